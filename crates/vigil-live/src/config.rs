//! Presentation preferences and the configuration contract.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Where live validation problems should be presented (user preference).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemsDestination {
    Console,
    Dialog,
}

impl ProblemsDestination {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Dialog => "dialog",
        }
    }
}

impl std::fmt::Display for ProblemsDestination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One consistent view of the presentation preferences.
///
/// Routing reads this as a single value so concurrent preference edits can
/// never be observed field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub destination: ProblemsDestination,
    /// Show warning-only results in a dialog instead of the console.
    pub warnings_in_dialog: bool,
    /// Raise the console when problems were written to it.
    pub show_console_on_problem: bool,
}

impl Default for PresentationConfig {
    /// A fresh installation: dialogs on, warnings included, console raised
    /// on problems.
    fn default() -> Self {
        Self {
            destination: ProblemsDestination::Dialog,
            warnings_in_dialog: true,
            show_console_on_problem: true,
        }
    }
}

/// Read-write access to the host's validation preferences.
///
/// Implementations back onto whatever store the host uses; queries are
/// assumed bounded-time, and a failing store surfaces as
/// [`ConfigError::Unavailable`] rather than hanging.
pub trait ConfigurationSource: Send + Sync {
    /// Context ids registered for live presentation.
    fn list_registered_context_ids(&self) -> Result<Vec<String>, ConfigError>;

    /// One atomic snapshot of the presentation preferences.
    fn snapshot(&self) -> Result<PresentationConfig, ConfigError>;

    /// Persist the "show warning-only results in a dialog" preference.
    ///
    /// Written when the user accepts the dialog opt-out; the next routing
    /// decision observes the new value.
    fn set_warnings_in_dialog(&self, enabled: bool) -> Result<(), ConfigError>;
}

/// In-memory configuration for embedding and tests.
pub struct InMemoryConfiguration {
    context_ids: Mutex<Vec<String>>,
    config: Mutex<PresentationConfig>,
}

impl Default for InMemoryConfiguration {
    fn default() -> Self {
        Self::new(PresentationConfig::default())
    }
}

impl InMemoryConfiguration {
    pub fn new(config: PresentationConfig) -> Self {
        Self {
            context_ids: Mutex::new(Vec::new()),
            config: Mutex::new(config),
        }
    }

    /// Register context ids eligible for live presentation.
    pub fn with_context_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.context_ids.lock() {
            Ok(mut guard) => guard.extend(ids.into_iter().map(Into::into)),
            Err(poisoned) => poisoned
                .into_inner()
                .extend(ids.into_iter().map(Into::into)),
        }
        self
    }

    /// Replace the registered context ids.
    pub fn set_context_ids(&self, ids: Vec<String>) {
        match self.context_ids.lock() {
            Ok(mut guard) => *guard = ids,
            Err(poisoned) => *poisoned.into_inner() = ids,
        }
    }

    /// Replace the whole preference snapshot in one step.
    pub fn set_config(&self, config: PresentationConfig) {
        match self.config.lock() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}

impl ConfigurationSource for InMemoryConfiguration {
    fn list_registered_context_ids(&self) -> Result<Vec<String>, ConfigError> {
        let ids = match self.context_ids.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(ids)
    }

    fn snapshot(&self) -> Result<PresentationConfig, ConfigError> {
        let config = match self.config.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        };
        Ok(config)
    }

    fn set_warnings_in_dialog(&self, enabled: bool) -> Result<(), ConfigError> {
        match self.config.lock() {
            Ok(mut guard) => guard.warnings_in_dialog = enabled,
            Err(poisoned) => poisoned.into_inner().warnings_in_dialog = enabled,
        }
        Ok(())
    }
}
