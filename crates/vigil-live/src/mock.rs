//! Mock collaborators for unit testing.
//!
//! Configurable doubles that record all calls and return pre-configured
//! responses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::{ConfigurationSource, InMemoryConfiguration, PresentationConfig};
use crate::error::{ConfigError, PresentError};
use crate::present::{DialogRequest, DialogResponse, InteractiveHost};

/// Mock implementation of [`InteractiveHost`].
///
/// Responses are scripted in FIFO order; once the script runs out, the
/// default response (no opt-out) is returned.
pub struct MockInteractiveHost {
    available: AtomicBool,
    requests: Mutex<Vec<DialogRequest>>,
    responses: Mutex<VecDeque<DialogResponse>>,
    error: Mutex<Option<PresentError>>,
}

impl Default for MockInteractiveHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInteractiveHost {
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::new()),
            error: Mutex::new(None),
        }
    }

    /// Queue a scripted response for the next dialog.
    pub fn with_response(self, response: DialogResponse) -> Self {
        match self.responses.lock() {
            Ok(mut guard) => guard.push_back(response),
            Err(poisoned) => poisoned.into_inner().push_back(response),
        }
        self
    }

    /// Configure the next dialog to fail.
    pub fn with_error(self, err: PresentError) -> Self {
        match self.error.lock() {
            Ok(mut guard) => *guard = Some(err),
            Err(poisoned) => *poisoned.into_inner() = Some(err),
        }
        self
    }

    /// Toggle reported availability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// All dialog requests received so far.
    pub fn requests(&self) -> Vec<DialogRequest> {
        match self.requests.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn request_count(&self) -> usize {
        match self.requests.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

#[async_trait]
impl InteractiveHost for MockInteractiveHost {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn present_dialog(&self, request: DialogRequest) -> Result<DialogResponse, PresentError> {
        match self.requests.lock() {
            Ok(mut guard) => guard.push(request),
            Err(poisoned) => poisoned.into_inner().push(request),
        }

        let scripted_error = match self.error.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(err) = scripted_error {
            return Err(err);
        }

        let response = match self.responses.lock() {
            Ok(mut guard) => guard.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        Ok(response.unwrap_or_default())
    }
}

/// Configuration source whose every query fails, for fail-closed tests.
pub struct FailingConfiguration;

impl ConfigurationSource for FailingConfiguration {
    fn list_registered_context_ids(&self) -> Result<Vec<String>, ConfigError> {
        Err(ConfigError::Unavailable {
            message: "store offline".to_string(),
        })
    }

    fn snapshot(&self) -> Result<PresentationConfig, ConfigError> {
        Err(ConfigError::Unavailable {
            message: "store offline".to_string(),
        })
    }

    fn set_warnings_in_dialog(&self, _enabled: bool) -> Result<(), ConfigError> {
        Err(ConfigError::Unavailable {
            message: "store offline".to_string(),
        })
    }
}

/// Wraps [`InMemoryConfiguration`] and counts registry queries, to assert
/// how often the allow-list cache rebuilds.
pub struct CountingConfiguration {
    inner: InMemoryConfiguration,
    list_calls: AtomicUsize,
}

impl CountingConfiguration {
    pub fn new(inner: InMemoryConfiguration) -> Self {
        Self {
            inner,
            list_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `list_registered_context_ids` queries served.
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl ConfigurationSource for CountingConfiguration {
    fn list_registered_context_ids(&self) -> Result<Vec<String>, ConfigError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_registered_context_ids()
    }

    fn snapshot(&self) -> Result<PresentationConfig, ConfigError> {
        self.inner.snapshot()
    }

    fn set_warnings_in_dialog(&self, enabled: bool) -> Result<(), ConfigError> {
        self.inner.set_warnings_in_dialog(enabled)
    }
}
