//! Constraint descriptors and the enablement selection model.
//!
//! The selection model backs a preferences surface: each registered
//! constraint gets a node with a working checked state that can be
//! applied to, reverted from, or reset against the preference store.
//! Mandatory and errored constraints have a fixed state.

use std::collections::HashMap;
use std::sync::Mutex;

use vigil_core::event::EvaluationMode;
use vigil_core::severity::Severity;

/// Static description of a registered constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    pub evaluation_mode: EvaluationMode,
    /// Mandatory constraints cannot be disabled.
    pub mandatory: bool,
    /// Errored constraints failed to load and cannot be enabled.
    pub errored: bool,
    /// Ids of the categories this constraint belongs to.
    pub categories: Vec<String>,
}

impl ConstraintDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            severity: Severity::Error,
            evaluation_mode: EvaluationMode::Batch,
            mandatory: false,
            errored: false,
            categories: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_evaluation_mode(mut self, mode: EvaluationMode) -> Self {
        self.evaluation_mode = mode;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn errored(mut self) -> Self {
        self.errored = true;
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Default enablement: on, unless the constraint is broken.
    pub fn default_enabled(&self) -> bool {
        !self.errored
    }
}

/// Persisted enablement preferences for constraints.
pub trait ConstraintPreferenceStore: Send + Sync {
    /// The stored enablement for `constraint_id`, if any was written.
    fn is_enabled(&self, constraint_id: &str) -> Option<bool>;

    fn set_enabled(&self, constraint_id: &str, enabled: bool);

    /// Remove any stored enablement, falling back to the default.
    fn clear(&self, constraint_id: &str);
}

/// In-memory store for embedding and tests.
#[derive(Default)]
pub struct InMemoryPreferenceStore {
    entries: Mutex<HashMap<String, bool>>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConstraintPreferenceStore for InMemoryPreferenceStore {
    fn is_enabled(&self, constraint_id: &str) -> Option<bool> {
        match self.entries.lock() {
            Ok(guard) => guard.get(constraint_id).copied(),
            Err(poisoned) => poisoned.into_inner().get(constraint_id).copied(),
        }
    }

    fn set_enabled(&self, constraint_id: &str, enabled: bool) {
        match self.entries.lock() {
            Ok(mut guard) => {
                guard.insert(constraint_id.to_string(), enabled);
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(constraint_id.to_string(), enabled);
            }
        }
    }

    fn clear(&self, constraint_id: &str) {
        match self.entries.lock() {
            Ok(mut guard) => {
                guard.remove(constraint_id);
            }
            Err(poisoned) => {
                poisoned.into_inner().remove(constraint_id);
            }
        }
    }
}

/// Working selection state for one constraint.
#[derive(Debug, Clone)]
pub struct ConstraintNode {
    descriptor: ConstraintDescriptor,
    checked: bool,
}

impl ConstraintNode {
    /// Initial state from the store: the stored preference when present,
    /// the descriptor default otherwise. Mandatory constraints are always
    /// checked, errored constraints never.
    pub fn from_store(
        descriptor: ConstraintDescriptor,
        store: &dyn ConstraintPreferenceStore,
    ) -> Self {
        let checked = if descriptor.errored {
            false
        } else if descriptor.mandatory {
            true
        } else {
            store
                .is_enabled(&descriptor.id)
                .unwrap_or_else(|| descriptor.default_enabled())
        };
        Self {
            descriptor,
            checked,
        }
    }

    pub fn descriptor(&self) -> &ConstraintDescriptor {
        &self.descriptor
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Change the working state. No effect for mandatory or errored
    /// constraints.
    pub fn set_checked(&mut self, checked: bool) {
        if self.descriptor.mandatory || self.descriptor.errored {
            return;
        }
        self.checked = checked;
    }

    /// Write my working state to the store.
    pub fn apply_to(&self, store: &dyn ConstraintPreferenceStore) {
        store.set_enabled(&self.descriptor.id, self.checked);
    }

    /// Reload my working state from the store.
    pub fn revert_from(&mut self, store: &dyn ConstraintPreferenceStore) {
        *self = Self::from_store(self.descriptor.clone(), store);
    }

    /// Back to the default state, dropping any stored preference.
    pub fn restore_defaults(&mut self, store: &dyn ConstraintPreferenceStore) {
        store.clear(&self.descriptor.id);
        self.revert_from(store);
    }
}
