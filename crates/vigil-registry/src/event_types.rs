//! Registry of contributed validation event types.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

/// A contributed event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventType {
    pub name: String,
    /// Whether changes of this type are scoped to a single feature of the
    /// changed element.
    pub feature_specific: bool,
}

/// A host change notice. Notification generators translate host-specific
/// notices into the ones the validation service reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub event_type: String,
    pub detail: String,
}

impl ChangeNotice {
    pub fn new(event_type: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            detail: detail.into(),
        }
    }
}

/// Translates host-specific change notices into validation triggers.
pub trait NotificationGenerator: Send + Sync {
    fn generate(&self, changes: &[ChangeNotice]) -> Vec<ChangeNotice>;
}

/// One entry from the host's event-type configuration.
pub struct EventTypeEntry {
    pub name: String,
    pub feature_specific: bool,
    pub generator: Option<Arc<dyn NotificationGenerator>>,
}

/// Registry of event types keyed by name, with the notification
/// generators contributed alongside them.
#[derive(Default)]
pub struct EventTypeRegistry {
    types: HashMap<String, EventType>,
    generators: HashMap<String, Arc<dyn NotificationGenerator>>,
}

impl EventTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load contributed entries.
    ///
    /// Entries with an empty name are skipped with a diagnostic; one bad
    /// entry never aborts the rest.
    pub fn configure(&mut self, entries: Vec<EventTypeEntry>) {
        for entry in entries {
            if entry.name.is_empty() {
                warn!("skipping contributed event type with an empty name");
                continue;
            }
            self.types.insert(
                entry.name.clone(),
                EventType {
                    name: entry.name.clone(),
                    feature_specific: entry.feature_specific,
                },
            );
            if let Some(generator) = entry.generator {
                self.generators.insert(entry.name, generator);
            }
        }
    }

    pub fn event_type(&self, name: &str) -> Option<&EventType> {
        self.types.get(name)
    }

    pub fn event_types(&self) -> impl Iterator<Item = &EventType> {
        self.types.values()
    }

    /// The generator contributed for `name`, if any.
    pub fn notification_generator(&self, name: &str) -> Option<&Arc<dyn NotificationGenerator>> {
        self.generators.get(name)
    }

    pub fn notification_generators(&self) -> impl Iterator<Item = &Arc<dyn NotificationGenerator>> {
        self.generators.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PassThroughGenerator;

    impl NotificationGenerator for PassThroughGenerator {
        fn generate(&self, changes: &[ChangeNotice]) -> Vec<ChangeNotice> {
            changes.to_vec()
        }
    }

    #[test]
    fn configure_registers_types_and_generators() {
        let mut registry = EventTypeRegistry::new();
        registry.configure(vec![
            EventTypeEntry {
                name: "attribute-set".to_string(),
                feature_specific: true,
                generator: None,
            },
            EventTypeEntry {
                name: "element-moved".to_string(),
                feature_specific: false,
                generator: Some(Arc::new(PassThroughGenerator)),
            },
        ]);

        let found = match registry.event_type("attribute-set") {
            Some(event_type) => event_type,
            None => panic!("expected registered type"),
        };
        assert!(found.feature_specific);
        assert!(registry.notification_generator("attribute-set").is_none());
        assert!(registry.notification_generator("element-moved").is_some());
        assert_eq!(registry.event_types().count(), 2);
        assert_eq!(registry.notification_generators().count(), 1);
    }

    #[test]
    fn empty_names_are_skipped() {
        let mut registry = EventTypeRegistry::new();
        registry.configure(vec![
            EventTypeEntry {
                name: String::new(),
                feature_specific: false,
                generator: Some(Arc::new(PassThroughGenerator)),
            },
            EventTypeEntry {
                name: "kept".to_string(),
                feature_specific: false,
                generator: None,
            },
        ]);

        assert_eq!(registry.event_types().count(), 1);
        assert!(registry.event_type("kept").is_some());
        assert_eq!(registry.notification_generators().count(), 0);
    }

    #[test]
    fn reconfiguring_replaces_existing_entries() {
        let mut registry = EventTypeRegistry::new();
        registry.configure(vec![EventTypeEntry {
            name: "attribute-set".to_string(),
            feature_specific: true,
            generator: None,
        }]);
        registry.configure(vec![EventTypeEntry {
            name: "attribute-set".to_string(),
            feature_specific: false,
            generator: None,
        }]);

        let found = match registry.event_type("attribute-set") {
            Some(event_type) => event_type,
            None => panic!("expected registered type"),
        };
        assert!(!found.feature_specific);
    }

    #[test]
    fn generators_translate_notices() {
        let generator = PassThroughGenerator;
        let notices = vec![ChangeNotice::new("attribute-set", "width: 3 -> 4")];
        assert_eq!(generator.generate(&notices), notices);
    }
}
