//! Coordination audit events.
//!
//! Each processed validation event leaves exactly one record describing
//! where it was routed and how presentation went, for audit trails and
//! debugging.

use chrono::{DateTime, Utc};

use crate::router::Destination;

/// How one coordination pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinationOutcome {
    /// The pass completed as routed.
    Completed,
    /// Presentation fell back to a lesser channel; the message says why.
    Degraded(String),
}

impl std::fmt::Display for CoordinationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
        }
    }
}

/// Audit record emitted after each coordination pass.
#[derive(Debug, Clone)]
pub struct CoordinationEvent {
    pub timestamp: DateTime<Utc>,
    pub destination: Destination,
    pub outcome: CoordinationOutcome,
    pub detail: String,
}

impl CoordinationEvent {
    pub fn new(
        destination: Destination,
        outcome: CoordinationOutcome,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            destination,
            outcome,
            detail: detail.into(),
        }
    }

    /// Record for a pass that suppressed presentation.
    pub fn suppressed(detail: impl Into<String>) -> Self {
        Self::new(Destination::Suppress, CoordinationOutcome::Completed, detail)
    }
}

/// Trait for sinks that receive coordination events.
///
/// Implementations can store events, log them, or broadcast them to
/// subscribers.
pub trait CoordinationEventSink: Send + Sync {
    fn record(&self, event: CoordinationEvent);
}

/// In-memory event sink for testing.
#[derive(Default)]
pub struct InMemoryEventSink {
    events: std::sync::Mutex<Vec<CoordinationEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CoordinationEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self) -> usize {
        match self.events.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}

impl CoordinationEventSink for InMemoryEventSink {
    fn record(&self, event: CoordinationEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

/// No-op event sink that discards all events.
pub struct NullEventSink;

impl CoordinationEventSink for NullEventSink {
    fn record(&self, _event: CoordinationEvent) {}
}
