//! Validation events delivered to listeners.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;
use crate::status::StatusNode;

/// How a validation run was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Automatic validation in response to an edit.
    Live,
    /// On-demand validation of a selection.
    Batch,
}

impl EvaluationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Batch => "batch",
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl std::fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation run outcome, delivered to listeners fire-and-forget.
///
/// The aggregate severity always equals the worst severity among the
/// leaves of `results`; it is computed at construction and cannot drift.
#[derive(Debug, Clone)]
pub struct ValidationEvent {
    pub evaluation_mode: EvaluationMode,
    severity: Severity,
    /// Identifiers of the modeling contexts that produced the event.
    pub client_context_ids: BTreeSet<String>,
    pub results: Vec<StatusNode>,
    pub occurred_at: DateTime<Utc>,
}

impl ValidationEvent {
    pub fn new(
        evaluation_mode: EvaluationMode,
        client_context_ids: BTreeSet<String>,
        results: Vec<StatusNode>,
    ) -> Self {
        let severity = results
            .iter()
            .map(StatusNode::worst_severity)
            .max()
            .unwrap_or(Severity::Ok);
        Self {
            evaluation_mode,
            severity,
            client_context_ids,
            results,
            occurred_at: Utc::now(),
        }
    }

    /// The worst severity among all result leaves.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Whether the event is at least as severe as `at_least`.
    pub fn matches(&self, at_least: Severity) -> bool {
        self.severity.matches(at_least)
    }
}
