//! Immutable validation status trees.
//!
//! A validation run produces a forest of status nodes. Leaves carry the
//! user-facing messages; a node with children is a container that groups
//! sub-results and is never itself displayed as a leaf message.

use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// One node of a validation result tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNode {
    pub severity: Severity,
    pub message: String,
    /// Opaque identifier of the subsystem that produced this result.
    pub source_id: String,
    /// Host-defined result code, carried through unchanged.
    #[serde(default)]
    pub code: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StatusNode>,
}

impl StatusNode {
    /// A leaf result with no children.
    pub fn leaf(
        severity: Severity,
        source_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            source_id: source_id.into(),
            code: 0,
            children: Vec::new(),
        }
    }

    /// A container node grouping `children`. Its severity is the worst
    /// severity among the children (`Ok` when there are none).
    pub fn multi(
        source_id: impl Into<String>,
        message: impl Into<String>,
        children: Vec<StatusNode>,
    ) -> Self {
        let severity = children
            .iter()
            .map(StatusNode::worst_severity)
            .max()
            .unwrap_or(Severity::Ok);
        Self {
            severity,
            message: message.into(),
            source_id: source_id.into(),
            code: 0,
            children,
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn is_multi(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_ok(&self) -> bool {
        self.severity == Severity::Ok
    }

    /// Whether this node is at least as severe as `at_least`.
    pub fn matches(&self, at_least: Severity) -> bool {
        self.severity.matches(at_least)
    }

    /// The worst severity among the leaves of this subtree.
    pub fn worst_severity(&self) -> Severity {
        if self.children.is_empty() {
            self.severity
        } else {
            self.children
                .iter()
                .map(StatusNode::worst_severity)
                .max()
                .unwrap_or(self.severity)
        }
    }
}

/// The first of `results` at least as severe as `severity`, falling back
/// to the first result when none matches. `None` only for an empty slice.
pub fn first_matching(results: &[StatusNode], severity: Severity) -> Option<&StatusNode> {
    results
        .iter()
        .find(|status| status.matches(severity))
        .or_else(|| results.first())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn status_trees_round_trip_through_serde() {
        let node = StatusNode::multi(
            "vigil.test",
            "container",
            vec![StatusNode::leaf(Severity::Warning, "vigil.test", "w").with_code(7)],
        );
        let json = serde_json::to_string(&node).expect("serialize");
        let parsed: StatusNode = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, node);
    }

    #[test]
    fn leaves_serialize_without_a_children_field() {
        let leaf = StatusNode::leaf(Severity::Info, "vigil.test", "note");
        let json = serde_json::to_string(&leaf).expect("serialize");
        assert!(!json.contains("children"));
        assert!(json.contains("\"info\""));
    }

    #[test]
    fn multi_takes_worst_child_severity() {
        let node = StatusNode::multi(
            "vigil.test",
            "container",
            vec![
                StatusNode::leaf(Severity::Info, "vigil.test", "a"),
                StatusNode::leaf(Severity::Error, "vigil.test", "b"),
                StatusNode::leaf(Severity::Warning, "vigil.test", "c"),
            ],
        );
        assert_eq!(node.severity, Severity::Error);
        assert!(node.is_multi());
    }

    #[test]
    fn empty_multi_is_ok() {
        let node = StatusNode::multi("vigil.test", "container", Vec::new());
        assert_eq!(node.severity, Severity::Ok);
        assert!(!node.is_multi());
    }

    #[test]
    fn worst_severity_descends_into_nested_children() {
        let node = StatusNode::multi(
            "vigil.test",
            "outer",
            vec![StatusNode::multi(
                "vigil.test",
                "inner",
                vec![StatusNode::leaf(Severity::Cancel, "vigil.test", "deep")],
            )],
        );
        assert_eq!(node.worst_severity(), Severity::Cancel);
    }

    #[test]
    fn first_matching_prefers_severity_then_falls_back() {
        let results = vec![
            StatusNode::leaf(Severity::Warning, "vigil.test", "warn"),
            StatusNode::leaf(Severity::Error, "vigil.test", "boom"),
        ];
        let found = match first_matching(&results, Severity::Error) {
            Some(status) => status,
            None => panic!("expected a match"),
        };
        assert_eq!(found.message, "boom");

        let fallback = match first_matching(&results, Severity::Cancel) {
            Some(status) => status,
            None => panic!("expected fallback"),
        };
        assert_eq!(fallback.message, "warn");

        assert!(first_matching(&[], Severity::Ok).is_none());
    }
}
