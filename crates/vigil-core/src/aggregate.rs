//! Flattening of validation result trees into presentable message lists.

use crate::severity::Severity;
use crate::status::StatusNode;

/// Fixed notice appended once to the message list when any error-severity
/// leaf was found. Also used as the lead text of error dialogs.
pub const ERROR_NOTICE: &str = "Live validation produced an error.";

/// Outcome of flattening one validation event's result forest.
///
/// Produced fresh per event and discarded after presentation; never cached
/// or shared between events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    /// One formatted line per non-ok node, in depth-first pre-order, plus
    /// the trailing [`ERROR_NOTICE`] when errors were found.
    pub formatted_messages: Vec<String>,
    /// Any leaf was warning severity or worse.
    pub has_problems: bool,
    /// Any leaf was error severity or worse.
    pub has_errors: bool,
}

/// Flatten a result forest into formatted messages.
///
/// Depth-first pre-order: each non-ok node contributes one line, and
/// children are visited regardless of their parent's own severity, so an
/// ok container still surfaces its problematic children. Repeated
/// identical messages are preserved in traversal order.
pub fn aggregate(roots: &[StatusNode]) -> AggregationResult {
    let mut result = roots.iter().fold(AggregationResult::default(), fold_node);
    if result.has_errors {
        result.formatted_messages.push(ERROR_NOTICE.to_string());
    }
    result
}

fn fold_node(mut acc: AggregationResult, node: &StatusNode) -> AggregationResult {
    if !node.is_ok() {
        let line = match node.severity {
            Severity::Error | Severity::Cancel => {
                acc.has_problems = true;
                acc.has_errors = true;
                format!("[ERROR] {}", node.message)
            }
            Severity::Warning => {
                acc.has_problems = true;
                format!("[WARN] {}", node.message)
            }
            _ => format!("[NOTE] {}", node.message),
        };
        acc.formatted_messages.push(line);
    }
    if node.is_multi() {
        acc = node.children.iter().fold(acc, fold_node);
    }
    acc
}
