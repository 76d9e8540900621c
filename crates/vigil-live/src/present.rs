//! Presentation contracts: interactive dialogs and the categorized console.

use async_trait::async_trait;

use vigil_core::aggregate::AggregationResult;
use vigil_core::severity::Severity;

use crate::error::PresentError;

/// Title of live validation dialogs.
pub const DIALOG_TITLE: &str = "Live Validation";

/// Lead text for warning dialogs, first paragraph.
pub const WARNING_MESSAGE_LEAD: &str = "Problems were found in the changes you just made.";

/// Lead text for warning dialogs, second paragraph.
pub const WARNING_MESSAGE_DETAIL: &str =
    "You may want to correct them before continuing to work with the model.";

/// Label of the dialog opt-out check box.
pub const SUPPRESS_CHECKBOX_LABEL: &str = "Don't show this dialog again";

/// A dialog to be shown in the interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    /// Severity-dependent lead text shown above the details.
    pub message: String,
    /// Summary line taken from the first result matching the event
    /// severity.
    pub headline: String,
    /// Source of the headline result when the event carried exactly one
    /// result; otherwise the presenter's own identifier.
    pub source_id: String,
    /// Result code of the headline result when the event carried exactly
    /// one result; otherwise zero.
    pub code: i32,
    /// Severity to display, fixed at construction. Distinct from the raw
    /// event severity: a recovered error is informational by the time a
    /// live dialog appears, while a warning still needs the user's
    /// attention.
    pub display_severity: Severity,
    pub details: AggregationResult,
    /// Whether to offer the "don't show this again" opt-out.
    pub allow_suppress_checkbox: bool,
}

/// The user's answer to a dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialogResponse {
    /// True when the user accepted the warnings opt-out.
    pub suppress_future_warnings: bool,
}

/// An interactive presentation host.
///
/// Implementations marshal the dialog onto whatever thread the host
/// reserves for interaction; see `interactive::InteractiveChannel` for the
/// stock implementation.
#[async_trait]
pub trait InteractiveHost: Send + Sync {
    /// Whether an interactive session can currently show dialogs.
    fn is_available(&self) -> bool;

    /// Show a dialog and wait for the user's response.
    async fn present_dialog(&self, request: DialogRequest) -> Result<DialogResponse, PresentError>;
}

/// A categorized console/log sink.
///
/// Output is best-effort: a sink that cannot write drops the line rather
/// than failing the caller.
pub trait ConsoleSink: Send + Sync {
    /// Append one line under `category`.
    fn println(&self, category: &str, text: &str);

    /// Bring the console for `category` to the front, if one is open.
    fn show(&self, category: &str);
}
