//! The presentation routing decision table.

use vigil_core::event::EvaluationMode;
use vigil_core::severity::Severity;

use crate::config::{PresentationConfig, ProblemsDestination};

/// The presentation channel chosen for one validation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Destination {
    Suppress,
    Dialog,
    Console,
}

impl Destination {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Suppress => "suppress",
            Self::Dialog => "dialog",
            Self::Console => "console",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the routing decision reads, captured as one value.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext {
    pub evaluation_mode: EvaluationMode,
    pub severity: Severity,
    /// Outcome of the client-context filter for this event.
    pub eligible: bool,
    /// Whether an interactive session can currently show dialogs.
    pub host_available: bool,
    /// Whether aggregation found any error-severity leaves.
    pub has_errors: bool,
    pub config: PresentationConfig,
}

/// Decide the destination for one event. Rules are evaluated in order and
/// the first match wins:
///
/// 1. non-live events are never presented
/// 2. severity below warning is never presented
/// 3. unregistered client contexts are never presented
/// 4. without an interactive host, the console is the only channel
/// 5. a console preference always goes to the console
/// 6. a dialog preference shows a dialog, except that a warnings-only
///    result goes to the console when the user opted out of warning
///    dialogs; errors always interrupt
pub fn route(ctx: RouteContext) -> Destination {
    if !ctx.evaluation_mode.is_live() {
        return Destination::Suppress;
    }
    if !ctx.severity.matches(Severity::Warning) {
        return Destination::Suppress;
    }
    if !ctx.eligible {
        return Destination::Suppress;
    }
    if !ctx.host_available {
        return Destination::Console;
    }
    match ctx.config.destination {
        ProblemsDestination::Console => Destination::Console,
        ProblemsDestination::Dialog => {
            if !ctx.has_errors && !ctx.config.warnings_in_dialog {
                Destination::Console
            } else {
                Destination::Dialog
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RouteContext {
        RouteContext {
            evaluation_mode: EvaluationMode::Live,
            severity: Severity::Error,
            eligible: true,
            host_available: true,
            has_errors: true,
            config: PresentationConfig::default(),
        }
    }

    #[test]
    fn batch_events_are_suppressed_regardless_of_severity() {
        let mut context = ctx();
        context.evaluation_mode = EvaluationMode::Batch;
        assert_eq!(route(context), Destination::Suppress);
    }

    #[test]
    fn sub_warning_severity_is_suppressed() {
        let mut context = ctx();
        context.severity = Severity::Info;
        context.has_errors = false;
        assert_eq!(route(context), Destination::Suppress);
    }

    #[test]
    fn ineligible_contexts_are_suppressed() {
        let mut context = ctx();
        context.eligible = false;
        assert_eq!(route(context), Destination::Suppress);
    }

    #[test]
    fn missing_host_forces_console_even_for_dialog_preference() {
        let mut context = ctx();
        context.host_available = false;
        context.config.destination = ProblemsDestination::Dialog;
        assert_eq!(route(context), Destination::Console);
    }

    #[test]
    fn console_preference_goes_to_console() {
        let mut context = ctx();
        context.config.destination = ProblemsDestination::Console;
        assert_eq!(route(context), Destination::Console);
    }

    #[test]
    fn errors_override_the_warnings_opt_out() {
        let mut context = ctx();
        context.config.destination = ProblemsDestination::Dialog;
        context.config.warnings_in_dialog = false;
        context.has_errors = true;
        assert_eq!(route(context), Destination::Dialog);
    }

    #[test]
    fn warnings_only_with_opt_out_goes_to_console() {
        let mut context = ctx();
        context.severity = Severity::Warning;
        context.config.destination = ProblemsDestination::Dialog;
        context.config.warnings_in_dialog = false;
        context.has_errors = false;
        assert_eq!(route(context), Destination::Console);
    }

    #[test]
    fn warnings_in_dialog_when_opted_in() {
        let mut context = ctx();
        context.severity = Severity::Warning;
        context.has_errors = false;
        context.config.destination = ProblemsDestination::Dialog;
        context.config.warnings_in_dialog = true;
        assert_eq!(route(context), Destination::Dialog);
    }
}
