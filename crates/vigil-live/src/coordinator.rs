//! Live validation coordination: filter, aggregate, route, present.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use vigil_core::aggregate::{aggregate, AggregationResult, ERROR_NOTICE};
use vigil_core::event::ValidationEvent;
use vigil_core::severity::Severity;
use vigil_core::status::first_matching;

use crate::audit::{CoordinationEvent, CoordinationEventSink, CoordinationOutcome, NullEventSink};
use crate::config::{ConfigurationSource, PresentationConfig};
use crate::console::{PROBLEMS_HEADER, VALIDATION_CATEGORY};
use crate::context::ClientContextFilter;
use crate::error::PresentError;
use crate::present::{
    ConsoleSink, DialogRequest, InteractiveHost, DIALOG_TITLE, WARNING_MESSAGE_DETAIL,
    WARNING_MESSAGE_LEAD,
};
use crate::router::{route, Destination, RouteContext};

/// Source id attached to synthesized multi-result dialog summaries.
pub const COORDINATOR_SOURCE_ID: &str = "vigil.live";

/// Receives validation events, fire-and-forget.
///
/// Implementations never return an error to the producer; faults are
/// absorbed and presentation degrades instead.
#[async_trait]
pub trait ValidationListener: Send + Sync {
    async fn validation_occurred(&self, event: &ValidationEvent);
}

/// Phases of one coordination pass.
///
/// Every pass starts and ends at `Idle`; nothing carries over between
/// events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Filtering,
    Aggregating,
    Routing,
    Presenting,
}

/// What moved a pass forward (or back to idle).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStep {
    EventArrived,
    Eligible,
    Ineligible,
    Aggregated,
    Routed,
    Suppressed,
    Presented,
}

pub fn next_phase(_current: Phase, step: PhaseStep) -> Phase {
    match step {
        PhaseStep::EventArrived => Phase::Filtering,
        PhaseStep::Eligible => Phase::Aggregating,
        PhaseStep::Aggregated => Phase::Routing,
        PhaseStep::Routed => Phase::Presenting,
        PhaseStep::Ineligible | PhaseStep::Suppressed | PhaseStep::Presented => Phase::Idle,
    }
}

/// Orchestrates one pass per validation event: eligibility, aggregation,
/// routing, and dispatch to the chosen presentation sink.
pub struct LiveValidationCoordinator {
    config: Arc<dyn ConfigurationSource>,
    filter: ClientContextFilter,
    host: Arc<dyn InteractiveHost>,
    console: Arc<dyn ConsoleSink>,
    audit: Arc<dyn CoordinationEventSink>,
}

impl LiveValidationCoordinator {
    pub fn new(
        config: Arc<dyn ConfigurationSource>,
        host: Arc<dyn InteractiveHost>,
        console: Arc<dyn ConsoleSink>,
    ) -> Self {
        let filter = ClientContextFilter::new(Arc::clone(&config));
        Self {
            config,
            filter,
            host,
            console,
            audit: Arc::new(NullEventSink),
        }
    }

    /// Record coordination passes to `sink` instead of discarding them.
    pub fn with_audit_sink(mut self, sink: Arc<dyn CoordinationEventSink>) -> Self {
        self.audit = sink;
        self
    }

    /// The eligibility filter, so hosts can invalidate its allow-list when
    /// the context registry changes.
    pub fn context_filter(&self) -> &ClientContextFilter {
        &self.filter
    }

    async fn process(&self, event: &ValidationEvent) -> CoordinationEvent {
        let mut phase = next_phase(Phase::Idle, PhaseStep::EventArrived);
        debug!(
            ?phase,
            mode = %event.evaluation_mode,
            severity = %event.severity(),
            "validation event received"
        );

        if !self.filter.is_eligible(&event.client_context_ids) {
            phase = next_phase(phase, PhaseStep::Ineligible);
            debug!(?phase, "client contexts not registered for live presentation");
            return CoordinationEvent::suppressed("client contexts not registered");
        }

        phase = next_phase(phase, PhaseStep::Eligible);
        let aggregation = aggregate(&event.results);
        debug!(
            ?phase,
            messages = aggregation.formatted_messages.len(),
            "results aggregated"
        );

        phase = next_phase(phase, PhaseStep::Aggregated);
        let config = match self.config.snapshot() {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "presentation preferences unavailable; suppressing");
                return CoordinationEvent::suppressed("presentation preferences unavailable");
            }
        };
        let destination = route(RouteContext {
            evaluation_mode: event.evaluation_mode,
            severity: event.severity(),
            eligible: true,
            host_available: self.host.is_available(),
            has_errors: aggregation.has_errors,
            config,
        });
        debug!(?phase, destination = %destination, "destination chosen");

        let record = match destination {
            Destination::Suppress => {
                phase = next_phase(phase, PhaseStep::Suppressed);
                debug!(?phase, "nothing to present");
                return CoordinationEvent::suppressed("routing chose no presentation");
            }
            Destination::Console => {
                phase = next_phase(phase, PhaseStep::Routed);
                self.present_console(&aggregation, config);
                CoordinationEvent::new(
                    destination,
                    CoordinationOutcome::Completed,
                    pass_detail(&aggregation),
                )
            }
            Destination::Dialog => {
                phase = next_phase(phase, PhaseStep::Routed);
                match self.present_dialog(event, &aggregation).await {
                    Ok(()) => CoordinationEvent::new(
                        destination,
                        CoordinationOutcome::Completed,
                        pass_detail(&aggregation),
                    ),
                    Err(err) => {
                        warn!(error = %err, "dialog unavailable; falling back to console");
                        self.present_console(&aggregation, config);
                        CoordinationEvent::new(
                            Destination::Console,
                            CoordinationOutcome::Degraded(err.to_string()),
                            pass_detail(&aggregation),
                        )
                    }
                }
            }
        };
        phase = next_phase(phase, PhaseStep::Presented);
        debug!(?phase, "presentation complete");
        record
    }

    fn present_console(&self, aggregation: &AggregationResult, config: PresentationConfig) {
        if !aggregation.formatted_messages.is_empty() {
            self.console.println(VALIDATION_CATEGORY, PROBLEMS_HEADER);
            for message in &aggregation.formatted_messages {
                self.console.println(VALIDATION_CATEGORY, message);
            }
        }
        if aggregation.has_problems && config.show_console_on_problem {
            self.console.show(VALIDATION_CATEGORY);
        }
    }

    async fn present_dialog(
        &self,
        event: &ValidationEvent,
        aggregation: &AggregationResult,
    ) -> Result<(), PresentError> {
        let request = build_dialog_request(event, aggregation);
        let response = self.host.present_dialog(request).await?;
        if response.suppress_future_warnings {
            if let Err(err) = self.config.set_warnings_in_dialog(false) {
                warn!(error = %err, "could not persist the warnings opt-out");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ValidationListener for LiveValidationCoordinator {
    async fn validation_occurred(&self, event: &ValidationEvent) {
        let record = self.process(event).await;
        self.audit.record(record);
    }
}

/// Build the dialog for one event.
///
/// Display severity: warning when any result leaf is warning severity or
/// worse, informational otherwise. Errors reaching a live dialog have
/// already been corrected by the system, so they do not escalate the
/// display severity on their own; warnings still need the user's
/// attention.
pub fn build_dialog_request(
    event: &ValidationEvent,
    aggregation: &AggregationResult,
) -> DialogRequest {
    let display_severity = if event.matches(Severity::Warning) {
        Severity::Warning
    } else {
        Severity::Info
    };
    let primary = first_matching(&event.results, event.severity());
    let headline = primary
        .map(|status| status.message.clone())
        .unwrap_or_default();
    // A single result keeps its own identity in the dialog; only
    // aggregates get the synthesized summary identity.
    let (source_id, code) = match (event.results.len(), primary) {
        (1, Some(only)) => (only.source_id.clone(), only.code),
        _ => (COORDINATOR_SOURCE_ID.to_string(), 0),
    };
    let message = if event.matches(Severity::Error) {
        ERROR_NOTICE.to_string()
    } else {
        format!("{WARNING_MESSAGE_LEAD}\n\n{WARNING_MESSAGE_DETAIL}")
    };
    DialogRequest {
        title: DIALOG_TITLE.to_string(),
        message,
        headline,
        source_id,
        code,
        display_severity,
        details: aggregation.clone(),
        allow_suppress_checkbox: display_severity.matches(Severity::Warning),
    }
}

fn pass_detail(aggregation: &AggregationResult) -> String {
    format!(
        "{} message(s), errors: {}",
        aggregation.formatted_messages.len(),
        aggregation.has_errors
    )
}
