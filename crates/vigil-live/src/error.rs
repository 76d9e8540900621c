//! Error types for the live presentation service.
//!
//! These never escape to the event producer; the coordinator absorbs them
//! and degrades presentation instead.

use thiserror::Error;

/// Configuration lookups that could not be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The backing preference/registry store could not be queried.
    #[error("configuration unavailable: {message}")]
    Unavailable { message: String },
}

/// Presentation dispatch failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    /// No interactive session can currently show dialogs.
    #[error("interactive host is not available")]
    HostUnavailable,

    /// The interactive host went away before responding.
    #[error("interactive host closed before responding")]
    Closed,

    /// The host reported a display failure.
    #[error("presentation failed: {message}")]
    Failed { message: String },
}
