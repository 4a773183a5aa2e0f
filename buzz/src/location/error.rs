//! Errors that stop the reporter from starting.

use thiserror::Error;

/// Reasons `start()` ends in [`ReporterStatus::Error`](super::ReporterStatus::Error).
///
/// The display text is what the reporter stores as `last_error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReporterError {
    /// No subject identifier was supplied.
    #[error("Missing subject id for location sharing")]
    MissingSubject,

    /// Foreground location permission was refused.
    #[error("Location permission not granted")]
    PermissionDenied,

    /// The permission request itself failed.
    #[error("Failed to request location permission: {0}")]
    PermissionRequest(String),

    /// `start` was polled outside a Tokio runtime.
    #[error("Location sharing requires a Tokio runtime")]
    NoRuntime,

    /// The position watch could not be opened.
    #[error("Failed to start location updates: {0}")]
    Watch(String),
}
