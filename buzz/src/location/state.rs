//! Observable reporter state.

use std::fmt;

use super::sample::PositionSample;

/// Lifecycle state of the location reporter.
///
/// ```text
/// Idle --start()--> Running
/// Idle --start() fails--> Error
/// Running | Error --stop()--> Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReporterStatus {
    /// Not watching the position.
    #[default]
    Idle,
    /// Watch active and permission granted.
    Running,
    /// Permission denied, no subject, or the watch failed to open.
    Error,
}

impl ReporterStatus {
    /// Short lowercase name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReporterStatus::Idle => "idle",
            ReporterStatus::Running => "running",
            ReporterStatus::Error => "error",
        }
    }
}

impl fmt::Display for ReporterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time copy of everything a UI may show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterSnapshot {
    /// Lifecycle state.
    pub status: ReporterStatus,
    /// Most recent start or send error, cleared on the next success.
    pub last_error: Option<String>,
    /// Most recent position seen, whether or not it was sent.
    pub last_location: Option<PositionSample>,
    /// Whether OS-level background updates are running.
    ///
    /// `false` while `Running` means the reporter works in foreground only,
    /// e.g. because background permission was refused.
    pub background_active: bool,
}
