//! Platform location services consumed by the reporter.
//!
//! The reporter never talks to a device directly. Permission prompts, the
//! foreground position watch and OS-scheduled background updates are all
//! reached through the [`LocationPlatform`] trait so that a phone runtime, a
//! replayed track or a test double can sit behind the same engine.
//!
//! Async methods return [`BoxFuture`] so the trait stays dyn-compatible and
//! the reporter can hold an `Arc<dyn LocationPlatform>`.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;

use super::sample::PositionSample;

/// Callback invoked with each position the platform delivers.
pub type SampleCallback = Arc<dyn Fn(PositionSample) + Send + Sync>;

/// Result of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// The user granted access.
    Granted,
    /// The user refused access.
    Denied,
    /// The user has not answered yet.
    Undetermined,
}

impl PermissionStatus {
    /// Whether location access may be used.
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Requested fix accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocationAccuracy {
    Lowest,
    Low,
    /// Roughly 100m; the platform mixes GPS with network positioning.
    #[default]
    Balanced,
    High,
    Highest,
}

/// Options for the foreground position watch.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchOptions {
    /// Requested accuracy.
    pub accuracy: LocationAccuracy,
    /// Minimum movement in meters between callbacks.
    pub distance_interval_m: f64,
    /// Minimum time between callbacks.
    pub time_interval: Duration,
}

/// Options for OS-scheduled background location updates.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundUpdateOptions {
    /// Requested accuracy.
    pub accuracy: LocationAccuracy,
    /// Minimum movement in meters between deliveries.
    pub distance_interval_m: f64,
    /// Minimum time between deliveries.
    pub time_interval: Duration,
    /// Let the OS pause updates while the device is stationary.
    pub pauses_updates_automatically: bool,
    /// Show the OS background-location indicator.
    pub shows_background_indicator: bool,
    /// Title of the foreground-service notification.
    pub notification_title: String,
    /// Body of the foreground-service notification.
    pub notification_body: String,
}

/// Errors reported by platform location services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// Location services are turned off or missing.
    #[error("Location services unavailable: {0}")]
    Unavailable(String),

    /// The operation is not supported on this platform.
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),

    /// The platform rejected the request.
    #[error("{0}")]
    Failed(String),
}

/// Handle to an open position watch.
///
/// Removing the subscription stops further callbacks.
pub trait WatchSubscription: Send {
    /// Stop delivering positions.
    fn remove(&mut self);
}

/// Device location services.
///
/// Foreground permission and the position watch are required. Background
/// updates are optional and default to unsupported.
pub trait LocationPlatform: Send + Sync {
    /// Ask for foreground location permission.
    fn request_foreground_permission(&self) -> BoxFuture<'_, Result<PermissionStatus, PlatformError>>;

    /// Open a continuous position watch delivering samples to `callback`.
    fn watch_position(
        &self,
        options: WatchOptions,
        callback: SampleCallback,
    ) -> BoxFuture<'_, Result<Box<dyn WatchSubscription>, PlatformError>>;

    /// Whether OS-level background location updates exist on this platform.
    fn supports_background(&self) -> bool {
        false
    }

    /// Ask for background location permission.
    fn request_background_permission(&self) -> BoxFuture<'_, Result<PermissionStatus, PlatformError>> {
        Box::pin(async { Ok(PermissionStatus::Denied) })
    }

    /// Define the named background task with the OS.
    ///
    /// This is a process-wide registration; the reporter calls it at most
    /// once per process.
    fn define_background_task(&self, _task_name: &str) -> Result<(), PlatformError> {
        Err(PlatformError::Unsupported("background tasks"))
    }

    /// Whether background updates for `task_name` are currently running.
    fn has_started_location_updates<'a>(
        &'a self,
        _task_name: &'a str,
    ) -> BoxFuture<'a, Result<bool, PlatformError>> {
        Box::pin(async { Ok(false) })
    }

    /// Start background updates for `task_name`.
    fn start_location_updates<'a>(
        &'a self,
        _task_name: &'a str,
        _options: BackgroundUpdateOptions,
    ) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async { Err(PlatformError::Unsupported("background location updates")) })
    }

    /// Stop background updates for `task_name`.
    fn stop_location_updates<'a>(&'a self, _task_name: &'a str) -> BoxFuture<'a, Result<(), PlatformError>> {
        Box::pin(async { Ok(()) })
    }
}
