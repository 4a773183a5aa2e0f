//! Location reporter configuration.

use std::time::Duration;

use super::backoff::{DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_BACKOFF_MS};

/// Default minimum movement between sends, in meters.
pub const DEFAULT_DISTANCE_THRESHOLD_M: f64 = 25.0;

/// Default maximum quiet time between sends (15 seconds).
pub const DEFAULT_TIME_THRESHOLD_MS: u64 = 15_000;

/// Default title of the foreground-service notification.
pub const DEFAULT_NOTIFICATION_TITLE: &str = "BUZZ";

/// Default body of the foreground-service notification.
pub const DEFAULT_NOTIFICATION_BODY: &str = "Sharing your live location";

/// Name of the OS-level background location task.
pub const DRIVER_LOCATION_TASK: &str = "buzz-driver-location-updates";

/// Notification shown while background location updates run.
///
/// Only used when background updates are enabled and the platform requires
/// a visible foreground service for background location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundServiceConfig {
    /// Notification title.
    pub notification_title: String,
    /// Notification body.
    pub notification_body: String,
}

impl Default for BackgroundServiceConfig {
    fn default() -> Self {
        Self {
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            notification_body: DEFAULT_NOTIFICATION_BODY.to_string(),
        }
    }
}

/// Configuration for [`LocationReporter`](super::LocationReporter).
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterConfig {
    /// Minimum movement in meters before a new update is sent.
    pub distance_threshold_m: f64,

    /// Maximum time between updates while stationary.
    pub time_threshold: Duration,

    /// Retry delay after the first failed send.
    pub initial_backoff: Duration,

    /// Upper bound for the retry delay.
    pub max_backoff: Duration,

    /// Also request OS-level background location updates.
    pub enable_background_updates: bool,

    /// Notification text for background updates.
    pub background_service: BackgroundServiceConfig,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            distance_threshold_m: DEFAULT_DISTANCE_THRESHOLD_M,
            time_threshold: Duration::from_millis(DEFAULT_TIME_THRESHOLD_MS),
            initial_backoff: Duration::from_millis(DEFAULT_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_MAX_BACKOFF_MS),
            enable_background_updates: false,
            background_service: BackgroundServiceConfig::default(),
        }
    }
}

impl ReporterConfig {
    /// Set the distance threshold in meters.
    pub fn with_distance_threshold(mut self, meters: f64) -> Self {
        self.distance_threshold_m = meters;
        self
    }

    /// Set the time threshold.
    pub fn with_time_threshold(mut self, threshold: Duration) -> Self {
        self.time_threshold = threshold;
        self
    }

    /// Set the initial and maximum retry delays.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Enable or disable background updates.
    pub fn with_background_updates(mut self, enabled: bool) -> Self {
        self.enable_background_updates = enabled;
        self
    }

    /// Set the background notification text.
    pub fn with_background_service(mut self, service: BackgroundServiceConfig) -> Self {
        self.background_service = service;
        self
    }
}
