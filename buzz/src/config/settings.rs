//! Typed configuration sections.

use std::path::PathBuf;
use std::time::Duration;

use crate::location::{
    BackgroundServiceConfig, ReporterConfig, DEFAULT_DISTANCE_THRESHOLD_M,
    DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_BACKOFF_MS, DEFAULT_NOTIFICATION_BODY,
    DEFAULT_NOTIFICATION_TITLE, DEFAULT_TIME_THRESHOLD_MS,
};

/// Complete contents of `config.ini`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub api: ApiSettings,
    pub location: LocationSettings,
    pub background: BackgroundSettings,
    pub logging: LoggingSettings,
}

/// `[api]` section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiSettings {
    /// Backend base URL. `None` falls back to the environment or the default.
    pub base_url: Option<String>,
}

/// `[location]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub distance_threshold_m: f64,
    pub time_threshold_ms: u64,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub background_updates: bool,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            distance_threshold_m: DEFAULT_DISTANCE_THRESHOLD_M,
            time_threshold_ms: DEFAULT_TIME_THRESHOLD_MS,
            initial_backoff_ms: DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            background_updates: false,
        }
    }
}

/// `[background]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSettings {
    pub notification_title: String,
    pub notification_body: String,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            notification_title: DEFAULT_NOTIFICATION_TITLE.to_string(),
            notification_body: DEFAULT_NOTIFICATION_BODY.to_string(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path.
    pub file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: super::file::default_log_file(),
        }
    }
}

impl ConfigFile {
    /// Reporter configuration built from the `[location]` and `[background]`
    /// sections.
    pub fn reporter_config(&self) -> ReporterConfig {
        ReporterConfig::default()
            .with_distance_threshold(self.location.distance_threshold_m)
            .with_time_threshold(Duration::from_millis(self.location.time_threshold_ms))
            .with_backoff(
                Duration::from_millis(self.location.initial_backoff_ms),
                Duration::from_millis(self.location.max_backoff_ms),
            )
            .with_background_updates(self.location.background_updates)
            .with_background_service(BackgroundServiceConfig {
                notification_title: self.background.notification_title.clone(),
                notification_body: self.background.notification_body.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reporter_config_matches_engine_defaults() {
        assert_eq!(ConfigFile::default().reporter_config(), ReporterConfig::default());
    }

    #[test]
    fn test_reporter_config_carries_overrides() {
        let mut config = ConfigFile::default();
        config.location.distance_threshold_m = 40.0;
        config.location.time_threshold_ms = 30_000;
        config.location.background_updates = true;
        config.background.notification_title = "Bus 11".to_string();

        let reporter = config.reporter_config();
        assert_eq!(reporter.distance_threshold_m, 40.0);
        assert_eq!(reporter.time_threshold, Duration::from_secs(30));
        assert!(reporter.enable_background_updates);
        assert_eq!(reporter.background_service.notification_title, "Bus 11");
    }
}
