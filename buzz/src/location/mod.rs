//! Driver location reporting.
//!
//! The [`LocationReporter`] watches the device position through a
//! [`LocationPlatform`], throttles samples with a [`SendThrottle`] and delivers
//! them through a [`LocationTransport`], retrying failed sends with
//! exponential [`Backoff`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use buzz::api::HttpTransport;
//! use buzz::location::{LocationReporter, ReplayPlatform, ReporterConfig};
//!
//! let platform = Arc::new(ReplayPlatform::from_track_file(path, Duration::from_secs(1))?);
//! let transport = Arc::new(HttpTransport::new("http://localhost:5000")?);
//! let reporter = LocationReporter::new(
//!     Some("11".to_string()),
//!     ReporterConfig::default(),
//!     platform,
//!     transport,
//! );
//!
//! reporter.start().await;
//! // ...
//! reporter.stop().await;
//! ```
//!
//! # Background updates
//!
//! Platforms that support OS-scheduled background location deliver batches
//! through [`dispatch_background_event`]. Positions that arrive before a
//! reporter is running are buffered and handed over when it starts.

mod backoff;
mod bridge;
mod config;
mod error;
mod platform;
mod replay;
mod reporter;
mod sample;
mod state;
mod throttle;
mod transport;

pub use backoff::{Backoff, DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_BACKOFF_MS};
pub use bridge::{dispatch_background_event, BackgroundTaskEvent};
pub use config::{
    BackgroundServiceConfig, ReporterConfig, DEFAULT_DISTANCE_THRESHOLD_M,
    DEFAULT_NOTIFICATION_BODY, DEFAULT_NOTIFICATION_TITLE, DEFAULT_TIME_THRESHOLD_MS,
    DRIVER_LOCATION_TASK,
};
pub use error::ReporterError;
pub use platform::{
    BackgroundUpdateOptions, LocationAccuracy, LocationPlatform, PermissionStatus, PlatformError,
    SampleCallback, WatchOptions, WatchSubscription,
};
pub use replay::{ReplayError, ReplayPlatform};
pub use reporter::LocationReporter;
pub use sample::PositionSample;
pub use state::{ReporterSnapshot, ReporterStatus};
pub use throttle::{SendThrottle, SentMarker, ThrottleDecision};
pub use transport::{LocationTransport, LocationUpdate, TransportError};
