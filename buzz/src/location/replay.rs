//! Host-side platform that replays a recorded track.
//!
//! Used by the CLI to drive a real reporter from a file of coordinates. A
//! track file has one `latitude,longitude` pair per line; blank lines and
//! lines starting with `#` are ignored.
//!
//! ```text
//! # Main gate to library
//! 13.0105,80.2354
//! 13.0108,80.2361
//! ```

use std::path::Path;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::platform::{
    LocationPlatform, PermissionStatus, PlatformError, SampleCallback, WatchOptions,
    WatchSubscription,
};
use super::sample::PositionSample;

/// Errors loading a track.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The track file could not be read.
    #[error("Failed to read track file: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid coordinate pair.
    #[error("Line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The track contains no points.
    #[error("Track contains no points")]
    Empty,
}

/// Replays a fixed list of coordinates as a position watch.
pub struct ReplayPlatform {
    track: Vec<(f64, f64)>,
    interval: Duration,
    permission: PermissionStatus,
    finished: CancellationToken,
}

impl ReplayPlatform {
    /// Replay `track` with one point every `interval`.
    pub fn new(track: Vec<(f64, f64)>, interval: Duration) -> Self {
        Self {
            track,
            interval,
            permission: PermissionStatus::Granted,
            finished: CancellationToken::new(),
        }
    }

    /// Parse a track from text.
    pub fn from_track_str(text: &str, interval: Duration) -> Result<Self, ReplayError> {
        let track = parse_track(text)?;
        Ok(Self::new(track, interval))
    }

    /// Load a track file.
    pub fn from_track_file(path: &Path, interval: Duration) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_track_str(&text, interval)
    }

    /// Simulate the user granting or refusing location permission.
    pub fn with_permission(mut self, granted: bool) -> Self {
        self.permission = if granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        self
    }

    /// Number of points in the track.
    pub fn len(&self) -> usize {
        self.track.len()
    }

    /// Whether the track is empty.
    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }

    /// Cancelled once a watch has emitted every point.
    pub fn finished(&self) -> CancellationToken {
        self.finished.clone()
    }
}

fn parse_track(text: &str) -> Result<Vec<(f64, f64)>, ReplayError> {
    let mut track = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |reason: String| ReplayError::Parse {
            line: index + 1,
            reason,
        };

        let (lat, lon) = line
            .split_once(',')
            .ok_or_else(|| parse_error(format!("expected 'latitude,longitude', got '{line}'")))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("invalid latitude '{}'", lat.trim())))?;
        let longitude: f64 = lon
            .trim()
            .parse()
            .map_err(|_| parse_error(format!("invalid longitude '{}'", lon.trim())))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(parse_error(format!("latitude {latitude} out of range")));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(parse_error(format!("longitude {longitude} out of range")));
        }
        track.push((latitude, longitude));
    }

    if track.is_empty() {
        return Err(ReplayError::Empty);
    }
    Ok(track)
}

struct ReplaySubscription {
    cancel: CancellationToken,
}

impl WatchSubscription for ReplaySubscription {
    fn remove(&mut self) {
        self.cancel.cancel();
    }
}

impl Drop for ReplaySubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl LocationPlatform for ReplayPlatform {
    fn request_foreground_permission(
        &self,
    ) -> BoxFuture<'_, Result<PermissionStatus, PlatformError>> {
        let permission = self.permission;
        Box::pin(async move { Ok(permission) })
    }

    fn watch_position(
        &self,
        _options: WatchOptions,
        callback: SampleCallback,
    ) -> BoxFuture<'_, Result<Box<dyn WatchSubscription>, PlatformError>> {
        Box::pin(async move {
            let cancel = CancellationToken::new();
            let token = cancel.clone();
            let track = self.track.clone();
            let finished = self.finished.clone();
            let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));

            tokio::spawn(async move {
                for (index, (latitude, longitude)) in track.into_iter().enumerate() {
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!(point = index, "Track replay cancelled");
                            return;
                        }
                        _ = ticker.tick() => callback(PositionSample::new(latitude, longitude)),
                    }
                }
                debug!("Track replay finished");
                finished.cancel();
            });

            Ok(Box::new(ReplaySubscription { cancel }) as Box<dyn WatchSubscription>)
        })
    }
}
