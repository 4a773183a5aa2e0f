//! Position samples produced by the platform location service.

use chrono::{DateTime, Utc};

/// A single position fix reported by the device.
///
/// Samples are immutable once captured. The timestamp is the time the
/// platform took the fix, not the time the sample reached the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionSample {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl PositionSample {
    /// Create a new sample stamped with the current time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Utc::now(),
        }
    }

    /// Create a sample with an explicit timestamp.
    pub fn with_timestamp(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    /// The position as a `(latitude, longitude)` pair.
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
