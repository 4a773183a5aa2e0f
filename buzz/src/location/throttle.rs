//! Distance/time throttle for outgoing location updates.
//!
//! The platform watch already pre-filters positions by distance and interval,
//! but those filters are best-effort. The [`SendThrottle`] applies the same
//! thresholds at the application level against the last position that was
//! actually delivered to the backend.
//!
//! A sample is discarded only when it is **both** closer than the distance
//! threshold **and** sooner than the time threshold. Either condition alone is
//! enough to send.

use std::time::Duration;

use tokio::time::Instant;

use super::sample::PositionSample;
use crate::geo::haversine_distance_m;

/// The last sample successfully delivered, and when it was delivered.
#[derive(Debug, Clone, Copy)]
pub struct SentMarker {
    /// Coordinates that were sent.
    pub sample: PositionSample,
    /// Monotonic time of the successful send.
    pub sent_at: Instant,
}

impl SentMarker {
    /// Create a marker for a sample sent at `sent_at`.
    pub fn new(sample: PositionSample, sent_at: Instant) -> Self {
        Self { sample, sent_at }
    }
}

/// Outcome of evaluating a sample against the throttle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleDecision {
    /// Nothing has been sent yet; the sample is queued unconditionally.
    FirstSample,
    /// The sample is far enough away or enough time has passed.
    Send {
        /// Distance from the last sent position in meters.
        distance_m: f64,
        /// Time since the last successful send.
        elapsed: Duration,
    },
    /// The sample is within both thresholds and is dropped.
    Discard {
        /// Distance from the last sent position in meters.
        distance_m: f64,
        /// Time since the last successful send.
        elapsed: Duration,
    },
}

impl ThrottleDecision {
    /// Whether the sample should be queued for sending.
    pub fn should_send(&self) -> bool {
        !matches!(self, ThrottleDecision::Discard { .. })
    }
}

/// Application-level send throttle.
#[derive(Debug, Clone, Copy)]
pub struct SendThrottle {
    distance_threshold_m: f64,
    time_threshold: Duration,
}

impl SendThrottle {
    /// Create a throttle with the given thresholds.
    pub fn new(distance_threshold_m: f64, time_threshold: Duration) -> Self {
        Self {
            distance_threshold_m,
            time_threshold,
        }
    }

    /// Distance threshold in meters.
    pub fn distance_threshold_m(&self) -> f64 {
        self.distance_threshold_m
    }

    /// Time threshold.
    pub fn time_threshold(&self) -> Duration {
        self.time_threshold
    }

    /// Decide whether `sample`, observed at `now`, should be sent.
    pub fn evaluate(
        &self,
        last_sent: Option<&SentMarker>,
        sample: &PositionSample,
        now: Instant,
    ) -> ThrottleDecision {
        let Some(last) = last_sent else {
            return ThrottleDecision::FirstSample;
        };

        let distance_m = haversine_distance_m(last.sample.coords(), sample.coords());
        let elapsed = now.saturating_duration_since(last.sent_at);

        if distance_m < self.distance_threshold_m && elapsed < self.time_threshold {
            ThrottleDecision::Discard {
                distance_m,
                elapsed,
            }
        } else {
            ThrottleDecision::Send {
                distance_m,
                elapsed,
            }
        }
    }
}
