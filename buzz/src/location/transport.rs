//! Delivery of location updates to the backend.

use futures::future::BoxFuture;
use serde::Serialize;
use thiserror::Error;

use super::sample::PositionSample;

/// JSON body of `POST /driver/location`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    /// Subject identifier (the bus the driver is operating).
    pub bus_id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LocationUpdate {
    /// Build an update for `bus_id` from a sample.
    pub fn new(bus_id: impl Into<String>, sample: &PositionSample) -> Self {
        Self {
            bus_id: bus_id.into(),
            latitude: sample.latitude,
            longitude: sample.longitude,
        }
    }
}

/// Errors from delivering an update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("Failed with status {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("Request failed: {0}")]
    Request(String),
}

/// Sends location updates somewhere.
///
/// Implementations must treat any non-2xx answer as a failure.
pub trait LocationTransport: Send + Sync {
    /// Deliver one update.
    fn send(&self, update: LocationUpdate) -> BoxFuture<'_, Result<(), TransportError>>;
}
