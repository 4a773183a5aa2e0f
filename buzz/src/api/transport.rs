//! HTTP delivery of location updates.

use futures::future::BoxFuture;
use tracing::debug;

use super::build_http_client;
use super::error::ApiError;
use crate::location::{LocationTransport, LocationUpdate, TransportError};

/// Posts location updates to `{base_url}/driver/location`.
///
/// Any non-2xx answer is a failure; the reporter retries it with backoff.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport with its own HTTP client.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self::with_client(build_http_client()?, base_url))
    }

    /// Create a transport reusing an existing HTTP client.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/driver/location", base_url.trim_end_matches('/')),
        }
    }

    /// Full URL updates are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, update: LocationUpdate) -> Result<(), TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&update)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        debug!(
            bus_id = %update.bus_id,
            latitude = update.latitude,
            longitude = update.longitude,
            "Location posted"
        );
        Ok(())
    }
}

impl LocationTransport for HttpTransport {
    fn send(&self, update: LocationUpdate) -> BoxFuture<'_, Result<(), TransportError>> {
        Box::pin(self.post(update))
    }
}
