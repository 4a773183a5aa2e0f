//! HTTP client for the BUZZ backend.
//!
//! - [`DriverApi`] - driver login and health check
//! - [`HttpTransport`] - delivers location updates for the reporter
//!
//! # Base URL
//!
//! [`resolve_base_url`] picks the backend address from, in order: the
//! `BUZZ_API_BASE_URL` environment variable, the configured value, and
//! [`DEFAULT_API_BASE_URL`].

mod client;
mod error;
mod transport;

use std::time::Duration;

pub use client::DriverApi;
pub use error::ApiError;
pub use transport::HttpTransport;

/// Backend address used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Environment variable overriding the backend address.
pub const API_BASE_URL_ENV: &str = "BUZZ_API_BASE_URL";

/// Timeout applied to every backend request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve the backend base URL.
///
/// Empty values are skipped. Trailing slashes are removed so paths can be
/// appended directly.
pub fn resolve_base_url(configured: Option<&str>) -> String {
    let from_env = std::env::var(API_BASE_URL_ENV).ok();
    resolve_from(from_env.as_deref(), configured)
}

fn resolve_from(from_env: Option<&str>, configured: Option<&str>) -> String {
    let chosen = [from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_BASE_URL);
    chosen.trim_end_matches('/').to_string()
}

pub(crate) fn build_http_client() -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_HTTP_TIMEOUT)
        .build()
        .map_err(|e| ApiError::Client(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_nothing_set() {
        assert_eq!(resolve_from(None, None), "http://localhost:5000");
    }

    #[test]
    fn test_environment_wins_over_config() {
        assert_eq!(
            resolve_from(Some("https://buzz.example.edu"), Some("http://10.0.0.2:5000")),
            "https://buzz.example.edu"
        );
    }

    #[test]
    fn test_config_used_without_environment() {
        assert_eq!(
            resolve_from(None, Some("http://10.0.0.2:5000")),
            "http://10.0.0.2:5000"
        );
    }

    #[test]
    fn test_empty_values_are_skipped() {
        assert_eq!(
            resolve_from(Some("  "), Some("http://10.0.0.2:5000")),
            "http://10.0.0.2:5000"
        );
        assert_eq!(resolve_from(Some(""), Some("")), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        assert_eq!(
            resolve_from(None, Some("http://10.0.0.2:5000//")),
            "http://10.0.0.2:5000"
        );
    }
}
