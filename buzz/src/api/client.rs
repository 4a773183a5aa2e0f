//! Driver login and backend health.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::error::ApiError;
use super::transport::HttpTransport;
use super::{build_http_client, resolve_base_url};

/// Message shown when the server rejects a login without saying why.
const DEFAULT_LOGIN_ERROR: &str = "Invalid driver phone number";

/// Minimum phone number length after trimming.
const MIN_PHONE_LEN: usize = 10;

#[derive(Serialize)]
struct LoginRequest<'a> {
    phone: &'a str,
}

#[derive(Deserialize, Default)]
struct LoginResponse {
    #[serde(default)]
    ok: bool,
    #[serde(rename = "busId", default)]
    bus_id: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    #[serde(default)]
    ok: bool,
}

/// Client for the driver endpoints of the BUZZ backend.
///
/// Holds a pooled `reqwest::Client` with a 10 second timeout.
#[derive(Clone)]
pub struct DriverApi {
    http: reqwest::Client,
    base_url: String,
}

impl DriverApi {
    /// Create a client for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: build_http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for the resolved base URL.
    ///
    /// See [`resolve_base_url`].
    pub fn from_configured(configured: Option<&str>) -> Result<Self, ApiError> {
        Self::new(resolve_base_url(configured))
    }

    /// Backend base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Location transport sharing this client's connection pool.
    pub fn location_transport(&self) -> HttpTransport {
        HttpTransport::with_client(self.http.clone(), &self.base_url)
    }

    /// Log a driver in by phone number and return the assigned bus id.
    pub async fn login(&self, phone: &str) -> Result<String, ApiError> {
        let phone = validate_phone(phone)?;
        let url = format!("{}/driver/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { phone })
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        debug!(status = status.as_u16(), "Driver login response received");
        let bus_id = parse_login_response(status.is_success(), &body)?;
        info!(bus_id = %bus_id, "Driver logged in");
        Ok(bus_id)
    }

    /// Ask the backend whether it can reach its database.
    ///
    /// Returns `Ok(false)` when the server answers but reports itself
    /// unhealthy, and an error when it cannot be reached.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        let success = response.status().is_success();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let healthy = serde_json::from_slice::<HealthResponse>(&body)
            .map(|h| h.ok)
            .unwrap_or(false);
        Ok(success && healthy)
    }
}

fn validate_phone(phone: &str) -> Result<&str, ApiError> {
    let trimmed = phone.trim();
    if trimmed.chars().count() < MIN_PHONE_LEN {
        return Err(ApiError::InvalidPhone);
    }
    Ok(trimmed)
}

fn parse_login_response(success: bool, body: &[u8]) -> Result<String, ApiError> {
    let parsed = serde_json::from_slice::<LoginResponse>(body);

    let response = match parsed {
        Ok(response) => response,
        Err(e) if success => return Err(ApiError::InvalidResponse(e.to_string())),
        Err(_) => LoginResponse::default(),
    };

    if !success || !response.ok {
        let message = response
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string());
        return Err(ApiError::LoginRejected(message));
    }

    match response.bus_id {
        Some(Value::String(id)) if !id.is_empty() => Ok(id),
        Some(Value::Number(id)) => Ok(id.to_string()),
        other => Err(ApiError::InvalidResponse(format!(
            "unexpected busId: {}",
            other.map(|v| v.to_string()).unwrap_or_else(|| "missing".into())
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_is_trimmed() {
        assert_eq!(validate_phone("  9876543210 ").unwrap(), "9876543210");
    }

    #[test]
    fn test_short_phone_rejected() {
        assert!(matches!(validate_phone("12345"), Err(ApiError::InvalidPhone)));
        assert!(matches!(validate_phone("   123456789  "), Err(ApiError::InvalidPhone)));
        assert!(matches!(validate_phone(""), Err(ApiError::InvalidPhone)));
    }

    #[test]
    fn test_numeric_bus_id() {
        let body = br#"{"ok": true, "busId": 11}"#;
        assert_eq!(parse_login_response(true, body).unwrap(), "11");
    }

    #[test]
    fn test_string_bus_id() {
        let body = br#"{"ok": true, "busId": "11B", "name": "Ravi"}"#;
        assert_eq!(parse_login_response(true, body).unwrap(), "11B");
    }

    #[test]
    fn test_rejection_uses_server_message() {
        let body = br#"{"ok": false, "error": "Driver not found"}"#;
        match parse_login_response(false, body) {
            Err(ApiError::LoginRejected(message)) => assert_eq!(message, "Driver not found"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rejection_falls_back_to_default_message() {
        match parse_login_response(true, br#"{"ok": false}"#) {
            Err(ApiError::LoginRejected(message)) => {
                assert_eq!(message, "Invalid driver phone number")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        match parse_login_response(false, b"<html>Bad Gateway</html>") {
            Err(ApiError::LoginRejected(message)) => {
                assert_eq!(message, "Invalid driver phone number")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_success_without_bus_id_is_invalid() {
        assert!(matches!(
            parse_login_response(true, br#"{"ok": true}"#),
            Err(ApiError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_login_response(true, b"not json"),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let api = DriverApi::new("http://localhost:5000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
    }
}
