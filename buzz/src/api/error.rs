//! Driver API errors.

use thiserror::Error;

/// Errors from the driver API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The phone number is shorter than ten characters after trimming.
    #[error("Please enter a valid phone number")]
    InvalidPhone,

    /// The server refused the login.
    #[error("Login failed: {0}")]
    LoginRejected(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// The request did not complete.
    #[error("Network request failed: {0}")]
    Http(String),

    /// The server answered with something we could not understand.
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}
