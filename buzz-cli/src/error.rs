//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use buzz::api::ApiError;
use buzz::config::ConfigFileError;
use buzz::location::ReplayError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Configuration file could not be read or written
    ConfigFile(ConfigFileError),
    /// Backend request failed
    Api(ApiError),
    /// Track file could not be loaded
    Track { path: String, error: ReplayError },
    /// Location sharing could not start
    Sharing(String),
    /// Backend answered but reported itself unhealthy
    Unhealthy(String),
    /// Failed to install the Ctrl+C handler
    Signal(String),
    /// Failed to build the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Api(ApiError::Http(_)) | CliError::Unhealthy(_) => {
                eprintln!();
                eprintln!("Check that the backend is running and reachable:");
                eprintln!("  1. Set [api] base_url in ~/.buzz/config.ini, or");
                eprintln!("  2. Export BUZZ_API_BASE_URL, or");
                eprintln!("  3. Pass --base-url");
            }
            CliError::Track { .. } => {
                eprintln!();
                eprintln!("Track files contain one 'latitude,longitude' pair per line.");
                eprintln!("Blank lines and lines starting with '#' are ignored.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Api(e) => write!(f, "{}", e),
            CliError::Track { path, error } => {
                write!(f, "Failed to load track '{}': {}", path, error)
            }
            CliError::Sharing(msg) => write!(f, "Location sharing failed: {}", msg),
            CliError::Unhealthy(url) => write!(f, "Backend at {} reported unhealthy", url),
            CliError::Signal(msg) => write!(f, "Failed to install Ctrl+C handler: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Api(e) => Some(e),
            CliError::Track { error, .. } => Some(error),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        CliError::Api(e)
    }
}
