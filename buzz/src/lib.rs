//! BUZZ - live bus location sharing for the campus bus tracker
//!
//! This library provides the driver-side location reporting engine: it watches
//! the device position, throttles updates by distance and time, and delivers
//! them to the BUZZ backend with retry and exponential backoff.
//!
//! # Modules
//!
//! - [`location`] - The location reporting engine and its platform seams
//! - [`geo`] - Great-circle distance calculations
//! - [`api`] - HTTP client for the BUZZ backend
//! - [`config`] - Configuration file handling (`~/.buzz/config.ini`)
//! - [`logging`] - Tracing subscriber setup

pub mod api;
pub mod config;
pub mod geo;
pub mod location;
pub mod logging;

/// Library version, taken from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
