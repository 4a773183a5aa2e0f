//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`health`] - Backend health check
//! - [`login`] - Driver login by phone number
//! - [`share`] - Live location sharing from a recorded track

pub mod common;
pub mod config;
pub mod health;
pub mod login;
pub mod share;
