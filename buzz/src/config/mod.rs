//! Configuration file handling for `~/.buzz/config.ini`.
//!
//! ```ini
//! [api]
//! base_url = http://10.0.0.2:5000
//!
//! [location]
//! distance_threshold = 25
//! time_threshold_ms = 15000
//! ```
//!
//! A missing file yields defaults. Settings structs live in `settings`,
//! parsing in `parser` and serialization in `writer`.

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, default_log_file, ConfigFileError};
pub use settings::{
    ApiSettings, BackgroundSettings, ConfigFile, LocationSettings, LoggingSettings,
};
