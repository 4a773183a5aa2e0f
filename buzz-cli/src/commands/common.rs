//! Arguments and helpers shared across CLI commands.

use clap::Args;

use buzz::api::DriverApi;
use buzz::config::ConfigFile;

use crate::error::CliError;

/// Backend selection flags.
#[derive(Debug, Args)]
pub struct ApiArgs {
    /// Backend base URL (overrides BUZZ_API_BASE_URL and the config file)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl ApiArgs {
    /// Build a driver API client honouring flag > environment > config.
    pub fn driver_api(&self, config: &ConfigFile) -> Result<DriverApi, CliError> {
        let api = match &self.base_url {
            Some(url) => DriverApi::new(url.as_str())?,
            None => DriverApi::from_configured(config.api.base_url.as_deref())?,
        };
        Ok(api)
    }
}
