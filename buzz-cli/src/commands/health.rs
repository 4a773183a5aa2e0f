//! `buzz health` - check the backend.

use clap::Args;

use crate::commands::common::ApiArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `buzz health`.
#[derive(Debug, Args)]
pub struct HealthArgs {
    #[command(flatten)]
    pub api: ApiArgs,
}

/// Query `/health` and report the result.
pub fn run(args: HealthArgs, runner: &CliRunner) -> Result<(), CliError> {
    let api = args.api.driver_api(runner.config())?;
    let healthy = runner.block_on(api.health())?;

    if !healthy {
        return Err(CliError::Unhealthy(api.base_url().to_string()));
    }
    println!("Backend at {} is healthy", api.base_url());
    Ok(())
}
