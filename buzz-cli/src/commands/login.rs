//! `buzz login` - look up the bus assigned to a driver.

use clap::Args;

use crate::commands::common::ApiArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `buzz login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Driver phone number (at least 10 digits)
    #[arg(long)]
    pub phone: String,

    #[command(flatten)]
    pub api: ApiArgs,
}

/// Log in and print the assigned bus id.
pub fn run(args: LoginArgs, runner: &CliRunner) -> Result<(), CliError> {
    let api = args.api.driver_api(runner.config())?;
    let bus_id = runner.block_on(api.login(&args.phone))?;

    println!("Logged in as driver for bus {}", bus_id);
    Ok(())
}
