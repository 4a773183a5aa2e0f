//! BUZZ CLI - share a bus driver's live location from the command line.
//!
//! The phone app is the primary driver client; this binary drives the same
//! reporting engine from a recorded track, which is handy for demos, field
//! testing the backend and replaying a route after the fact.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::health::HealthArgs;
use commands::login::LoginArgs;
use commands::share::ShareArgs;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "buzz")]
#[command(version, about = "Share a bus driver's live location with BUZZ", long_about = None)]
struct Cli {
    /// Enable debug logging (also mirrors logs to stdout)
    #[arg(long, global = true)]
    debug: bool,

    /// Use this config file instead of ~/.buzz/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in as a driver and print the assigned bus
    Login(LoginArgs),

    /// Share live location by replaying a recorded track
    Share(ShareArgs),

    /// Check that the backend is reachable and healthy
    Health(HealthArgs),

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let Cli {
        debug,
        config,
        command,
    } = Cli::parse();
    let config = config.as_deref();

    let result = match command {
        Commands::Login(args) => {
            CliRunner::new(config, debug).and_then(|runner| commands::login::run(args, &runner))
        }
        Commands::Share(args) => {
            CliRunner::new(config, debug).and_then(|runner| commands::share::run(args, &runner))
        }
        Commands::Health(args) => {
            CliRunner::new(config, debug).and_then(|runner| commands::health::run(args, &runner))
        }
        Commands::Config { command } => commands::config::run(command, config),
    };

    if let Err(e) = result {
        e.exit();
    }
}
