//! `buzz share` - report live location from a recorded track.
//!
//! Replays the track through the location reporter exactly as a phone would
//! deliver positions: throttled, one request in flight, failed sends retried
//! with backoff. Runs until the track ends or Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgGroup, Args};
use tokio_util::sync::CancellationToken;
use tracing::info;

use buzz::location::{LocationReporter, ReplayPlatform, ReporterSnapshot, ReporterStatus};

use crate::commands::common::ApiArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// How long to keep running after the last track point so its send can land.
const FINAL_FLUSH: Duration = Duration::from_secs(2);

/// Arguments for `buzz share`.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("driver").required(true).args(["bus_id", "phone"])))]
pub struct ShareArgs {
    /// Bus to report for
    #[arg(long)]
    pub bus_id: Option<String>,

    /// Log in with this phone number to find the bus
    #[arg(long)]
    pub phone: Option<String>,

    /// Track file with one 'latitude,longitude' pair per line
    #[arg(long, value_name = "FILE")]
    pub track: PathBuf,

    /// Delay between track points in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Request background location updates (ignored where unsupported)
    #[arg(long)]
    pub background: bool,

    #[command(flatten)]
    pub api: ApiArgs,
}

/// Share location until the track ends or the user interrupts.
pub fn run(args: ShareArgs, runner: &CliRunner) -> Result<(), CliError> {
    let config = runner.config();
    let api = args.api.driver_api(config)?;

    let bus_id = match (args.bus_id, args.phone) {
        (Some(bus_id), _) => bus_id,
        (None, Some(phone)) => runner.block_on(api.login(&phone))?,
        (None, None) => {
            return Err(CliError::Config(
                "either --bus-id or --phone is required".to_string(),
            ))
        }
    };

    let platform =
        ReplayPlatform::from_track_file(&args.track, Duration::from_millis(args.interval_ms))
            .map_err(|error| CliError::Track {
                path: args.track.display().to_string(),
                error,
            })?;
    let track_finished = platform.finished();
    let points = platform.len();

    let reporter_config = config
        .reporter_config()
        .with_background_updates(args.background || config.location.background_updates);
    let reporter = LocationReporter::new(
        Some(bus_id.clone()),
        reporter_config,
        Arc::new(platform),
        Arc::new(api.location_transport()),
    );

    let shutdown = CancellationToken::new();
    let handler_token = shutdown.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .map_err(|e| CliError::Signal(e.to_string()))?;

    runner.block_on(async {
        reporter.start().await;
        let snapshot = reporter.snapshot();
        if snapshot.status == ReporterStatus::Error {
            return Err(CliError::Sharing(snapshot.last_error.unwrap_or_default()));
        }

        info!(bus_id = %bus_id, points, backend = %api.base_url(), "Sharing started");
        println!(
            "Sharing location for bus {} to {} ({} points). Press Ctrl+C to stop.",
            bus_id,
            api.base_url(),
            points
        );

        let mut updates = reporter.subscribe();
        let mut previous = updates.borrow_and_update().clone();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    println!("Stopping...");
                    break;
                }
                _ = track_finished.cancelled() => {
                    let _ = tokio::time::timeout(FINAL_FLUSH, shutdown.cancelled()).await;
                    println!("Track finished.");
                    break;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = updates.borrow_and_update().clone();
                    report_change(&previous, &current);
                    previous = current;
                }
            }
        }

        reporter.stop().await;
        Ok(())
    })
}

/// Print the parts of the snapshot a driver cares about.
fn report_change(previous: &ReporterSnapshot, current: &ReporterSnapshot) {
    if current.last_location != previous.last_location {
        if let Some(sample) = current.last_location {
            println!("  position {:.5}, {:.5}", sample.latitude, sample.longitude);
        }
    }
    if current.last_error != previous.last_error {
        match &current.last_error {
            Some(error) => println!("  send failed: {} (retrying)", error),
            None => println!("  backend reachable again"),
        }
    }
    if current.background_active && !previous.background_active {
        println!("  background updates active");
    }
}
