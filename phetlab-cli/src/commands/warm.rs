//! Warm command - run one cache population pass with progress output.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use phetlab::warming::start_warming;

use super::on_ctrl_c;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Progress refresh interval.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Arguments for the warm command.
#[derive(Debug, Args)]
pub struct WarmArgs {
    /// Concurrent workers (overrides [warming] workers)
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Run the warm command.
pub async fn run(config_path: Option<&Path>, args: WarmArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("warm");
    let adapter = runner.create_adapter()?;

    let mut warmer = adapter.warmer();
    if let Some(workers) = args.workers {
        warmer = warmer.with_workers(workers);
    }
    println!("Populating cache with {} workers", warmer.workers());
    println!("Press Ctrl+C to stop");
    println!();

    let handle = start_warming(Arc::new(warmer));
    let interrupt = handle.clone();
    on_ctrl_c(move || interrupt.cancel());

    let mut ticker = tokio::time::interval(PROGRESS_INTERVAL);
    loop {
        ticker.tick().await;
        let status = handle.status();
        if status.total > 0 {
            print!(
                "\r  {}/{} ({:.0}%), {} failed",
                status.processed(),
                status.total,
                status.progress_fraction() * 100.0,
                status.failed
            );
            let _ = std::io::stdout().flush();
        }
        if status.is_complete {
            break;
        }
    }
    println!();

    let status = handle.status();
    if let Some(error) = &status.error {
        return Err(CliError::Warm(error.clone()));
    }

    let report = status.report();
    println!(
        "Done: {} completed, {} failed, {} cancelled",
        report.completed, report.failed, report.cancelled
    );
    if report.was_cancelled {
        println!("Pass was cancelled before all tasks ran.");
    }
    Ok(())
}
