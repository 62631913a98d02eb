//! Daemon command - re-populate the cache on a fixed interval.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use super::on_ctrl_c;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the daemon command until Ctrl+C.
pub async fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("daemon");
    let adapter = runner.create_adapter()?;

    let daemon = adapter.daemon();
    let task = daemon.task();

    println!("phetlab daemon v{}", phetlab::VERSION);
    println!("====================");
    println!();
    println!("Task:     {}", task.name);
    println!("Interval: {}h", task.interval.as_secs() / 3600);
    println!("Workers:  {}", runner.config().warming.workers);
    println!();
    println!("Press Ctrl+C to stop");

    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    on_ctrl_c(move || token.cancel());

    let passes = daemon.run(shutdown).await;

    println!("Daemon stopped after {} completed passes.", passes);
    Ok(())
}
