//! Reserve command - resolve the load URL of one laboratory.

use std::path::Path;

use clap::Args;
use phetlab::adapter::ReservationRequest;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the reserve command.
#[derive(Debug, Args)]
pub struct ReserveArgs {
    /// Laboratory id (as printed by `phetlab labs`)
    pub laboratory_id: String,

    /// Requested language (falls back to English when unavailable)
    #[arg(long, default_value = "en")]
    pub locale: String,
}

/// Run the reserve command.
pub async fn run(config_path: Option<&Path>, args: ReserveArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("reserve");
    let adapter = runner.create_adapter()?;

    let request = ReservationRequest::new(args.laboratory_id).with_locale(args.locale);
    let reservation = adapter.reserve(&request).await?;
    let widget = adapter.load_widget(&reservation.reservation_id, "default");

    println!("{}", widget.url);
    Ok(())
}
