//! Translations command - languages and strings of one laboratory.

use std::path::Path;

use clap::Args;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the translations command.
#[derive(Debug, Args)]
pub struct TranslationsArgs {
    /// Laboratory id (as printed by `phetlab labs`)
    pub laboratory_id: String,

    /// Only list supported languages
    #[arg(long)]
    pub list: bool,
}

/// Run the translations command.
pub async fn run(config_path: Option<&Path>, args: TranslationsArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("translations");
    let adapter = runner.create_adapter()?;

    if args.list {
        let list = adapter.get_translation_list(&args.laboratory_id).await?;
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        let response = adapter.get_translations(&args.laboratory_id).await;
        println!("{}", serde_json::to_string_pretty(response.as_ref())?);
    }
    Ok(())
}
