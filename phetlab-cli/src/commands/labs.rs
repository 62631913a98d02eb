//! Laboratory and language listing.

use std::path::Path;

use clap::Args;
use phetlab::adapter::LabFilter;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the labs command.
#[derive(Debug, Args)]
pub struct LabsArgs {
    /// Only laboratories in this subject domain (e.g. physics)
    #[arg(long)]
    pub domain: Option<String>,

    /// Only laboratories for this age range (e.g. ">18", "14-16")
    #[arg(long)]
    pub age_range: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Run the labs command.
pub async fn run(config_path: Option<&Path>, args: LabsArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("labs");
    let adapter = runner.create_adapter()?;

    let filter = LabFilter {
        domain: args.domain,
        age_range: args.age_range,
    };
    let labs = adapter.get_laboratories(&filter).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&labs)?);
        return Ok(());
    }

    for lab in &labs {
        println!("{}", lab.name);
        println!("  id:      {}", lab.laboratory_id);
        if !lab.domains.is_empty() {
            println!("  domains: {}", lab.domains.join(", "));
        }
        if !lab.age_ranges.is_empty() {
            println!("  ages:    {}", lab.age_ranges.join(", "));
        }
    }
    println!();
    println!("{} laboratories", labs.len());
    Ok(())
}

/// Run the languages command.
pub async fn run_languages(config_path: Option<&Path>) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path)?;
    runner.log_startup("languages");
    let adapter = runner.create_adapter()?;

    let languages = adapter.languages().await?;
    println!("{}", languages.join(" "));
    Ok(())
}
