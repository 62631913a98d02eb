//! phetlab CLI - Command-line interface
//!
//! This binary drives the phetlab library: list laboratories, resolve
//! reservations, and populate the cache once or on a schedule.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigAction;
use commands::labs::LabsArgs;
use commands::reserve::ReserveArgs;
use commands::translations::TranslationsArgs;
use commands::warm::WarmArgs;

#[derive(Parser)]
#[command(name = "phetlab")]
#[command(version = phetlab::VERSION)]
#[command(about = "PhET simulation catalog adapter", long_about = None)]
struct Cli {
    /// Config file (default: ~/.phetlab/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List laboratories in the catalog
    Labs(LabsArgs),
    /// List supported language codes
    Languages,
    /// Resolve the load URL of a laboratory in a language
    Reserve(ReserveArgs),
    /// Show the languages or translated strings of a laboratory
    Translations(TranslationsArgs),
    /// Run one cache population pass
    Warm(WarmArgs),
    /// Re-populate the cache periodically until interrupted
    Daemon,
    /// Show configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Labs(args) => commands::labs::run(config_path, args).await,
        Commands::Languages => commands::labs::run_languages(config_path).await,
        Commands::Reserve(args) => commands::reserve::run(config_path, args).await,
        Commands::Translations(args) => commands::translations::run(config_path, args).await,
        Commands::Warm(args) => commands::warm::run(config_path, args).await,
        Commands::Daemon => commands::daemon::run(config_path).await,
        Commands::Config { action } => commands::config::run(config_path, action),
    };

    if let Err(e) = result {
        e.exit();
    }
}
