//! Configuration inspection CLI commands.
//!
//! Provides `config path` and `config show` for checking which file is read
//! and what the effective settings are after defaults and overrides.

use std::path::Path;

use clap::Subcommand;
use phetlab::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,
}

/// Run a config subcommand.
pub fn run(config_path: Option<&Path>, action: ConfigAction) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
            if !path.exists() {
                println!("(file does not exist, defaults are used)");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = ConfigFile::load_with_env(&path)?;
            print_config(&config);
            Ok(())
        }
    }
}

fn print_config(config: &ConfigFile) {
    println!("[upstream]");
    println!("origin = {}", config.upstream.origin);
    println!("mode = {}", config.upstream.mode);
    println!("metadata_path = {}", config.upstream.metadata_path);
    println!("timeout = {}", config.upstream.timeout);
    println!("max_category_depth = {}", config.upstream.max_category_depth);
    println!();
    println!("[cache]");
    println!("min_freshness_hours = {}", config.cache.min_freshness_hours);
    println!();
    println!("[warming]");
    println!("workers = {}", config.warming.workers);
    println!("interval_hours = {}", config.warming.interval_hours);
    println!();
    println!("[adapter]");
    println!("translations = {}", config.adapter.translations);
    println!("contact_mails = {}", config.adapter.contact_mails.join(", "));
    println!();
    println!("[logging]");
    println!("file = {}", config.logging.file.display());
}
