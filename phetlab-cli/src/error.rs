//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use phetlab::adapter::AdapterError;
use phetlab::catalog::CatalogError;
use phetlab::config::ConfigFileError;
use phetlab::reservation::ReservationError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(ConfigFileError),
    /// Upstream catalog or reservation failure
    Adapter(AdapterError),
    /// Failed to render output
    Output(serde_json::Error),
    /// Warming pass could not start
    Warm(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Adapter(AdapterError::Catalog(CatalogError::Http(_)))
            | CliError::Adapter(AdapterError::Reservation(ReservationError::Catalog(
                CatalogError::Http(_),
            ))) => {
                eprintln!();
                eprintln!("Could not reach the upstream site. Check:");
                eprintln!("  1. Network connectivity");
                eprintln!("  2. [upstream] origin in config.ini");
                eprintln!("  3. [upstream] timeout if the site is slow");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'phetlab config path' to locate the config file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Adapter(e) => write!(f, "{}", e),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
            CliError::Warm(msg) => write!(f, "Cache population failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Adapter(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<AdapterError> for CliError {
    fn from(e: AdapterError) -> Self {
        CliError::Adapter(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
