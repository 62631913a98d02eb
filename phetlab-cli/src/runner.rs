//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, and adapter
//! creation to reduce duplication across command handlers.

use std::path::Path;

use phetlab::adapter::SimulationAdapter;
use phetlab::config::ConfigFile;
use phetlab::http::AsyncReqwestClient;
use phetlab::logging::{init_logging, split_log_path, LogVerbosity, LoggingGuard};
use tracing::info;

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Load config (from `config_path` or the default location) and
    /// initialize logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => ConfigFile::load_with_env(path)?,
            None => ConfigFile::load()?,
        };

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(&log_dir, &log_file, LogVerbosity::from_env())
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("phetlab v{}", phetlab::VERSION);
        info!(
            origin = %self.config.upstream.origin,
            mode = %self.config.upstream.mode,
            "phetlab CLI: {} command",
            command
        );
    }

    /// Create the adapter described by the loaded configuration.
    pub fn create_adapter(&self) -> Result<SimulationAdapter<AsyncReqwestClient>, CliError> {
        SimulationAdapter::from_config(&self.config)
            .map_err(CliError::from)
            .inspect(|_| info!("Adapter created successfully"))
    }
}
