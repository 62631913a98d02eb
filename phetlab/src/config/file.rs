//! Configuration file handling for ~/.phetlab/config.ini.
//!
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! and parsing in [`super::parser`].

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::defaults::{clamp_workers, THREADS_ENV};
use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Load configuration from the default path (~/.phetlab/config.ini),
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_with_env(&config_file_path())
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigFileError> {
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Apply overrides from the environment.
    ///
    /// `lookup` returns the value of a variable, if set. `PHETLAB_THREADS`
    /// overrides the warming worker count.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigFileError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(THREADS_ENV) {
            let workers: usize = v.trim().parse().map_err(|_| {
                super::parser::invalid("env", THREADS_ENV, &v, "must be a positive integer")
            })?;
            self.warming.workers = clamp_workers(workers);
        }
        Ok(())
    }
}

/// Get the path to the config directory (~/.phetlab).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".phetlab")
}

/// Get the path to the config file (~/.phetlab/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
