//! Configuration for phetlab components.
//!
//! Settings are read from an INI file (`~/.phetlab/config.ini` by default)
//! over built-in defaults, then overridden from the environment.
//!
//! # Example
//!
//! ```no_run
//! use phetlab::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! println!("upstream: {} ({})", config.upstream.origin, config.upstream.mode);
//! # Ok::<(), phetlab::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;

pub use defaults::{
    DEFAULT_LOG_FILE, DEFAULT_MIN_FRESHNESS_HOURS, DEFAULT_ORIGIN, DEFAULT_WARM_INTERVAL_HOURS,
    MIN_WORKERS, THREADS_ENV,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    AdapterSettings, CacheSettings, ConfigFile, LoggingSettings, UpstreamSettings,
    WarmingSettings,
};
