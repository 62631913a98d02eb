//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants, clamping helpers, and the
//! `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::catalog::{FetchMode, DEFAULT_MAX_CATEGORY_DEPTH, DEFAULT_METADATA_PATH};
use crate::http::DEFAULT_TIMEOUT_SECS;
use crate::warming::{DEFAULT_WORKERS, MAX_WORKERS};

/// Default upstream site.
pub const DEFAULT_ORIGIN: &str = "https://phet.colorado.edu";

/// Default freshness window for cached catalog and reservations.
pub const DEFAULT_MIN_FRESHNESS_HOURS: u64 = 24;

/// Default hours between warming passes.
pub const DEFAULT_WARM_INTERVAL_HOURS: u64 = 23;

/// Minimum warming workers.
pub const MIN_WORKERS: usize = 1;

/// Environment variable overriding the warming worker count.
pub const THREADS_ENV: &str = "PHETLAB_THREADS";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "phetlab.log";

/// Clamps the worker count to valid range and logs a warning if clamped.
pub(super) fn clamp_workers(value: usize) -> usize {
    let clamped = value.clamp(MIN_WORKERS, MAX_WORKERS);
    if clamped != value {
        tracing::warn!(
            requested = value,
            min = MIN_WORKERS,
            max = MAX_WORKERS,
            "warming workers out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            upstream: UpstreamSettings {
                origin: DEFAULT_ORIGIN.to_string(),
                mode: FetchMode::default(),
                metadata_path: DEFAULT_METADATA_PATH.to_string(),
                timeout: DEFAULT_TIMEOUT_SECS,
                max_category_depth: DEFAULT_MAX_CATEGORY_DEPTH,
            },
            cache: CacheSettings {
                min_freshness_hours: DEFAULT_MIN_FRESHNESS_HOURS,
            },
            warming: WarmingSettings {
                workers: DEFAULT_WORKERS,
                interval_hours: DEFAULT_WARM_INTERVAL_HOURS,
            },
            adapter: AdapterSettings {
                translations: false,
                contact_mails: Vec::new(),
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE),
            },
        }
    }
}
