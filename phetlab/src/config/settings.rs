//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing logic.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{FetchMode, SourceConfig};

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Upstream site settings
    pub upstream: UpstreamSettings,
    /// Cache freshness settings
    pub cache: CacheSettings,
    /// Cache warming settings
    pub warming: WarmingSettings,
    /// Host-facing adapter settings
    pub adapter: AdapterSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Upstream catalog site.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamSettings {
    /// Site origin, e.g. `https://phet.colorado.edu`
    pub origin: String,
    /// Metadata API or HTML scraping
    pub mode: FetchMode,
    /// Metadata endpoint path (API mode only)
    pub metadata_path: String,
    /// HTTP timeout in seconds
    pub timeout: u64,
    /// Depth bound for the category walk (API mode only)
    pub max_category_depth: usize,
}

impl UpstreamSettings {
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            mode: self.mode,
            origin: self.origin.clone(),
            metadata_path: self.metadata_path.clone(),
            max_category_depth: self.max_category_depth,
        }
    }
}

/// Cache freshness.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum age of catalog and reservation entries; 0 disables the check
    pub min_freshness_hours: u64,
}

impl CacheSettings {
    pub fn min_freshness(&self) -> Option<Duration> {
        (self.min_freshness_hours > 0).then(|| Duration::from_secs(self.min_freshness_hours * 3600))
    }
}

/// Cache warming.
#[derive(Debug, Clone, PartialEq)]
pub struct WarmingSettings {
    /// Concurrent warming workers
    pub workers: usize,
    /// Hours between warming passes
    pub interval_hours: u64,
}

impl WarmingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours * 3600)
    }
}

/// Host-facing adapter behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterSettings {
    /// Advertise and serve per-string translations
    pub translations: bool,
    /// Contacts returned alongside translations
    pub contact_mails: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
