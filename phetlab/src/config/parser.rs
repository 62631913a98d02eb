//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::clamp_workers;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::catalog::FetchMode;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [upstream] section
    if let Some(section) = ini.section(Some("upstream")) {
        if let Some(v) = section.get("origin") {
            let v = v.trim().trim_end_matches('/');
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid("upstream", "origin", v, "must be an http(s) URL"));
            }
            config.upstream.origin = v.to_string();
        }
        if let Some(v) = section.get("mode") {
            config.upstream.mode = FetchMode::from_str(v)
                .map_err(|_| invalid("upstream", "mode", v, "must be 'api' or 'scrape'"))?;
        }
        if let Some(v) = section.get("metadata_path") {
            let v = v.trim();
            if !v.is_empty() {
                config.upstream.metadata_path = if v.starts_with('/') {
                    v.to_string()
                } else {
                    format!("/{v}")
                };
            }
        }
        if let Some(v) = section.get("timeout") {
            config.upstream.timeout = parse_positive(v)
                .ok_or_else(|| invalid("upstream", "timeout", v, "must be a positive integer (seconds)"))?;
        }
        if let Some(v) = section.get("max_category_depth") {
            config.upstream.max_category_depth = parse_positive(v)
                .ok_or_else(|| invalid("upstream", "max_category_depth", v, "must be a positive integer"))?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("min_freshness_hours") {
            config.cache.min_freshness_hours = v.trim().parse().map_err(|_| {
                invalid("cache", "min_freshness_hours", v, "must be a non-negative integer (hours)")
            })?;
        }
    }

    // [warming] section
    if let Some(section) = ini.section(Some("warming")) {
        if let Some(v) = section.get("workers") {
            let workers: usize = v
                .trim()
                .parse()
                .map_err(|_| invalid("warming", "workers", v, "must be a positive integer"))?;
            config.warming.workers = clamp_workers(workers);
        }
        if let Some(v) = section.get("interval_hours") {
            config.warming.interval_hours = parse_positive(v)
                .ok_or_else(|| invalid("warming", "interval_hours", v, "must be a positive integer (hours)"))?;
        }
    }

    // [adapter] section
    if let Some(section) = ini.section(Some("adapter")) {
        if let Some(v) = section.get("translations") {
            config.adapter.translations = parse_bool(v);
        }
        if let Some(v) = section.get("contact_mails") {
            config.adapter.contact_mails = v
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

pub(super) fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    value.trim().parse().ok().filter(|v| *v > T::default())
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
