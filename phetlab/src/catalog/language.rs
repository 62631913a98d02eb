//! Language code normalization.
//!
//! Upstream publishes region-qualified codes (`pt_BR`, `zh_CN`) next to
//! plain ones. Everything downstream is keyed by the primary subtag.

/// Language used as fallback and as the source of canonical names.
pub const ENGLISH: &str = "en";

/// Reduce a region-qualified code (`xx_YY`) to its primary subtag (`xx`).
pub fn primary_subtag(code: &str) -> &str {
    let code = code.trim();
    match code.split_once('_') {
        Some((primary, _)) => primary,
        None => code,
    }
}

/// Returns true if the code carries a region qualifier.
pub fn is_region_qualified(code: &str) -> bool {
    code.trim().contains('_')
}

/// Normalize a requested locale, defaulting to English when empty.
pub fn normalize_locale(code: &str) -> String {
    match primary_subtag(code) {
        "" => ENGLISH.to_string(),
        primary => primary.to_string(),
    }
}
