//! Core types for the cache layer.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::catalog::{Catalog, Laboratory};
use crate::reservation::ReservationResult;
use crate::translations::TranslationsResponse;

/// Identifies one cached operation result.
///
/// Rendered through [`fmt::Display`] into the operation-specific string a
/// host key/value store would use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Supported language codes.
    Languages,
    /// The resolved catalog.
    Catalog,
    /// The host-facing laboratory list.
    Laboratories,
    /// A resolved load URL for one laboratory in one language.
    Reservation {
        laboratory_id: String,
        language: String,
    },
    /// Languages available for one laboratory.
    TranslationList(String),
    /// Extracted UI strings for one laboratory.
    Translations(String),
}

impl CacheKey {
    pub fn reservation(laboratory_id: impl Into<String>, language: impl Into<String>) -> Self {
        CacheKey::Reservation {
            laboratory_id: laboratory_id.into(),
            language: language.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Languages => f.write_str("get_languages"),
            CacheKey::Catalog => f.write_str("get_links"),
            CacheKey::Laboratories => f.write_str("get_laboratories"),
            CacheKey::Reservation {
                laboratory_id,
                language,
            } => write!(f, "reserve:{laboratory_id}_{language}"),
            CacheKey::TranslationList(id) => write!(f, "get_translation_list:{id}"),
            CacheKey::Translations(id) => write!(f, "get_translations:{id}"),
        }
    }
}

/// A cached operation result.
///
/// Large values are shared through `Arc` so a cache hit never deep-copies
/// the catalog.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Languages(Vec<String>),
    Catalog(Arc<Catalog>),
    Laboratories(Arc<Vec<Laboratory>>),
    Reservation(ReservationResult),
    TranslationList(Vec<String>),
    Translations(Arc<TranslationsResponse>),
}

impl CacheValue {
    pub fn into_languages(self) -> Option<Vec<String>> {
        match self {
            CacheValue::Languages(languages) => Some(languages),
            _ => None,
        }
    }

    pub fn into_catalog(self) -> Option<Arc<Catalog>> {
        match self {
            CacheValue::Catalog(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn into_laboratories(self) -> Option<Arc<Vec<Laboratory>>> {
        match self {
            CacheValue::Laboratories(labs) => Some(labs),
            _ => None,
        }
    }

    pub fn into_reservation(self) -> Option<ReservationResult> {
        match self {
            CacheValue::Reservation(result) => Some(result),
            _ => None,
        }
    }

    pub fn into_translation_list(self) -> Option<Vec<String>> {
        match self {
            CacheValue::TranslationList(languages) => Some(languages),
            _ => None,
        }
    }

    pub fn into_translations(self) -> Option<Arc<TranslationsResponse>> {
        match self {
            CacheValue::Translations(response) => Some(response),
            _ => None,
        }
    }
}

/// A stored value plus the instant it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: CacheValue,
    pub written_at: Instant,
}

impl CacheEntry {
    pub fn new(value: CacheValue) -> Self {
        Self {
            value,
            written_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.written_at.elapsed()
    }

    /// An entry is fresh unless a window is given and the entry is older.
    pub fn is_fresh(&self, min_freshness: Option<Duration>) -> bool {
        match min_freshness {
            Some(window) => self.age() <= window,
            None => true,
        }
    }
}
