//! Cache trait definition for dependency injection.

use std::time::Duration;

use crate::cache::types::{CacheKey, CacheValue};
use crate::cache::CacheStatistics;

/// Key/value store with time-based invalidation.
///
/// Mirrors the host platform's cache object: callers ask for a value no
/// older than some window, recompute on a miss, and `put` the result. The
/// cache itself never recomputes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use phetlab::cache::{Cache, CacheKey, CacheValue, MemoryCache};
///
/// let cache = MemoryCache::new();
/// let window = Some(Duration::from_secs(3600));
///
/// if cache.get(&CacheKey::Languages, window).is_none() {
///     cache.put(CacheKey::Languages, CacheValue::Languages(vec!["en".into()]));
/// }
/// assert!(cache.contains(&CacheKey::Languages));
/// ```
pub trait Cache: Send + Sync {
    /// Get the value for `key`.
    ///
    /// Returns `None` if absent, or if `min_freshness` is given and the
    /// entry was written longer ago than that.
    fn get(&self, key: &CacheKey, min_freshness: Option<Duration>) -> Option<CacheValue>;

    /// Store a value, replacing any previous entry. Last write wins.
    fn put(&self, key: CacheKey, value: CacheValue);

    /// Check if a key exists, regardless of age.
    fn contains(&self, key: &CacheKey) -> bool;

    /// Remove every entry.
    fn clear(&self);

    fn stats(&self) -> CacheStatistics;
}

/// Cache that never stores anything.
///
/// Models the host's "cache disabled" mode: every call recomputes.
///
/// ```
/// use phetlab::cache::{Cache, CacheKey, CacheValue, NoOpCache};
///
/// let cache = NoOpCache::new();
/// cache.put(CacheKey::Languages, CacheValue::Languages(vec![]));
/// assert!(cache.get(&CacheKey::Languages, None).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoOpCache;

impl NoOpCache {
    pub fn new() -> Self {
        Self
    }
}

impl Cache for NoOpCache {
    fn get(&self, _key: &CacheKey, _min_freshness: Option<Duration>) -> Option<CacheValue> {
        None
    }

    fn put(&self, _key: CacheKey, _value: CacheValue) {}

    fn contains(&self, _key: &CacheKey) -> bool {
        false
    }

    fn clear(&self) {}

    fn stats(&self) -> CacheStatistics {
        CacheStatistics::default()
    }
}
