//! In-process cache backed by a concurrent map.

use std::time::Duration;

use dashmap::DashMap;
use tracing::trace;

use crate::cache::types::{CacheEntry, CacheKey, CacheValue};
use crate::cache::{Cache, CacheStatistics, CacheStats};

/// Concurrent in-memory cache.
///
/// `DashMap` gives per-key atomicity, so warming workers write reservations
/// without any external lock. Entries are never evicted; stale entries stay
/// until overwritten or cleared.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<CacheKey, CacheEntry>,
    stats: CacheStats,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &CacheKey, min_freshness: Option<Duration>) -> Option<CacheValue> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            trace!(key = %key, "Cache miss");
            return None;
        };

        if entry.is_fresh(min_freshness) {
            self.stats.record_hit();
            Some(entry.value.clone())
        } else {
            self.stats.record_stale();
            trace!(key = %key, age_secs = entry.age().as_secs(), "Cache entry stale");
            None
        }
    }

    fn put(&self, key: CacheKey, value: CacheValue) {
        self.entries.insert(key, CacheEntry::new(value));
        self.stats.record_write();
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    fn clear(&self) {
        self.entries.clear();
    }

    fn stats(&self) -> CacheStatistics {
        self.stats.snapshot(self.entries.len())
    }
}
