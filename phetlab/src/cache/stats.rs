//! Cache statistics tracking and reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe counters updated on every cache operation.
#[derive(Debug)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
    writes: AtomicU64,
    created_at: Instant,
}

impl Default for CacheStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStats {
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            created_at: Instant::now(),
        }
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// An entry existed but was older than the requested window.
    /// Also counted as a miss.
    pub fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, entries: usize) -> CacheStatistics {
        CacheStatistics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            entries,
            uptime_secs: self.created_at.elapsed().as_secs(),
        }
    }
}

/// Snapshot of cache statistics for reporting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub writes: u64,
    pub entries: usize,
    pub uptime_secs: u64,
}

impl CacheStatistics {
    /// Hit rate from 0.0 to 1.0.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Format statistics as a human-readable string.
    pub fn format(&self) -> String {
        format!(
            r#"Cache Statistics
  Entries:     {}
  Hits:        {}
  Misses:      {}
  Stale:       {}
  Writes:      {}
  Hit Rate:    {:.1}%
  Uptime:      {}s
"#,
            self.entries,
            self.hits,
            self.misses,
            self.stale,
            self.writes,
            self.hit_rate() * 100.0,
            self.uptime_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_empty() {
        let snapshot = CacheStats::new().snapshot(0);
        assert_eq!(snapshot.hits, 0);
        assert_eq!(snapshot.misses, 0);
        assert_eq!(snapshot.hit_rate(), 0.0);
    }

    #[test]
    fn test_stale_counts_as_miss() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_stale();
        stats.record_miss();
        stats.record_write();

        let snapshot = stats.snapshot(3);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 2);
        assert_eq!(snapshot.stale, 1);
        assert_eq!(snapshot.writes, 1);
        assert_eq!(snapshot.entries, 3);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let snapshot = CacheStatistics {
            hits: 75,
            misses: 25,
            ..Default::default()
        };
        assert_eq!(snapshot.hit_rate(), 0.75);
        assert!(snapshot.format().contains("Hit Rate:    75.0%"));
    }
}
