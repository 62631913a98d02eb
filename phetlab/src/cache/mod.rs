//! Cache layer for catalog, laboratory, and reservation results.
//!
//! Entries are keyed by operation and stamped with their write time; reads
//! take an optional freshness window.

mod memory;
mod stats;
mod r#trait;
mod types;

pub use memory::MemoryCache;
pub use r#trait::{Cache, NoOpCache};
pub use stats::{CacheStatistics, CacheStats};
pub use types::{CacheEntry, CacheKey, CacheValue};
