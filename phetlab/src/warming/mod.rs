//! Cache warming.
//!
//! A warming pass enumerates every laboratory × language pair and resolves
//! each reservation ahead of time, so host requests are served from the
//! cache.
//!
//! # Architecture
//!
//! - [`CacheWarmer`] - Fetches the catalog once and runs one pass
//! - [`WarmHandle`] - Status snapshot and cancellation for a spawned pass
//! - [`WarmingDaemon`] - Repeats the pass on a fixed interval
//!
//! Work is spread over a bounded pool of tokio tasks draining one shared
//! queue. Cancellation is cooperative through a `CancellationToken`.

mod daemon;
mod pass;
mod pool;
mod status;
mod task;

use std::time::Duration;

pub use daemon::WarmingDaemon;
pub use pass::{start_warming, CacheWarmer};
pub use status::{WarmHandle, WarmReport, WarmStatus};
pub use task::{ReservationRunner, TaskRunner, WarmTask};

/// Default number of concurrent warming workers.
pub const DEFAULT_WORKERS: usize = 32;

/// Upper bound on warming workers.
pub const MAX_WORKERS: usize = 256;

/// Default interval between warming passes (23 hours).
pub const DEFAULT_WARM_INTERVAL: Duration = Duration::from_secs(23 * 3600);

/// Name under which the periodic pass is registered with a host scheduler.
pub const POPULATING_CACHE: &str = "Populating cache";

/// Descriptor of a periodic job for a host scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTask {
    pub name: &'static str,
    pub interval: Duration,
}

/// The cache population job at the given interval.
pub fn populating_cache_task(interval: Duration) -> PeriodicTask {
    PeriodicTask {
        name: POPULATING_CACHE,
        interval,
    }
}
