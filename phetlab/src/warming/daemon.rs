//! Periodic warming daemon.
//!
//! Runs a warming pass on a fixed interval until shutdown. Each pass gets a
//! child of the shutdown token, so shutting down also cancels a running
//! pass.
//!
//! # Example
//!
//! ```ignore
//! let daemon = WarmingDaemon::new(Arc::new(warmer))
//!     .with_interval(Duration::from_secs(23 * 3600));
//!
//! tokio::spawn(daemon.run(shutdown_token));
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::pass::CacheWarmer;
use super::{populating_cache_task, PeriodicTask, DEFAULT_WARM_INTERVAL};
use crate::catalog::CatalogSource;

/// Background daemon that re-warms the cache periodically.
pub struct WarmingDaemon<S> {
    warmer: Arc<CacheWarmer<S>>,
    interval: Duration,
}

impl<S: CatalogSource + 'static> WarmingDaemon<S> {
    pub fn new(warmer: Arc<CacheWarmer<S>>) -> Self {
        Self {
            warmer,
            interval: DEFAULT_WARM_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Descriptor for host schedulers that drive the pass themselves.
    pub fn task(&self) -> PeriodicTask {
        populating_cache_task(self.interval)
    }

    /// Runs passes until shutdown is signalled.
    ///
    /// The first pass starts immediately. Returns the number of passes
    /// that ran to completion.
    pub async fn run(self, shutdown: CancellationToken) -> usize {
        info!(
            interval_secs = self.interval.as_secs(),
            workers = self.warmer.workers(),
            "Warming daemon starting"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut passes = 0;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Warming daemon shutting down");
                    break;
                }

                _ = interval.tick() => {
                    match self.warmer.warm_cache(shutdown.child_token()).await {
                        Ok(report) if !report.was_cancelled => passes += 1,
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "Warming pass failed, retrying next interval"),
                    }
                }
            }
        }

        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, NoOpCache};
    use crate::catalog::{ApiCatalogSource, CatalogService};
    use crate::http::tests::MockHttpClient;
    use crate::reservation::ReservationResolver;

    const META_URL: &str = "http://phet.example/meta";
    const DOCUMENT: &str = r#"{"projects": [{"name": "p", "simulations": [{"id": 1, "name": "a",
        "localizedSimulations": [{"locale": "en", "title": "A", "runUrl": "/a.html"}]}]}]}"#;

    fn daemon(http: Arc<MockHttpClient>) -> WarmingDaemon<ApiCatalogSource<MockHttpClient>> {
        let source = ApiCatalogSource::new(http, "http://phet.example").with_metadata_path("/meta");
        // No caching, so every pass goes upstream.
        let service = CatalogService::new(
            source,
            Arc::new(NoOpCache::new()) as Arc<dyn Cache>,
            None,
        );
        let resolver = Arc::new(ReservationResolver::new(Arc::new(service)));
        WarmingDaemon::new(Arc::new(CacheWarmer::new(resolver)))
    }

    #[test]
    fn test_task_descriptor() {
        let http = Arc::new(MockHttpClient::new());
        let task = daemon(http)
            .with_interval(Duration::from_secs(60))
            .task();

        assert_eq!(task.name, "Populating cache");
        assert_eq!(task.interval, Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_each_interval_until_shutdown() {
        let http = Arc::new(MockHttpClient::new().with_page(META_URL, DOCUMENT));
        let daemon = daemon(Arc::clone(&http)).with_interval(Duration::from_secs(3600));
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(daemon.run(shutdown.clone()));
        // First pass at t=0, second at t=1h, third at t=2h.
        tokio::time::sleep(Duration::from_secs(2 * 3600 + 60)).await;
        shutdown.cancel();

        let passes = task.await.unwrap();
        assert_eq!(passes, 3);
    }

    #[tokio::test]
    async fn test_failed_pass_does_not_stop_daemon() {
        let http = Arc::new(MockHttpClient::new());
        let daemon = daemon(http).with_interval(Duration::from_millis(10));
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(daemon.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.cancel();

        assert_eq!(task.await.unwrap(), 0);
    }
}
