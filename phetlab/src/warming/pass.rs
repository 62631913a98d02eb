//! One warming pass: resolve every (laboratory, language) pair.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::pool::run_pool;
use super::status::{WarmHandle, WarmReport, WarmStatus};
use super::task::{ReservationRunner, WarmTask};
use super::{DEFAULT_WARM_INTERVAL, DEFAULT_WORKERS, MAX_WORKERS};
use crate::catalog::{laboratories, CatalogError, CatalogSource};
use crate::reservation::ReservationResolver;

/// Pre-populates the reservation cache.
pub struct CacheWarmer<S> {
    resolver: Arc<ReservationResolver<S>>,
    workers: usize,
    min_freshness: Option<Duration>,
}

impl<S: CatalogSource + 'static> CacheWarmer<S> {
    /// Create a warmer with the default worker count.
    ///
    /// Reservations older than the default warm interval are re-resolved,
    /// so each periodic pass refreshes what the previous one stored.
    pub fn new(resolver: Arc<ReservationResolver<S>>) -> Self {
        Self {
            resolver,
            workers: DEFAULT_WORKERS,
            min_freshness: Some(DEFAULT_WARM_INTERVAL),
        }
    }

    /// Sets the worker count, clamped to `1..=MAX_WORKERS`.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.clamp(1, MAX_WORKERS);
        self
    }

    /// Sets the age beyond which cached reservations are re-resolved.
    pub fn with_min_freshness(mut self, min_freshness: Option<Duration>) -> Self {
        self.min_freshness = min_freshness;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run one pass to completion or cancellation.
    ///
    /// Fails only if the catalog or language list cannot be obtained;
    /// per-task failures are logged and counted.
    pub async fn warm_cache(
        &self,
        cancellation: CancellationToken,
    ) -> Result<WarmReport, CatalogError> {
        let status = Arc::new(Mutex::new(WarmStatus::default()));
        self.run(cancellation, status).await
    }

    async fn run(
        &self,
        cancellation: CancellationToken,
        status: Arc<Mutex<WarmStatus>>,
    ) -> Result<WarmReport, CatalogError> {
        let started = Instant::now();
        let service = self.resolver.service();

        let languages = service.languages().await?;
        let catalog = service.catalog().await?;
        let labs = laboratories(&catalog);

        let tasks: Vec<WarmTask> = labs
            .iter()
            .flat_map(|lab| {
                languages
                    .iter()
                    .map(move |lang| WarmTask::new(lab.laboratory_id.clone(), lang.clone()))
            })
            .collect();

        info!(
            laboratories = labs.len(),
            languages = languages.len(),
            tasks = tasks.len(),
            workers = self.workers,
            "Populating cache"
        );
        status.lock().total = tasks.len();

        let runner = Arc::new(ReservationRunner::new(
            Arc::clone(&self.resolver),
            catalog,
            self.min_freshness,
        ));
        run_pool(tasks, runner, self.workers, cancellation.clone(), Arc::clone(&status)).await;

        let report = {
            let mut s = status.lock();
            s.was_cancelled = cancellation.is_cancelled();
            s.is_complete = true;
            s.report()
        };

        info!(
            completed = report.completed,
            failed = report.failed,
            cancelled = report.cancelled,
            was_cancelled = report.was_cancelled,
            elapsed_secs = started.elapsed().as_secs(),
            "Cache population finished"
        );

        Ok(report)
    }
}

/// Spawn a warming pass on the current runtime and return its handle.
pub fn start_warming<S: CatalogSource + 'static>(warmer: Arc<CacheWarmer<S>>) -> WarmHandle {
    let status = Arc::new(Mutex::new(WarmStatus::default()));
    let cancellation = CancellationToken::new();
    let handle = WarmHandle {
        status: Arc::clone(&status),
        cancellation: cancellation.clone(),
    };

    tokio::spawn(async move {
        if let Err(e) = warmer.run(cancellation, Arc::clone(&status)).await {
            warn!(error = %e, "Cache population could not start");
            let mut s = status.lock();
            s.error = Some(e.to_string());
            s.is_complete = true;
        }
    });

    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheKey, MemoryCache};
    use crate::catalog::{ApiCatalogSource, CatalogService};
    use crate::http::tests::MockHttpClient;

    const META_URL: &str = "http://phet.example/meta";

    fn document() -> String {
        let sims: Vec<String> = (0..4)
            .map(|i| {
                format!(
                    r#"{{"id": {i}, "name": "sim{i}", "localizedSimulations": [
                        {{"locale": "en", "title": "Sim {i}", "runUrl": "/sims/sim{i}_en.html"}},
                        {{"locale": "es", "title": "Sim {i} (es)", "runUrl": "/sims/sim{i}_es.html"}}
                    ]}}"#
                )
            })
            .collect();
        // `sim9` has no English entry and must not be warmed.
        format!(
            r#"{{"projects": [{{"name": "p", "simulations": [{}, {{"id": 9, "name": "sim9",
                "localizedSimulations": [{{"locale": "fr", "title": "Neuf", "runUrl": "/n.html"}}]}}]}}]}}"#,
            sims.join(",")
        )
    }

    fn warmer(
        http: MockHttpClient,
    ) -> (Arc<MemoryCache>, CacheWarmer<ApiCatalogSource<MockHttpClient>>) {
        let cache = Arc::new(MemoryCache::new());
        let source =
            ApiCatalogSource::new(Arc::new(http), "http://phet.example").with_metadata_path("/meta");
        let service = CatalogService::new(
            source,
            Arc::clone(&cache) as Arc<dyn Cache>,
            Some(Duration::from_secs(3600)),
        );
        let resolver = Arc::new(ReservationResolver::new(Arc::new(service)));
        (cache, CacheWarmer::new(resolver).with_workers(3))
    }

    #[tokio::test]
    async fn test_warm_cache_schedules_labs_times_languages() {
        let (cache, warmer) = warmer(MockHttpClient::new().with_page(META_URL, &document()));

        let report = warmer.warm_cache(CancellationToken::new()).await.unwrap();

        // 4 English-bearing labs × {en, es, fr}.
        assert_eq!(report.total, 12);
        assert_eq!(report.completed, 12);
        assert_eq!(report.failed, 0);
        assert!(!report.was_cancelled);

        let fr = cache
            .get(&CacheKey::reservation("http://phet.example/en/simulation/sim2", "fr"), None)
            .and_then(|v| v.into_reservation())
            .unwrap();
        assert_eq!(fr.load_url, "http://phet.example/sims/sim2_en.html");
    }

    #[tokio::test]
    async fn test_warm_cache_cancelled_before_start() {
        let (_, warmer) = warmer(MockHttpClient::new().with_page(META_URL, &document()));
        let token = CancellationToken::new();
        token.cancel();

        let report = warmer.warm_cache(token).await.unwrap();

        assert!(report.was_cancelled);
        assert_eq!(report.completed, 0);
        assert_eq!(report.cancelled, report.total);
    }

    #[tokio::test]
    async fn test_warm_cache_fails_without_catalog() {
        let (_, warmer) = warmer(MockHttpClient::new());
        assert!(warmer.warm_cache(CancellationToken::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_start_warming_reports_completion() {
        let (_, warmer) = warmer(MockHttpClient::new().with_page(META_URL, &document()));
        let handle = start_warming(Arc::new(warmer));

        for _ in 0..200 {
            if handle.is_complete() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let status = handle.status();
        assert!(status.is_complete);
        assert_eq!(status.completed, 12);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn test_start_warming_records_startup_error() {
        let (_, warmer) = warmer(MockHttpClient::new());
        let handle = start_warming(Arc::new(warmer));

        for _ in 0..200 {
            if handle.is_complete() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(handle.status().error.is_some());
    }

    #[test]
    fn test_worker_count_clamped() {
        let (_, low) = warmer(MockHttpClient::new());
        assert_eq!(low.with_workers(0).workers(), 1);

        let (_, high) = warmer(MockHttpClient::new());
        assert_eq!(high.with_workers(10_000).workers(), MAX_WORKERS);
    }
}
