//! Reservation resolution.
//!
//! A "reservation" is a resolved load URL for one laboratory in one
//! language. Nothing is booked; results live until their cache entry goes
//! stale.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::cache::{Cache, CacheKey, CacheValue};
use crate::catalog::language::{normalize_locale, ENGLISH};
use crate::catalog::{Catalog, CatalogError, CatalogService, CatalogSource, LocalizedEntry};

/// A resolved load URL. Both fields always carry the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationResult {
    pub reservation_id: String,
    pub load_url: String,
}

impl ReservationResult {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            reservation_id: url.clone(),
            load_url: url,
        }
    }
}

/// Errors raised while resolving a reservation.
#[derive(Debug, Clone, Error)]
pub enum ReservationError {
    /// The laboratory id is not in the catalog.
    #[error("Laboratory not found: {0}")]
    LaboratoryNotFound(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Resolves (laboratory, language) pairs to load URLs, caching each answer.
pub struct ReservationResolver<S> {
    service: Arc<CatalogService<S>>,
}

impl<S: CatalogSource> ReservationResolver<S> {
    pub fn new(service: Arc<CatalogService<S>>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &Arc<CatalogService<S>> {
        &self.service
    }

    /// Resolve a load URL using the service's freshness window.
    ///
    /// `catalog_override` skips the cache lookup for the catalog; warming
    /// passes use it to share one catalog across every task.
    pub async fn reserve(
        &self,
        laboratory_id: &str,
        language: &str,
        catalog_override: Option<&Arc<Catalog>>,
    ) -> Result<ReservationResult, ReservationError> {
        self.reserve_with_freshness(
            laboratory_id,
            language,
            catalog_override,
            self.service.min_freshness(),
        )
        .await
    }

    /// Resolve a load URL, treating cached answers older than
    /// `min_freshness` as misses.
    pub async fn reserve_with_freshness(
        &self,
        laboratory_id: &str,
        language: &str,
        catalog_override: Option<&Arc<Catalog>>,
        min_freshness: Option<Duration>,
    ) -> Result<ReservationResult, ReservationError> {
        let language = normalize_locale(language);
        let cache = self.service.cache();
        let key = CacheKey::reservation(laboratory_id, &language);

        if let Some(result) = cached(cache.as_ref(), &key, min_freshness) {
            return Ok(result);
        }

        let catalog = match catalog_override {
            Some(catalog) => Arc::clone(catalog),
            None => self.service.catalog().await?,
        };
        let link = catalog
            .get(laboratory_id)
            .ok_or_else(|| ReservationError::LaboratoryNotFound(laboratory_id.to_string()))?;

        if let Some(entry) = link.entry(&language) {
            let result = self.resolve_entry(entry).await?;
            cache.put(key, CacheValue::Reservation(result.clone()));
            debug!(laboratory_id, language = %language, "Reservation resolved");
            return Ok(result);
        }

        // Requested language missing: serve English under both keys.
        let english_key = CacheKey::reservation(laboratory_id, ENGLISH);
        let result = match cached(cache.as_ref(), &english_key, min_freshness) {
            Some(result) => result,
            None => {
                let english = link.english().ok_or_else(|| {
                    ReservationError::LaboratoryNotFound(laboratory_id.to_string())
                })?;
                let result = self.resolve_entry(english).await?;
                cache.put(english_key, CacheValue::Reservation(result.clone()));
                result
            }
        };

        cache.put(key, CacheValue::Reservation(result.clone()));
        debug!(
            laboratory_id,
            language = %language,
            "Language unavailable, reserved English"
        );
        Ok(result)
    }

    async fn resolve_entry(
        &self,
        entry: &LocalizedEntry,
    ) -> Result<ReservationResult, ReservationError> {
        let url = self.service.source().resolve_run_url(entry).await?;
        Ok(ReservationResult::new(url))
    }
}

fn cached(
    cache: &dyn Cache,
    key: &CacheKey,
    min_freshness: Option<Duration>,
) -> Option<ReservationResult> {
    cache
        .get(key, min_freshness)
        .and_then(CacheValue::into_reservation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::cache::MemoryCache;
    use crate::catalog::{ApiCatalogSource, SimulationLink};
    use crate::http::tests::MockHttpClient;

    type Resolver = ReservationResolver<ApiCatalogSource<MockHttpClient>>;

    fn link(id: &str, entries: &[(&str, &str, &str)]) -> SimulationLink {
        SimulationLink {
            id: id.to_string(),
            localized: entries
                .iter()
                .map(|(lang, name, run_url)| {
                    (
                        lang.to_string(),
                        LocalizedEntry::new(*name, format!("http://x/{lang}/{id}"))
                            .with_run_url(*run_url),
                    )
                })
                .collect(),
            metadata: None,
        }
    }

    fn sim_a_catalog() -> Arc<Catalog> {
        let sim_a = link(
            "sim/a",
            &[
                ("en", "Sim A", "http://x/a.html"),
                ("es", "Simulación A", "http://x/a_es.html"),
                ("pt", "Simulação A", "/a_pt.html"),
            ],
        );
        let mut links = BTreeMap::new();
        links.insert(sim_a.id.clone(), sim_a);
        Arc::new(Catalog::new(links, BTreeMap::new(), vec!["en".into(), "es".into()]))
    }

    fn resolver() -> (Arc<MockHttpClient>, Arc<MemoryCache>, Resolver) {
        let http = Arc::new(MockHttpClient::new());
        let cache = Arc::new(MemoryCache::new());
        let source = ApiCatalogSource::new(Arc::clone(&http), "http://x");
        let service = CatalogService::new(
            source,
            Arc::clone(&cache) as Arc<dyn Cache>,
            Some(Duration::from_secs(86_400)),
        );
        (http, cache, ReservationResolver::new(Arc::new(service)))
    }

    #[tokio::test]
    async fn test_sim_a_scenario() {
        let (_, _, resolver) = resolver();
        let catalog = sim_a_catalog();

        let es = resolver.reserve("sim/a", "es", Some(&catalog)).await.unwrap();
        assert_eq!(es.reservation_id, "http://x/a_es.html");
        assert_eq!(es.load_url, "http://x/a_es.html");

        let fr = resolver.reserve("sim/a", "fr", Some(&catalog)).await.unwrap();
        let en = resolver.reserve("sim/a", "en", Some(&catalog)).await.unwrap();
        assert_eq!(fr.load_url, "http://x/a.html");
        assert_eq!(fr, en);
    }

    #[tokio::test]
    async fn test_missing_language_stored_under_both_keys() {
        let (_, cache, resolver) = resolver();
        let catalog = sim_a_catalog();

        resolver.reserve("sim/a", "fr", Some(&catalog)).await.unwrap();

        assert!(cache.contains(&CacheKey::reservation("sim/a", "fr")));
        assert!(cache.contains(&CacheKey::reservation("sim/a", "en")));
    }

    #[tokio::test]
    async fn test_region_code_matches_primary() {
        let (_, _, resolver) = resolver();
        let catalog = sim_a_catalog();

        let qualified = resolver.reserve("sim/a", "pt_BR", Some(&catalog)).await.unwrap();
        let plain = resolver.reserve("sim/a", "pt", Some(&catalog)).await.unwrap();

        assert_eq!(qualified, plain);
        assert_eq!(plain.load_url, "http://x/a_pt.html");
    }

    #[tokio::test]
    async fn test_empty_locale_means_english() {
        let (_, _, resolver) = resolver();
        let catalog = sim_a_catalog();

        let result = resolver.reserve("sim/a", "", Some(&catalog)).await.unwrap();
        assert_eq!(result.load_url, "http://x/a.html");
    }

    #[tokio::test]
    async fn test_unknown_laboratory_is_not_found() {
        let (_, _, resolver) = resolver();
        let catalog = sim_a_catalog();

        let err = resolver
            .reserve("unknown-id", "en", Some(&catalog))
            .await
            .unwrap_err();
        assert!(matches!(err, ReservationError::LaboratoryNotFound(ref id) if id == "unknown-id"));
    }

    #[tokio::test]
    async fn test_cached_answer_skips_catalog() {
        let (http, cache, resolver) = resolver();
        cache.put(
            CacheKey::reservation("sim/a", "es"),
            CacheValue::Reservation(ReservationResult::new("http://cached")),
        );

        // No override and no catalog upstream: only a cache hit can succeed.
        let result = resolver.reserve("sim/a", "es", None).await.unwrap();
        assert_eq!(result.load_url, "http://cached");
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_answer_is_recomputed() {
        let (_, cache, resolver) = resolver();
        let catalog = sim_a_catalog();
        cache.put(
            CacheKey::reservation("sim/a", "es"),
            CacheValue::Reservation(ReservationResult::new("http://old")),
        );
        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = resolver
            .reserve_with_freshness("sim/a", "es", Some(&catalog), Some(Duration::from_millis(1)))
            .await
            .unwrap();
        assert_eq!(result.load_url, "http://x/a_es.html");
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let (_, _, resolver) = resolver();

        let err = resolver.reserve("sim/a", "en", None).await.unwrap_err();
        assert!(matches!(err, ReservationError::Catalog(CatalogError::Http(_))));
    }
}
