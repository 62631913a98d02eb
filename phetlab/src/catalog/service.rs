//! Cache-backed access to the catalog and the values derived from it.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::error::CatalogError;
use super::resolver::{laboratories, resolve};
use super::source::CatalogSource;
use super::types::{Catalog, Laboratory};
use crate::cache::{Cache, CacheKey, CacheValue};

/// Serves the catalog, language list, and laboratory list from the cache,
/// fetching and resolving from upstream on a miss.
pub struct CatalogService<S> {
    source: S,
    cache: Arc<dyn Cache>,
    min_freshness: Option<Duration>,
}

impl<S: CatalogSource> CatalogService<S> {
    pub fn new(source: S, cache: Arc<dyn Cache>, min_freshness: Option<Duration>) -> Self {
        Self {
            source,
            cache,
            min_freshness,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    pub fn min_freshness(&self) -> Option<Duration> {
        self.min_freshness
    }

    /// The resolved catalog, fetched from upstream when absent or stale.
    pub async fn catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = self
            .cache
            .get(&CacheKey::Catalog, self.min_freshness)
            .and_then(CacheValue::into_catalog)
        {
            return Ok(catalog);
        }

        debug!(source = self.source.name(), "Catalog not cached, fetching");
        let raw = self.source.fetch_catalog().await?;
        let catalog = Arc::new(resolve(raw));

        info!(
            source = self.source.name(),
            links = catalog.len(),
            unlinked = catalog.unlinked().len(),
            languages = catalog.languages().len(),
            "Catalog refreshed"
        );

        self.cache
            .put(CacheKey::Catalog, CacheValue::Catalog(Arc::clone(&catalog)));
        Ok(catalog)
    }

    /// Supported language codes, sorted.
    pub async fn languages(&self) -> Result<Vec<String>, CatalogError> {
        if let Some(languages) = self
            .cache
            .get(&CacheKey::Languages, self.min_freshness)
            .and_then(CacheValue::into_languages)
        {
            return Ok(languages);
        }

        let languages = self.catalog().await?.languages().to_vec();
        self.cache
            .put(CacheKey::Languages, CacheValue::Languages(languages.clone()));
        Ok(languages)
    }

    /// Host-facing laboratory list.
    pub async fn laboratories(&self) -> Result<Arc<Vec<Laboratory>>, CatalogError> {
        if let Some(labs) = self
            .cache
            .get(&CacheKey::Laboratories, self.min_freshness)
            .and_then(CacheValue::into_laboratories)
        {
            return Ok(labs);
        }

        let labs = Arc::new(laboratories(&*self.catalog().await?));
        self.cache.put(
            CacheKey::Laboratories,
            CacheValue::Laboratories(Arc::clone(&labs)),
        );
        Ok(labs)
    }
}
