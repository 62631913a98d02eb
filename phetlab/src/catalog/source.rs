//! Catalog source abstraction and factory.
//!
//! Two upstream generations are supported: the structured metadata API and
//! the legacy HTML pages. Both produce the same [`RawCatalog`], which the
//! resolver turns into the canonical mapping.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use super::api::{ApiCatalogSource, DEFAULT_MAX_CATEGORY_DEPTH, DEFAULT_METADATA_PATH};
use super::error::CatalogError;
use super::scrape::ScrapeCatalogSource;
use super::types::{LocalizedEntry, RawCatalog};
use crate::http::AsyncHttpClient;

/// Upstream data source for simulation records.
pub trait CatalogSource: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Fetch every (simulation, language) record from upstream.
    fn fetch_catalog(&self) -> impl Future<Output = Result<RawCatalog, CatalogError>> + Send;

    /// Produce the absolute runnable URL for one localized entry.
    ///
    /// The API source answers from the stored record; the scrape source
    /// fetches the detail page.
    fn resolve_run_url(
        &self,
        entry: &LocalizedEntry,
    ) -> impl Future<Output = Result<String, CatalogError>> + Send;
}

/// Which upstream generation to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Structured JSON metadata endpoint.
    Api,
    /// Per-language HTML index pages.
    #[default]
    Scrape,
}

impl FetchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchMode::Api => "api",
            FetchMode::Scrape => "scrape",
        }
    }
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(FetchMode::Api),
            "scrape" | "html" => Ok(FetchMode::Scrape),
            other => Err(format!("unknown fetch mode '{other}', expected api or scrape")),
        }
    }
}

/// Settings needed to build a catalog source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub mode: FetchMode,
    pub origin: String,
    pub metadata_path: String,
    pub max_category_depth: usize,
}

impl SourceConfig {
    pub fn new(mode: FetchMode, origin: impl Into<String>) -> Self {
        Self {
            mode,
            origin: origin.into(),
            metadata_path: DEFAULT_METADATA_PATH.to_string(),
            max_category_depth: DEFAULT_MAX_CATEGORY_DEPTH,
        }
    }

    pub fn api(origin: impl Into<String>) -> Self {
        Self::new(FetchMode::Api, origin)
    }

    pub fn scrape(origin: impl Into<String>) -> Self {
        Self::new(FetchMode::Scrape, origin)
    }
}

/// Either source, chosen at runtime from configuration.
pub enum AnyCatalogSource<C> {
    Api(ApiCatalogSource<C>),
    Scrape(ScrapeCatalogSource<C>),
}

impl<C: AsyncHttpClient> AnyCatalogSource<C> {
    pub fn mode(&self) -> FetchMode {
        match self {
            AnyCatalogSource::Api(_) => FetchMode::Api,
            AnyCatalogSource::Scrape(_) => FetchMode::Scrape,
        }
    }
}

impl<C: AsyncHttpClient> CatalogSource for AnyCatalogSource<C> {
    fn name(&self) -> &str {
        match self {
            AnyCatalogSource::Api(source) => source.name(),
            AnyCatalogSource::Scrape(source) => source.name(),
        }
    }

    async fn fetch_catalog(&self) -> Result<RawCatalog, CatalogError> {
        match self {
            AnyCatalogSource::Api(source) => source.fetch_catalog().await,
            AnyCatalogSource::Scrape(source) => source.fetch_catalog().await,
        }
    }

    async fn resolve_run_url(&self, entry: &LocalizedEntry) -> Result<String, CatalogError> {
        match self {
            AnyCatalogSource::Api(source) => source.resolve_run_url(entry).await,
            AnyCatalogSource::Scrape(source) => source.resolve_run_url(entry).await,
        }
    }
}

/// Builds catalog sources that share one HTTP client.
pub struct CatalogSourceFactory<C> {
    http: Arc<C>,
}

impl<C: AsyncHttpClient> CatalogSourceFactory<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    pub fn create(&self, config: &SourceConfig) -> AnyCatalogSource<C> {
        let http = Arc::clone(&self.http);
        match config.mode {
            FetchMode::Api => AnyCatalogSource::Api(
                ApiCatalogSource::new(http, config.origin.clone())
                    .with_metadata_path(config.metadata_path.clone())
                    .with_max_category_depth(config.max_category_depth),
            ),
            FetchMode::Scrape => {
                AnyCatalogSource::Scrape(ScrapeCatalogSource::new(http, config.origin.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;

    #[test]
    fn test_fetch_mode_parse() {
        assert_eq!("api".parse::<FetchMode>().unwrap(), FetchMode::Api);
        assert_eq!(" Scrape ".parse::<FetchMode>().unwrap(), FetchMode::Scrape);
        assert_eq!("html".parse::<FetchMode>().unwrap(), FetchMode::Scrape);
        assert!("soap".parse::<FetchMode>().is_err());
        assert_eq!(FetchMode::default(), FetchMode::Scrape);
        assert_eq!(FetchMode::Api.to_string(), "api");
    }

    #[test]
    fn test_factory_selects_source() {
        let factory = CatalogSourceFactory::new(Arc::new(MockHttpClient::new()));

        let api = factory.create(&SourceConfig::api("http://phet.example"));
        assert_eq!(api.mode(), FetchMode::Api);
        assert_eq!(api.name(), "metadata-api");

        let scrape = factory.create(&SourceConfig::scrape("http://phet.example"));
        assert_eq!(scrape.mode(), FetchMode::Scrape);
        assert_eq!(scrape.name(), "html-scrape");
    }

    #[tokio::test]
    async fn test_api_source_uses_configured_path() {
        let http = Arc::new(MockHttpClient::new().with_page(
            "http://phet.example/meta.json",
            r#"{"categories": [], "projects": []}"#,
        ));
        let factory = CatalogSourceFactory::new(Arc::clone(&http));
        let mut config = SourceConfig::api("http://phet.example");
        config.metadata_path = "/meta.json".to_string();

        let raw = factory.create(&config).fetch_catalog().await.unwrap();
        assert!(raw.links.is_empty());
        assert_eq!(http.requests_for("http://phet.example/meta.json"), 1);
    }
}
