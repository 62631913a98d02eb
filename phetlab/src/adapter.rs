//! Host plugin facade.
//!
//! [`SimulationAdapter`] exposes the fixed contract a lab-management host
//! expects from a remote-lab plugin: version and capabilities, laboratory
//! listing, reservation, widgets, and translations.
//!
//! # Example
//!
//! ```no_run
//! use phetlab::adapter::{ReservationRequest, SimulationAdapter};
//! use phetlab::config::ConfigFile;
//!
//! # async fn run() -> Result<(), phetlab::adapter::AdapterError> {
//! let config = ConfigFile::default();
//! let adapter = SimulationAdapter::from_config(&config)?;
//!
//! let labs = adapter.get_laboratories(&Default::default()).await?;
//! let request = ReservationRequest::new(&labs[0].laboratory_id).with_locale("es");
//! let reservation = adapter.reserve(&request).await?;
//! println!("{}", reservation.load_url);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{Cache, CacheKey, CacheStatistics, CacheValue, MemoryCache};
use crate::catalog::language::ENGLISH;
use crate::catalog::{
    AnyCatalogSource, CatalogError, CatalogService, CatalogSourceFactory, Laboratory,
};
use crate::config::{AdapterSettings, ConfigFile, WarmingSettings};
use crate::http::{AsyncHttpClient, AsyncReqwestClient, HttpError};
use crate::reservation::{ReservationError, ReservationResolver, ReservationResult};
use crate::translations::{TranslationExtractor, TranslationsResponse};
use crate::warming::{
    populating_cache_task, CacheWarmer, PeriodicTask, WarmReport, WarmingDaemon,
};

/// Plugin contract version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Version {
    V1,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::V1 => f.write_str("1"),
        }
    }
}

/// What the plugin can do for the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Laboratories render as an embeddable widget.
    Widget,
    /// Per-laboratory supported-language list.
    TranslationList,
    /// Per-string translations (best effort).
    Translations,
}

/// Laboratory listing filters. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabFilter {
    pub domain: Option<String>,
    pub age_range: Option<String>,
}

impl LabFilter {
    pub fn matches(&self, lab: &Laboratory) -> bool {
        let domain_ok = self
            .domain
            .as_ref()
            .map_or(true, |d| lab.domains.iter().any(|x| x.eq_ignore_ascii_case(d)));
        let age_ok = self
            .age_range
            .as_ref()
            .map_or(true, |a| lab.age_ranges.iter().any(|x| x == a));
        domain_ok && age_ok
    }
}

/// A host reservation call.
///
/// Only `laboratory_id` and `locale` affect the result; the remaining
/// fields are part of the host contract and accepted as-is.
#[derive(Debug, Clone, Default)]
pub struct ReservationRequest {
    pub laboratory_id: String,
    pub username: String,
    pub institution: String,
    pub general_configuration: serde_json::Value,
    pub particular_configurations: serde_json::Value,
    pub request_payload: serde_json::Value,
    pub user_properties: serde_json::Value,
    pub locale: Option<String>,
}

impl ReservationRequest {
    pub fn new(laboratory_id: impl Into<String>) -> Self {
        Self {
            laboratory_id: laboratory_id.into(),
            ..Self::default()
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Requested locale, defaulting to English.
    pub fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(ENGLISH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Widget {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedWidget {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationList {
    pub supported_languages: Vec<String>,
}

/// Errors surfaced to the host.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Reservation(#[from] ReservationError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] HttpError),
}

/// The remote-lab plugin.
pub struct SimulationAdapter<C> {
    resolver: Arc<ReservationResolver<AnyCatalogSource<C>>>,
    extractor: TranslationExtractor<C>,
    adapter: AdapterSettings,
    warming: WarmingSettings,
}

impl SimulationAdapter<AsyncReqwestClient> {
    /// Build an adapter with a reqwest client and an in-process cache.
    pub fn from_config(config: &ConfigFile) -> Result<Self, AdapterError> {
        let http = Arc::new(AsyncReqwestClient::with_timeout(config.upstream.timeout)?);
        Ok(Self::new(http, Arc::new(MemoryCache::new()), config))
    }
}

impl<C: AsyncHttpClient + 'static> SimulationAdapter<C> {
    pub fn new(http: Arc<C>, cache: Arc<dyn Cache>, config: &ConfigFile) -> Self {
        let source = CatalogSourceFactory::new(Arc::clone(&http))
            .create(&config.upstream.source_config());
        let service = CatalogService::new(source, cache, config.cache.min_freshness());

        Self {
            resolver: Arc::new(ReservationResolver::new(Arc::new(service))),
            extractor: TranslationExtractor::new(http),
            adapter: config.adapter.clone(),
            warming: config.warming.clone(),
        }
    }

    fn service(&self) -> &CatalogService<AnyCatalogSource<C>> {
        self.resolver.service()
    }

    fn cache(&self) -> &Arc<dyn Cache> {
        self.service().cache()
    }

    pub fn get_version(&self) -> Version {
        Version::V1
    }

    pub fn get_capabilities(&self) -> Vec<Capability> {
        let mut capabilities = vec![Capability::Widget, Capability::TranslationList];
        if self.adapter.translations {
            capabilities.push(Capability::Translations);
        }
        capabilities
    }

    pub async fn get_laboratories(&self, filter: &LabFilter) -> Result<Vec<Laboratory>, AdapterError> {
        let labs = self.service().laboratories().await?;
        Ok(labs.iter().filter(|lab| filter.matches(lab)).cloned().collect())
    }

    /// Supported language codes across the catalog.
    pub async fn languages(&self) -> Result<Vec<String>, AdapterError> {
        Ok(self.service().languages().await?)
    }

    pub async fn reserve(&self, request: &ReservationRequest) -> Result<ReservationResult, AdapterError> {
        let result = self
            .resolver
            .reserve(&request.laboratory_id, request.locale(), None)
            .await?;
        Ok(result)
    }

    /// The reservation id is already the load URL.
    pub fn load_widget(&self, reservation_id: &str, _widget_name: &str) -> LoadedWidget {
        LoadedWidget {
            url: reservation_id.to_string(),
        }
    }

    pub fn list_widgets(&self, _laboratory_id: &str) -> Vec<Widget> {
        vec![Widget {
            name: "default".to_string(),
            description: "Default widget".to_string(),
        }]
    }

    /// Languages one laboratory is available in. Unknown ids yield an
    /// empty list.
    pub async fn get_translation_list(&self, laboratory_id: &str) -> Result<TranslationList, AdapterError> {
        let key = CacheKey::TranslationList(laboratory_id.to_string());
        if let Some(languages) = self
            .cache()
            .get(&key, None)
            .and_then(CacheValue::into_translation_list)
        {
            return Ok(TranslationList {
                supported_languages: languages,
            });
        }

        let catalog = self.service().catalog().await?;
        let languages = catalog
            .get(laboratory_id)
            .map(|link| link.languages())
            .unwrap_or_default();

        self.cache()
            .put(key, CacheValue::TranslationList(languages.clone()));
        Ok(TranslationList {
            supported_languages: languages,
        })
    }

    /// Per-string translations for one laboratory.
    ///
    /// Never fails: any problem yields empty translations. Only non-empty
    /// results are cached.
    pub async fn get_translations(&self, laboratory_id: &str) -> Arc<TranslationsResponse> {
        let key = CacheKey::Translations(laboratory_id.to_string());
        if let Some(response) = self
            .cache()
            .get(&key, None)
            .and_then(CacheValue::into_translations)
        {
            return response;
        }

        let mut response = TranslationsResponse {
            mails: self.adapter.contact_mails.clone(),
            ..TranslationsResponse::default()
        };

        let reservation = match self.resolver.reserve(laboratory_id, ENGLISH, None).await {
            Ok(reservation) => reservation,
            Err(e) => {
                warn!(laboratory_id, error = %e, "Translations unavailable");
                return Arc::new(response);
            }
        };

        match self.extractor.extract(&reservation.load_url).await {
            Ok(translations) => response.translations = translations,
            Err(e) => {
                warn!(laboratory_id, error = %e, "Translation extraction failed");
            }
        }

        let response = Arc::new(response);
        if !response.translations.is_empty() {
            debug!(
                laboratory_id,
                languages = response.translations.len(),
                "Translations cached"
            );
            self.cache()
                .put(key, CacheValue::Translations(Arc::clone(&response)));
        }
        response
    }

    /// A warmer configured from the `[warming]` settings.
    pub fn warmer(&self) -> CacheWarmer<AnyCatalogSource<C>> {
        CacheWarmer::new(Arc::clone(&self.resolver))
            .with_workers(self.warming.workers)
            .with_min_freshness(Some(self.warming.interval()))
    }

    /// Run one cache population pass.
    pub async fn populate_cache(&self, cancellation: CancellationToken) -> Result<WarmReport, AdapterError> {
        Ok(self.warmer().warm_cache(cancellation).await?)
    }

    /// The periodic population job, ready to run until shutdown.
    pub fn daemon(&self) -> WarmingDaemon<AnyCatalogSource<C>> {
        WarmingDaemon::new(Arc::new(self.warmer())).with_interval(self.warming.interval())
    }

    /// Descriptor of the periodic population job.
    pub fn periodic_task(&self) -> PeriodicTask {
        populating_cache_task(self.warming.interval())
    }

    pub fn cache_stats(&self) -> CacheStatistics {
        self.cache().stats()
    }
}
