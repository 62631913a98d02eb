//! Integration tests for the scrape-mode adapter.
//!
//! These tests drive the public API end to end against a canned site:
//! - Language discovery → index scraping → link resolution
//! - Reservation with English fallback
//! - Cache population followed by cache-only reservations
//!
//! Run with: `cargo test --test adapter_integration`

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use phetlab::adapter::{AdapterError, LabFilter, ReservationRequest, SimulationAdapter};
use phetlab::cache::MemoryCache;
use phetlab::catalog::FetchMode;
use phetlab::config::ConfigFile;
use phetlab::http::{AsyncHttpClient, HttpError};
use phetlab::reservation::ReservationError;

// ============================================================================
// Test Helpers
// ============================================================================

const ORIGIN: &str = "http://phet.example";
const DENSITY: &str = "http://phet.example/en/simulation/density";
const BUOYANCY: &str = "http://phet.example/en/simulation/buoyancy";

/// Serves fixed pages by URL and counts requests.
#[derive(Default)]
struct SiteClient {
    pages: HashMap<String, String>,
    requests: AtomicUsize,
}

impl SiteClient {
    fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), body.into());
        self
    }

    fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for SiteClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .map(|body| body.as_bytes().to_vec())
            .ok_or_else(|| HttpError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

fn language_selector() -> &'static str {
    r#"<select>
        <option value="/en/simulations/index">English</option>
        <option value="/es/simulations/index">Español</option>
        <option value="/fr/simulations/index">Français</option>
    </select>"#
}

fn index_page(lang: &str, sims: &[(&str, &str)]) -> String {
    let anchors: String = sims
        .iter()
        .map(|(slug, name)| {
            format!(r#"<a href="/{lang}/simulation/{slug}"><span>{name}</span></a>"#)
        })
        .collect();
    format!(
        r#"<html><body>{}<div id="S"><h2>S</h2>{anchors}</div></body></html>"#,
        language_selector()
    )
}

fn detail_page(run_url: &str) -> String {
    format!(r#"<html><body><a class="sim-button" href="{run_url}">Run in HTML5</a></body></html>"#)
}

/// English has both simulations, Spanish only density, French none.
fn site() -> SiteClient {
    SiteClient::default()
        .with_page(
            "http://phet.example/en/simulations/index",
            index_page("en", &[("density", "Density"), ("buoyancy", "Buoyancy")]),
        )
        .with_page(
            "http://phet.example/es/simulations/index",
            index_page("es", &[("density", "Densidad")]),
        )
        .with_page("http://phet.example/fr/simulations/index", index_page("fr", &[]))
        .with_page(DENSITY, detail_page("/sims/density_en.html"))
        .with_page(
            "http://phet.example/es/simulation/density",
            detail_page("/sims/density_es.html"),
        )
        .with_page(BUOYANCY, detail_page("/sims/buoyancy_en.html"))
}

fn create_adapter() -> (Arc<SiteClient>, SimulationAdapter<SiteClient>) {
    let mut config = ConfigFile::default();
    config.upstream.origin = ORIGIN.to_string();
    config.upstream.mode = FetchMode::Scrape;
    config.warming.workers = 4;

    let http = Arc::new(site());
    let adapter = SimulationAdapter::new(Arc::clone(&http), Arc::new(MemoryCache::new()), &config);
    (http, adapter)
}

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn test_scraped_laboratories() {
    let (_, adapter) = create_adapter();

    let labs = adapter.get_laboratories(&LabFilter::default()).await.unwrap();
    let mut names: Vec<&str> = labs.iter().map(|l| l.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Buoyancy", "Density"]);
    assert!(labs.iter().all(|l| l.autoload));

    // Scraped entries carry no taxonomy.
    let physics = adapter
        .get_laboratories(&LabFilter {
            domain: Some("physics".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(physics.is_empty());
}

#[tokio::test]
async fn test_languages_and_translation_list() {
    let (_, adapter) = create_adapter();

    assert_eq!(adapter.languages().await.unwrap(), vec!["en", "es", "fr"]);

    let list = adapter.get_translation_list(DENSITY).await.unwrap();
    assert_eq!(list.supported_languages, vec!["en", "es"]);

    let list = adapter.get_translation_list(BUOYANCY).await.unwrap();
    assert_eq!(list.supported_languages, vec!["en"]);
}

// ============================================================================
// Reservation
// ============================================================================

#[tokio::test]
async fn test_reserve_translated_and_fallback() {
    let (_, adapter) = create_adapter();

    let es = adapter
        .reserve(&ReservationRequest::new(DENSITY).with_locale("es"))
        .await
        .unwrap();
    assert_eq!(es.load_url, "http://phet.example/sims/density_es.html");

    let fr = adapter
        .reserve(&ReservationRequest::new(BUOYANCY).with_locale("fr_CA"))
        .await
        .unwrap();
    assert_eq!(fr.load_url, "http://phet.example/sims/buoyancy_en.html");
}

#[tokio::test]
async fn test_reserve_unknown_laboratory() {
    let (_, adapter) = create_adapter();

    let err = adapter
        .reserve(&ReservationRequest::new("http://phet.example/en/simulation/nope"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::Reservation(ReservationError::LaboratoryNotFound(_))
    ));
}

// ============================================================================
// Cache Population
// ============================================================================

#[tokio::test]
async fn test_populated_cache_serves_reservations() {
    let (http, adapter) = create_adapter();

    let report = adapter.populate_cache(CancellationToken::new()).await.unwrap();
    // 2 laboratories × 3 languages.
    assert_eq!(report.total, 6);
    assert_eq!(report.completed, 6);
    assert_eq!(report.failed, 0);
    assert!(!report.was_cancelled);

    let before = http.requests();
    for (id, lang) in [(DENSITY, "es"), (DENSITY, "fr"), (BUOYANCY, "es"), (BUOYANCY, "en")] {
        adapter
            .reserve(&ReservationRequest::new(id).with_locale(lang))
            .await
            .unwrap();
    }
    assert_eq!(http.requests(), before);
}

#[tokio::test]
async fn test_cancelled_population() {
    let (_, adapter) = create_adapter();
    let token = CancellationToken::new();
    token.cancel();

    let report = adapter.populate_cache(token).await.unwrap();
    assert!(report.was_cancelled);
    assert_eq!(report.completed, 0);
    assert_eq!(report.cancelled, report.total);
}

#[tokio::test]
async fn test_population_fails_without_upstream() {
    let config = ConfigFile::default();
    let adapter = SimulationAdapter::new(
        Arc::new(SiteClient::default()),
        Arc::new(MemoryCache::new()),
        &config,
    );

    let err = adapter.populate_cache(CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, AdapterError::Catalog(_)));
}
