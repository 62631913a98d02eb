//! Structured metadata API source.
//!
//! Fetches the JSON metadata document in one request. The document carries a
//! nested category taxonomy and a flat list of projects, each holding one or
//! more simulations with per-locale titles and run URLs.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::error::CatalogError;
use super::source::CatalogSource;
use super::types::{LocalizedEntry, Metadata, RawCatalog, RawLink};
use super::url::normalize_run_url;
use crate::http::AsyncHttpClient;

/// Default path of the metadata endpoint, relative to the site origin.
pub const DEFAULT_METADATA_PATH: &str =
    "/services/metadata/1.2/simulations?format=json&type=html&summary";

/// Default depth bound for the category walk.
pub const DEFAULT_MAX_CATEGORY_DEPTH: usize = 10;

/// Branches that group simulations by something other than subject.
/// They are not recorded as categories, but their children are walked.
const NON_SEMANTIC_CATEGORIES: &[&str] = &["by-device", "by-level", "new", "html"];

/// Level categories and the age buckets they imply.
const LEVEL_AGE_RANGES: &[(&str, &[&str])] = &[
    ("university", &[">18"]),
    ("high-school", &["14-16", "16-18"]),
    ("middle-school", &["10-12", "12-14"]),
    ("elementary-school", &["8-10", "6-8", "<6"]),
];

#[derive(Debug, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    categories: Vec<CategoryNode>,
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoryNode {
    name: String,
    #[serde(default)]
    simulation_ids: Vec<u64>,
    #[serde(default)]
    subcategories: Vec<CategoryNode>,
}

#[derive(Debug, Deserialize)]
struct Project {
    #[serde(default)]
    simulations: Vec<Simulation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Simulation {
    id: u64,
    name: String,
    #[serde(default)]
    description: HashMap<String, String>,
    #[serde(default)]
    localized_simulations: Vec<LocalizedSimulation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalizedSimulation {
    locale: String,
    title: String,
    #[serde(default)]
    run_url: Option<String>,
}

/// Catalog source backed by the structured metadata endpoint.
pub struct ApiCatalogSource<C> {
    http: Arc<C>,
    origin: String,
    metadata_path: String,
    max_category_depth: usize,
}

impl<C: AsyncHttpClient> ApiCatalogSource<C> {
    pub fn new(http: Arc<C>, origin: impl Into<String>) -> Self {
        Self {
            http,
            origin: origin.into().trim_end_matches('/').to_string(),
            metadata_path: DEFAULT_METADATA_PATH.to_string(),
            max_category_depth: DEFAULT_MAX_CATEGORY_DEPTH,
        }
    }

    pub fn with_metadata_path(mut self, path: impl Into<String>) -> Self {
        self.metadata_path = path.into();
        self
    }

    pub fn with_max_category_depth(mut self, depth: usize) -> Self {
        self.max_category_depth = depth;
        self
    }

    /// Full URL of the metadata document.
    pub fn metadata_url(&self) -> String {
        format!("{}{}", self.origin, self.metadata_path)
    }
}

impl<C: AsyncHttpClient> CatalogSource for ApiCatalogSource<C> {
    fn name(&self) -> &str {
        "metadata-api"
    }

    async fn fetch_catalog(&self) -> Result<RawCatalog, CatalogError> {
        let url = self.metadata_url();
        let bytes = self.http.get(&url).await?;
        let catalog = parse_metadata(&bytes, &url, &self.origin, self.max_category_depth)?;

        info!(
            url = %url,
            records = catalog.links.len(),
            languages = catalog.languages.len(),
            "Metadata catalog fetched"
        );

        Ok(catalog)
    }

    async fn resolve_run_url(&self, entry: &LocalizedEntry) -> Result<String, CatalogError> {
        entry
            .run_url
            .as_deref()
            .map(|url| normalize_run_url(&self.origin, url))
            .filter(|url| !url.is_empty())
            .ok_or_else(|| CatalogError::MissingRunUrl(entry.detail_link.clone()))
    }
}

/// Parse the metadata document into raw records.
pub(crate) fn parse_metadata(
    bytes: &[u8],
    url: &str,
    origin: &str,
    max_depth: usize,
) -> Result<RawCatalog, CatalogError> {
    let document: MetadataDocument =
        serde_json::from_slice(bytes).map_err(|e| CatalogError::parse(url, e.to_string()))?;

    let mut categories: HashMap<String, BTreeSet<u64>> = HashMap::new();
    for node in &document.categories {
        walk_category(node, 0, max_depth, &mut categories);
    }
    debug!(categories = categories.len(), "Category tree indexed");

    let mut raw = RawCatalog::default();
    let mut languages = BTreeSet::new();

    for simulation in document.projects.iter().flat_map(|p| &p.simulations) {
        for localized in &simulation.localized_simulations {
            let detail_link = format!(
                "{}/{}/simulation/{}",
                origin, localized.locale, simulation.name
            );
            let mut entry = LocalizedEntry::new(localized.title.clone(), detail_link);
            entry.run_url = localized.run_url.clone();

            languages.insert(localized.locale.clone());
            raw.links.push(RawLink {
                join_key: simulation.name.clone(),
                language: localized.locale.clone(),
                entry,
            });
        }

        raw.metadata
            .entry(simulation.name.clone())
            .or_insert_with(|| simulation_metadata(simulation, &categories));
    }

    raw.languages = languages.into_iter().collect();
    Ok(raw)
}

/// Record the simulations under each semantic category, depth-first.
///
/// Only the first `max_depth` levels are visited. Returns every simulation
/// id found in the visited subtree so parents include their children's
/// simulations.
fn walk_category(
    node: &CategoryNode,
    depth: usize,
    max_depth: usize,
    out: &mut HashMap<String, BTreeSet<u64>>,
) -> BTreeSet<u64> {
    if depth >= max_depth {
        return BTreeSet::new();
    }

    let mut ids: BTreeSet<u64> = node.simulation_ids.iter().copied().collect();
    for child in &node.subcategories {
        ids.extend(walk_category(child, depth + 1, max_depth, out));
    }

    if !NON_SEMANTIC_CATEGORIES.contains(&node.name.as_str()) {
        out.entry(node.name.clone())
            .or_default()
            .extend(ids.iter().copied());
    }

    ids
}

fn simulation_metadata(
    simulation: &Simulation,
    categories: &HashMap<String, BTreeSet<u64>>,
) -> Metadata {
    let mut metadata = Metadata {
        description: simulation
            .description
            .get("en")
            .cloned()
            .unwrap_or_default(),
        ..Metadata::default()
    };

    for (category, ids) in categories {
        if !ids.contains(&simulation.id) {
            continue;
        }
        match LEVEL_AGE_RANGES
            .iter()
            .find(|(level, _)| *level == category.as_str())
        {
            Some((_, ranges)) => {
                metadata
                    .age_ranges
                    .extend(ranges.iter().map(|r| r.to_string()));
            }
            None => {
                metadata.domains.insert(category.clone());
            }
        }
    }

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolver::resolve;
    use crate::http::tests::MockHttpClient;

    const ORIGIN: &str = "https://phet.example";

    const DOCUMENT: &str = r#"{
        "count": 2,
        "categories": [
            {"name": "physics", "subcategories": [
                {"name": "motion", "simulationIds": [1]},
                {"name": "sound-and-waves", "simulationIds": [2]}
            ]},
            {"name": "by-level", "subcategories": [
                {"name": "high-school", "simulationIds": [1, 2]},
                {"name": "university", "simulationIds": [2]}
            ]},
            {"name": "new", "simulationIds": [2]}
        ],
        "projects": [
            {"name": "forces-and-motion", "simulations": [
                {"id": 1, "name": "forces-and-motion-basics",
                 "description": {"en": "Explore forces."},
                 "localizedSimulations": [
                    {"locale": "en", "title": "Forces and Motion", "runUrl": "https://phet.example/sims/html/fmb/latest/fmb_en.html"},
                    {"locale": "es", "title": "Fuerzas y Movimiento", "runUrl": "https://phet.example/sims/html/fmb/latest/fmb_es.html"}
                 ]}
            ]},
            {"name": "wave-interference", "simulations": [
                {"id": 2, "name": "wave-interference",
                 "localizedSimulations": [
                    {"locale": "en", "title": "Wave Interference", "runUrl": "https://phet.example/sims/html/wi/latest/wi_en.html"},
                    {"locale": "pt_BR", "title": "Interferência", "runUrl": "https://phet.example/sims/html/wi/latest/wi_pt_BR.html"}
                 ]}
            ]}
        ]
    }"#;

    fn parse() -> RawCatalog {
        parse_metadata(DOCUMENT.as_bytes(), "test", ORIGIN, DEFAULT_MAX_CATEGORY_DEPTH).unwrap()
    }

    #[test]
    fn test_parses_localized_records() {
        let raw = parse();

        assert_eq!(raw.links.len(), 4);
        assert_eq!(raw.languages, vec!["en", "es", "pt_BR"]);

        let spanish = raw.links.iter().find(|l| l.language == "es").unwrap();
        assert_eq!(spanish.join_key, "forces-and-motion-basics");
        assert_eq!(
            spanish.entry.detail_link,
            "https://phet.example/es/simulation/forces-and-motion-basics"
        );
        assert!(spanish.entry.run_url.as_deref().unwrap().ends_with("fmb_es.html"));
    }

    #[test]
    fn test_domains_include_parent_categories() {
        let raw = parse();
        let meta = &raw.metadata["forces-and-motion-basics"];

        assert!(meta.domains.contains("physics"));
        assert!(meta.domains.contains("motion"));
        assert!(!meta.domains.contains("sound-and-waves"));
        assert_eq!(meta.description, "Explore forces.");
    }

    #[test]
    fn test_non_semantic_branches_not_recorded() {
        let raw = parse();
        let meta = &raw.metadata["wave-interference"];

        assert!(!meta.domains.contains("by-level"));
        assert!(!meta.domains.contains("new"));
        assert!(!meta.domains.contains("high-school"));
    }

    #[test]
    fn test_levels_map_to_age_ranges() {
        let raw = parse();

        let fmb = &raw.metadata["forces-and-motion-basics"];
        let expected: BTreeSet<String> = ["14-16", "16-18"].iter().map(|s| s.to_string()).collect();
        assert_eq!(fmb.age_ranges, expected);

        let wave = &raw.metadata["wave-interference"];
        assert!(wave.age_ranges.contains(">18"));
        assert!(wave.age_ranges.contains("14-16"));
    }

    #[test]
    fn test_depth_bound_stops_walk() {
        let raw = parse_metadata(DOCUMENT.as_bytes(), "test", ORIGIN, 2).unwrap();
        let meta = &raw.metadata["forces-and-motion-basics"];
        assert!(meta.domains.contains("physics"));
        assert!(meta.domains.contains("motion"));

        // Only top-level nodes are visited; none lists simulations directly.
        let raw = parse_metadata(DOCUMENT.as_bytes(), "test", ORIGIN, 1).unwrap();
        let meta = &raw.metadata["forces-and-motion-basics"];
        assert!(meta.domains.is_empty());
        assert!(meta.age_ranges.is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_metadata(b"<html>", "http://x/meta", ORIGIN, 10).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_resolves_to_english_keyed_catalog() {
        let catalog = resolve(parse());
        let link = catalog
            .get("https://phet.example/en/simulation/wave-interference")
            .unwrap();

        assert_eq!(link.entry("pt").unwrap().name, "Interferência");
        assert!(link.metadata.is_some());
    }

    #[tokio::test]
    async fn test_fetch_catalog_single_request() {
        let http = Arc::new(MockHttpClient::new().with_page(
            &format!("{ORIGIN}{DEFAULT_METADATA_PATH}"),
            DOCUMENT,
        ));
        let source = ApiCatalogSource::new(Arc::clone(&http), ORIGIN);

        let raw = source.fetch_catalog().await.unwrap();
        assert_eq!(raw.links.len(), 4);
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_catalog_propagates_http_error() {
        let http = Arc::new(MockHttpClient::new());
        let source = ApiCatalogSource::new(http, ORIGIN);

        let err = source.fetch_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Http(_)));
    }

    #[tokio::test]
    async fn test_resolve_run_url_uses_stored_url() {
        let source = ApiCatalogSource::new(Arc::new(MockHttpClient::new()), ORIGIN);

        let entry = LocalizedEntry::new("A", "https://phet.example/en/simulation/a")
            .with_run_url("https://phet.example/sims/a_en.html");
        assert_eq!(
            source.resolve_run_url(&entry).await.unwrap(),
            "https://phet.example/sims/a_en.html"
        );

        let missing = LocalizedEntry::new("B", "https://phet.example/en/simulation/b");
        assert!(matches!(
            source.resolve_run_url(&missing).await,
            Err(CatalogError::MissingRunUrl(_))
        ));
    }
}
