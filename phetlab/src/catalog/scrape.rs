//! Legacy HTML scraping source.
//!
//! Older revisions of the upstream site expose no metadata API. The catalog
//! is rebuilt from one index page per language, and run URLs are pulled out
//! of each simulation's detail page on demand.
//!
//! Parsed documents are never held across an `.await`: every page is fetched
//! as text first and handed to a synchronous parser.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use futures::future::try_join_all;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::error::CatalogError;
use super::language::{primary_subtag, ENGLISH};
use super::source::CatalogSource;
use super::types::{LocalizedEntry, RawCatalog, RawLink};
use super::url::{absolutize, first_segment, normalize_run_url, path_after_language};
use crate::http::AsyncHttpClient;

/// Path fragment identifying a per-language index page.
const INDEX_PATH: &str = "/simulations/index";

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("Valid selector")
}

/// Catalog source that scrapes the per-language index pages.
pub struct ScrapeCatalogSource<C> {
    http: Arc<C>,
    origin: String,
}

impl<C: AsyncHttpClient> ScrapeCatalogSource<C> {
    pub fn new(http: Arc<C>, origin: impl Into<String>) -> Self {
        Self {
            http,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the index page for one language.
    pub fn index_url(&self, language: &str) -> String {
        format!("{}/{}{}", self.origin, language, INDEX_PATH)
    }

    /// Discover the supported language codes from the English index page.
    pub async fn fetch_languages(&self) -> Result<Vec<String>, CatalogError> {
        let url = self.index_url(ENGLISH);
        let html = self.http.get_text(&url).await?;
        let languages = parse_language_codes(&html);

        if languages.is_empty() {
            return Err(CatalogError::parse(&url, "no language selector found"));
        }

        debug!(count = languages.len(), "Languages discovered");
        Ok(languages)
    }

    async fn fetch_index(&self, language: String) -> Result<Vec<RawLink>, CatalogError> {
        let url = self.index_url(&language);
        let html = self.http.get_text(&url).await?;
        let links = parse_index_page(&html, &self.origin, &language);
        debug!(language = %language, links = links.len(), "Index page parsed");
        Ok(links)
    }
}

impl<C: AsyncHttpClient> CatalogSource for ScrapeCatalogSource<C> {
    fn name(&self) -> &str {
        "html-scrape"
    }

    async fn fetch_catalog(&self) -> Result<RawCatalog, CatalogError> {
        let languages = self.fetch_languages().await?;

        // One page per primary subtag; `pt` sorts before `pt_BR` and wins.
        let mut seen = HashSet::new();
        let to_fetch: Vec<String> = languages
            .iter()
            .filter(|lang| seen.insert(primary_subtag(lang).to_string()))
            .cloned()
            .collect();

        let pages = try_join_all(to_fetch.into_iter().map(|lang| self.fetch_index(lang))).await?;
        let links: Vec<RawLink> = pages.into_iter().flatten().collect();

        info!(
            records = links.len(),
            languages = languages.len(),
            "Index pages scraped"
        );

        Ok(RawCatalog {
            links,
            metadata: Default::default(),
            languages,
        })
    }

    async fn resolve_run_url(&self, entry: &LocalizedEntry) -> Result<String, CatalogError> {
        let html = self.http.get_text(&entry.detail_link).await?;
        let url = extract_run_url(&html, &entry.detail_link)?;
        Ok(normalize_run_url(&self.origin, &url))
    }
}

/// Extract language codes from the language selector.
///
/// Newer pages use an `<option>` list, older ones a list of anchors. Both
/// point at `/<lang>/simulations/index`.
pub(crate) fn parse_language_codes(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let from_options = collect_codes(&document, &selector("option[value]"), "value");
    let codes = if from_options.is_empty() {
        collect_codes(&document, &selector("a[href]"), "href")
    } else {
        from_options
    };

    codes.into_iter().collect()
}

fn collect_codes(document: &Html, selector: &Selector, attr: &str) -> BTreeSet<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr(attr))
        .filter(|target| target.contains(INDEX_PATH))
        .map(first_segment)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract simulation links from one language's index page.
///
/// Simulations are grouped under `h2` headings whose parent carries a
/// single-letter id (the alphabetical sections).
pub(crate) fn parse_index_page(html: &str, origin: &str, language: &str) -> Vec<RawLink> {
    let document = Html::parse_document(html);
    let heading = selector("h2");
    let anchor = selector("a[href]");
    let span = selector("span");

    let mut visited = HashSet::new();
    let mut links = Vec::new();

    for h2 in document.select(&heading) {
        let Some(section) = h2.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let is_letter_section = section
            .value()
            .id()
            .is_some_and(|id| id.chars().count() == 1);
        if !is_letter_section || !visited.insert(section.id()) {
            continue;
        }

        for link in section.select(&anchor) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let name = link
                .select(&span)
                .next()
                .map(element_text)
                .unwrap_or_else(|| element_text(link));
            if name.is_empty() {
                continue;
            }

            let detail_link = absolutize(origin, href);
            links.push(RawLink {
                join_key: path_after_language(&detail_link).to_string(),
                language: language.to_string(),
                entry: LocalizedEntry::new(name, detail_link),
            });
        }
    }

    links
}

/// Extract the runnable URL from a simulation detail page.
///
/// Rules, in order: a `sim-button` anchor mentioning HTML5; otherwise the
/// `#embeddable-text` snippet, preferring its iframe source over a plain
/// anchor.
pub(crate) fn extract_run_url(html: &str, page_url: &str) -> Result<String, CatalogError> {
    let snippet = {
        let document = Html::parse_document(html);

        let html5_button = document
            .select(&selector("a.sim-button"))
            .find(|a| element_text(*a).contains("HTML5"))
            .and_then(|a| a.value().attr("href"));
        if let Some(href) = html5_button {
            return Ok(href.trim().to_string());
        }

        document
            .select(&selector("#embeddable-text"))
            .next()
            .map(element_text)
            .ok_or_else(|| CatalogError::parse(page_url, "no HTML5 button or embeddable-text"))?
    };

    let fragment = Html::parse_fragment(&snippet);
    let iframe_src = fragment
        .select(&selector("iframe[src]"))
        .next()
        .and_then(|el| el.value().attr("src"));
    let anchor_href = || {
        fragment
            .select(&selector("a[href]"))
            .next()
            .and_then(|el| el.value().attr("href"))
    };

    iframe_src
        .or_else(anchor_href)
        .map(|url| url.trim().to_string())
        .ok_or_else(|| CatalogError::parse(page_url, "embeddable-text holds no iframe or link"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
