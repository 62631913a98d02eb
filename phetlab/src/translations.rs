//! Best-effort extraction of simulation UI strings.
//!
//! HTML5 simulations publish their strings either as a sibling
//! `<name>_string-map.json` file or inline in the run page as a
//! `window.phet.chipper.strings = {...};` assignment. Both shapes are
//! `{lang: {key: text}}`.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::http::{AsyncHttpClient, HttpError};

/// Marker of the inline string assignment in a run page.
const EMBEDDED_STRINGS_MARKER: &str = "window.phet.chipper.strings";

/// One translated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslatedString {
    pub value: String,
    /// Text before the first `/` of the key, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// language → key → string.
pub type Translations = BTreeMap<String, BTreeMap<String, TranslatedString>>;

type RawStrings = BTreeMap<String, BTreeMap<String, String>>;

/// What `get_translations` hands to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationsResponse {
    /// Contacts for translators.
    pub mails: Vec<String>,
    pub translations: Translations,
}

#[derive(Debug, Clone, Error)]
pub enum TranslationError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid string data from {url}: {reason}")]
    Json { url: String, reason: String },

    #[error("Cannot derive string map location from {0}")]
    MalformedUrl(String),

    #[error("No embedded strings in {0}")]
    NoEmbeddedStrings(String),
}

/// Location of the string map next to a run URL.
///
/// `.../density/latest/density_en.html` → `.../density/latest/density_string-map.json`.
pub fn string_map_url(run_url: &str) -> Result<String, TranslationError> {
    let segments: Vec<&str> = run_url.split('/').collect();
    let name = segments
        .len()
        .checked_sub(3)
        .map(|i| segments[i])
        .filter(|name| !name.is_empty())
        .ok_or_else(|| TranslationError::MalformedUrl(run_url.to_string()))?;
    let (dir, _) = run_url
        .rsplit_once('/')
        .ok_or_else(|| TranslationError::MalformedUrl(run_url.to_string()))?;

    Ok(format!("{dir}/{name}_string-map.json"))
}

/// Attach namespaces to raw `{lang: {key: text}}` strings.
pub fn convert_strings(raw: RawStrings) -> Translations {
    raw.into_iter()
        .map(|(lang, strings)| {
            let converted = strings
                .into_iter()
                .map(|(key, value)| {
                    let namespace = key.split_once('/').map(|(ns, _)| ns.to_string());
                    (key, TranslatedString { value, namespace })
                })
                .collect();
            (lang, converted)
        })
        .collect()
}

/// Parse the inline string assignment out of a run page.
pub fn extract_embedded_strings(page: &str, url: &str) -> Result<Translations, TranslationError> {
    let line = page
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(EMBEDDED_STRINGS_MARKER))
        .ok_or_else(|| TranslationError::NoEmbeddedStrings(url.to_string()))?;

    let json = line
        .split_once('=')
        .map(|(_, rhs)| rhs.trim())
        .ok_or_else(|| TranslationError::NoEmbeddedStrings(url.to_string()))?;
    let json = json.rsplit_once(';').map_or(json, |(body, _)| body);

    parse_strings(json.as_bytes(), url)
}

fn parse_strings(bytes: &[u8], url: &str) -> Result<Translations, TranslationError> {
    let raw: RawStrings = serde_json::from_slice(bytes).map_err(|e| TranslationError::Json {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(convert_strings(raw))
}

/// Fetches strings for a resolved run URL.
pub struct TranslationExtractor<C> {
    http: Arc<C>,
}

impl<C: AsyncHttpClient> TranslationExtractor<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    /// Try the string map first, then the strings embedded in the run page.
    pub async fn extract(&self, run_url: &str) -> Result<Translations, TranslationError> {
        let map_url = string_map_url(run_url)?;

        match self.fetch_string_map(&map_url).await {
            Ok(translations) => return Ok(translations),
            Err(e) => debug!(url = %map_url, error = %e, "String map unavailable, scanning run page"),
        }

        let page = self.http.get_text(run_url).await?;
        extract_embedded_strings(&page, run_url)
    }

    async fn fetch_string_map(&self, url: &str) -> Result<Translations, TranslationError> {
        let bytes = self.http.get(url).await?;
        parse_strings(&bytes, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;

    const RUN_URL: &str = "https://phet.example/sims/html/density/latest/density_en.html";
    const MAP_URL: &str = "https://phet.example/sims/html/density/latest/density_string-map.json";

    #[test]
    fn test_string_map_url() {
        assert_eq!(string_map_url(RUN_URL).unwrap(), MAP_URL);
        assert!(matches!(
            string_map_url("a.html"),
            Err(TranslationError::MalformedUrl(_))
        ));
    }

    #[test]
    fn test_convert_strings_namespaces() {
        let mut en = BTreeMap::new();
        en.insert("density/title".to_string(), "Density".to_string());
        en.insert("plain".to_string(), "Plain".to_string());
        let mut raw = BTreeMap::new();
        raw.insert("en".to_string(), en);

        let converted = convert_strings(raw);
        let en = &converted["en"];
        assert_eq!(en["density/title"].namespace.as_deref(), Some("density"));
        assert_eq!(en["density/title"].value, "Density");
        assert_eq!(en["plain"].namespace, None);
    }

    #[test]
    fn test_namespace_omitted_when_serialized() {
        let value = TranslatedString {
            value: "x".to_string(),
            namespace: None,
        };
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"value":"x"}"#);
    }

    #[test]
    fn test_extract_embedded_strings() {
        let page = r#"<html><script>
            var x = 1;
            window.phet.chipper.strings = {"es": {"density/title": "Densidad"}};
        </script></html>"#;

        let translations = extract_embedded_strings(page, RUN_URL).unwrap();
        assert_eq!(translations["es"]["density/title"].value, "Densidad");
    }

    #[test]
    fn test_extract_embedded_strings_missing() {
        assert!(matches!(
            extract_embedded_strings("<html></html>", RUN_URL),
            Err(TranslationError::NoEmbeddedStrings(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_prefers_string_map() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_page(MAP_URL, r#"{"en": {"density/title": "Density"}}"#)
                .with_page(RUN_URL, "window.phet.chipper.strings = {};"),
        );
        let extractor = TranslationExtractor::new(Arc::clone(&http));

        let translations = extractor.extract(RUN_URL).await.unwrap();
        assert_eq!(translations["en"]["density/title"].value, "Density");
        assert_eq!(http.requests_for(RUN_URL), 0);
    }

    #[tokio::test]
    async fn test_extract_falls_back_to_run_page() {
        let http = Arc::new(MockHttpClient::new().with_page(
            RUN_URL,
            r#"window.phet.chipper.strings = {"fr": {"title": "Densité"}};"#,
        ));
        let extractor = TranslationExtractor::new(http);

        let translations = extractor.extract(RUN_URL).await.unwrap();
        assert_eq!(translations["fr"]["title"].value, "Densité");
    }

    #[tokio::test]
    async fn test_extract_fails_without_any_source() {
        let extractor = TranslationExtractor::new(Arc::new(MockHttpClient::new()));
        assert!(matches!(
            extractor.extract(RUN_URL).await,
            Err(TranslationError::Http(_))
        ));
    }
}
