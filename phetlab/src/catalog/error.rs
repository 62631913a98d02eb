//! Error types for catalog fetching and link resolution.

use thiserror::Error;

use crate::http::HttpError;

/// Errors raised while fetching or interpreting the upstream catalog.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Network or HTTP status failure.
    #[error("Upstream unavailable: {0}")]
    Http(#[from] HttpError),

    /// Expected HTML or JSON structure was missing.
    #[error("Failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },

    /// The localized entry has no runnable URL and none can be derived.
    #[error("No runnable URL for {0}")]
    MissingRunUrl(String),
}

impl CatalogError {
    pub(crate) fn parse(url: &str, reason: impl Into<String>) -> Self {
        CatalogError::Parse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
