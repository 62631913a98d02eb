//! Simulation catalog: upstream sources, link resolution, and the
//! cache-backed catalog service.
//!
//! # Architecture
//!
//! ```text
//! CatalogSource (api | scrape) ──► RawCatalog ──► resolver::resolve ──► Catalog
//!                                                                        │
//!                                      CatalogService ◄── Cache ◄────────┘
//! ```

mod api;
mod error;
pub mod language;
pub mod resolver;
mod scrape;
mod service;
mod source;
mod types;
pub mod url;

pub use api::{ApiCatalogSource, DEFAULT_MAX_CATEGORY_DEPTH, DEFAULT_METADATA_PATH};
pub use error::CatalogError;
pub use resolver::{laboratories, resolve};
pub use scrape::ScrapeCatalogSource;
pub use service::CatalogService;
pub use source::{AnyCatalogSource, CatalogSource, CatalogSourceFactory, FetchMode, SourceConfig};
pub use types::{
    Catalog, Laboratory, LocalizedEntry, Metadata, RawCatalog, RawLink, SimulationLink,
};
