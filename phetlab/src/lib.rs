//! phetlab - PhET simulation catalog adapter
//!
//! This library exposes the PhET interactive simulation catalog to a
//! remote-laboratory host: it discovers simulations upstream, keeps the
//! derived answers in a freshness-gated cache, resolves per-language load
//! URLs, and periodically pre-populates the cache with a bounded worker pool.
//!
//! # High-Level API
//!
//! For most use cases, the [`adapter`] module provides a simplified facade:
//!
//! ```no_run
//! use phetlab::adapter::{LabFilter, SimulationAdapter};
//! use phetlab::config::ConfigFile;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigFile::load()?;
//! let adapter = SimulationAdapter::from_config(&config)?;
//!
//! for lab in adapter.get_laboratories(&LabFilter::default()).await? {
//!     println!("{} {}", lab.laboratory_id, lab.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod http;
pub mod logging;
pub mod reservation;
pub mod translations;
pub mod warming;

/// Version of the phetlab library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
