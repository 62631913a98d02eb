//! Catalog data model.
//!
//! Raw records come out of a [`CatalogSource`](super::CatalogSource); the
//! resolver turns them into an immutable [`Catalog`] keyed by canonical id.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::language::ENGLISH;

/// Language-specific name and links for one simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedEntry {
    /// Display name in this language
    pub name: String,
    /// Absolute URL of the localized detail page
    pub detail_link: String,
    /// Runnable-content URL when the source knows it up front (API mode)
    pub run_url: Option<String>,
}

impl LocalizedEntry {
    pub fn new(name: impl Into<String>, detail_link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            detail_link: detail_link.into(),
            run_url: None,
        }
    }

    pub fn with_run_url(mut self, run_url: impl Into<String>) -> Self {
        self.run_url = Some(run_url.into());
        self
    }
}

/// Descriptive metadata, only available from the structured API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub domains: BTreeSet<String>,
    pub age_ranges: BTreeSet<String>,
    pub description: String,
}

/// One simulation with all of its localized entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationLink {
    /// Canonical identifier (the English detail link)
    pub id: String,
    /// Primary language subtag → localized entry
    pub localized: BTreeMap<String, LocalizedEntry>,
    pub metadata: Option<Metadata>,
}

impl SimulationLink {
    /// The English entry, which every exposed link has.
    pub fn english(&self) -> Option<&LocalizedEntry> {
        self.localized.get(ENGLISH)
    }

    pub fn entry(&self, language: &str) -> Option<&LocalizedEntry> {
        self.localized.get(language)
    }

    /// Languages this simulation is published in, sorted.
    pub fn languages(&self) -> Vec<String> {
        self.localized.keys().cloned().collect()
    }
}

/// A single record extracted by a catalog source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    /// Key shared by all translations of the same simulation
    /// (slug in API mode, `simulation/<slug>` path when scraping)
    pub join_key: String,
    /// Language code exactly as published upstream (may be region-qualified)
    pub language: String,
    pub entry: LocalizedEntry,
}

/// Unresolved output of one catalog fetch.
#[derive(Debug, Clone, Default)]
pub struct RawCatalog {
    /// Records in upstream iteration order
    pub links: Vec<RawLink>,
    /// Metadata by join key
    pub metadata: HashMap<String, Metadata>,
    /// Language codes offered by the site, sorted and de-duplicated
    pub languages: Vec<String>,
}

/// Resolved catalog, shared read-only between callers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    links: BTreeMap<String, SimulationLink>,
    unlinked: BTreeMap<String, SimulationLink>,
    languages: Vec<String>,
}

impl Catalog {
    pub(crate) fn new(
        links: BTreeMap<String, SimulationLink>,
        unlinked: BTreeMap<String, SimulationLink>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            links,
            unlinked,
            languages,
        }
    }

    /// Look up a simulation by canonical id.
    pub fn get(&self, id: &str) -> Option<&SimulationLink> {
        self.links.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationLink> {
        self.links.values()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Simulations without an English entry, keyed by join key.
    ///
    /// They cannot be addressed by canonical id and are never exposed.
    pub fn unlinked(&self) -> &BTreeMap<String, SimulationLink> {
        &self.unlinked
    }

    /// Language codes offered by the site.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

/// Host-facing projection of a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Laboratory {
    pub laboratory_id: String,
    pub name: String,
    pub autoload: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub age_ranges: Vec<String>,
}

impl Laboratory {
    /// Project a link into a laboratory. `None` if it has no English entry.
    pub fn from_link(link: &SimulationLink) -> Option<Self> {
        let english = link.english()?;
        let (description, domains, age_ranges) = match &link.metadata {
            Some(meta) => (
                Some(meta.description.clone()).filter(|d| !d.is_empty()),
                meta.domains.iter().cloned().collect(),
                meta.age_ranges.iter().cloned().collect(),
            ),
            None => (None, Vec::new(), Vec::new()),
        };

        Some(Self {
            laboratory_id: link.id.clone(),
            name: english.name.clone(),
            autoload: true,
            description,
            domains,
            age_ranges,
        })
    }
}
