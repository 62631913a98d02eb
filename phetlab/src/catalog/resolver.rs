//! Link resolution: raw records → canonical catalog.
//!
//! Records are grouped by join key, languages are collapsed to their
//! primary subtag, and each group is re-keyed by its English detail link.
//! Groups without an English entry end up in [`Catalog::unlinked`].

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::language::{is_region_qualified, primary_subtag, ENGLISH};
use super::types::{Catalog, Laboratory, LocalizedEntry, RawCatalog, SimulationLink};

/// A localized entry plus whether it came from a region-qualified code.
struct Candidate {
    entry: LocalizedEntry,
    qualified: bool,
}

struct Group {
    join_key: String,
    localized: BTreeMap<String, Candidate>,
}

/// Resolve a raw catalog into the canonical mapping.
///
/// Duplicate (simulation, language) pairs keep the first record seen, except
/// that an unqualified code (`pt`) always displaces a region-qualified one
/// (`pt_BR`) with the same primary subtag.
pub fn resolve(raw: RawCatalog) -> Catalog {
    let RawCatalog {
        links: raw_links,
        mut metadata,
        mut languages,
    } = raw;

    let mut groups: Vec<Group> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for raw_link in raw_links {
        let slot = *index.entry(raw_link.join_key.clone()).or_insert_with(|| {
            groups.push(Group {
                join_key: raw_link.join_key.clone(),
                localized: BTreeMap::new(),
            });
            groups.len() - 1
        });

        let language = primary_subtag(&raw_link.language).to_string();
        let candidate = Candidate {
            entry: raw_link.entry,
            qualified: is_region_qualified(&raw_link.language),
        };

        match groups[slot].localized.entry(language) {
            Entry::Vacant(vacant) => {
                vacant.insert(candidate);
            }
            Entry::Occupied(mut occupied) => {
                if occupied.get().qualified && !candidate.qualified {
                    occupied.insert(candidate);
                }
            }
        }
    }

    let mut links: BTreeMap<String, SimulationLink> = BTreeMap::new();
    let mut unlinked = BTreeMap::new();

    for group in groups {
        let localized: BTreeMap<String, LocalizedEntry> = group
            .localized
            .into_iter()
            .map(|(lang, candidate)| (lang, candidate.entry))
            .collect();
        let group_metadata = metadata.remove(&group.join_key);

        let Some(id) = localized.get(ENGLISH).map(|e| e.detail_link.clone()) else {
            unlinked.insert(
                group.join_key.clone(),
                SimulationLink {
                    id: group.join_key,
                    localized,
                    metadata: group_metadata,
                },
            );
            continue;
        };

        match links.entry(id.clone()) {
            Entry::Vacant(vacant) => {
                vacant.insert(SimulationLink {
                    id,
                    localized,
                    metadata: group_metadata,
                });
            }
            Entry::Occupied(mut occupied) => {
                // Two join keys sharing one English page: merge, first write wins.
                let existing = occupied.get_mut();
                for (lang, entry) in localized {
                    existing.localized.entry(lang).or_insert(entry);
                }
                if existing.metadata.is_none() {
                    existing.metadata = group_metadata;
                }
            }
        }
    }

    languages.sort();
    languages.dedup();

    debug!(
        links = links.len(),
        unlinked = unlinked.len(),
        languages = languages.len(),
        "Catalog resolved"
    );

    Catalog::new(links, unlinked, languages)
}

/// Project the host-facing laboratory list. Only English-bearing links appear.
pub fn laboratories(catalog: &Catalog) -> Vec<Laboratory> {
    catalog.iter().filter_map(Laboratory::from_link).collect()
}
