use companion_catalog::{Catalog, SpeciesDefinition};
use companion_progress::ProgressRecord;
use std::sync::Arc;

/// One species paired with the current user's capture overlay. Rebuilt from
/// scratch on every merge pass, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntry {
    pub species: Arc<SpeciesDefinition>,
    pub captured: bool,
    pub aspects: Vec<String>,
}

/// Merge the catalog with an optional progress record.
///
/// Pure and deterministic: the same inputs always produce an equal output
/// list, sorted ascending by national number regardless of catalog
/// iteration order. With no progress record every entry comes back
/// uncaptured.
pub fn merge(catalog: &Catalog, progress: Option<&ProgressRecord>) -> Vec<MergedEntry> {
    let collected = progress.map(ProgressRecord::normalized_aspects);

    let mut entries: Vec<MergedEntry> = catalog
        .iter()
        .map(|species| {
            let aspects = collected
                .as_ref()
                .and_then(|map| map.get(&species.name.to_lowercase()));
            MergedEntry {
                species: species.clone(),
                captured: aspects.is_some(),
                aspects: aspects.cloned().unwrap_or_default(),
            }
        })
        .collect();

    entries.sort_by_key(|entry| entry.species.national_pokedex_number);
    entries
}
