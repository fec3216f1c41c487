use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One immutable reference record from the species catalog.
///
/// `generation` is assigned by the loader from the partition the record was
/// found in; a `generation` value inside the JSON payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDefinition {
    pub name: String,
    pub national_pokedex_number: u32,
    #[serde(default)]
    pub generation: u32,
    pub primary_type: String,
    #[serde(default)]
    pub secondary_type: Option<String>,
    pub abilities: Vec<String>,
    pub base_stats: BaseStats,
    pub catch_rate: u32,
    pub male_ratio: f32,
    pub female_ratio: f32,
    #[serde(default)]
    pub evolutions: Option<Vec<Evolution>>,
    #[serde(default)]
    pub spawn_biomes: Option<Vec<String>>,
}

/// The six fixed base stats. Catalog files exported from the game use the
/// short keys (`atk`, `def`, `spa`, `spd`, `spe`); hand-authored files use
/// the long camelCase names. Both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    pub hp: u32,
    #[serde(alias = "atk")]
    pub attack: u32,
    #[serde(alias = "def")]
    pub defense: u32,
    #[serde(alias = "spa")]
    pub special_attack: u32,
    #[serde(alias = "spd")]
    pub special_defense: u32,
    #[serde(alias = "spe")]
    pub speed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Evolution {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub item: Option<String>,
    pub result: String,
}

/// The full reference catalog, keyed by lowercased canonical name.
///
/// Entries whose names normalize to the same key silently replace each other
/// within a single load pass (last writer wins). That mirrors the behavior of
/// the save format this catalog pairs with and is kept on purpose.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    species: HashMap<String, Arc<SpeciesDefinition>>,
}

impl Catalog {
    pub fn insert(&mut self, key: String, definition: SpeciesDefinition) {
        self.species.insert(key, Arc::new(definition));
    }

    /// Look up a species by canonical name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&Arc<SpeciesDefinition>> {
        self.species.get(&name.to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SpeciesDefinition>> {
        self.species.values()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}
