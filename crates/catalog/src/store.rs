use crate::error::{CatalogError, Result};
use crate::source::AssetSource;
use crate::species::{Catalog, SpeciesDefinition};
use log::{debug, warn};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Suffix of structured species record files inside a partition.
const RECORD_SUFFIX: &str = ".json";

/// Prefix that marks a top-level entry as a generation partition.
const PARTITION_PREFIX: &str = "gen";

/// Loads the species catalog from a partitioned asset source and caches it
/// for the life of the process.
///
/// `load` is single-flight: concurrent callers before the first successful
/// completion share one underlying read pass and all observe the same
/// outcome. A successful load (including one that yields an empty catalog)
/// is cached forever; a failed load is not cached and may be retried.
pub struct CatalogStore {
    source: Arc<dyn AssetSource>,
    cache: OnceCell<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    pub async fn load(&self) -> Result<Arc<Catalog>> {
        self.cache
            .get_or_try_init(|| self.load_uncached())
            .await
            .map(Arc::clone)
    }

    /// Look up one species by canonical name, independent of any view state.
    /// Triggers the catalog load if it has not happened yet.
    pub async fn species_by_name(&self, name: &str) -> Result<Option<Arc<SpeciesDefinition>>> {
        let catalog = self.load().await?;
        Ok(catalog.get(name).cloned())
    }

    async fn load_uncached(&self) -> Result<Arc<Catalog>> {
        debug!("loading species catalog from asset source");
        let top_level = self
            .source
            .list("")
            .await
            .map_err(CatalogError::Enumerate)?;

        let mut catalog = Catalog::default();
        let mut partitions = 0usize;

        for partition in &top_level {
            let Some(generation) = parse_generation(partition) else {
                debug!("skipping non-partition entry {partition}");
                continue;
            };
            partitions += 1;

            let entries = match self.source.list(partition).await {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("failed to list partition {partition}: {err}");
                    continue;
                }
            };
            debug!("partition {partition}: {} entries", entries.len());

            for entry in entries {
                let Some(canonical) = entry.strip_suffix(RECORD_SUFFIX) else {
                    continue;
                };
                let path = format!("{partition}/{entry}");
                let bytes = match self.source.read(&path).await {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        warn!("failed to read {path}: {err}");
                        continue;
                    }
                };
                let mut definition: SpeciesDefinition = match serde_json::from_slice(&bytes) {
                    Ok(definition) => definition,
                    Err(err) => {
                        warn!("failed to parse {path}: {err}");
                        continue;
                    }
                };
                // The partition is authoritative for the generation number,
                // whatever the payload says.
                definition.generation = generation;
                catalog.insert(canonical.to_lowercase(), definition);
            }
        }

        if partitions == 0 {
            warn!("no generation partitions found in the asset source");
        }
        debug!("catalog loaded: {} species", catalog.len());
        Ok(Arc::new(catalog))
    }
}

/// `genN` where N is a positive integer, else not a partition.
fn parse_generation(name: &str) -> Option<u32> {
    name.strip_prefix(PARTITION_PREFIX)?
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::parse_generation;
    use pretty_assertions::assert_eq;

    #[test]
    fn partition_names() {
        assert_eq!(parse_generation("gen1"), Some(1));
        assert_eq!(parse_generation("gen12"), Some(12));
        assert_eq!(parse_generation("gen0"), None);
        assert_eq!(parse_generation("genx"), None);
        assert_eq!(parse_generation("extras"), None);
        assert_eq!(parse_generation("generation1"), None);
    }
}
