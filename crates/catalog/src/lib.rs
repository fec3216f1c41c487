//! # Companion Catalog
//!
//! Reference species catalog for the Pokédex completion view.
//!
//! The catalog lives in a partitioned asset tree (`gen1/`, `gen2/`, ...,
//! one JSON record per species) and is loaded exactly once per process:
//!
//! ```text
//! AssetSource
//!     │
//!     ├──> partition filter (genN)
//!     │      └─> per-file parse (bad files dropped, not fatal)
//!     │
//!     └──> Catalog (lowercased-name keys, cached for process lifetime)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use companion_catalog::{CatalogStore, DirAssetSource};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), companion_catalog::CatalogError> {
//!     let store = CatalogStore::new(Arc::new(DirAssetSource::new("species")));
//!     let catalog = store.load().await?;
//!     println!("{} species", catalog.len());
//!     Ok(())
//! }
//! ```

mod error;
mod source;
mod species;
mod store;

pub use error::{CatalogError, Result};
pub use source::{AssetSource, DirAssetSource};
pub use species::{BaseStats, Catalog, Evolution, SpeciesDefinition};
pub use store::CatalogStore;
