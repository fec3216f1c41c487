//! # Companion Progress
//!
//! Import of user progress snapshots (capture data exported from a game
//! save) and the key normalization that lets them join against the
//! reference catalog.

mod error;
mod importer;
mod record;

pub use error::{ImportError, Result};
pub use importer::{FileSnapshotSource, ProgressImporter, SnapshotSource};
pub use record::{normalize_species_key, AdvancementData, ProgressRecord};
