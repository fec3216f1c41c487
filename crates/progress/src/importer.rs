use crate::error::{ImportError, Result};
use crate::record::ProgressRecord;
use async_trait::async_trait;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};

/// Opaque byte source a progress snapshot is read from. The UI layer decides
/// where the bytes come from (file picker, share intent, test fixture); the
/// importer only sees the locator.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn read_all(&self) -> io::Result<Vec<u8>>;
}

/// Snapshot source backed by a file on disk.
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn read_all(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// Turns an opaque byte source into a [`ProgressRecord`].
///
/// All-or-nothing: either the whole snapshot decodes or the import fails
/// with no side effects. The importer never touches catalog or view state.
#[derive(Debug, Default)]
pub struct ProgressImporter;

impl ProgressImporter {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse(&self, source: &dyn SnapshotSource) -> Result<ProgressRecord> {
        let bytes = source.read_all().await.map_err(ImportError::Read)?;
        let record: ProgressRecord =
            serde_json::from_slice(&bytes).map_err(ImportError::Decode)?;
        debug!(
            "parsed progress snapshot for {}: {} species with aspects",
            record.uuid,
            record.advancement_data.aspects_collected.len()
        );
        Ok(record)
    }
}
