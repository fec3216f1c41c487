use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only hierarchical asset store the catalog is loaded from.
///
/// Paths are relative, `/`-separated, with `""` naming the root. The catalog
/// loader only ever looks one level deep: partitions under the root, record
/// files under a partition.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// List the names of the entries directly under `path`.
    async fn list(&self, path: &str) -> io::Result<Vec<String>>;

    /// Read the full contents of the entry at `path`.
    async fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Asset source backed by a plain directory tree.
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl AssetSource for DirAssetSource {
    async fn list(&self, path: &str) -> io::Result<Vec<String>> {
        let mut dir = tokio::fs::read_dir(self.resolve(path)).await?;
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    async fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.resolve(path)).await
    }
}
