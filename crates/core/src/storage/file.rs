//! File-based snapshot storage
//!
//! Each key is stored as `<data_dir>/<key>.json`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::SnapshotStorage;
use crate::{Error, Result};

/// Snapshot storage backed by JSON files in a directory
#[derive(Debug, Clone)]
pub struct FileSnapshotStorage {
    data_dir: PathBuf,
}

impl FileSnapshotStorage {
    /// Create storage rooted at a directory
    ///
    /// The directory is created on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(Error::InvalidInput(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.data_dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl SnapshotStorage for FileSnapshotStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::Storage(format!("Failed to read snapshot file: {}", e))
        })?;
        Ok(Some(content))
    }

    async fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create directory: {}", e))
            })?;
        }

        tokio::fs::write(&path, blob).await.map_err(|e| {
            Error::Storage(format!("Failed to write snapshot file: {}", e))
        })?;
        debug!("Saved snapshot: {}", path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_file(&path).await?;
        Ok(true)
    }
}
