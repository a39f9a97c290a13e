//! In-memory snapshot storage, for tests and ephemeral hosts

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::SnapshotStorage;
use crate::Result;

#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStorage for MemorySnapshotStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.blobs
            .write()
            .await
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.blobs.write().await.remove(key).is_some())
    }
}
