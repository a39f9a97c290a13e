//! Snapshot persistence
//!
//! The store is saved as one opaque JSON blob under a namespace key. The
//! blob wraps the snapshot in a versioned envelope:
//! `{"state": {...}, "version": 0}`.

mod file;
mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::error::Error;
use crate::Result;

pub use file::FileSnapshotStorage;
pub use memory::MemorySnapshotStorage;

/// Namespace key the board snapshot is stored under
pub const DEFAULT_STORAGE_KEY: &str = "task-board-storage";

/// Envelope version written by this crate
pub const SNAPSHOT_VERSION: u32 = 0;

/// Durable key-value blob storage
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    /// Load the blob stored under a key
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Store a blob under a key, replacing any previous value
    async fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Remove a key. Returns false if nothing was stored.
    async fn remove(&self, key: &str) -> Result<bool>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a BoardSnapshot,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: BoardSnapshot,
    version: u32,
}

/// Serialize a snapshot into a storage blob
pub fn encode_snapshot(snapshot: &BoardSnapshot) -> Result<String> {
    serde_json::to_string(&EnvelopeRef {
        state: snapshot,
        version: SNAPSHOT_VERSION,
    })
    .map_err(|e| Error::Storage(format!("Failed to serialize board snapshot: {}", e)))
}

/// Parse a storage blob back into a snapshot
pub fn decode_snapshot(blob: &str) -> Result<BoardSnapshot> {
    let envelope: Envelope = serde_json::from_str(blob)
        .map_err(|e| Error::Storage(format!("Failed to parse board snapshot: {}", e)))?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(Error::Storage(format!(
            "Unsupported snapshot version {}",
            envelope.version
        )));
    }
    Ok(envelope.state)
}
