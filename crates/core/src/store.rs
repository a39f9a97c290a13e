//! Persisted board store
//!
//! Wraps [`BoardState`] behind an async lock so that mutations from any
//! task are applied one at a time. Each mutation runs on a detached copy
//! that is saved before it replaces the live state, so a failed save leaves
//! memory, storage and subscribers untouched.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{info, warn};

use crate::board::{Board, BoardSnapshot, BoardState, Column, NewTask, Task, TaskUpdate};
use crate::config::BoardConfig;
use crate::drag::{DragCoordinator, DragOutcome, PointerEvent};
use crate::storage::{decode_snapshot, encode_snapshot, FileSnapshotStorage, SnapshotStorage};
use crate::Result;

const EVENT_CAPACITY: usize = 256;

/// Thread-safe board store with snapshot persistence
#[derive(Clone)]
pub struct BoardStore {
    state: Arc<RwLock<BoardState>>,
    storage: Arc<dyn SnapshotStorage>,
    key: String,
    events: broadcast::Sender<Arc<BoardSnapshot>>,
}

impl BoardStore {
    /// Open the store saved under `key`, or start from seed data
    ///
    /// A fresh seed is written immediately so the next start restores it.
    pub async fn open(storage: Arc<dyn SnapshotStorage>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let (state, fresh) = match storage.load(&key).await? {
            Some(blob) => {
                let snapshot = decode_snapshot(&blob)?;
                let state = BoardState::from_snapshot(snapshot).inspect_err(|e| {
                    warn!("Saved board snapshot {} is inconsistent: {}", key, e);
                })?;
                info!(
                    "Restored board snapshot {} ({} boards, {} tasks)",
                    key,
                    state.snapshot().boards.len(),
                    state.snapshot().tasks.len()
                );
                (state, false)
            }
            None => {
                info!("No saved board snapshot {}, starting from seed data", key);
                (BoardState::seeded(), true)
            }
        };

        let store = Self::with_state(state, storage, key);
        if fresh {
            store.persist().await?;
        }
        Ok(store)
    }

    /// Open the file-backed store described by a config
    pub async fn open_with_config(config: &BoardConfig) -> Result<Self> {
        let storage = Arc::new(FileSnapshotStorage::new(config.data_dir.clone()));
        Self::open(storage, config.storage_key.clone()).await
    }

    /// Wrap an existing state without loading or saving
    pub fn with_state(
        mut state: BoardState,
        storage: Arc<dyn SnapshotStorage>,
        key: impl Into<String>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let sender = events.clone();
        state.subscribe(Box::new(move |snapshot: &BoardSnapshot| {
            // no receivers is fine
            let _ = sender.send(Arc::new(snapshot.clone()));
        }));

        Self {
            state: Arc::new(RwLock::new(state)),
            storage,
            key: key.into(),
            events,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Receive every snapshot produced by a successful mutation
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<BoardSnapshot>> {
        self.events.subscribe()
    }

    /// Get the current board state
    pub async fn snapshot(&self) -> BoardSnapshot {
        self.state.read().await.snapshot().clone()
    }

    /// Apply one mutation, persist it, then publish it, all under the lock
    async fn mutate<T>(&self, op: impl FnOnce(&mut BoardState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write().await;
        let mut next = state.detached();
        let value = op(&mut next)?;
        self.save(&next).await.inspect_err(|e| {
            warn!("Discarding board change, save failed: {}", e);
        })?;
        state.replace_with(next);
        Ok(value)
    }

    pub async fn add_user(&self, name: &str) -> Result<String> {
        self.mutate(|state| Ok(state.add_user(name))).await
    }

    pub async fn set_current_user(&self, user_id: &str) -> Result<()> {
        self.mutate(|state| state.set_current_user(user_id)).await
    }

    pub async fn create_board(&self, name: &str, created_by: &str) -> Result<String> {
        self.mutate(|state| state.create_board(name, created_by)).await
    }

    pub async fn delete_board(&self, board_id: &str) -> Result<Board> {
        self.mutate(|state| state.delete_board(board_id)).await
    }

    pub async fn create_column(&self, board_id: &str, title: &str) -> Result<String> {
        self.mutate(|state| state.create_column(board_id, title)).await
    }

    pub async fn update_column(&self, column_id: &str, title: &str) -> Result<()> {
        self.mutate(|state| state.update_column(column_id, title)).await
    }

    pub async fn delete_column(&self, column_id: &str) -> Result<Column> {
        self.mutate(|state| state.delete_column(column_id)).await
    }

    pub async fn create_task(&self, column_id: &str, fields: NewTask) -> Result<String> {
        self.mutate(|state| state.create_task(column_id, fields)).await
    }

    pub async fn update_task(&self, task_id: &str, update: TaskUpdate) -> Result<()> {
        self.mutate(|state| state.update_task(task_id, update)).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<Task> {
        self.mutate(|state| state.delete_task(task_id)).await
    }

    pub async fn move_task(
        &self,
        task_id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<usize> {
        self.mutate(|state| state.move_task(task_id, target_column_id, target_index))
            .await
    }

    pub async fn reorder_tasks(&self, column_id: &str, task_ids: Vec<String>) -> Result<()> {
        self.mutate(|state| state.reorder_tasks(column_id, task_ids))
            .await
    }

    /// Feed one pointer event through a drag session
    ///
    /// The snapshot is saved only when the event changed the store. A failed
    /// save discards the change and ends the drag session.
    pub async fn drag(
        &self,
        coordinator: &mut DragCoordinator,
        event: PointerEvent,
    ) -> Result<DragOutcome> {
        let mut state = self.state.write().await;
        let mut next = state.detached();
        let outcome = coordinator.handle(&mut next, event)?;
        if outcome.changed_store() {
            if let Err(e) = self.save(&next).await {
                warn!("Discarding drag change, save failed: {}", e);
                coordinator.reset();
                return Err(e);
            }
            state.replace_with(next);
        }
        Ok(outcome)
    }

    /// Persist the current state
    pub async fn persist(&self) -> Result<()> {
        let state = self.state.read().await;
        self.save(&state).await
    }

    async fn save(&self, state: &BoardState) -> Result<()> {
        let blob = encode_snapshot(state.snapshot())?;
        self.storage.save(&self.key, &blob).await
    }
}
