//! Host session: applies commands to the store and streams events back

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, info, warn};

use board_core::board::BoardSnapshot;
use board_core::drag::{DragConfig, DragCoordinator};
use board_core::store::BoardStore;

use crate::protocol::{parse_command, Command, HostEvent};

/// One UI connection's view of the store
pub struct Session {
    store: BoardStore,
    drag: DragCoordinator,
}

/// What a successfully applied command reports besides the state sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    None,
    /// The store did not change; the caller wants the state anyway
    Sync,
    Created { kind: &'static str, id: String },
}

impl Session {
    pub fn new(store: BoardStore, drag: DragConfig) -> Self {
        Self {
            store,
            drag: DragCoordinator::new(drag),
        }
    }

    /// Apply one command to the store
    pub async fn apply(&mut self, command: Command) -> board_core::Result<Reply> {
        if let Some(event) = command.pointer_event() {
            let outcome = self.store.drag(&mut self.drag, event).await?;
            debug!("Drag outcome: {:?}", outcome);
            return Ok(Reply::None);
        }

        let store = &self.store;
        let reply = match command {
            Command::RequestSync => Reply::Sync,
            Command::AddUser { name } => created("user", store.add_user(&name).await?),
            Command::SetCurrentUser { user_id } => {
                store.set_current_user(&user_id).await?;
                Reply::None
            }
            Command::CreateBoard { name, created_by } => {
                let created_by = match created_by {
                    Some(user_id) => user_id,
                    None => store.snapshot().await.current_user_id,
                };
                created("board", store.create_board(&name, &created_by).await?)
            }
            Command::DeleteBoard { board_id } => {
                store.delete_board(&board_id).await?;
                Reply::None
            }
            Command::CreateColumn { board_id, title } => {
                created("column", store.create_column(&board_id, &title).await?)
            }
            Command::UpdateColumn { column_id, title } => {
                store.update_column(&column_id, &title).await?;
                Reply::None
            }
            Command::DeleteColumn { column_id } => {
                store.delete_column(&column_id).await?;
                Reply::None
            }
            Command::CreateTask { column_id, mut task } => {
                if task.created_by.is_empty() || task.assigned_to.is_empty() {
                    let current = store.snapshot().await.current_user_id;
                    if task.created_by.is_empty() {
                        task.created_by = current.clone();
                    }
                    if task.assigned_to.is_empty() {
                        task.assigned_to = current;
                    }
                }
                created("task", store.create_task(&column_id, task).await?)
            }
            Command::UpdateTask { task_id, update } => {
                store.update_task(&task_id, update).await?;
                Reply::None
            }
            Command::DeleteTask { task_id } => {
                store.delete_task(&task_id).await?;
                Reply::None
            }
            Command::MoveTask {
                task_id,
                target_column_id,
                target_index,
            } => {
                store
                    .move_task(&task_id, &target_column_id, target_index)
                    .await?;
                Reply::None
            }
            Command::ReorderTasks { column_id, task_ids } => {
                store.reorder_tasks(&column_id, task_ids).await?;
                Reply::None
            }
            Command::PointerDown { .. }
            | Command::PointerMove { .. }
            | Command::PointerUp { .. }
            | Command::PointerCancel => Reply::None,
        };
        Ok(reply)
    }

    /// Handle one raw input line, writing any reply events
    async fn handle_line<W>(&mut self, line: &str, out: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("Malformed command: {}", e);
                return write_event(out, &HostEvent::error(format!("Malformed command: {}", e)))
                    .await;
            }
        };

        match self.apply(command).await {
            Ok(Reply::None) => Ok(()),
            Ok(Reply::Sync) => {
                let snapshot = self.store.snapshot().await;
                write_event(out, &HostEvent::Sync { state: &snapshot }).await
            }
            Ok(Reply::Created { kind, id }) => {
                write_event(out, &HostEvent::Created { kind, id }).await
            }
            Err(e) => {
                warn!("Command failed: {}", e);
                write_event(out, &HostEvent::error(e.to_string())).await
            }
        }
    }

    /// Serve commands from `input` until EOF
    ///
    /// Every snapshot the store publishes is written as a `board:sync` line.
    pub async fn run<R, W>(mut self, input: R, mut out: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut updates = self.store.subscribe();
        let mut lines = input.lines();

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line, &mut out).await?,
                    None => break,
                },
                update = updates.recv() => match update {
                    Ok(snapshot) => write_sync(&mut out, &snapshot).await?,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Skipped {} board updates, resending current state", skipped);
                        let snapshot = self.store.snapshot().await;
                        write_event(&mut out, &HostEvent::Sync { state: &snapshot }).await?;
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        // flush updates produced by the last commands
        loop {
            match updates.try_recv() {
                Ok(snapshot) => write_sync(&mut out, &snapshot).await?,
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        out.flush().await?;
        info!("Input closed, session finished");
        Ok(())
    }
}

fn created(kind: &'static str, id: String) -> Reply {
    Reply::Created { kind, id }
}

async fn write_sync<W>(out: &mut W, snapshot: &Arc<BoardSnapshot>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_event(out, &HostEvent::Sync { state: snapshot }).await
}

async fn write_event<W>(out: &mut W, event: &HostEvent<'_>) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(event.to_line()?.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}
