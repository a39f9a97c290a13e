//! Line-delimited JSON protocol between the UI shell and the host
//!
//! Each input line is one [`Command`]; each output line is one
//! [`HostEvent`].

use serde::{Deserialize, Serialize};

use board_core::board::{BoardSnapshot, NewTask, TaskUpdate};
use board_core::drag::{DropTarget, Point, PointerEvent};

// ============ Commands ============

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Command {
    RequestSync,
    AddUser {
        name: String,
    },
    SetCurrentUser {
        user_id: String,
    },
    CreateBoard {
        name: String,
        /// Defaults to the current user
        created_by: Option<String>,
    },
    DeleteBoard {
        board_id: String,
    },
    CreateColumn {
        board_id: String,
        title: String,
    },
    UpdateColumn {
        column_id: String,
        title: String,
    },
    DeleteColumn {
        column_id: String,
    },
    CreateTask {
        column_id: String,
        #[serde(flatten)]
        task: NewTask,
    },
    UpdateTask {
        task_id: String,
        #[serde(flatten)]
        update: TaskUpdate,
    },
    DeleteTask {
        task_id: String,
    },
    MoveTask {
        task_id: String,
        target_column_id: String,
        #[serde(default)]
        target_index: usize,
    },
    ReorderTasks {
        column_id: String,
        task_ids: Vec<String>,
    },
    PointerDown {
        task_id: String,
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
        over: Option<DropTarget>,
    },
    PointerUp {
        over: Option<DropTarget>,
    },
    PointerCancel,
}

impl Command {
    /// The drag event this command carries, if it is a pointer command
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match self {
            Self::PointerDown { task_id, x, y } => Some(PointerEvent::Down {
                task_id: task_id.clone(),
                position: Point::new(*x, *y),
            }),
            Self::PointerMove { x, y, over } => Some(PointerEvent::Move {
                position: Point::new(*x, *y),
                over: over.clone(),
            }),
            Self::PointerUp { over } => Some(PointerEvent::Up { over: over.clone() }),
            Self::PointerCancel => Some(PointerEvent::Cancel),
            _ => None,
        }
    }
}

/// Parse one input line
pub fn parse_command(line: &str) -> serde_json::Result<Command> {
    serde_json::from_str(line)
}

// ============ Events ============

#[derive(Debug, Serialize)]
#[serde(tag = "event")]
pub enum HostEvent<'a> {
    #[serde(rename = "board:sync")]
    Sync { state: &'a BoardSnapshot },
    #[serde(rename = "board:created")]
    Created { kind: &'static str, id: String },
    #[serde(rename = "board:error")]
    Error { message: String },
}

impl HostEvent<'_> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Encode as one output line, newline included
    pub fn to_line(&self) -> serde_json::Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}
