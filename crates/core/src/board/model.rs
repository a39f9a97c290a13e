//! Board model definitions
//!
//! These types mirror the persisted blob shape used by the browser client,
//! so field names are camelCase on the wire.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Generate a fresh entity id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Today's date in UTC, used to stamp created boards and tasks
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// A person tasks and boards can be attributed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Avatar image URL, picked from a fixed palette by name
    pub avatar: String,
}

/// Top-level container of columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    /// User id of the creator
    pub created_by: String,
    pub created_date: NaiveDate,
    /// Number of live columns referencing this board
    pub column_count: usize,
}

/// An ordered lane of tasks within a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub title: String,
    pub board_id: String,
    /// Authoritative display order of the column's tasks
    pub task_ids: Vec<String>,
    /// Position among sibling columns of the same board
    pub order: usize,
}

impl Column {
    /// Position of a task within this column
    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.task_ids.iter().position(|id| id == task_id)
    }
}

/// A unit of work belonging to exactly one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub column_id: String,
    pub created_by: String,
    pub assigned_to: String,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub created_date: NaiveDate,
}

/// Fields supplied when creating a task
///
/// The id, column and creation date are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    /// Create a new task payload with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the creator
    pub fn with_created_by(mut self, user_id: impl Into<String>) -> Self {
        self.created_by = user_id.into();
        self
    }

    /// Set the assignee
    pub fn with_assigned_to(mut self, user_id: impl Into<String>) -> Self {
        self.assigned_to = user_id.into();
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update for a task
///
/// Has no `column_id`: column membership only changes through `move_task`,
/// which keeps `task_ids` in sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date; an explicit `null` on the wire maps to it
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date: Option<Option<NaiveDate>>,
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assigned_to.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }

    pub(crate) fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
    }
}

/// The complete board state handed to observers and persisted as a blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub boards: HashMap<String, Board>,
    pub columns: HashMap<String, Column>,
    pub tasks: HashMap<String, Task>,
    pub users: HashMap<String, User>,
    pub current_user_id: String,
}

impl BoardSnapshot {
    /// Columns of a board in display order
    pub fn columns_for_board(&self, board_id: &str) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self
            .columns
            .values()
            .filter(|column| column.board_id == board_id)
            .collect();
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        columns
    }

    /// Tasks of a column in display order
    pub fn tasks_for_column(&self, column_id: &str) -> Vec<&Task> {
        self.columns
            .get(column_id)
            .map(|column| {
                column
                    .task_ids
                    .iter()
                    .filter_map(|id| self.tasks.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The user currently acting, if the id resolves
    pub fn current_user(&self) -> Option<&User> {
        self.users.get(&self.current_user_id)
    }

    /// Resolve an attribution string to a display name
    ///
    /// Attribution is stored as a user id; older blobs carried raw display
    /// names, which are returned unchanged.
    pub fn user_name<'a>(&'a self, attribution: &'a str) -> &'a str {
        self.users
            .get(attribution)
            .map(|user| user.name.as_str())
            .unwrap_or(attribution)
    }
}
