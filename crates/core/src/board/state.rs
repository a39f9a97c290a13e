//! Board state store
//!
//! [`BoardState`] owns boards, columns, tasks and users, and is the only
//! place they are mutated. Every operation is all-or-nothing: it validates
//! first, then applies, then notifies observers with the new snapshot.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info};

use crate::error::Error;
use crate::Result;

use super::avatar::avatar_for;
use super::model::{
    generate_id, today, Board, BoardSnapshot, Column, NewTask, Task, TaskUpdate, User,
};
use super::seed::seed_snapshot;

/// Callback invoked synchronously after every successful mutation
pub type Observer = Box<dyn FnMut(&BoardSnapshot) + Send + Sync>;

/// Handle returned by [`BoardState::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

fn require_text(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed.to_string())
}

/// The canonical in-memory board store
pub struct BoardState {
    data: BoardSnapshot,
    /// Board id -> ids of its columns, in display order
    board_columns: HashMap<String, Vec<String>>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardState")
            .field("data", &self.data)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Create an empty store
    pub fn new() -> Self {
        Self::indexed(BoardSnapshot::default())
    }

    /// Create a store holding the initial seed board
    pub fn seeded() -> Self {
        Self::indexed(seed_snapshot())
    }

    /// Restore a store from a snapshot, rejecting one that breaks integrity
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Result<Self> {
        let state = Self::indexed(snapshot);
        state.check_invariants()?;
        Ok(state)
    }

    fn indexed(data: BoardSnapshot) -> Self {
        let mut columns: Vec<&Column> = data.columns.values().collect();
        columns.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        let mut board_columns: HashMap<String, Vec<String>> = HashMap::new();
        for column in columns {
            board_columns
                .entry(column.board_id.clone())
                .or_default()
                .push(column.id.clone());
        }

        Self {
            data,
            board_columns,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// The current snapshot
    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.data
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.data.boards.get(board_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.data.columns.get(column_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.data.tasks.get(task_id)
    }

    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.data.users.get(user_id)
    }

    pub fn current_user_id(&self) -> &str {
        &self.data.current_user_id
    }

    /// Ids of a board's columns, in display order
    pub fn column_ids(&self, board_id: &str) -> &[String] {
        self.board_columns
            .get(board_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // ============ Observers ============

    /// Register an observer; it is called after every successful mutation
    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Copy the data and indexes, leaving observers behind
    ///
    /// Mutations on the copy notify nobody until it is handed back through
    /// [`BoardState::replace_with`].
    pub fn detached(&self) -> Self {
        Self {
            data: self.data.clone(),
            board_columns: self.board_columns.clone(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Take over the data of `other` and notify this store's observers
    pub fn replace_with(&mut self, other: BoardState) {
        self.data = other.data;
        self.board_columns = other.board_columns;
        self.notify();
    }

    fn notify(&mut self) {
        let data = &self.data;
        for (_, observer) in self.observers.iter_mut() {
            observer(data);
        }
    }

    // ============ Users ============

    /// Add a user with an avatar derived from their name
    pub fn add_user(&mut self, name: &str) -> String {
        let id = generate_id();
        let user = User {
            id: id.clone(),
            name: name.to_string(),
            avatar: avatar_for(name).to_string(),
        };
        self.data.users.insert(id.clone(), user);
        info!("Added user {} ({})", name, id);
        self.notify();
        id
    }

    /// Set the user used as default attribution
    pub fn set_current_user(&mut self, user_id: &str) -> Result<()> {
        if !self.data.users.contains_key(user_id) {
            return Err(Error::UserNotFound(user_id.to_string()));
        }
        self.data.current_user_id = user_id.to_string();
        self.notify();
        Ok(())
    }

    // ============ Boards ============

    /// Create an empty board stamped with today's date
    pub fn create_board(&mut self, name: &str, created_by: &str) -> Result<String> {
        let name = require_text(name, "Board name")?;
        let id = generate_id();
        let board = Board {
            id: id.clone(),
            name,
            created_by: created_by.to_string(),
            created_date: today(),
            column_count: 0,
        };
        info!("Created board {} ({})", board.name, id);
        self.data.boards.insert(id.clone(), board);
        self.board_columns.insert(id.clone(), Vec::new());
        self.notify();
        Ok(id)
    }

    /// Delete a board together with its columns and their tasks
    pub fn delete_board(&mut self, board_id: &str) -> Result<Board> {
        let board = self
            .data
            .boards
            .remove(board_id)
            .ok_or_else(|| Error::BoardNotFound(board_id.to_string()))?;

        let column_ids = self.board_columns.remove(board_id).unwrap_or_default();
        let mut removed_tasks = 0;
        for column_id in &column_ids {
            if let Some(column) = self.data.columns.remove(column_id) {
                for task_id in &column.task_ids {
                    if self.data.tasks.remove(task_id).is_some() {
                        removed_tasks += 1;
                    }
                }
            }
        }

        info!(
            "Deleted board {} with {} columns and {} tasks",
            board_id,
            column_ids.len(),
            removed_tasks
        );
        self.notify();
        Ok(board)
    }

    // ============ Columns ============

    /// Append an empty column to a board
    pub fn create_column(&mut self, board_id: &str, title: &str) -> Result<String> {
        let title = require_text(title, "Column title")?;
        let board = self
            .data
            .boards
            .get_mut(board_id)
            .ok_or_else(|| Error::BoardNotFound(board_id.to_string()))?;

        let siblings = self.board_columns.entry(board_id.to_string()).or_default();
        // sibling count, bumped past any order left behind by deletes
        let order = siblings
            .iter()
            .filter_map(|id| self.data.columns.get(id))
            .map(|column| column.order + 1)
            .max()
            .unwrap_or(0)
            .max(siblings.len());
        let id = generate_id();
        let column = Column {
            id: id.clone(),
            title,
            board_id: board_id.to_string(),
            task_ids: Vec::new(),
            order,
        };
        siblings.push(id.clone());
        board.column_count += 1;

        info!("Created column {} on board {}", id, board_id);
        self.data.columns.insert(id.clone(), column);
        self.notify();
        Ok(id)
    }

    /// Rename a column
    pub fn update_column(&mut self, column_id: &str, title: &str) -> Result<()> {
        let title = require_text(title, "Column title")?;
        let column = self
            .data
            .columns
            .get_mut(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;
        column.title = title;
        self.notify();
        Ok(())
    }

    /// Delete a column and every task in it
    pub fn delete_column(&mut self, column_id: &str) -> Result<Column> {
        let column = self
            .data
            .columns
            .remove(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;

        for task_id in &column.task_ids {
            self.data.tasks.remove(task_id);
        }
        if let Some(siblings) = self.board_columns.get_mut(&column.board_id) {
            siblings.retain(|id| id != column_id);
        }
        if let Some(board) = self.data.boards.get_mut(&column.board_id) {
            board.column_count = board.column_count.saturating_sub(1);
        }

        info!(
            "Deleted column {} with {} tasks",
            column_id,
            column.task_ids.len()
        );
        self.notify();
        Ok(column)
    }

    // ============ Tasks ============

    /// Create a task at the end of a column
    pub fn create_task(&mut self, column_id: &str, fields: NewTask) -> Result<String> {
        let title = require_text(&fields.title, "Task title")?;
        let column = self
            .data
            .columns
            .get_mut(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;

        let id = generate_id();
        let task = Task {
            id: id.clone(),
            title,
            description: fields.description,
            column_id: column_id.to_string(),
            created_by: fields.created_by,
            assigned_to: fields.assigned_to,
            priority: fields.priority,
            due_date: fields.due_date,
            created_date: today(),
        };
        column.task_ids.push(id.clone());

        info!("Created task {} in column {}", id, column_id);
        self.data.tasks.insert(id.clone(), task);
        self.notify();
        Ok(id)
    }

    /// Merge a partial update into a task
    pub fn update_task(&mut self, task_id: &str, update: TaskUpdate) -> Result<()> {
        if let Some(title) = &update.title {
            require_text(title, "Task title")?;
        }
        let task = self
            .data
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        let mut update = update;
        if let Some(title) = update.title.take() {
            update.title = Some(title.trim().to_string());
        }
        update.apply(task);
        self.notify();
        Ok(())
    }

    /// Delete a task and drop it from its column
    pub fn delete_task(&mut self, task_id: &str) -> Result<Task> {
        let task = self
            .data
            .tasks
            .remove(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        if let Some(column) = self.data.columns.get_mut(&task.column_id) {
            column.task_ids.retain(|id| id != task_id);
        }

        info!("Deleted task {}", task_id);
        self.notify();
        Ok(task)
    }

    /// Move a task into a column at a position
    ///
    /// The index is clamped to the target column's length after the task has
    /// been taken out of its source column. Returns the index it landed at.
    pub fn move_task(
        &mut self,
        task_id: &str,
        target_column_id: &str,
        target_index: usize,
    ) -> Result<usize> {
        if !self.data.columns.contains_key(target_column_id) {
            return Err(Error::ColumnNotFound(target_column_id.to_string()));
        }
        let task = self
            .data
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;

        let source_column_id = std::mem::replace(&mut task.column_id, target_column_id.to_string());

        if let Some(source) = self.data.columns.get_mut(&source_column_id) {
            source.task_ids.retain(|id| id != task_id);
        }

        let index = match self.data.columns.get_mut(target_column_id) {
            Some(target) => {
                let index = target_index.min(target.task_ids.len());
                target.task_ids.insert(index, task_id.to_string());
                index
            }
            None => 0,
        };

        debug!(
            "Moved task {} from {} to {} at {}",
            task_id, source_column_id, target_column_id, index
        );
        self.notify();
        Ok(index)
    }

    /// Replace a column's task order with a permutation of its current tasks
    pub fn reorder_tasks(&mut self, column_id: &str, task_ids: Vec<String>) -> Result<()> {
        let column = self
            .data
            .columns
            .get_mut(column_id)
            .ok_or_else(|| Error::ColumnNotFound(column_id.to_string()))?;

        let current: HashSet<&String> = column.task_ids.iter().collect();
        let proposed: HashSet<&String> = task_ids.iter().collect();
        if task_ids.len() != column.task_ids.len()
            || proposed.len() != task_ids.len()
            || current != proposed
        {
            return Err(Error::InvariantViolation(format!(
                "Reorder of column {} is not a permutation of its tasks",
                column_id
            )));
        }

        column.task_ids = task_ids;
        debug!("Reordered tasks in column {}", column_id);
        self.notify();
        Ok(())
    }

    // ============ Integrity ============

    /// Verify the referential invariants across all collections
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| -> Result<()> { Err(Error::InvariantViolation(msg)) };

        let mut columns_per_board: HashMap<&str, usize> = HashMap::new();
        for column in self.data.columns.values() {
            if !self.data.boards.contains_key(&column.board_id) {
                return violation(format!(
                    "Column {} references missing board {}",
                    column.id, column.board_id
                ));
            }
            *columns_per_board.entry(column.board_id.as_str()).or_default() += 1;
        }

        for board in self.data.boards.values() {
            let live = columns_per_board.get(board.id.as_str()).copied().unwrap_or(0);
            if board.column_count != live {
                return violation(format!(
                    "Board {} has columnCount {} but {} columns",
                    board.id, board.column_count, live
                ));
            }
        }

        let mut listed: HashSet<&str> = HashSet::new();
        for column in self.data.columns.values() {
            for task_id in &column.task_ids {
                if !listed.insert(task_id.as_str()) {
                    return violation(format!("Task {} is listed more than once", task_id));
                }
                match self.data.tasks.get(task_id) {
                    Some(task) if task.column_id == column.id => {}
                    Some(task) => {
                        return violation(format!(
                            "Task {} is listed in {} but belongs to {}",
                            task_id, column.id, task.column_id
                        ))
                    }
                    None => {
                        return violation(format!(
                            "Column {} lists missing task {}",
                            column.id, task_id
                        ))
                    }
                }
            }
        }

        for task in self.data.tasks.values() {
            if !self.data.columns.contains_key(&task.column_id) {
                return violation(format!(
                    "Task {} references missing column {}",
                    task.id, task.column_id
                ));
            }
            if !listed.contains(task.id.as_str()) {
                return violation(format!(
                    "Task {} is not listed in column {}",
                    task.id, task.column_id
                ));
            }
        }

        Ok(())
    }
}
