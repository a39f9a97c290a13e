//! Drag and drop over task cards
//!
//! The coordinator tracks one gesture at a time and issues `move_task` /
//! `reorder_tasks` calls against the board state.

mod coordinator;

pub use coordinator::*;
