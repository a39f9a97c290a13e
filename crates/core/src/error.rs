//! Error types for the board store

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// True for the family of errors raised when a referenced id is missing
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound(_)
                | Self::ColumnNotFound(_)
                | Self::TaskNotFound(_)
                | Self::UserNotFound(_)
        )
    }
}
