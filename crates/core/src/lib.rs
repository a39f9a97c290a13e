//! Core library for the task board
//!
//! This crate contains the board state store and its supporting pieces:
//! - Board, column, task and user state with referential integrity
//! - The drag coordinator that turns pointer gestures into moves
//! - Snapshot persistence and the persisted, shareable store
//! - Environment-driven configuration

pub mod board;
pub mod config;
pub mod drag;
pub mod error;
pub mod storage;
pub mod store;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
