//! Board state management
//!
//! Boards own columns, columns own tasks. [`BoardState`] is the single
//! writer over all four collections and keeps them referentially intact.

mod avatar;
mod model;
mod seed;
mod state;

pub use avatar::avatar_for;
pub use model::*;
pub use seed::seed_snapshot;
pub use state::*;
