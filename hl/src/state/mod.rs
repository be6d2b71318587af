//! State management with actor pattern
//!
//! StateManager owns the HistoryStore and processes messages via channels,
//! serializing every read-decide-write on a user's history.

mod manager;
mod messages;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse, Submission};
