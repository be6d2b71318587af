//! State manager messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::Profile;

/// Errors from state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("No history for user {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    StoreError(#[from] historystore::StoreError),

    #[error("Channel error")]
    ChannelError,
}

/// Response from state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Result of submitting a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Same game state as the user's latest snapshot; nothing written
    Duplicate,
    /// Appended to the user's history
    Stored {
        /// Latest snapshot before this one
        previous: Option<Profile>,
        /// Oldest snapshots dropped to stay within capacity
        evicted: usize,
    },
}

/// Commands sent to the StateManager actor
#[derive(Debug)]
pub enum StateCommand {
    /// Dedup against the latest snapshot and append atomically
    Submit {
        user: String,
        profile: Box<Profile>,
        reply: oneshot::Sender<StateResponse<Submission>>,
    },
    History {
        user: String,
        reply: oneshot::Sender<StateResponse<Vec<Profile>>>,
    },
    Latest {
        user: String,
        reply: oneshot::Sender<StateResponse<Option<Profile>>>,
    },
    /// Remove a user's history; replies whether anything existed
    Clear {
        user: String,
        reply: oneshot::Sender<StateResponse<bool>>,
    },
    Users {
        reply: oneshot::Sender<StateResponse<Vec<String>>>,
    },

    // Shutdown
    Shutdown,
}
