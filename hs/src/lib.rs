//! HistoryStore - bounded per-key record history
//!
//! Keeps an insertion-ordered, capacity-bounded list of JSON records for each
//! key (typically a user id). Appending beyond capacity evicts the oldest
//! records first.
//!
//! # Architecture
//!
//! ```text
//! history/
//! ├── {key}.jsonl      # one record per line, oldest first
//! └── {key}.lock       # exclusive lock held during read-modify-write
//! ```
//!
//! # Example
//!
//! ```ignore
//! use historystore::HistoryStore;
//!
//! let store = HistoryStore::open("history")?;
//! store.append("42", snapshot, historystore::DEFAULT_CAPACITY)?;
//! let history: Vec<Snapshot> = store.load("42")?;
//! ```

pub mod cli;
pub mod config;
mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::{HistoryStats, HistoryStore, Update, append_bounded, validate_key};

/// Default number of records retained per key
pub const DEFAULT_CAPACITY: usize = 100;
