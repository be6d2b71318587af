//! History policy: duplicate detection and bounded retention
//!
//! A new snapshot is a duplicate when it equals (game state only, see
//! [`Profile`]) the most recent stored snapshot. Accepted snapshots are
//! appended with [`append_bounded`], which the history store applies under
//! its per-user lock.

use tracing::debug;

use crate::domain::Profile;

pub use historystore::append_bounded;

/// Snapshots retained per user
pub const HISTORY_CAPACITY: usize = historystore::DEFAULT_CAPACITY;

/// What the policy decided for an incoming snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Admission {
    /// Same game state as the latest snapshot; nothing should be stored
    Duplicate,
    /// Snapshot should be appended
    Accepted {
        /// Latest snapshot before this one, to diff against
        previous: Option<Profile>,
        /// How many of the oldest snapshots the append will evict
        evicted: usize,
    },
}

/// Decide whether `candidate` may be appended to `history`
pub fn admit(history: &[Profile], candidate: &Profile, capacity: usize) -> Admission {
    debug!(len = history.len(), capacity, "admit: called");
    match history.last() {
        Some(latest) if latest == candidate => {
            debug!("admit: duplicate of latest snapshot");
            Admission::Duplicate
        }
        previous => Admission::Accepted {
            previous: previous.cloned(),
            evicted: (history.len() + 1).saturating_sub(capacity),
        },
    }
}
