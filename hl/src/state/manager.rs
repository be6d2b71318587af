//! StateManager - actor that owns the HistoryStore
//!
//! Every write for every user goes through one task, so the dedup check and
//! the append can never interleave within this process. The store's file lock
//! covers other processes.

use std::path::Path;

use historystore::{HistoryStore, Update};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::messages::{StateCommand, StateError, StateResponse, Submission};
use crate::domain::Profile;
use crate::history::{Admission, admit};

/// Handle to send commands to the StateManager
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn a new StateManager actor
    pub fn spawn(store_path: impl AsRef<Path>, capacity: usize) -> eyre::Result<Self> {
        debug!(store_path = %store_path.as_ref().display(), capacity, "spawn: called");
        if capacity == 0 {
            eyre::bail!("history capacity must be at least 1");
        }
        let store = HistoryStore::open(store_path.as_ref())?;

        let (tx, rx) = mpsc::channel(256);

        // Spawn the actor task
        tokio::spawn(actor_loop(store, capacity, rx));

        info!("StateManager spawned");

        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<StateResponse<T>>) -> StateCommand,
    ) -> StateResponse<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(build(reply_tx))
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Store a snapshot unless it duplicates the user's latest one
    pub async fn submit(&self, user: &str, profile: Profile) -> StateResponse<Submission> {
        debug!(%user, level = profile.level, "submit: called");
        self.request(|reply| StateCommand::Submit {
            user: user.to_string(),
            profile: Box::new(profile),
            reply,
        })
        .await
    }

    /// Full history for a user, oldest first
    pub async fn history(&self, user: &str) -> StateResponse<Vec<Profile>> {
        debug!(%user, "history: called");
        self.request(|reply| StateCommand::History {
            user: user.to_string(),
            reply,
        })
        .await
    }

    /// Most recent snapshot for a user
    pub async fn latest(&self, user: &str) -> StateResponse<Option<Profile>> {
        debug!(%user, "latest: called");
        self.request(|reply| StateCommand::Latest {
            user: user.to_string(),
            reply,
        })
        .await
    }

    /// Most recent snapshot, returning error if the user has none
    pub async fn latest_required(&self, user: &str) -> StateResponse<Profile> {
        debug!(%user, "latest_required: called");
        self.latest(user)
            .await?
            .ok_or_else(|| StateError::NotFound(user.to_string()))
    }

    /// Delete a user's history
    pub async fn clear(&self, user: &str) -> StateResponse<bool> {
        debug!(%user, "clear: called");
        self.request(|reply| StateCommand::Clear {
            user: user.to_string(),
            reply,
        })
        .await
    }

    /// Users that have a stored history
    pub async fn users(&self) -> StateResponse<Vec<String>> {
        debug!("users: called");
        self.request(|reply| StateCommand::Users { reply }).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> Result<(), StateError> {
        debug!("shutdown: called");
        self.tx
            .send(StateCommand::Shutdown)
            .await
            .map_err(|_| StateError::ChannelError)
    }
}

fn submit(store: &HistoryStore, capacity: usize, user: &str, profile: Profile) -> StateResponse<Submission> {
    let (evicted, submission) = store.update(user, capacity, |history: &[Profile]| {
        match admit(history, &profile, capacity) {
            Admission::Duplicate => (Update::Keep, Submission::Duplicate),
            Admission::Accepted { previous, evicted } => (
                Update::Append(profile.clone()),
                Submission::Stored { previous, evicted },
            ),
        }
    })?;

    if let Submission::Stored { evicted: expected, .. } = &submission
        && *expected != evicted
    {
        warn!(%user, expected, evicted, "submit: eviction count differs from policy");
    }
    Ok(submission)
}

async fn actor_loop(store: HistoryStore, capacity: usize, mut rx: mpsc::Receiver<StateCommand>) {
    debug!("actor_loop: called");
    debug!("StateManager actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::Submit { user, profile, reply } => {
                debug!(%user, "actor_loop: Submit command");
                let result = submit(&store, capacity, &user, *profile);
                let _ = reply.send(result);
            }

            StateCommand::History { user, reply } => {
                debug!(%user, "actor_loop: History command");
                let result = store.load::<Profile>(&user).map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::Latest { user, reply } => {
                debug!(%user, "actor_loop: Latest command");
                let result = store.latest::<Profile>(&user).map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::Clear { user, reply } => {
                debug!(%user, "actor_loop: Clear command");
                let result = store.delete(&user).map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::Users { reply } => {
                debug!("actor_loop: Users command");
                let result = store.keys().map_err(StateError::from);
                let _ = reply.send(result);
            }

            StateCommand::Shutdown => {
                debug!("actor_loop: Shutdown command");
                info!("StateManager shutting down");
                break;
            }
        }
    }

    debug!("StateManager actor stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixture;
    use chrono::Duration;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_submit_then_history() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), 100).unwrap();

        let first = fixture(5, 100, 1000);
        let result = manager.submit("42", first.clone()).await.unwrap();
        assert_eq!(
            result,
            Submission::Stored {
                previous: None,
                evicted: 0
            }
        );

        let mut second = fixture(5, 200, 1000);
        second.timestamp += Duration::hours(1);
        let result = manager.submit("42", second.clone()).await.unwrap();
        assert_eq!(
            result,
            Submission::Stored {
                previous: Some(first.clone()),
                evicted: 0
            }
        );

        let history = manager.history("42").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].timestamp, second.timestamp);
        assert_eq!(manager.latest("42").await.unwrap(), Some(second));

        manager.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_not_stored() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), 100).unwrap();

        let p = fixture(5, 100, 1000);
        manager.submit("42", p.clone()).await.unwrap();

        let mut later = p.clone();
        later.timestamp += Duration::days(1);
        assert_eq!(manager.submit("42", later).await.unwrap(), Submission::Duplicate);
        assert_eq!(manager.history("42").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), 2).unwrap();

        for xp in 1..=3 {
            manager.submit("u", fixture(5, xp, 1000)).await.unwrap();
        }

        let history = manager.history("u").await.unwrap();
        let xps: Vec<i64> = history.iter().map(|p| p.current_experience).collect();
        assert_eq!(xps, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_users_and_clear() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), 100).unwrap();

        manager.submit("b", fixture(5, 1, 1000)).await.unwrap();
        manager.submit("a", fixture(5, 1, 1000)).await.unwrap();
        assert_eq!(manager.users().await.unwrap(), vec!["a".to_string(), "b".to_string()]);

        assert!(manager.clear("a").await.unwrap());
        assert!(!manager.clear("a").await.unwrap());
        assert!(manager.history("a").await.unwrap().is_empty());
        assert!(matches!(
            manager.latest_required("a").await,
            Err(StateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_user_is_store_error() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), 100).unwrap();

        let result = manager.submit("../x", fixture(5, 1, 1000)).await;
        assert!(matches!(result, Err(StateError::StoreError(_))));
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_store_once() {
        let temp = tempdir().unwrap();
        let manager = StateManager::spawn(temp.path(), 100).unwrap();
        let p = fixture(7, 500, 1000);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                let p = p.clone();
                tokio::spawn(async move { manager.submit("42", p).await.unwrap() })
            })
            .collect();

        let mut stored = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), Submission::Stored { .. }) {
                stored += 1;
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(manager.history("42").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_rejects_zero_capacity() {
        let temp = tempdir().unwrap();
        assert!(StateManager::spawn(temp.path(), 0).is_err());
    }
}
