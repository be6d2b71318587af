//! Core HistoryStore implementation

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

const HISTORY_EXT: &str = "jsonl";
const LOCK_EXT: &str = "lock";

/// Decision returned from an [`HistoryStore::update`] closure
#[derive(Debug, Clone, PartialEq)]
pub enum Update<T> {
    /// Leave the history untouched
    Keep,
    /// Append a record, evicting the oldest entries beyond capacity
    Append(T),
}

/// Statistics for one key
#[derive(Debug, Clone, Default)]
pub struct HistoryStats {
    /// Number of records stored
    pub record_count: usize,
    /// Size of the history file in bytes
    pub total_bytes: u64,
}

/// The main history store
pub struct HistoryStore {
    /// Base path for storage
    base_path: PathBuf,
}

/// Check that a key is safe to use as a file stem
pub fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key.len() <= 128
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

/// Append `item`, dropping the oldest records beyond `capacity`
///
/// Returns how many records were dropped.
pub fn append_bounded<T>(records: &mut Vec<T>, item: T, capacity: usize) -> usize {
    records.push(item);
    let evicted = records.len().saturating_sub(capacity);
    records.drain(..evicted);
    evicted
}

impl HistoryStore {
    /// Open or create a history store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened history store");
        Ok(Self { base_path })
    }

    /// Base directory of this store
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    fn history_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.{}", key, HISTORY_EXT)))
    }

    fn lock_path(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(format!("{}.{}", key, LOCK_EXT)))
    }

    /// Take the per-key exclusive lock; released when the returned file drops
    fn lock(&self, key: &str) -> StoreResult<fs::File> {
        let lock_file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(key)?)?;
        lock_file.lock_exclusive()?;
        debug!(%key, "lock: acquired");
        Ok(lock_file)
    }

    /// Load the full history for a key, oldest first
    ///
    /// A key that was never written yields an empty history.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        debug!(%key, "load: called");
        let path = self.history_path(key)?;
        if !path.exists() {
            debug!(%key, "load: no history file");
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut records = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                line: idx + 1,
                source,
            })?;
            records.push(record);
        }
        Ok(records)
    }

    /// Most recently appended record for a key
    pub fn latest<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        debug!(%key, "latest: called");
        Ok(self.load::<T>(key)?.pop())
    }

    /// Append a record, evicting the oldest beyond `capacity`
    ///
    /// Returns the number of evicted records.
    pub fn append<T: Serialize + DeserializeOwned>(&self, key: &str, record: T, capacity: usize) -> StoreResult<usize> {
        debug!(%key, capacity, "append: called");
        self.update(key, capacity, |_: &[T]| (Update::Append(record), ()))
            .map(|(evicted, ())| evicted)
    }

    /// Atomic read-decide-write for one key
    ///
    /// The closure sees the current history while the key's exclusive lock is
    /// held, so no other writer can slip in between the read and the write.
    /// Returns the number of evicted records alongside the closure's result.
    pub fn update<T, R, F>(&self, key: &str, capacity: usize, decide: F) -> StoreResult<(usize, R)>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&[T]) -> (Update<T>, R),
    {
        debug!(%key, capacity, "update: called");
        if capacity == 0 {
            return Err(StoreError::ZeroCapacity);
        }

        let lock = self.lock(key)?;
        let mut records: Vec<T> = self.load(key)?;
        let (decision, result) = decide(&records);

        let evicted = match decision {
            Update::Keep => {
                debug!(%key, "update: closure kept history unchanged");
                0
            }
            Update::Append(record) if records.len() < capacity => {
                debug!(%key, "update: appending in place");
                self.append_line(key, &record)?;
                0
            }
            Update::Append(record) => {
                let evicted = append_bounded(&mut records, record, capacity);
                debug!(%key, evicted, "update: rewriting with eviction");
                self.rewrite(key, &records)?;
                evicted
            }
        };

        FileExt::unlock(&lock)?;
        Ok((evicted, result))
    }

    fn append_line<T: Serialize>(&self, key: &str, record: &T) -> StoreResult<()> {
        let line = serde_json::to_string(record)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.history_path(key)?)?;
        writeln!(file, "{}", line)?;
        file.sync_data()?;
        Ok(())
    }

    /// Replace the history file via temp file + rename
    fn rewrite<T: Serialize>(&self, key: &str, records: &[T]) -> StoreResult<()> {
        let path = self.history_path(key)?;
        let tmp_path = path.with_extension(format!("{}.tmp", HISTORY_EXT));
        {
            let mut writer = BufWriter::new(fs::File::create(&tmp_path)?);
            for record in records {
                writeln!(writer, "{}", serde_json::to_string(record)?)?;
            }
            writer.flush()?;
            writer.get_ref().sync_data()?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// List all keys with a history file
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == HISTORY_EXT)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_key(stem).is_ok()
            {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Get statistics for a key
    pub fn stats(&self, key: &str) -> StoreResult<HistoryStats> {
        let path = self.history_path(key)?;
        if !path.exists() {
            return Ok(HistoryStats::default());
        }

        let total_bytes = fs::metadata(&path)?.len();
        let reader = BufReader::new(fs::File::open(&path)?);
        let mut record_count = 0;
        for line in reader.lines() {
            if !line?.trim().is_empty() {
                record_count += 1;
            }
        }

        Ok(HistoryStats {
            record_count,
            total_bytes,
        })
    }

    /// Delete a key and all its records
    ///
    /// The lock file stays in place: writers already waiting on it must keep
    /// excluding the ones that arrive after the delete.
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        debug!(%key, "delete: called");
        let path = self.history_path(key)?;
        if !self.lock_path(key)?.exists() && !path.exists() {
            return Ok(false);
        }

        let lock = self.lock(key)?;
        let existed = path.exists();
        if existed {
            fs::remove_file(&path)?;
            info!(key, "Deleted history");
        }
        FileExt::unlock(&lock)?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        n: u32,
    }

    fn entry(n: u32) -> Entry {
        Entry { n }
    }

    #[test]
    fn test_append_and_load() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path().join("store")).unwrap();

        store.append("42", entry(1), 10).unwrap();
        store.append("42", entry(2), 10).unwrap();

        let history: Vec<Entry> = store.load("42").unwrap();
        assert_eq!(history, vec![entry(1), entry(2)]);
        assert_eq!(store.latest::<Entry>("42").unwrap(), Some(entry(2)));
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();

        let history: Vec<Entry> = store.load("nobody").unwrap();
        assert!(history.is_empty());
        assert_eq!(store.latest::<Entry>("nobody").unwrap(), None);
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();

        for n in 1..=3 {
            assert_eq!(store.append("u", entry(n), 3).unwrap(), 0);
        }
        assert_eq!(store.append("u", entry(4), 3).unwrap(), 1);
        assert_eq!(store.append("u", entry(5), 3).unwrap(), 1);

        let history: Vec<Entry> = store.load("u").unwrap();
        assert_eq!(history, vec![entry(3), entry(4), entry(5)]);
        assert_eq!(store.stats("u").unwrap().record_count, 3);
    }

    #[test]
    fn test_update_keep_leaves_history() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();
        store.append("u", entry(7), 10).unwrap();

        let (evicted, seen) = store
            .update("u", 10, |history: &[Entry]| (Update::Keep, history.len()))
            .unwrap();

        assert_eq!(evicted, 0);
        assert_eq!(seen, 1);
        assert_eq!(store.load::<Entry>("u").unwrap(), vec![entry(7)]);
    }

    #[test]
    fn test_update_sees_current_history() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();
        store.append("u", entry(1), 10).unwrap();

        let (_, appended) = store
            .update("u", 10, |history: &[Entry]| {
                if history.last() == Some(&entry(1)) {
                    (Update::Keep, false)
                } else {
                    (Update::Append(entry(1)), true)
                }
            })
            .unwrap();

        assert!(!appended);
        assert_eq!(store.stats("u").unwrap().record_count, 1);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();

        let result = store.append("u", entry(1), 0);
        assert!(matches!(result, Err(StoreError::ZeroCapacity)));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(validate_key("327887608").is_ok());
        assert!(validate_key("user_1-a").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("a b").is_err());

        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();
        assert!(matches!(store.load::<Entry>("a/b"), Err(StoreError::InvalidKey(_))));
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();
        fs::write(temp.path().join("u.jsonl"), "{\"n\":1}\nnot json\n").unwrap();

        match store.load::<Entry>("u") {
            Err(StoreError::Corrupt { key, line, .. }) => {
                assert_eq!(key, "u");
                assert_eq!(line, 2);
            }
            other => panic!("expected corrupt error, got {:?}", other),
        }
    }

    #[test]
    fn test_delete_keeps_lock_file_and_allows_append() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();
        store.append("u", entry(1), 10).unwrap();

        assert!(store.delete("u").unwrap());
        assert!(temp.path().join("u.lock").exists());
        assert!(!temp.path().join("u.jsonl").exists());

        store.append("u", entry(2), 10).unwrap();
        assert_eq!(store.load::<Entry>("u").unwrap(), vec![entry(2)]);
        assert!(store.delete("u").unwrap());
        assert!(!store.delete("u").unwrap());
    }

    #[test]
    fn test_delete_unknown_key_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();

        assert!(!store.delete("ghost").unwrap());
        assert!(!temp.path().join("ghost.lock").exists());
    }

    #[test]
    fn test_append_bounded() {
        let mut records = vec![1, 2, 3];
        assert_eq!(append_bounded(&mut records, 4, 5), 0);
        assert_eq!(append_bounded(&mut records, 5, 5), 0);
        assert_eq!(append_bounded(&mut records, 6, 5), 1);
        assert_eq!(records, vec![2, 3, 4, 5, 6]);
        assert_eq!(append_bounded(&mut records, 7, 2), 4);
        assert_eq!(records, vec![6, 7]);
    }

    #[test]
    fn test_keys_and_delete() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::open(temp.path()).unwrap();
        store.append("b", entry(1), 10).unwrap();
        store.append("a", entry(1), 10).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);
    }
}
