//! Durable JSON-backed collection store.
//!
//! One file per collection under a single data directory
//! (`drivers.json`, `stops.json`, ...). A collection is always read and
//! written as a whole snapshot: callers load the full document, mutate
//! a copy in memory, and save the full document back. There are no
//! partial-field updates and no version tokens.
//!
//! All writes to a collection, including the first-touch bootstrap of
//! an empty snapshot, serialize on an internal per-collection lock.
//! Reads of an existing file take no lock; the rename commit
//! guarantees they see a complete document.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub struct JsonStore {
    data_dir: PathBuf,
    write_locks: Mutex<BTreeMap<String, Arc<Mutex<()>>>>,
}

impl JsonStore {
    /// Opens the store rooted at `data_dir`, creating the directory if
    /// it does not exist yet.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .map_err(|source| Error::io(&data_dir.display().to_string(), source))?;
        Ok(Self {
            data_dir,
            write_locks: Mutex::new(BTreeMap::new()),
        })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    /// Returns the write lock for a collection, creating it on first
    /// use. Every path that writes the collection's file must hold it;
    /// the temp-file name is shared, so unserialized writers could
    /// steal or clobber each other's commit.
    fn write_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks.entry(collection.to_string()).or_default().clone()
    }

    /// Loads the full snapshot of a collection.
    ///
    /// A collection that has never been written bootstraps itself: the
    /// empty default shape is persisted and returned, so a missing file
    /// is indistinguishable from an empty collection on the next read.
    pub fn load<T>(&self, collection: &str) -> Result<T>
    where
        T: DeserializeOwned + Serialize + Default,
    {
        let path = self.collection_path(collection);
        if !path.exists() {
            let lock = self.write_lock(collection);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            // Re-check under the lock: a writer may have committed a
            // snapshot in the meantime, and it must not be replaced
            // with the empty shape.
            if !path.exists() {
                let empty = T::default();
                self.write_snapshot(collection, &empty)?;
                debug!(collection, "bootstrapped empty collection");
                return Ok(empty);
            }
        }

        let contents =
            fs::read_to_string(&path).map_err(|source| Error::io(collection, source))?;
        serde_json::from_str(&contents).map_err(|source| Error::snapshot(collection, source))
    }

    /// Replaces the full snapshot of a collection.
    ///
    /// The document is written to a temporary file in the same
    /// directory and renamed into place, so a concurrent `load` sees
    /// either the old snapshot or the new one, never a truncated file.
    pub fn save<T: Serialize>(&self, collection: &str, snapshot: &T) -> Result<()> {
        let lock = self.write_lock(collection);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write_snapshot(collection, snapshot)
    }

    /// Commits a snapshot to disk. Callers must hold the collection's
    /// write lock.
    fn write_snapshot<T: Serialize>(&self, collection: &str, snapshot: &T) -> Result<()> {
        let contents = serde_json::to_string_pretty(snapshot)
            .map_err(|source| Error::snapshot(collection, source))?;

        let tmp = self.data_dir.join(format!("{collection}.json.tmp"));
        fs::write(&tmp, contents).map_err(|source| Error::io(collection, source))?;
        fs::rename(&tmp, self.collection_path(collection))
            .map_err(|source| Error::io(collection, source))?;

        debug!(collection, "snapshot saved");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn open_store() -> (tempfile::TempDir, JsonStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_load_bootstraps_missing_collection() {
        let (dir, store) = open_store();

        let snapshot: BTreeMap<String, String> = store.load("drivers").unwrap();
        assert!(snapshot.is_empty());

        // The empty shape must be durably persisted, not just returned.
        let on_disk = std::fs::read_to_string(dir.path().join("drivers.json")).unwrap();
        assert_eq!(on_disk.trim(), "{}");
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let (_dir, store) = open_store();

        let mut snapshot = BTreeMap::new();
        snapshot.insert("12".to_string(), "Ravi".to_string());
        store.save("drivers", &snapshot).unwrap();

        let loaded: BTreeMap<String, String> = store.load("drivers").unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_save_leaves_no_temporary_file() {
        let (dir, store) = open_store();

        let snapshot: BTreeMap<String, Vec<String>> =
            [("5".to_string(), vec!["GateA".to_string()])].into();
        store.save("stops", &snapshot).unwrap();

        assert!(dir.path().join("stops.json").exists());
        assert!(!dir.path().join("stops.json.tmp").exists());
    }

    #[test]
    fn test_open_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("bustrack");
        let store = JsonStore::open(&nested).unwrap();

        let _: BTreeMap<String, String> = store.load("status").unwrap();
        assert!(nested.join("status.json").exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_reported() {
        let (dir, store) = open_store();
        std::fs::write(dir.path().join("attendance.json"), "{not json").unwrap();

        let result: Result<BTreeMap<String, String>> = store.load("attendance");
        assert!(matches!(result, Err(Error::Snapshot { .. })));
    }

    #[test]
    fn test_concurrent_first_loads_bootstrap_once() {
        let (dir, store) = open_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let snapshot: BTreeMap<String, String> = store.load("drivers").unwrap();
                    assert!(snapshot.is_empty());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let on_disk = std::fs::read_to_string(dir.path().join("drivers.json")).unwrap();
        assert_eq!(on_disk.trim(), "{}");
    }

    #[test]
    fn test_bootstrap_does_not_clobber_concurrent_save() {
        // Race a first-touch load against a save on a fresh directory,
        // many rounds: the bootstrap must neither steal the saver's
        // temp file nor overwrite its committed snapshot with the
        // empty shape.
        for _ in 0..64 {
            let dir = tempfile::tempdir().unwrap();
            let store = Arc::new(JsonStore::open(dir.path()).unwrap());

            let saver = {
                let store = store.clone();
                std::thread::spawn(move || {
                    let snapshot: BTreeMap<String, String> =
                        [("12".to_string(), "Ravi".to_string())].into();
                    store.save("drivers", &snapshot).unwrap();
                })
            };
            let loader = {
                let store = store.clone();
                std::thread::spawn(move || {
                    let _: BTreeMap<String, String> = store.load("drivers").unwrap();
                })
            };
            saver.join().unwrap();
            loader.join().unwrap();

            let final_state: BTreeMap<String, String> = store.load("drivers").unwrap();
            assert_eq!(final_state.get("12").map(String::as_str), Some("Ravi"));
        }
    }
}
