//! Thread-safe store handle with an explicit open/shutdown lifecycle.
//!
//! `ItemStore` needs `&mut self` for writes, but the transport shares the
//! store across request tasks behind an `Arc`. This wrapper puts the store
//! and its closed flag behind one `RwLock`: reads share the lock, every
//! mutation and the final snapshot save take it exclusively.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{error, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StoreError};
use crate::store::item_store::ItemStore;
use crate::store::records::{Item, ItemMap};
use crate::store::snapshot;

struct Inner {
    store: ItemStore,
    closed: bool,
}

pub struct SharedStore {
    inner: RwLock<Inner>,
    snapshot_path: PathBuf,
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("snapshot_path", &self.snapshot_path)
            .finish_non_exhaustive()
    }
}

impl SharedStore {
    /// Load the snapshot at `path` (or start empty) using the system clock.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    /// Load the snapshot at `path` (or start empty) with a custom clock.
    pub fn open_with_clock(path: impl AsRef<Path>, clock: Arc<dyn Clock>) -> Self {
        let snapshot_path = path.as_ref().to_path_buf();
        let store = ItemStore::from_snapshot(snapshot::load(&snapshot_path), clock);
        Self {
            inner: RwLock::new(Inner { store, closed: false }),
            snapshot_path,
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        let guard = self.inner.write().map_err(|e| StoreError::Storage(e.to_string()))?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        Ok(guard)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.read()?.store.count())
    }

    pub fn get(&self, id: u64) -> Result<Item> {
        self.read()?.store.get(id).cloned()
    }

    pub fn after(&self, tick: u64) -> Result<ItemMap> {
        Ok(self.read()?.store.after(tick))
    }

    pub fn search(&self, needle: &str) -> Result<ItemMap> {
        self.read()?.store.search(needle)
    }

    pub fn all(&self) -> Result<ItemMap> {
        Ok(self.read()?.store.all())
    }

    pub fn last_tick(&self) -> Result<u64> {
        Ok(self.read()?.store.last_tick())
    }

    pub fn create(&self, text: &str) -> Result<Item> {
        self.write()?.store.create(text)
    }

    pub fn update(&self, id: u64, text: &str) -> Result<Item> {
        self.write()?.store.update(id, text)
    }

    pub fn delete(&self, id: u64) -> Result<Item> {
        self.write()?.store.delete(id)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().map(|inner| inner.closed).unwrap_or(true)
    }

    /// Stop accepting mutations and write the snapshot.
    ///
    /// Succeeds at most once. The store stays closed even if the save fails,
    /// so nothing can be mutated after the state has been captured.
    pub fn shutdown(&self) -> Result<()> {
        let mut guard = self.write()?;
        guard.closed = true;

        let state = guard.store.to_snapshot();
        match snapshot::save(&self.snapshot_path, &state) {
            Ok(()) => {
                info!("Store shut down cleanly ({} items)", state.items.len());
                Ok(())
            }
            Err(e) => {
                error!("Failed to save snapshot to {}: {}", self.snapshot_path.display(), e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::collections::HashSet;
    use std::thread;
    use tempfile::TempDir;

    fn create_test_store() -> (SharedStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SharedStore::open_with_clock(
            temp_dir.path().join("db.json"),
            Arc::new(ManualClock::new(1000)),
        );
        (store, temp_dir)
    }

    #[test]
    fn test_open_empty() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.last_tick().unwrap(), 0);
        assert!(!store.is_closed());
    }

    #[test]
    fn test_create_and_get() {
        let (store, _temp) = create_test_store();
        let item = store.create("hello").unwrap();
        assert_eq!(store.get(item.id).unwrap(), item);
    }

    #[test]
    fn test_shutdown_persists_and_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");

        let before = {
            let store = SharedStore::open(&path);
            store.create("one").unwrap();
            store.create("two").unwrap();
            store.delete(1).unwrap();
            let all = store.all().unwrap();
            store.shutdown().unwrap();
            (all, store.last_tick().unwrap())
        };

        let reopened = SharedStore::open(&path);
        assert_eq!(reopened.all().unwrap(), before.0);
        assert_eq!(reopened.last_tick().unwrap(), before.1);
        assert_eq!(reopened.create("three").unwrap().id, 3);
    }

    #[test]
    fn test_mutations_rejected_after_shutdown() {
        let (store, _temp) = create_test_store();
        store.create("a").unwrap();
        store.shutdown().unwrap();

        assert!(store.is_closed());
        assert!(matches!(store.create("b"), Err(StoreError::Closed)));
        assert!(matches!(store.update(1, "b"), Err(StoreError::Closed)));
        assert!(matches!(store.delete(1), Err(StoreError::Closed)));

        // reads still work
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.get(1).unwrap().text, "a");
    }

    #[test]
    fn test_shutdown_only_once() {
        let (store, _temp) = create_test_store();
        store.shutdown().unwrap();
        assert!(matches!(store.shutdown(), Err(StoreError::Closed)));
    }

    #[test]
    fn test_shutdown_reports_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in place of the snapshot file makes the rename fail
        let path = temp_dir.path().join("db.json");
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let store = SharedStore::open(&path);
        store.create("a").unwrap();

        assert!(store.shutdown().is_err());
        assert!(store.is_closed());
    }

    #[test]
    fn test_exhausted_tick_space_keeps_store_usable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"items":{"1":{"id":1,"tick":18446744073709551615,"text":"edge"}},"maxid":1,"lasttick":18446744073709551615}"#,
        )
        .unwrap();

        let store = SharedStore::open(&path);
        let before = store.all().unwrap();

        assert!(matches!(store.create("x"), Err(StoreError::Storage(_))));
        assert!(matches!(store.delete(1), Err(StoreError::Storage(_))));

        // lock not poisoned, nothing changed
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.all().unwrap(), before);
        assert_eq!(store.last_tick().unwrap(), u64::MAX);

        store.shutdown().unwrap();
        let reopened = SharedStore::open(&path);
        assert_eq!(reopened.all().unwrap(), before);
    }

    #[test]
    fn test_concurrent_creates_are_serialized() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(SharedStore::open_with_clock(
            temp_dir.path().join("db.json"),
            Arc::new(ManualClock::new(42)),
        ));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    (0..25)
                        .map(|i| store.create(&format!("t{}-{}", t, i)).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let items: Vec<Item> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        let ids: HashSet<u64> = items.iter().map(|i| i.id).collect();
        let ticks: HashSet<u64> = items.iter().map(|i| i.tick).collect();

        assert_eq!(ids, (1..=200).collect::<HashSet<u64>>());
        assert_eq!(ticks.len(), 200);
        assert_eq!(store.count().unwrap(), 200);
    }
}
