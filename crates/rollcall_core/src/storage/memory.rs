//! In-process snapshot store for tests and previews.

use super::{SnapshotStore, StorageError, StorageResult};
use std::cell::{Cell, RefCell};

/// Volatile snapshot store with an optional simulated write outage.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshot: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
    fail_loads: Cell<bool>,
    saves: Cell<usize>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        let store = Self::default();
        store.snapshot.replace(Some(snapshot.into()));
        store
    }

    /// Makes subsequent saves fail with `StorageError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Makes subsequent loads fail with `StorageError::Unavailable`.
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.set(fail);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Option<String> {
        self.snapshot.borrow().clone()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> StorageResult<Option<String>> {
        if self.fail_loads.get() {
            return Err(StorageError::Unavailable("simulated read failure".to_string()));
        }
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &str) -> StorageResult<()> {
        if self.fail_saves.get() {
            return Err(StorageError::Unavailable("simulated write failure".to_string()));
        }
        self.snapshot.replace(Some(snapshot.to_string()));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
