//! Persistent store adapter contracts and implementations.
//!
//! # Responsibility
//! - Durably save and load one serialized snapshot of all groups.
//! - Hide the backing key-value medium from the attendance store.
//!
//! # Invariants
//! - The snapshot lives under the single well-known key `SNAPSHOT_KEY`.
//! - `load` of a never-written store is `Ok(None)`, not an error.
//! - `save` replaces the whole snapshot; there is no incremental write.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemorySnapshotStore;
pub use sqlite::SqliteSnapshotStore;

/// Fixed storage key holding the serialized groups list.
pub const SNAPSHOT_KEY: &str = "groups";

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the durable medium behind a snapshot store.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Backend refused the operation (e.g. simulated outage, closed handle).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value capability consumed by the attendance store.
pub trait SnapshotStore {
    /// Returns the last saved snapshot, or `None` on first run.
    fn load(&self) -> StorageResult<Option<String>>;
    /// Replaces the saved snapshot.
    fn save(&self, snapshot: &str) -> StorageResult<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> StorageResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> StorageResult<()> {
        (**self).save(snapshot)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> StorageResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, snapshot: &str) -> StorageResult<()> {
        (**self).save(snapshot)
    }
}
