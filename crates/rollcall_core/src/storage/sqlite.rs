//! SQLite-backed snapshot store.
//!
//! # Responsibility
//! - Keep string-keyed blobs in the `kv_store` table.
//! - Serve the fixed snapshot key for the attendance store.
//!
//! # Invariants
//! - Writes are upserts; one row per key.

use super::{SnapshotStore, StorageResult, SNAPSHOT_KEY};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable snapshot store owning one migrated SQLite connection.
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Wraps an already migrated connection (see `db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Reads one raw value by key.
    pub fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Inserts or replaces one raw value by key.
    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    /// Returns the underlying connection for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> StorageResult<Option<String>> {
        self.get(SNAPSHOT_KEY)
    }

    fn save(&self, snapshot: &str) -> StorageResult<()> {
        self.set(SNAPSHOT_KEY, snapshot)
    }
}
