//! Core data layer for the rollcall attendance app.
//! This crate owns every attendance invariant; UI layers only call into it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod sheet;
pub mod storage;
pub mod store;

pub use config::RuntimeConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{AttendanceRecord, AttendanceStatus, ParseStatusError};
pub use model::group::{Group, GroupId};
pub use model::student::{
    MicroSlot, Student, StudentId, StudentValidationError, MICRO_SCORE_MAX, MICRO_SCORE_MIN,
};
pub use sheet::{AttendanceSheet, SheetRow, StudentTally};
pub use storage::{
    MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore, StorageError, StorageResult,
    SNAPSHOT_KEY,
};
pub use store::{AttendanceStore, LoadOutcome, Listener, StoreError, StoreResult, SubscriptionId};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
