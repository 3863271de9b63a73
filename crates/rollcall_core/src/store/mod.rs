//! Attendance store: the authoritative in-memory groups list.
//!
//! # Responsibility
//! - Apply invariant-preserving transitions to the full groups list.
//! - Replicate every installed state to the persistent snapshot store.
//! - Notify subscribers of each new snapshot.
//!
//! # Invariants
//! - Student ids are unique within a group.
//! - `(student_id, date)` is unique within a group.
//! - Removing a student cascades to its attendance records.
//! - Renaming a student re-keys its attendance records in the same step.
//! - A rejected operation leaves the in-memory state untouched.

mod attendance_store;
mod error;
mod listeners;
pub mod snapshot;
pub mod transition;

pub use attendance_store::{AttendanceStore, LoadOutcome};
pub use error::{StoreError, StoreResult};
pub use listeners::{Listener, SubscriptionId};
