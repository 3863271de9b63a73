//! Domain model for attendance tracking.
//!
//! # Responsibility
//! - Define the groups/students/attendance shapes held by the store.
//! - Define the serialized snapshot shape shared with persistent storage.
//!
//! # Invariants
//! - A `Group` owns its students and attendance records exclusively.
//! - Attendance records reference students by id only (weak reference).
//! - Removal is permanent; there are no tombstones.

pub mod attendance;
pub mod group;
pub mod student;
