//! Group aggregate model.
//!
//! # Responsibility
//! - Define the unit of isolation that owns students and attendance records.
//! - Provide read-only lookups used by the store and sheet projections.
//!
//! # Invariants
//! - `id` is generated once at creation and never reused.
//! - `students` keeps insertion order.

use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::student::Student;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Generated group identifier.
///
/// UUIDv7 text: timestamp-prefixed, so ids sort by creation time.
pub type GroupId = String;

/// Named collection of students and their attendance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl Group {
    /// Creates an empty group with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), name)
    }

    /// Creates an empty group with a caller-provided id.
    pub fn with_id(id: impl Into<GroupId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            students: Vec::new(),
            attendance: Vec::new(),
        }
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|student| student.id == student_id)
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.student(student_id).is_some()
    }

    /// Returns the record for one `(student, date)` key.
    pub fn record_for(&self, student_id: &str, date: NaiveDate) -> Option<&AttendanceRecord> {
        self.attendance
            .iter()
            .find(|record| record.key() == (student_id, date))
    }

    /// Returns the status for one cell, if recorded.
    pub fn status_for(&self, student_id: &str, date: NaiveDate) -> Option<AttendanceStatus> {
        self.record_for(student_id, date).map(|record| record.status)
    }

    /// Returns all records for one day.
    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &AttendanceRecord> {
        self.attendance
            .iter()
            .filter(move |record| record.date == date)
    }

    /// Returns all records for one student.
    pub fn records_of<'a>(
        &'a self,
        student_id: &'a str,
    ) -> impl Iterator<Item = &'a AttendanceRecord> + 'a {
        self.attendance
            .iter()
            .filter(move |record| record.student_id == student_id)
    }

    /// Returns distinct recorded dates, newest first.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let distinct: BTreeSet<NaiveDate> =
            self.attendance.iter().map(|record| record.date).collect();
        distinct.into_iter().rev().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Group;
    use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn new_groups_get_distinct_ids() {
        let first = Group::new("A");
        let second = Group::new("A");
        assert_ne!(first.id, second.id);
        assert!(first.students.is_empty());
        assert!(first.attendance.is_empty());
    }

    #[test]
    fn dates_are_distinct_and_newest_first() {
        let mut group = Group::with_id("g", "G");
        group.attendance = vec![
            AttendanceRecord::new("S1", day(2), AttendanceStatus::Present),
            AttendanceRecord::new("S2", day(9), AttendanceStatus::Absent),
            AttendanceRecord::new("S2", day(2), AttendanceStatus::Justified),
        ];
        assert_eq!(group.dates(), vec![day(9), day(2)]);
        assert_eq!(
            group.status_for("S2", day(2)),
            Some(AttendanceStatus::Justified)
        );
        assert_eq!(group.records_on(day(2)).count(), 2);
        assert_eq!(group.records_of("S2").count(), 2);
    }
}
