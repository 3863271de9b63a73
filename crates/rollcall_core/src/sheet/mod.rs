//! Student-by-date attendance grid for export and review screens.
//!
//! # Responsibility
//! - Project one group into rows (students) and columns (dates).
//! - Count statuses per student.
//!
//! # Invariants
//! - Columns are the group's distinct record dates, newest first.
//! - Rows follow the group's student order.
//! - A cell without a record renders as `MISSING_CELL`.

use crate::model::attendance::AttendanceStatus;
use crate::model::group::Group;
use crate::model::student::StudentId;
use chrono::NaiveDate;

/// Label for a student/date pair with no record.
pub const MISSING_CELL: &str = "-";

/// One student row of the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
    /// Aligned with `AttendanceSheet::dates`.
    pub cells: Vec<Option<AttendanceStatus>>,
}

impl SheetRow {
    pub fn cell_label(&self, column: usize) -> &'static str {
        match self.cells.get(column).copied().flatten() {
            Some(status) => status.label(),
            None => MISSING_CELL,
        }
    }

    pub fn tally(&self) -> StudentTally {
        let mut tally = StudentTally::default();
        for status in self.cells.iter().flatten() {
            match status {
                AttendanceStatus::Present => tally.present += 1,
                AttendanceStatus::Absent => tally.absent += 1,
                AttendanceStatus::Justified => tally.justified += 1,
            }
            tally.recorded_days += 1;
        }
        tally
    }
}

/// Status counts for one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentTally {
    pub present: u32,
    pub absent: u32,
    pub justified: u32,
    pub recorded_days: u32,
}

/// Attendance grid for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceSheet {
    pub group_name: String,
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<SheetRow>,
}

impl AttendanceSheet {
    pub fn build(group: &Group) -> Self {
        let dates = group.dates();
        let rows = group
            .students
            .iter()
            .map(|student| SheetRow {
                student_id: student.id.clone(),
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                cells: dates
                    .iter()
                    .map(|date| group.status_for(&student.id, *date))
                    .collect(),
            })
            .collect();

        Self {
            group_name: group.name.clone(),
            dates,
            rows,
        }
    }

    pub fn total_students(&self) -> usize {
        self.rows.len()
    }

    /// Per-row tallies, in row order.
    pub fn tallies(&self) -> Vec<(StudentId, StudentTally)> {
        self.rows
            .iter()
            .map(|row| (row.student_id.clone(), row.tally()))
            .collect()
    }
}
