//! Attendance record model.
//!
//! # Responsibility
//! - Define the closed set of attendance statuses.
//! - Define the `(student_id, date, status)` record and its key.
//!
//! # Invariants
//! - `date` carries no time component; equality and ordering are by calendar day.
//! - At most one record per `AttendanceKey` exists within a group (enforced by
//!   the store, not by this type).

use crate::model::student::StudentId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Attendance status observed for one student on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Absent with an accepted excuse.
    Justified,
}

impl AttendanceStatus {
    /// All statuses in picker order.
    pub const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Absent, Self::Justified];

    /// Stable label used in snapshots and across FFI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Justified => "Justified",
        }
    }

    /// One-letter code for compact grid cells.
    pub fn short_code(self) -> char {
        match self {
            Self::Present => 'P',
            Self::Absent => 'A',
            Self::Justified => 'J',
        }
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a status label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown attendance status `{}`; expected Present|Absent|Justified",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

impl FromStr for AttendanceStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            "justified" => Ok(Self::Justified),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Uniqueness key of a record within a group.
pub type AttendanceKey<'a> = (&'a str, NaiveDate);

/// One status observation for one student on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    pub fn new(student_id: impl Into<StudentId>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            student_id: student_id.into(),
            date,
            status,
        }
    }

    pub fn key(&self) -> AttendanceKey<'_> {
        (self.student_id.as_str(), self.date)
    }
}
