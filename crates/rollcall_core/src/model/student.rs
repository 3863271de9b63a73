//! Student domain model.
//!
//! # Responsibility
//! - Define the per-group student record and its optional scores/notes.
//! - Validate micro score ranges before any write reaches the store.
//!
//! # Invariants
//! - `micro1`/`micro2`, when set, lie in `MICRO_SCORE_MIN..=MICRO_SCORE_MAX`.
//! - `id` is user-assigned and unique within its owning group.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-assigned student identifier, unique within one group.
pub type StudentId = String;

/// Lowest accepted micro score.
pub const MICRO_SCORE_MIN: f64 = 0.0;
/// Highest accepted micro score.
pub const MICRO_SCORE_MAX: f64 = 20.0;

/// Which of the two micro score slots a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicroSlot {
    Micro1,
    Micro2,
}

impl Display for MicroSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Micro1 => f.write_str("micro1"),
            Self::Micro2 => f.write_str("micro2"),
        }
    }
}

/// Validation error for student writes.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentValidationError {
    /// A micro score is outside `[0, 20]` or not a finite number.
    MicroScoreOutOfRange { slot: MicroSlot, value: f64 },
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MicroScoreOutOfRange { slot, value } => write!(
                f,
                "{slot} must be between {MICRO_SCORE_MIN} and {MICRO_SCORE_MAX}, got {value}"
            ),
        }
    }
}

impl Error for StudentValidationError {}

/// One tracked student inside a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micro1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micro2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Student {
    /// Creates a student with no scores and no notes.
    pub fn new(
        id: impl Into<StudentId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            micro1: None,
            micro2: None,
            notes: None,
        }
    }

    /// Returns `"<first> <last>"` for list and sheet rendering.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Validates score fields.
    ///
    /// # Errors
    /// - `MicroScoreOutOfRange` when either score is set and outside `[0, 20]`.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        validate_micro_scores(self.micro1, self.micro2)
    }
}

/// Validates a pair of optional micro scores.
///
/// `None` always passes. `NaN` and infinities are rejected like any other
/// out-of-range value.
pub fn validate_micro_scores(
    micro1: Option<f64>,
    micro2: Option<f64>,
) -> Result<(), StudentValidationError> {
    check_slot(MicroSlot::Micro1, micro1)?;
    check_slot(MicroSlot::Micro2, micro2)
}

fn check_slot(slot: MicroSlot, value: Option<f64>) -> Result<(), StudentValidationError> {
    match value {
        Some(score) if !(MICRO_SCORE_MIN..=MICRO_SCORE_MAX).contains(&score) => {
            Err(StudentValidationError::MicroScoreOutOfRange { slot, value: score })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_micro_scores, MicroSlot, Student, StudentValidationError};

    #[test]
    fn bounds_are_inclusive() {
        assert!(validate_micro_scores(Some(0.0), Some(20.0)).is_ok());
        assert!(validate_micro_scores(None, None).is_ok());
    }

    #[test]
    fn out_of_range_reports_slot() {
        let err = validate_micro_scores(Some(12.0), Some(20.5)).unwrap_err();
        assert_eq!(
            err,
            StudentValidationError::MicroScoreOutOfRange {
                slot: MicroSlot::Micro2,
                value: 20.5
            }
        );
        assert!(validate_micro_scores(Some(-0.1), None).is_err());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(validate_micro_scores(Some(f64::NAN), None).is_err());
    }

    #[test]
    fn serializes_camel_case_and_omits_empty_optionals() {
        let student = Student::new("S1", "Ann", "Lee");
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["firstName"], "Ann");
        assert_eq!(json["lastName"], "Lee");
        assert!(json.get("micro1").is_none());
        assert!(json.get("notes").is_none());
    }
}
