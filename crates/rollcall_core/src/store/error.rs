use crate::model::group::GroupId;
use crate::model::student::{StudentId, StudentValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced synchronously to store callers.
///
/// Missing groups/students and persistence failures are not errors here;
/// they are absorbed and logged.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Validation(StudentValidationError),
    /// Another student of the group already uses this id.
    DuplicateStudentId {
        group_id: GroupId,
        student_id: StudentId,
    },
    /// An attendance record names a student the group does not have.
    UnknownStudent {
        group_id: GroupId,
        student_id: StudentId,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateStudentId {
                group_id,
                student_id,
            } => write!(
                f,
                "student id `{student_id}` already exists in group {group_id}"
            ),
            Self::UnknownStudent {
                group_id,
                student_id,
            } => write!(
                f,
                "attendance references unknown student `{student_id}` in group {group_id}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for StoreError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}
