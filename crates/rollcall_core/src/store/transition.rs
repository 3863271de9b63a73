//! Pure state transitions over the groups list.
//!
//! Every function takes the prior groups list and returns the next one
//! without touching the input. Unaffected groups are cloned as-is.
//!
//! Return shape:
//! - `None`: target group or student is absent; nothing changes.
//! - `Some(next)`: the full next state to install.
//! - `Err(_)`: the operation is rejected; nothing changes.

use crate::model::attendance::AttendanceRecord;
use crate::model::group::Group;
use crate::model::student::{validate_micro_scores, Student};
use crate::store::error::{StoreError, StoreResult};
use std::collections::BTreeSet;

/// Appends `group` at the end of the list.
pub fn add_group(groups: &[Group], group: Group) -> Vec<Group> {
    let mut next = groups.to_vec();
    next.push(group);
    next
}

pub fn remove_group(groups: &[Group], group_id: &str) -> Option<Vec<Group>> {
    position(groups, group_id)?;
    Some(
        groups
            .iter()
            .filter(|group| group.id != group_id)
            .cloned()
            .collect(),
    )
}

pub fn rename_group(groups: &[Group], group_id: &str, name: &str) -> Option<Vec<Group>> {
    replace_group(groups, group_id, |group| {
        Ok(Some(Group {
            name: name.to_string(),
            ..group.clone()
        }))
    })
    .ok()
    .flatten()
}

/// Appends a student after checking scores and id uniqueness.
pub fn add_student(
    groups: &[Group],
    group_id: &str,
    student: &Student,
) -> StoreResult<Option<Vec<Group>>> {
    student.validate()?;
    replace_group(groups, group_id, |group| {
        if group.has_student(&student.id) {
            return Err(StoreError::DuplicateStudentId {
                group_id: group.id.clone(),
                student_id: student.id.clone(),
            });
        }
        let mut next = group.clone();
        next.students.push(student.clone());
        Ok(Some(next))
    })
}

/// Removes a student and every attendance record that references it.
pub fn remove_student(groups: &[Group], group_id: &str, student_id: &str) -> Option<Vec<Group>> {
    replace_group(groups, group_id, |group| {
        if !group.has_student(student_id) {
            return Ok(None);
        }
        Ok(Some(Group {
            students: group
                .students
                .iter()
                .filter(|student| student.id != student_id)
                .cloned()
                .collect(),
            attendance: group
                .attendance
                .iter()
                .filter(|record| record.student_id != student_id)
                .cloned()
                .collect(),
            ..group.clone()
        }))
    })
    .ok()
    .flatten()
}

/// Replaces the student stored under `student_id` with `updated`.
///
/// When `updated.id` differs from `student_id`, every attendance record of
/// the old id is re-keyed to the new id in the same transition.
pub fn update_student(
    groups: &[Group],
    group_id: &str,
    student_id: &str,
    updated: &Student,
) -> StoreResult<Option<Vec<Group>>> {
    updated.validate()?;
    replace_group(groups, group_id, |group| {
        let Some(index) = group.students.iter().position(|s| s.id == student_id) else {
            return Ok(None);
        };
        let renamed = updated.id != student_id;
        if renamed && group.has_student(&updated.id) {
            return Err(StoreError::DuplicateStudentId {
                group_id: group.id.clone(),
                student_id: updated.id.clone(),
            });
        }

        let mut next = group.clone();
        next.students[index] = updated.clone();
        if renamed {
            // Records under the new id can only be orphans left by older
            // snapshots; drop them so re-keyed records stay unique.
            next.attendance.retain(|record| record.student_id != updated.id);
            for record in &mut next.attendance {
                if record.student_id == student_id {
                    record.student_id = updated.id.clone();
                }
            }
        }
        Ok(Some(next))
    })
}

/// Sets both micro scores; `None` clears a score.
pub fn set_micro_scores(
    groups: &[Group],
    group_id: &str,
    student_id: &str,
    micro1: Option<f64>,
    micro2: Option<f64>,
) -> StoreResult<Option<Vec<Group>>> {
    validate_micro_scores(micro1, micro2)?;
    Ok(edit_student(groups, group_id, student_id, |student| {
        student.micro1 = micro1;
        student.micro2 = micro2;
    }))
}

pub fn set_notes(
    groups: &[Group],
    group_id: &str,
    student_id: &str,
    notes: &str,
) -> Option<Vec<Group>> {
    edit_student(groups, group_id, student_id, |student| {
        student.notes = Some(notes.to_string());
    })
}

/// Replaces whole days of attendance with `batch`.
///
/// Every record already stored for a date present in `batch` is dropped,
/// including students the batch omits. Duplicate keys inside `batch`
/// collapse to their last occurrence.
pub fn replace_days(
    groups: &[Group],
    group_id: &str,
    batch: &[AttendanceRecord],
) -> StoreResult<Option<Vec<Group>>> {
    if batch.is_empty() {
        return Ok(None);
    }
    replace_group(groups, group_id, |group| {
        ensure_known_students(group, batch)?;

        let dates: BTreeSet<_> = batch.iter().map(|record| record.date).collect();
        let mut incoming: Vec<AttendanceRecord> = Vec::with_capacity(batch.len());
        for record in batch {
            incoming.retain(|existing| existing.key() != record.key());
            incoming.push(record.clone());
        }

        let mut next = group.clone();
        next.attendance.retain(|record| !dates.contains(&record.date));
        next.attendance.extend(incoming);
        Ok(Some(next))
    })
}

/// Inserts or replaces the single record keyed by `(student_id, date)`.
pub fn upsert_record(
    groups: &[Group],
    group_id: &str,
    record: &AttendanceRecord,
) -> StoreResult<Option<Vec<Group>>> {
    replace_group(groups, group_id, |group| {
        ensure_known_students(group, std::slice::from_ref(record))?;
        let mut next = group.clone();
        next.attendance
            .retain(|existing| existing.key() != record.key());
        next.attendance.push(record.clone());
        Ok(Some(next))
    })
}

fn ensure_known_students(group: &Group, records: &[AttendanceRecord]) -> StoreResult<()> {
    match records
        .iter()
        .find(|record| !group.has_student(&record.student_id))
    {
        Some(record) => Err(StoreError::UnknownStudent {
            group_id: group.id.clone(),
            student_id: record.student_id.clone(),
        }),
        None => Ok(()),
    }
}

fn edit_student(
    groups: &[Group],
    group_id: &str,
    student_id: &str,
    edit: impl FnOnce(&mut Student),
) -> Option<Vec<Group>> {
    replace_group(groups, group_id, |group| {
        let Some(index) = group.students.iter().position(|s| s.id == student_id) else {
            return Ok(None);
        };
        let mut next = group.clone();
        edit(&mut next.students[index]);
        Ok(Some(next))
    })
    .ok()
    .flatten()
}

fn position(groups: &[Group], group_id: &str) -> Option<usize> {
    groups.iter().position(|group| group.id == group_id)
}

/// Rebuilds the list with one group swapped for `apply`'s result.
fn replace_group(
    groups: &[Group],
    group_id: &str,
    apply: impl FnOnce(&Group) -> StoreResult<Option<Group>>,
) -> StoreResult<Option<Vec<Group>>> {
    let Some(index) = position(groups, group_id) else {
        return Ok(None);
    };
    let Some(updated) = apply(&groups[index])? else {
        return Ok(None);
    };
    let mut next = Vec::with_capacity(groups.len());
    next.extend_from_slice(&groups[..index]);
    next.push(updated);
    next.extend_from_slice(&groups[index + 1..]);
    Ok(Some(next))
}

#[cfg(test)]
mod tests {
    use super::{add_group, remove_student, replace_days, update_student, upsert_record};
    use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
    use crate::model::group::Group;
    use crate::model::student::Student;
    use crate::store::error::StoreError;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn seeded() -> Vec<Group> {
        let mut group = Group::with_id("g", "Math");
        group.students = vec![
            Student::new("S1", "Ann", "Lee"),
            Student::new("S2", "Bob", "Ray"),
        ];
        group.attendance = vec![
            AttendanceRecord::new("S1", day(1), AttendanceStatus::Present),
            AttendanceRecord::new("S2", day(1), AttendanceStatus::Absent),
            AttendanceRecord::new("S1", day(2), AttendanceStatus::Absent),
        ];
        add_group(&[Group::with_id("other", "Other")], group)
    }

    #[test]
    fn transitions_leave_input_untouched() {
        let before = seeded();
        let next = remove_student(&before, "g", "S1").unwrap();
        assert_eq!(before[1].students.len(), 2);
        assert_eq!(next[1].students.len(), 1);
        assert_eq!(next[0], before[0]);
    }

    #[test]
    fn missing_targets_produce_no_state() {
        let groups = seeded();
        assert!(remove_student(&groups, "nope", "S1").is_none());
        assert!(remove_student(&groups, "g", "S9").is_none());
        let rec = AttendanceRecord::new("S1", day(3), AttendanceStatus::Present);
        assert!(upsert_record(&groups, "nope", &rec).unwrap().is_none());
    }

    #[test]
    fn rename_drops_orphans_under_new_id() {
        let mut groups = seeded();
        groups[1]
            .attendance
            .push(AttendanceRecord::new("S3", day(1), AttendanceStatus::Justified));
        let renamed = Student::new("S3", "Ann", "Lee");
        let next = update_student(&groups, "g", "S1", &renamed).unwrap().unwrap();
        let s3_day1: Vec<_> = next[1]
            .attendance
            .iter()
            .filter(|r| r.key() == ("S3", day(1)))
            .collect();
        assert_eq!(s3_day1.len(), 1);
        assert_eq!(s3_day1[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn batch_with_repeated_key_keeps_last() {
        let groups = seeded();
        let batch = vec![
            AttendanceRecord::new("S1", day(4), AttendanceStatus::Present),
            AttendanceRecord::new("S1", day(4), AttendanceStatus::Justified),
        ];
        let next = replace_days(&groups, "g", &batch).unwrap().unwrap();
        let day4: Vec<_> = next[1].records_on(day(4)).collect();
        assert_eq!(day4.len(), 1);
        assert_eq!(day4[0].status, AttendanceStatus::Justified);
    }

    #[test]
    fn batch_with_unknown_student_is_rejected_whole() {
        let groups = seeded();
        let batch = vec![
            AttendanceRecord::new("S1", day(1), AttendanceStatus::Present),
            AttendanceRecord::new("ghost", day(1), AttendanceStatus::Present),
        ];
        let err = replace_days(&groups, "g", &batch).unwrap_err();
        assert!(matches!(err, StoreError::UnknownStudent { student_id, .. } if student_id == "ghost"));
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        assert!(replace_days(&seeded(), "g", &[]).unwrap().is_none());
    }
}
