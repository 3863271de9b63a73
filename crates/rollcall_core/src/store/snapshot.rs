//! Snapshot encoding for the persistent store.
//!
//! The snapshot is the whole groups list as one JSON array. There is no
//! version field; a shape change is not backward compatible.

use crate::model::group::Group;

/// Serializes the full groups list.
pub fn encode_snapshot(groups: &[Group]) -> serde_json::Result<String> {
    serde_json::to_string(groups)
}

/// Parses a snapshot previously written by `encode_snapshot`.
pub fn decode_snapshot(raw: &str) -> serde_json::Result<Vec<Group>> {
    serde_json::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot};
    use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
    use crate::model::group::Group;
    use crate::model::student::Student;
    use chrono::NaiveDate;

    #[test]
    fn decodes_hand_written_snapshot() {
        let raw = r#"[{
            "id": "1704880000000",
            "name": "CS101",
            "students": [{"id": "S1", "firstName": "Ann", "lastName": "Lee", "micro1": 14.5}],
            "attendance": [{"studentId": "S1", "date": "2024-01-10", "status": "Justified"}]
        }]"#;
        let groups = decode_snapshot(raw).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].students[0].micro1, Some(14.5));
        assert_eq!(
            groups[0].attendance[0].status,
            AttendanceStatus::Justified
        );
    }

    #[test]
    fn rejects_unknown_status_label() {
        let raw = r#"[{"id":"g","name":"G","students":[],
            "attendance":[{"studentId":"S1","date":"2024-01-10","status":"Late"}]}]"#;
        assert!(decode_snapshot(raw).is_err());
    }

    #[test]
    fn encode_then_decode_preserves_groups() {
        let mut group = Group::with_id("g1", "Physics");
        group.students.push(Student::new("S1", "Ann", "Lee"));
        group.attendance.push(AttendanceRecord::new(
            "S1",
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            AttendanceStatus::Absent,
        ));
        let decoded = decode_snapshot(&encode_snapshot(&[group.clone()]).unwrap()).unwrap();
        assert_eq!(decoded, vec![group]);
    }
}
