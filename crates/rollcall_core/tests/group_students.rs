use rollcall_core::{
    AttendanceRecord, AttendanceStatus, AttendanceStore, MemorySnapshotStore, MicroSlot,
    StoreError, Student, StudentValidationError,
};
use chrono::NaiveDate;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn store_with_class(
    storage: &MemorySnapshotStore,
) -> (AttendanceStore<&MemorySnapshotStore>, String) {
    let mut store = AttendanceStore::open(storage);
    let group_id = store.add_group("CS101");
    store
        .add_student(&group_id, Student::new("S1", "Ann", "Lee"))
        .unwrap();
    store
        .add_student(&group_id, Student::new("S2", "Bob", "Ray"))
        .unwrap();
    (store, group_id)
}

#[test]
fn groups_keep_creation_order_and_allow_duplicate_names() {
    let storage = MemorySnapshotStore::new();
    let mut store = AttendanceStore::open(&storage);

    let first = store.add_group("Lab");
    let second = store.add_group("Lab");
    let third = store.add_group("Seminar");

    let ids: Vec<_> = store.groups().iter().map(|g| g.id.clone()).collect();
    assert_eq!(ids, vec![first.clone(), second, third]);
    assert_ne!(ids[0], ids[1]);
    let group = store.get_group(&first).unwrap();
    assert_eq!(group.name, "Lab");
    assert!(group.students.is_empty());
    assert!(group.attendance.is_empty());
}

#[test]
fn rename_and_remove_group() {
    let storage = MemorySnapshotStore::new();
    let mut store = AttendanceStore::open(&storage);
    let keep = store.add_group("A");
    let drop_id = store.add_group("B");

    store.update_group_name(&keep, "A-renamed");
    store.remove_group(&drop_id);

    assert_eq!(store.groups().len(), 1);
    assert_eq!(store.get_group(&keep).unwrap().name, "A-renamed");
    assert!(store.get_group(&drop_id).is_none());
}

#[test]
fn operations_on_missing_targets_are_silent_no_ops() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    let saves_before = storage.save_count();
    let before = store.groups().to_vec();

    store.remove_group("missing");
    store.update_group_name("missing", "x");
    store.remove_student(&group_id, "S404");
    store.update_student_notes(&group_id, "S404", "note");
    store
        .update_micro_scores(&group_id, "S404", Some(5.0), None)
        .unwrap();
    store
        .update_student(&group_id, "S404", Student::new("S405", "X", "Y"))
        .unwrap();
    store
        .add_student("missing", Student::new("S9", "Z", "Z"))
        .unwrap();

    assert_eq!(store.groups(), before.as_slice());
    assert_eq!(storage.save_count(), saves_before);
}

#[test]
fn add_student_rejects_duplicate_id_in_same_group_only() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    let other_group = store.add_group("CS102");

    let err = store
        .add_student(&group_id, Student::new("S1", "Another", "Ann"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateStudentId { ref student_id, .. } if student_id == "S1"));
    assert_eq!(store.get_group(&group_id).unwrap().students.len(), 2);

    store
        .add_student(&other_group, Student::new("S1", "Ann", "Lee"))
        .unwrap();
    assert_eq!(store.get_group(&other_group).unwrap().students.len(), 1);
}

#[test]
fn add_student_keeps_insertion_order() {
    let storage = MemorySnapshotStore::new();
    let (store, group_id) = store_with_class(&storage);
    let ids: Vec<_> = store
        .get_group(&group_id)
        .unwrap()
        .students
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(ids, vec!["S1", "S2"]);
}

#[test]
fn micro_scores_in_range_are_stored_exactly() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);

    for (m1, m2) in [(0.0, 20.0), (10.5, 19.75), (20.0, 0.0)] {
        store
            .update_micro_scores(&group_id, "S1", Some(m1), Some(m2))
            .unwrap();
        let student = store.get_group(&group_id).unwrap().student("S1").unwrap();
        assert_eq!(student.micro1, Some(m1));
        assert_eq!(student.micro2, Some(m2));
    }

    store
        .update_micro_scores(&group_id, "S1", None, Some(3.0))
        .unwrap();
    let student = store.get_group(&group_id).unwrap().student("S1").unwrap();
    assert_eq!(student.micro1, None);
    assert_eq!(student.micro2, Some(3.0));
}

#[test]
fn micro_scores_out_of_range_are_rejected_without_change() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    store
        .update_micro_scores(&group_id, "S1", Some(12.0), Some(14.0))
        .unwrap();
    let before = store.groups().to_vec();
    let saves_before = storage.save_count();

    for (m1, m2) in [
        (Some(-1.0), Some(10.0)),
        (Some(10.0), Some(20.01)),
        (Some(f64::INFINITY), None),
        (None, Some(f64::NAN)),
    ] {
        let err = store
            .update_micro_scores(&group_id, "S1", m1, m2)
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    assert_eq!(store.groups(), before.as_slice());
    assert_eq!(storage.save_count(), saves_before);
}

#[test]
fn update_student_validates_scores_before_anything_else() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    store
        .update_attendance(
            &group_id,
            AttendanceRecord::new("S1", day(10), AttendanceStatus::Present),
        )
        .unwrap();
    let before = store.groups().to_vec();

    let mut renamed = Student::new("S9", "Ann", "Lee");
    renamed.micro1 = Some(21.0);
    let err = store.update_student(&group_id, "S1", renamed).unwrap_err();

    assert_eq!(
        err,
        StoreError::Validation(StudentValidationError::MicroScoreOutOfRange {
            slot: MicroSlot::Micro1,
            value: 21.0
        })
    );
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn update_student_replaces_fields_in_place() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);

    let mut edited = Student::new("S1", "Anne", "Lee-Smith");
    edited.micro2 = Some(17.0);
    store.update_student(&group_id, "S1", edited.clone()).unwrap();

    let group = store.get_group(&group_id).unwrap();
    assert_eq!(group.students[0], edited);
    assert_eq!(group.students[1].id, "S2");
}

#[test]
fn rename_student_rekeys_all_attendance() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    store
        .add_attendance(
            &group_id,
            vec![
                AttendanceRecord::new("S1", day(8), AttendanceStatus::Present),
                AttendanceRecord::new("S2", day(8), AttendanceStatus::Absent),
            ],
        )
        .unwrap();
    store
        .update_attendance(
            &group_id,
            AttendanceRecord::new("S1", day(9), AttendanceStatus::Justified),
        )
        .unwrap();

    store
        .update_student(&group_id, "S1", Student::new("A-1", "Ann", "Lee"))
        .unwrap();

    let group = store.get_group(&group_id).unwrap();
    assert!(group.student("S1").is_none());
    assert_eq!(group.students[0].id, "A-1");
    assert_eq!(group.records_of("S1").count(), 0);
    assert_eq!(group.records_of("A-1").count(), 2);
    assert_eq!(
        group.status_for("A-1", day(9)),
        Some(AttendanceStatus::Justified)
    );
    assert_eq!(group.status_for("S2", day(8)), Some(AttendanceStatus::Absent));
}

#[test]
fn rename_onto_existing_id_is_rejected() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    let before = store.groups().to_vec();

    let err = store
        .update_student(&group_id, "S1", Student::new("S2", "Ann", "Lee"))
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateStudentId { .. }));
    assert_eq!(store.groups(), before.as_slice());
}

#[test]
fn remove_student_cascades_attendance() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    store
        .add_attendance(
            &group_id,
            vec![
                AttendanceRecord::new("S1", day(1), AttendanceStatus::Present),
                AttendanceRecord::new("S2", day(1), AttendanceStatus::Present),
            ],
        )
        .unwrap();
    store
        .add_attendance(
            &group_id,
            vec![AttendanceRecord::new("S1", day(2), AttendanceStatus::Absent)],
        )
        .unwrap();

    store.remove_student(&group_id, "S1");

    let group = store.get_group(&group_id).unwrap();
    assert!(group.student("S1").is_none());
    assert!(group.attendance.iter().all(|r| r.student_id != "S1"));
    assert_eq!(group.attendance.len(), 1);
}

#[test]
fn notes_update_touches_only_notes() {
    let storage = MemorySnapshotStore::new();
    let (mut store, group_id) = store_with_class(&storage);
    store
        .update_micro_scores(&group_id, "S2", Some(11.0), None)
        .unwrap();

    store.update_student_notes(&group_id, "S2", "sits in front row");

    let student = store.get_group(&group_id).unwrap().student("S2").unwrap();
    assert_eq!(student.notes.as_deref(), Some("sits in front row"));
    assert_eq!(student.micro1, Some(11.0));
    assert_eq!(student.first_name, "Bob");
}
