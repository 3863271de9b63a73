//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose store operations to Dart via FRB as plain DTOs.
//! - Own the single process-wide attendance store.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Dates cross the boundary as `YYYY-MM-DD`, statuses as their labels.
//! - Missing groups/students are not failures for mutations (store no-op).

use chrono::NaiveDate;
use log::warn;
use once_cell::sync::OnceCell;
use rollcall_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AttendanceRecord, AttendanceSheet, AttendanceStatus, AttendanceStore, Group, RuntimeConfig,
    SqliteSnapshotStore, Student,
};
use std::sync::{Mutex, MutexGuard};

const DATE_FORMAT: &str = "%Y-%m-%d";

type SharedStore = AttendanceStore<SqliteSnapshotStore>;

static STORE: OnceCell<Mutex<SharedStore>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Student shape exchanged with Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub micro1: Option<f64>,
    pub micro2: Option<f64>,
    pub notes: Option<String>,
}

/// Attendance record shape exchanged with Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecordDto {
    pub student_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `Present|Absent|Justified`.
    pub status: String,
}

/// One line of a bulk "take attendance" submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntryDto {
    pub student_id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    pub students: Vec<StudentDto>,
    pub attendance: Vec<AttendanceRecordDto>,
}

/// Row of the home screen group list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub student_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupListResponse {
    pub ok: bool,
    pub items: Vec<GroupSummary>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupResponse {
    pub ok: bool,
    pub group: Option<GroupDto>,
    pub message: String,
}

/// Generic action response envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Set by `group_create`.
    pub group_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            group_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            group_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRowDto {
    pub student_id: String,
    pub display_name: String,
    /// Status label per sheet date, `-` when unrecorded.
    pub cells: Vec<String>,
    pub present: u32,
    pub absent: u32,
    pub justified: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetResponse {
    pub ok: bool,
    pub group_name: String,
    /// Newest first.
    pub dates: Vec<String>,
    pub rows: Vec<SheetRowDto>,
    pub message: String,
}

/// Status labels in picker order.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_status_labels() -> Vec<String> {
    AttendanceStatus::ALL
        .iter()
        .map(|status| status.label().to_string())
        .collect()
}

#[flutter_rust_bridge::frb(sync)]
pub fn groups_list() -> GroupListResponse {
    match with_store(|store| store.groups().iter().map(to_group_summary).collect()) {
        Ok(items) => GroupListResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => GroupListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("groups_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn group_get(group_id: String) -> GroupResponse {
    match with_store(|store| store.get_group(group_id.trim()).map(to_group_dto)) {
        Ok(Some(group)) => GroupResponse {
            ok: true,
            group: Some(group),
            message: String::new(),
        },
        Ok(None) => GroupResponse {
            ok: false,
            group: None,
            message: "Group not found.".to_string(),
        },
        Err(err) => GroupResponse {
            ok: false,
            group: None,
            message: format!("group_get failed: {err}"),
        },
    }
}

/// Creates a group; blank names are rejected before reaching the store.
#[flutter_rust_bridge::frb(sync)]
pub fn group_create(name: String) -> ActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return ActionResponse::failure("Group name is required.");
    }
    match with_store(|store| store.add_group(name)) {
        Ok(group_id) => ActionResponse {
            group_id: Some(group_id),
            ..ActionResponse::success("Group created.")
        },
        Err(err) => ActionResponse::failure(format!("group_create failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn group_rename(group_id: String, name: String) -> ActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return ActionResponse::failure("Group name is required.");
    }
    respond("group_rename", "Group renamed.", |store| {
        store.update_group_name(group_id.trim(), name);
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn group_delete(group_id: String) -> ActionResponse {
    respond("group_delete", "Group deleted.", |store| {
        store.remove_group(group_id.trim());
        Ok(())
    })
}

/// Adds a student from the new-student form.
///
/// Id, first name and last name are trimmed and must be non-empty.
#[flutter_rust_bridge::frb(sync)]
pub fn student_add(
    group_id: String,
    student_id: String,
    first_name: String,
    last_name: String,
) -> ActionResponse {
    let student = match required_student(&student_id, &first_name, &last_name) {
        Ok(student) => student,
        Err(message) => return ActionResponse::failure(message),
    };
    respond("student_add", "Student added.", |store| {
        store
            .add_student(group_id.trim(), student)
            .map_err(|err| err.to_string())
    })
}

/// Replaces the student stored under `student_id` with `updated`.
///
/// A different `updated.id` renames the student and moves its history.
#[flutter_rust_bridge::frb(sync)]
pub fn student_update(group_id: String, student_id: String, updated: StudentDto) -> ActionResponse {
    let mut student = match required_student(&updated.id, &updated.first_name, &updated.last_name)
    {
        Ok(student) => student,
        Err(message) => return ActionResponse::failure(message),
    };
    student.micro1 = updated.micro1;
    student.micro2 = updated.micro2;
    student.notes = updated.notes;
    respond("student_update", "Student updated.", |store| {
        store
            .update_student(group_id.trim(), student_id.trim(), student)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_delete(group_id: String, student_id: String) -> ActionResponse {
    respond("student_delete", "Student removed.", |store| {
        store.remove_student(group_id.trim(), student_id.trim());
        Ok(())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_set_micro_scores(
    group_id: String,
    student_id: String,
    micro1: Option<f64>,
    micro2: Option<f64>,
) -> ActionResponse {
    respond("student_set_micro_scores", "Scores saved.", |store| {
        store
            .update_micro_scores(group_id.trim(), student_id.trim(), micro1, micro2)
            .map_err(|err| err.to_string())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn student_set_notes(group_id: String, student_id: String, notes: String) -> ActionResponse {
    respond("student_set_notes", "Notes saved.", |store| {
        store.update_student_notes(group_id.trim(), student_id.trim(), notes);
        Ok(())
    })
}

/// Saves a whole day of attendance, replacing anything already on `date`.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_take(
    group_id: String,
    date: String,
    entries: Vec<AttendanceEntryDto>,
) -> ActionResponse {
    let date = match parse_date(&date) {
        Ok(date) => date,
        Err(message) => return ActionResponse::failure(message),
    };
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        match parse_status(&entry.status) {
            Ok(status) => records.push(AttendanceRecord::new(entry.student_id.trim(), date, status)),
            Err(message) => return ActionResponse::failure(message),
        }
    }
    respond("attendance_take", "Attendance saved.", |store| {
        store
            .add_attendance(group_id.trim(), records)
            .map_err(|err| err.to_string())
    })
}

/// Sets one grid cell.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_set(
    group_id: String,
    student_id: String,
    date: String,
    status: String,
) -> ActionResponse {
    let record = match (parse_date(&date), parse_status(&status)) {
        (Ok(date), Ok(status)) => AttendanceRecord::new(student_id.trim(), date, status),
        (Err(message), _) | (_, Err(message)) => return ActionResponse::failure(message),
    };
    respond("attendance_set", "Attendance updated.", |store| {
        store
            .update_attendance(group_id.trim(), record)
            .map_err(|err| err.to_string())
    })
}

/// Student-by-date grid used by the group screen and exporters.
#[flutter_rust_bridge::frb(sync)]
pub fn attendance_sheet(group_id: String) -> SheetResponse {
    let failure = |message: String| SheetResponse {
        ok: false,
        group_name: String::new(),
        dates: Vec::new(),
        rows: Vec::new(),
        message,
    };

    match with_store(|store| store.get_group(group_id.trim()).map(AttendanceSheet::build)) {
        Ok(Some(sheet)) => to_sheet_response(&sheet),
        Ok(None) => failure("Group not found.".to_string()),
        Err(err) => failure(format!("attendance_sheet failed: {err}")),
    }
}

fn respond(
    op: &str,
    success_message: &str,
    f: impl FnOnce(&mut SharedStore) -> Result<(), String>,
) -> ActionResponse {
    match with_store(f) {
        Ok(Ok(())) => ActionResponse::success(success_message),
        Ok(Err(err)) | Err(err) => ActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn with_store<T>(f: impl FnOnce(&mut SharedStore) -> T) -> Result<T, String> {
    let mut guard = lock_store()?;
    Ok(f(&mut *guard))
}

fn lock_store() -> Result<MutexGuard<'static, SharedStore>, String> {
    let store = STORE.get_or_try_init(|| {
        let config = RuntimeConfig::from_env();
        let storage = SqliteSnapshotStore::open(&config.db_path)
            .map_err(|err| format!("snapshot DB open failed: {err}"))?;
        Ok::<_, String>(Mutex::new(AttendanceStore::open(storage)))
    })?;
    store.lock().map_err(|_| {
        warn!("event=store_lock module=ffi status=error error_code=poisoned");
        "attendance store is unavailable after an earlier failure".to_string()
    })
}

fn required_student(id: &str, first_name: &str, last_name: &str) -> Result<Student, String> {
    let (id, first_name, last_name) = (id.trim(), first_name.trim(), last_name.trim());
    if id.is_empty() {
        return Err("Student ID is required.".to_string());
    }
    if first_name.is_empty() {
        return Err("First name is required.".to_string());
    }
    if last_name.is_empty() {
        return Err("Last name is required.".to_string());
    }
    Ok(Student::new(id, first_name, last_name))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid date `{}`; expected YYYY-MM-DD", raw.trim()))
}

fn parse_status(raw: &str) -> Result<AttendanceStatus, String> {
    raw.parse::<AttendanceStatus>().map_err(|err| err.to_string())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn to_group_summary(group: &Group) -> GroupSummary {
    GroupSummary {
        id: group.id.clone(),
        name: group.name.clone(),
        student_count: u32::try_from(group.students.len()).unwrap_or(u32::MAX),
    }
}

fn to_group_dto(group: &Group) -> GroupDto {
    GroupDto {
        id: group.id.clone(),
        name: group.name.clone(),
        students: group
            .students
            .iter()
            .map(|student| StudentDto {
                id: student.id.clone(),
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                micro1: student.micro1,
                micro2: student.micro2,
                notes: student.notes.clone(),
            })
            .collect(),
        attendance: group
            .attendance
            .iter()
            .map(|record| AttendanceRecordDto {
                student_id: record.student_id.clone(),
                date: format_date(record.date),
                status: record.status.label().to_string(),
            })
            .collect(),
    }
}

fn to_sheet_response(sheet: &AttendanceSheet) -> SheetResponse {
    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            let tally = row.tally();
            SheetRowDto {
                student_id: row.student_id.clone(),
                display_name: format!("{} {}", row.first_name, row.last_name),
                cells: (0..sheet.dates.len())
                    .map(|column| row.cell_label(column).to_string())
                    .collect(),
                present: tally.present,
                absent: tally.absent,
                justified: tally.justified,
            }
        })
        .collect();

    SheetResponse {
        ok: true,
        group_name: sheet.group_name.clone(),
        dates: sheet.dates.iter().copied().map(format_date).collect(),
        rows,
        message: String::new(),
    }
}
