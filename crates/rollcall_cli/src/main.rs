//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `rollcall_core` linkage without the Flutter runtime.
//! - Print a per-group summary of a snapshot database.
//!
//! Usage: `rollcall_cli [db_path]` (defaults to `ROLLCALL_DB_PATH`).

use rollcall_core::{AttendanceSheet, AttendanceStore, RuntimeConfig, SqliteSnapshotStore};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("rollcall_core ping={}", rollcall_core::ping());
    println!("rollcall_core version={}", rollcall_core::core_version());

    let config = RuntimeConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = rollcall_core::init_logging(&config.log_level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or(config.db_path);
    let storage = match SqliteSnapshotStore::open(&db_path) {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("cannot open {}: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let store = AttendanceStore::open(storage);
    println!("db={} groups={}", db_path.display(), store.groups().len());
    for group in store.groups() {
        let sheet = AttendanceSheet::build(group);
        println!(
            "group id={} name={:?} students={} records={} days={}",
            group.id,
            group.name,
            sheet.total_students(),
            group.attendance.len(),
            sheet.dates.len()
        );
        for (student_id, tally) in sheet.tallies() {
            println!(
                "  student={student_id} present={} absent={} justified={}",
                tally.present, tally.absent, tally.justified
            );
        }
    }

    ExitCode::SUCCESS
}
