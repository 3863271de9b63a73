//! Store object owning the groups list and its persistence dependency.
//!
//! # Responsibility
//! - Hydrate once from the snapshot store at startup.
//! - Install transition results, notify subscribers, then persist.
//!
//! # Invariants
//! - In-memory state is installed before the durable write is attempted;
//!   a failed write is logged and never rolls the state back.
//! - Validation failures return before any state is installed.
//! - Log lines carry ids and counts only, never names or notes.
//!
//! # Side effects
//! - Every applied mutation writes the whole snapshot synchronously on the
//!   caller's thread before returning; callers that must not block (UI
//!   isolates) should invoke the store off their event loop.

use crate::model::attendance::AttendanceRecord;
use crate::model::group::{Group, GroupId};
use crate::model::student::Student;
use crate::storage::SnapshotStore;
use crate::store::error::StoreResult;
use crate::store::listeners::{Listener, ListenerRegistry, SubscriptionId};
use crate::store::snapshot::{decode_snapshot, encode_snapshot};
use crate::store::transition;
use log::{debug, error, info, warn};

/// Result of the startup load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No snapshot saved yet (first run).
    Empty,
    /// Snapshot decoded; holds the number of groups restored.
    Restored(usize),
    /// Snapshot unreadable or undecodable; in-memory state is kept as is.
    Failed,
}

/// Authoritative attendance data for one device session.
pub struct AttendanceStore<S: SnapshotStore> {
    storage: S,
    groups: Vec<Group>,
    listeners: ListenerRegistry,
}

impl<S: SnapshotStore> AttendanceStore<S> {
    /// Creates an empty, not yet hydrated store.
    ///
    /// Zero groups is a valid state; reads before `hydrate` see it.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            groups: Vec::new(),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Creates a store and performs the startup load.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.hydrate();
        store
    }

    /// Replaces in-memory state with the persisted snapshot.
    ///
    /// Never fails. A read or decode problem is logged and leaves the
    /// current in-memory state (empty at startup) untouched and unannounced,
    /// so a later write cannot replace the durable copy with an empty list.
    pub fn hydrate(&mut self) -> LoadOutcome {
        let loaded = match self.storage.load() {
            Ok(None) => Some((Vec::new(), LoadOutcome::Empty)),
            Ok(Some(raw)) => match decode_snapshot(&raw) {
                Ok(groups) => {
                    let restored = groups.len();
                    Some((groups, LoadOutcome::Restored(restored)))
                }
                Err(err) => {
                    error!(
                        "event=store_load module=store status=error error_code=snapshot_decode_failed bytes={} kept_groups={} error={}",
                        raw.len(),
                        self.groups.len(),
                        err
                    );
                    None
                }
            },
            Err(err) => {
                error!(
                    "event=store_load module=store status=error error_code=snapshot_read_failed kept_groups={} error={}",
                    self.groups.len(),
                    err
                );
                None
            }
        };

        let Some((groups, outcome)) = loaded else {
            return LoadOutcome::Failed;
        };
        self.groups = groups;
        info!(
            "event=store_load module=store status=ok groups={}",
            self.groups.len()
        );
        self.listeners.notify(&self.groups);
        outcome
    }

    /// Returns all groups in creation order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn get_group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    /// Serializes the current state in persisted snapshot shape.
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        encode_snapshot(&self.groups)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Registers a listener called with the full state after each mutation.
    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Creates an empty group at the end of the list and returns its id.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    pub fn add_group(&mut self, name: impl Into<String>) -> GroupId {
        let group = Group::new(name);
        let group_id = group.id.clone();
        let next = transition::add_group(&self.groups, group);
        self.install("add_group", next);
        group_id
    }

    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    pub fn remove_group(&mut self, group_id: &str) {
        let next = transition::remove_group(&self.groups, group_id);
        self.install_or_skip("remove_group", group_id, next);
    }

    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    pub fn update_group_name(&mut self, group_id: &str, new_name: impl Into<String>) {
        let new_name: String = new_name.into();
        let next = transition::rename_group(&self.groups, group_id, &new_name);
        self.install_or_skip("update_group_name", group_id, next);
    }

    /// Appends a student to a group.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    ///
    /// # Errors
    /// - `Validation` when a micro score is out of range.
    /// - `DuplicateStudentId` when the group already has this id.
    pub fn add_student(&mut self, group_id: &str, student: Student) -> StoreResult<()> {
        let result = transition::add_student(&self.groups, group_id, &student);
        let next = self.guard("add_student", result)?;
        self.install_or_skip("add_student", group_id, next);
        Ok(())
    }

    /// Removes a student and all of its attendance records.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    pub fn remove_student(&mut self, group_id: &str, student_id: &str) {
        let next = transition::remove_student(&self.groups, group_id, student_id);
        self.install_or_skip("remove_student", group_id, next);
    }

    /// Replaces a student, re-keying attendance when the id changes.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    ///
    /// # Errors
    /// - `Validation` when a micro score is out of range.
    /// - `DuplicateStudentId` when renaming onto an id already in use.
    pub fn update_student(
        &mut self,
        group_id: &str,
        student_id: &str,
        updated: Student,
    ) -> StoreResult<()> {
        let result = transition::update_student(&self.groups, group_id, student_id, &updated);
        let next = self.guard("update_student", result)?;
        self.install_or_skip("update_student", group_id, next);
        Ok(())
    }

    /// Sets both micro scores of a student.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    ///
    /// # Errors
    /// - `Validation` when either score is outside `[0, 20]`.
    pub fn update_micro_scores(
        &mut self,
        group_id: &str,
        student_id: &str,
        micro1: Option<f64>,
        micro2: Option<f64>,
    ) -> StoreResult<()> {
        let result =
            transition::set_micro_scores(&self.groups, group_id, student_id, micro1, micro2);
        let next = self.guard("update_micro_scores", result)?;
        self.install_or_skip("update_micro_scores", group_id, next);
        Ok(())
    }

    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    pub fn update_student_notes(
        &mut self,
        group_id: &str,
        student_id: &str,
        notes: impl Into<String>,
    ) {
        let notes: String = notes.into();
        let next = transition::set_notes(&self.groups, group_id, student_id, &notes);
        self.install_or_skip("update_student_notes", group_id, next);
    }

    /// Records a bulk entry, replacing every record on the batch's dates.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    ///
    /// # Errors
    /// - `UnknownStudent` when a record names a student the group lacks.
    pub fn add_attendance(
        &mut self,
        group_id: &str,
        records: Vec<AttendanceRecord>,
    ) -> StoreResult<()> {
        let result = transition::replace_days(&self.groups, group_id, &records);
        let next = self.guard("add_attendance", result)?;
        self.install_or_skip("add_attendance", group_id, next);
        Ok(())
    }

    /// Upserts one `(student_id, date)` record.
    ///
    /// # Side effects
    /// - Blocks on the full snapshot write when state changes.
    ///
    /// # Errors
    /// - `UnknownStudent` when the record names a student the group lacks.
    pub fn update_attendance(
        &mut self,
        group_id: &str,
        record: AttendanceRecord,
    ) -> StoreResult<()> {
        let result = transition::upsert_record(&self.groups, group_id, &record);
        let next = self.guard("update_attendance", result)?;
        self.install_or_skip("update_attendance", group_id, next);
        Ok(())
    }

    fn guard<T>(&self, op: &'static str, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(err) = &result {
            warn!("event=store_mutation module=store op={op} status=rejected error={err}");
        }
        result
    }

    fn install_or_skip(&mut self, op: &'static str, group_id: &str, next: Option<Vec<Group>>) {
        match next {
            Some(next) => self.install(op, next),
            None => debug!(
                "event=store_mutation module=store op={op} status=skipped reason=target_not_found group_id={group_id}"
            ),
        }
    }

    fn install(&mut self, op: &'static str, next: Vec<Group>) {
        self.groups = next;
        info!(
            "event=store_mutation module=store op={op} status=ok groups={}",
            self.groups.len()
        );
        self.listeners.notify(&self.groups);
        self.persist(op);
    }

    fn persist(&self, op: &'static str) {
        let snapshot = match encode_snapshot(&self.groups) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(
                    "event=snapshot_save module=store status=error op={op} error_code=snapshot_encode_failed error={err}"
                );
                return;
            }
        };
        match self.storage.save(&snapshot) {
            Ok(()) => debug!(
                "event=snapshot_save module=store status=ok op={op} bytes={}",
                snapshot.len()
            ),
            Err(err) => error!(
                "event=snapshot_save module=store status=error op={op} error_code=snapshot_write_failed error={err}"
            ),
        }
    }
}
