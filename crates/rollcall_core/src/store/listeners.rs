//! Snapshot subscribers.

use crate::model::group::Group;
use std::collections::BTreeMap;

/// Handle returned by `AttendanceStore::subscribe`.
pub type SubscriptionId = u64;

/// Callback receiving the full groups list after each installed mutation.
pub type Listener = Box<dyn FnMut(&[Group]) + Send>;

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: SubscriptionId,
    listeners: BTreeMap<SubscriptionId, Listener>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Calls listeners in subscription order.
    pub(crate) fn notify(&mut self, groups: &[Group]) {
        for listener in self.listeners.values_mut() {
            listener(groups);
        }
    }
}
