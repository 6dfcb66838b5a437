//! Read-only queries over committed state.

use crate::commands::commit::{Clock, Coordinator};
use insidertrack_core::{ChangeLogEntry, EntityKey, Snapshot};
use insidertrack_store::{ChangeLogStore, HistoryStore, Result, SnapshotStore};

impl<S, H, C, K> Coordinator<S, H, C, K>
where
    S: SnapshotStore,
    H: HistoryStore,
    C: ChangeLogStore,
    K: Clock,
{
    /// The last committed snapshot, `None` before the first commit
    pub fn get_current_snapshot(&self, key: &EntityKey) -> Result<Option<Snapshot>> {
        self.snapshots().load(key)
    }

    /// Retained change-log entries, oldest first
    pub fn get_change_log(&self, key: &EntityKey) -> Result<Vec<ChangeLogEntry>> {
        self.changes().load(key)
    }

    /// History record ids, oldest first
    pub fn list_history(&self, key: &EntityKey) -> Result<Vec<String>> {
        self.history().list(key)
    }

    pub fn get_history_snapshot(&self, key: &EntityKey, id: &str) -> Result<Snapshot> {
        self.history().read(key, id)
    }
}
