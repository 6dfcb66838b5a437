//! Store interfaces.
//!
//! Each trait covers one namespace and is keyed by [`EntityKey`]. Every write
//! is atomic on its own; sequencing across namespaces is the coordinator's
//! job. Implementations may be backed by a filesystem, an embedded database
//! or an object store without changes to the engine.

use crate::errors::Result;
use chrono::{DateTime, Utc};
use insidertrack_core::{ChangeLogEntry, EntityKey, Snapshot};

/// The single live snapshot per entity
pub trait SnapshotStore {
    /// Load the current snapshot, `None` if the entity was never committed
    fn load(&self, key: &EntityKey) -> Result<Option<Snapshot>>;

    /// Replace the current snapshot. A failed save leaves the previous
    /// snapshot readable.
    fn save(&self, key: &EntityKey, snapshot: &Snapshot) -> Result<()>;
}

/// Append-only archive of past snapshots
pub trait HistoryStore {
    /// Record `snapshot` under a name derived from `at` and return the
    /// record id.
    ///
    /// Never overwrites. Appending identical content under the same time is
    /// a no-op returning the existing id, so a retried commit does not
    /// duplicate records.
    fn append(&self, key: &EntityKey, snapshot: &Snapshot, at: DateTime<Utc>) -> Result<String>;

    /// Record ids in ascending time order
    fn list(&self, key: &EntityKey) -> Result<Vec<String>>;

    fn read(&self, key: &EntityKey, id: &str) -> Result<Snapshot>;
}

/// Capacity-bounded change-log per entity
pub trait ChangeLogStore {
    /// Append an entry, evicting the oldest entries beyond the retention cap
    fn append(&self, key: &EntityKey, entry: &ChangeLogEntry) -> Result<()>;

    /// All retained entries, oldest first
    fn load(&self, key: &EntityKey) -> Result<Vec<ChangeLogEntry>>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &T {
    fn load(&self, key: &EntityKey) -> Result<Option<Snapshot>> {
        (**self).load(key)
    }

    fn save(&self, key: &EntityKey, snapshot: &Snapshot) -> Result<()> {
        (**self).save(key, snapshot)
    }
}

impl<T: HistoryStore + ?Sized> HistoryStore for &T {
    fn append(&self, key: &EntityKey, snapshot: &Snapshot, at: DateTime<Utc>) -> Result<String> {
        (**self).append(key, snapshot, at)
    }

    fn list(&self, key: &EntityKey) -> Result<Vec<String>> {
        (**self).list(key)
    }

    fn read(&self, key: &EntityKey, id: &str) -> Result<Snapshot> {
        (**self).read(key, id)
    }
}

impl<T: ChangeLogStore + ?Sized> ChangeLogStore for &T {
    fn append(&self, key: &EntityKey, entry: &ChangeLogEntry) -> Result<()> {
        (**self).append(key, entry)
    }

    fn load(&self, key: &EntityKey) -> Result<Vec<ChangeLogEntry>> {
        (**self).load(key)
    }
}

/// Format a history record id from a timestamp (`YYYY-MM-DD_HH-MM-SS`)
pub fn history_id(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// Id for the `n`th collision on the same second (`n >= 1`)
pub fn history_id_with_suffix(base: &str, n: usize) -> String {
    format!("{}_{}", base, n)
}

/// Sort key ordering ids by timestamp then collision suffix
pub fn history_sort_key(id: &str) -> (&str, usize) {
    // The base id is fixed width: 19 chars
    if id.len() > 20 && id.as_bytes()[19] == b'_' {
        if let Ok(n) = id[20..].parse::<usize>() {
            return (&id[..19], n);
        }
    }
    (id, 0)
}
