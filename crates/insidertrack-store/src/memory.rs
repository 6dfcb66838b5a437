//! In-memory stores
//!
//! Single-threaded `RefCell` maps implementing the same contracts as the
//! filesystem stores. Snapshots are held as their serialized bytes so that
//! history idempotence compares content the same way the filesystem does.

use crate::errors::{corrupt_document, encode_failed, history_missing, Result};
use crate::traits::{
    history_id, history_id_with_suffix, history_sort_key, ChangeLogStore, HistoryStore,
    SnapshotStore,
};
use chrono::{DateTime, Utc};
use insidertrack_core::errors::ConfigError;
use insidertrack_core::{BoundedLog, ChangeLogEntry, EntityKey, Snapshot};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug)]
pub struct MemoryStores {
    current: RefCell<HashMap<EntityKey, Snapshot>>,
    history: RefCell<HashMap<EntityKey, HashMap<String, Vec<u8>>>>,
    changes: RefCell<HashMap<EntityKey, BoundedLog<ChangeLogEntry>>>,
    capacity: usize,
}

impl MemoryStores {
    pub fn new(max_change_history: usize) -> Result<Self> {
        if max_change_history == 0 {
            return Err(ConfigError::ZeroRetention(max_change_history).into());
        }
        Ok(Self {
            current: RefCell::new(HashMap::new()),
            history: RefCell::new(HashMap::new()),
            changes: RefCell::new(HashMap::new()),
            capacity: max_change_history,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl SnapshotStore for MemoryStores {
    fn load(&self, key: &EntityKey) -> Result<Option<Snapshot>> {
        Ok(self.current.borrow().get(key).cloned())
    }

    fn save(&self, key: &EntityKey, snapshot: &Snapshot) -> Result<()> {
        self.current.borrow_mut().insert(key.clone(), snapshot.clone());
        Ok(())
    }
}

impl HistoryStore for MemoryStores {
    fn append(&self, key: &EntityKey, snapshot: &Snapshot, at: DateTime<Utc>) -> Result<String> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| encode_failed("append_history", key, e))?;
        let base = history_id(at);

        let mut history = self.history.borrow_mut();
        let records = history.entry(key.clone()).or_default();

        let mut suffix = 0usize;
        loop {
            let id = if suffix == 0 {
                base.clone()
            } else {
                history_id_with_suffix(&base, suffix)
            };
            match records.get(&id) {
                None => {
                    records.insert(id.clone(), bytes);
                    return Ok(id);
                }
                Some(existing) if *existing == bytes => return Ok(id),
                Some(_) => suffix += 1,
            }
        }
    }

    fn list(&self, key: &EntityKey) -> Result<Vec<String>> {
        let history = self.history.borrow();
        let mut ids: Vec<String> = history
            .get(key)
            .map(|records| records.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort_by(|a, b| history_sort_key(a).cmp(&history_sort_key(b)));
        Ok(ids)
    }

    fn read(&self, key: &EntityKey, id: &str) -> Result<Snapshot> {
        let history = self.history.borrow();
        let bytes = history
            .get(key)
            .and_then(|records| records.get(id))
            .ok_or_else(|| history_missing(key, id))?;
        serde_json::from_slice(bytes).map_err(|e| corrupt_document("read_history", key, e))
    }
}

impl ChangeLogStore for MemoryStores {
    fn append(&self, key: &EntityKey, entry: &ChangeLogEntry) -> Result<()> {
        let mut changes = self.changes.borrow_mut();
        if let Some(log) = changes.get_mut(key) {
            log.push(entry.clone());
            return Ok(());
        }
        let Some(mut log) = BoundedLog::new(self.capacity) else {
            return Err(ConfigError::ZeroRetention(self.capacity).into());
        };
        log.push(entry.clone());
        changes.insert(key.clone(), log);
        Ok(())
    }

    fn load(&self, key: &EntityKey) -> Result<Vec<ChangeLogEntry>> {
        Ok(self
            .changes
            .borrow()
            .get(key)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default())
    }
}
