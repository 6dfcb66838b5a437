use super::atomic::atomic_write;
use super::layout::Layout;
use crate::errors::{corrupt_document, encode_failed, history_missing, io_error, Result};
use crate::traits::{history_id, history_id_with_suffix, history_sort_key, HistoryStore};
use chrono::{DateTime, Utc};
use insidertrack_core::{EntityKey, Snapshot};
use std::io::ErrorKind;

/// `history/<key>/<id>.json`, write-once
#[derive(Debug, Clone)]
pub struct FsHistoryStore {
    layout: Layout,
}

impl FsHistoryStore {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl HistoryStore for FsHistoryStore {
    fn append(&self, key: &EntityKey, snapshot: &Snapshot, at: DateTime<Utc>) -> Result<String> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| encode_failed("append_history", key, e))?;
        let base = history_id(at);

        let mut suffix = 0usize;
        loop {
            let id = if suffix == 0 {
                base.clone()
            } else {
                history_id_with_suffix(&base, suffix)
            };
            let path = self.layout.history_path(key, &id);

            match std::fs::read(&path) {
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    atomic_write(&path, &bytes).map_err(|e| e.with_entity_key(key.as_str()))?;
                    return Ok(id);
                }
                Err(e) => {
                    return Err(io_error("append_history", e).with_entity_key(key.as_str()));
                }
                // Same content already recorded: idempotent
                Ok(existing) if existing == bytes => {
                    tracing::debug!(entity_key = %key, history_id = %id, "History record already present");
                    return Ok(id);
                }
                Ok(_) => suffix += 1,
            }
        }
    }

    fn list(&self, key: &EntityKey) -> Result<Vec<String>> {
        let dir = self.layout.history_dir(key);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("list_history", e).with_entity_key(key.as_str())),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("list_history", e))?;
            let name = entry.file_name();
            if let Some(id) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                ids.push(id.to_string());
            }
        }
        ids.sort_by(|a, b| history_sort_key(a).cmp(&history_sort_key(b)));
        Ok(ids)
    }

    fn read(&self, key: &EntityKey, id: &str) -> Result<Snapshot> {
        // Ids are file stems; anything path-like cannot name a record
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(history_missing(key, id));
        }
        let bytes = match std::fs::read(self.layout.history_path(key, id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(history_missing(key, id)),
            Err(e) => return Err(io_error("read_history", e).with_entity_key(key.as_str())),
        };
        serde_json::from_slice(&bytes).map_err(|e| corrupt_document("read_history", key, e))
    }
}
