use super::atomic::atomic_write;
use super::layout::Layout;
use crate::errors::{corrupt_document, encode_failed, io_error, Result};
use crate::traits::ChangeLogStore;
use insidertrack_core::errors::ConfigError;
use insidertrack_core::{BoundedLog, ChangeLogEntry, EntityKey};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;

/// On-disk shape of `changes/<key>_changes.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogDocument {
    pub company: String,
    #[serde(default)]
    pub changes: Vec<ChangeLogEntry>,
}

/// Change-log files holding at most `capacity` entries each
#[derive(Debug, Clone)]
pub struct FsChangeLogStore {
    layout: Layout,
    capacity: usize,
}

impl FsChangeLogStore {
    pub fn new(layout: Layout, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(ConfigError::ZeroRetention(capacity).into());
        }
        Ok(Self { layout, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn read_document(&self, key: &EntityKey, op: &str) -> Result<Option<ChangeLogDocument>> {
        let bytes = match std::fs::read(self.layout.changes_path(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(op, e).with_entity_key(key.as_str())),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| corrupt_document(op, key, e))
    }
}

impl ChangeLogStore for FsChangeLogStore {
    fn append(&self, key: &EntityKey, entry: &ChangeLogEntry) -> Result<()> {
        let existing = self
            .read_document(key, "append_change")?
            .map(|doc| doc.changes)
            .unwrap_or_default();

        let Some(mut log) = BoundedLog::from_vec(self.capacity, existing) else {
            return Err(ConfigError::ZeroRetention(self.capacity).into());
        };
        if log.push(entry.clone()).is_some() {
            tracing::debug!(entity_key = %key, capacity = self.capacity, "Evicted oldest change-log entry");
        }

        let document = ChangeLogDocument {
            company: key.to_string(),
            changes: log.into_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&document)
            .map_err(|e| encode_failed("append_change", key, e))?;
        atomic_write(&self.layout.changes_path(key), &bytes)
            .map_err(|e| e.with_entity_key(key.as_str()))
    }

    fn load(&self, key: &EntityKey) -> Result<Vec<ChangeLogEntry>> {
        Ok(self
            .read_document(key, "load_changes")?
            .map(|doc| doc.changes)
            .unwrap_or_default())
    }
}
