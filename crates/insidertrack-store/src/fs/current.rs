use super::atomic::atomic_write;
use super::layout::Layout;
use crate::errors::{corrupt_document, encode_failed, io_error, Result};
use crate::traits::SnapshotStore;
use insidertrack_core::{EntityKey, Snapshot};
use std::io::ErrorKind;

/// `current/<key>.json`, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    layout: Layout,
}

impl FsSnapshotStore {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self, key: &EntityKey) -> Result<Option<Snapshot>> {
        let path = self.layout.current_path(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("load_current", e).with_entity_key(key.as_str())),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| corrupt_document("load_current", key, e))
    }

    fn save(&self, key: &EntityKey, snapshot: &Snapshot) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|e| encode_failed("save_current", key, e))?;
        atomic_write(&self.layout.current_path(key), &bytes)
            .map_err(|e| e.with_entity_key(key.as_str()))
    }
}
