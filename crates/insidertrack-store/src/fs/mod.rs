//! Filesystem-backed stores.
//!
//! Layout under the data directory:
//!
//! ```text
//! current/<key>.json                  one live snapshot per entity
//! history/<key>/<YYYY-MM-DD_HH-MM-SS>.json
//! changes/<key>_changes.json          {"company": key, "changes": [...]}
//! ```
//!
//! Every file write goes through [`atomic::atomic_write`].

pub mod atomic;
mod changelog;
mod current;
mod history;
mod layout;

pub use changelog::{ChangeLogDocument, FsChangeLogStore};
pub use current::FsSnapshotStore;
pub use history::FsHistoryStore;
pub use layout::Layout;

use crate::errors::{io_error, Result};
use insidertrack_core::EngineConfig;
use std::path::Path;

/// The three filesystem stores sharing one data directory
#[derive(Debug, Clone)]
pub struct FsStores {
    pub current: FsSnapshotStore,
    pub history: FsHistoryStore,
    pub changes: FsChangeLogStore,
}

impl FsStores {
    /// Open (creating if needed) the stores rooted at `config.data_dir`
    pub fn open(config: &EngineConfig) -> Result<Self> {
        Self::open_at(&config.data_dir, config.max_change_history)
    }

    pub fn open_at(data_dir: &Path, max_change_history: usize) -> Result<Self> {
        let layout = Layout::new(data_dir);
        for dir in [layout.current_dir(), layout.history_root(), layout.changes_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| io_error("create_data_dir", e))?;
        }
        tracing::debug!(data_dir = %data_dir.display(), "Opened filesystem stores");

        Ok(Self {
            current: FsSnapshotStore::new(layout.clone()),
            history: FsHistoryStore::new(layout.clone()),
            changes: FsChangeLogStore::new(layout, max_change_history)?,
        })
    }
}
