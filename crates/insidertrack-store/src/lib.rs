//! insidertrack store - persistence for current snapshots, history and change logs
//!
//! Provides:
//! - Store traits keyed by entity ([`SnapshotStore`], [`HistoryStore`], [`ChangeLogStore`])
//! - Filesystem implementations with atomic temp→rename writes ([`fs`])
//! - In-memory implementations for embedding and tests ([`memory`])

pub mod errors;
pub mod fs;
pub mod memory;
pub mod traits;

pub use errors::Result;
pub use fs::FsStores;
pub use memory::MemoryStores;
pub use traits::{ChangeLogStore, HistoryStore, SnapshotStore};
