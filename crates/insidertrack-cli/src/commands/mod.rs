pub mod commit;
pub mod inspect;
pub mod list;
pub mod run;

use insidertrack_core::EntityKey;
use insidertrack_engine::Coordinator;
use insidertrack_store::fs::{FsChangeLogStore, FsHistoryStore, FsSnapshotStore};

use crate::config::CliConfig;

pub type FsCoordinator = Coordinator<FsSnapshotStore, FsHistoryStore, FsChangeLogStore>;

pub fn open_coordinator(config: &CliConfig) -> Result<FsCoordinator, Box<dyn std::error::Error>> {
    Ok(Coordinator::open(&config.engine)?)
}

pub fn parse_key(slug: &str) -> Result<EntityKey, Box<dyn std::error::Error>> {
    Ok(EntityKey::new(slug)?)
}
