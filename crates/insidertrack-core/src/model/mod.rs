//! Data model for captured insider-trading disclosures.
//!
//! All types derive serde so snapshots round-trip through the on-disk JSON
//! documents unchanged.

pub mod amount;
pub mod change_log;
pub mod entity_key;
pub mod metrics;
pub mod snapshot;
pub mod transaction;

pub use amount::{parse_amount, Amount};
pub use change_log::{ChangeDetails, ChangeLogEntry};
pub use entity_key::EntityKey;
pub use metrics::CompanyMetrics;
pub use snapshot::Snapshot;
pub use transaction::{Transaction, TransactionType};
