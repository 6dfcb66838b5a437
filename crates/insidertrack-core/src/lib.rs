//! insidertrack core - snapshot model, identity and change detection
//!
//! This crate provides the pure parts of the tracker:
//! - Snapshot, transaction and metrics models matching the fetcher's documents
//! - Content-addressed transaction fingerprints
//! - The diff engine producing change reports
//! - A bounded FIFO log used for change-log retention
//! - Engine configuration, the error facility and the logging facility
//!
//! Persistence lives in `insidertrack-store`; orchestration in
//! `insidertrack-engine`.

pub mod config;
pub mod diff;
pub mod errors;
pub mod fingerprint;
pub mod logging_facility;
pub mod model;
pub mod retention;

#[doc(hidden)]
pub use insidertrack_core_types as core_types;

// Re-export commonly used types
pub use config::{EngineConfig, MetricsPolicy};
pub use diff::{diff, diff_with, ChangeKind, ChangeReport, DiffOptions};
pub use errors::{ExError, ExErrorKind, Result, Severity};
pub use fingerprint::{fingerprint, Fingerprint, Fingerprinter, Sha256Fingerprinter};
pub use model::{
    ChangeLogEntry, CompanyMetrics, EntityKey, Snapshot, Transaction, TransactionType,
};
pub use retention::BoundedLog;
