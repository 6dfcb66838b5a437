//! insidertrack engine - commit orchestration
//!
//! Sequences the diff engine and the three stores for one entity at a time,
//! and aggregates per-entity outcomes for a whole run.

pub mod commands;

pub use commands::commit::{Clock, CommitOutcome, Coordinator, FixedClock, SystemClock};
pub use commands::run::{EntityOutcome, RunSummary};
