//! Snapshot diff engine.
//!
//! Compares the previously stored snapshot of an entity (if any) with a new
//! capture and produces a [`ChangeReport`].
//!
//! ```ignore
//! use insidertrack_core::diff::diff;
//!
//! let report = diff(previous.as_ref(), &current);
//! if report.changed { /* record history */ }
//! ```
//!
//! ## Guarantees
//!
//! - **Set semantics**: transaction order never affects the result.
//! - **Content identity**: transactions are matched by [`crate::fingerprint`]
//!   only, so edits to non-identity fields never appear as add/remove pairs.
//! - **Purity**: inputs are borrowed immutably; no I/O.

pub mod engine;
pub mod model;

pub use engine::{diff, diff_with, DiffOptions};
pub use model::{ChangeKind, ChangeReport};
