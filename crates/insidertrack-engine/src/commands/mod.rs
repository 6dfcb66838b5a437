//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! The engine owns lifecycle logging for commits:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

pub mod commit;
pub mod queries;
pub mod run;
