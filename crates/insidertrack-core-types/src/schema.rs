//! Canonical schema constants for structured logging and events
//!
//! `tracing` macros take field names as identifiers, so emitters spell these
//! out literally; readers of captured events look fields up through these
//! constants.

// Lifecycle fields written by the log_op_* macros
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_ERR_CODE: &str = "err_code";

// Commit fields
pub const FIELD_ENTITY_KEY: &str = "entity_key";
pub const FIELD_RUN_ID: &str = "run_id";
pub const FIELD_CHANGED: &str = "changed";
pub const FIELD_NEW_COUNT: &str = "new_count";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
