//! Canonical logging macros
//!
//! Every engine operation logs one `start` event and exactly one of `end`
//! or `end_error`. Extra fields are passed through in `tracing` syntax.

/// Log the start of an operation
///
/// ```
/// # use insidertrack_core::log_op_start;
/// log_op_start!("commit");
/// log_op_start!("commit", entity_key = "afry-ab");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use insidertrack_core::log_op_end;
/// log_op_end!("commit", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Warning-severity errors (partial commits) are emitted at WARN, everything
/// else at ERROR.
///
/// ```
/// # use insidertrack_core::log_op_error;
/// # use insidertrack_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Io);
/// log_op_error!("commit", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: &$crate::errors::ExError = &$err;
        if ex_err.severity() == $crate::errors::Severity::Warning {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                $($field)*
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?ex_err.kind(),
                err_code = ex_err.code(),
                $($field)*
            );
        }
    }};
}
