//! Operation boundary macros
//!
//! A migrate cycle logs one `start` and one `end` (or `end_error`) per
//! operation. All three public macros expand through `__log_op!`, which
//! stamps `component`, `op` and `event` ahead of any caller fields.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)+)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::__schema::$event
            $(, $($field)+)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use sqlstep_core::log_op_start;
/// log_op_start!("migrate_run");
/// log_op_start!("apply_migration", version = "0001");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        $crate::__log_op!(info, $op, EVENT_START $(, $($field)+)?)
    };
}

/// Log the successful end of an operation; `duration_ms` is required
///
/// ```
/// # use sqlstep_core::log_op_end;
/// log_op_end!("apply_migration", duration_ms = 12, version = "0001");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        $crate::__log_op!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)+)?)
    };
}

/// Log a failed operation
///
/// `$err` is anything convertible into `SsError`; its kind and stable code
/// become `err.kind` and `err.code`.
///
/// ```
/// # use sqlstep_core::{log_op_error, MigrateError};
/// let err = MigrateError::DuplicateVersion { version: "0001".to_string() };
/// log_op_error!("apply_migration", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ss_err: $crate::errors::SsError = $err.into();
        $crate::__log_op!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ss_err.kind(),
            err.code = ss_err.code(),
            message = ss_err.message()
            $(, $($field)+)?
        )
    }};
}
