//! Boundary logging macros
//!
//! Every public comparison operation is bracketed by `log_op_start!` and
//! either `log_op_end!` or `log_op_error!`. Temp artifacts get a debug event
//! per transition through `log_artifact!`. Field keys are listed in
//! `versus_core_types::schema`.

/// Log the start of an operation
///
/// ```
/// # use versus_core::log_op_start;
/// log_op_start!("compare", materialize = "all");
/// log_op_start!("value_diffs", comparison_id = "0190");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = versus_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = versus_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use versus_core::log_op_end;
/// log_op_end!("close", duration_ms = 2, comparison_id = "0190", dropped = 7u64);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = versus_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = versus_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log a failed operation
///
/// Accepts anything convertible into `ExError`. Besides the stable kind and
/// code, the side label and column the error names are recorded when
/// present.
///
/// ```
/// # use versus_core::log_op_error;
/// # use versus_core::errors::ComparisonError;
/// let err = ComparisonError::DuplicateKey { side: "a".into(), sample: "id=1".into() };
/// log_op_error!("compare", err, duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = versus_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_side = ex_err.side(),
            err_column = ex_err.column(),
            $($field)*
        );
    }};
}

/// Log one temp artifact transition at debug level
///
/// `$event` is one of the `EVENT_ARTIFACT_*` names.
///
/// ```
/// # use versus_core::log_artifact;
/// # use versus_core_types::schema::EVENT_ARTIFACT_RECORDED;
/// # use versus_core_types::{ArtifactKind, ArtifactName};
/// let name = ArtifactName::generate("input_a");
/// log_artifact!(EVENT_ARTIFACT_RECORDED, name.as_str(), ArtifactKind::View);
/// ```
#[macro_export]
macro_rules! log_artifact {
    ($event:expr, $name:expr, $kind:expr) => {
        tracing::debug!(
            component = module_path!(),
            event = $event,
            artifact = $name,
            artifact_kind = ?$kind,
        );
    };
    ($event:expr, $name:expr, $kind:expr, $($field:tt)*) => {
        tracing::debug!(
            component = module_path!(),
            event = $event,
            artifact = $name,
            artifact_kind = ?$kind,
            $($field)*
        );
    };
}
