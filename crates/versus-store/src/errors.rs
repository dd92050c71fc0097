//! Error handling for versus-store
//!
//! Wraps versus-core ExError with substrate-specific helpers

use versus_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an engine error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Engine)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Engine error carrying the failing operation
pub fn engine_error(op: &str, err: rusqlite::Error) -> ExError {
    from_rusqlite(err).with_op(op)
}
