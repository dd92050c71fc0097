//! Versus Core - engine-free kernel of the relational diff
//!
//! This crate provides the parts of a two-table comparison that do not need
//! a live SQL connection:
//! - Error facility (`ComparisonError`, `ExError`, stable error codes)
//! - Structured logging facility and boundary macros
//! - Typed schema descriptor, value and relation model, comparison options
//! - Argument validation rules (keys, labels, column selections, suffixes)
//! - A typed query plan rendered to SQLite text as a final step
//! - Diff plan builders (key joins, NULL-aware diff predicates, anti-joins)

pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod plan;
pub mod rules;

// Re-export commonly used types
pub use errors::{ComparisonError, ExError, ExErrorKind, Result};
pub use model::{
    ColumnType, CompareOptions, Field, Materialize, Relation, Side, SideLabels, TableSchema,
    Value,
};
