//! Domain model of a two-table comparison
//!
//! - `value` / `relation`: cell values and projection results
//! - `schema`: typed schema descriptor computed once per input
//! - `side`: validated side labels and side identity
//! - `options`: comparison configuration
//! - `summary`: typed rows of the summary tables

pub mod options;
pub mod relation;
pub mod schema;
pub mod side;
pub mod summary;
pub mod value;

pub use options::{CompareOptions, Materialize};
pub use relation::Relation;
pub use schema::{ColumnType, Field, TableSchema};
pub use side::{Side, SideLabels};
pub use summary::{
    ByColumn, IntersectionRow, Summary, TableSummary, UnmatchedColumn, UnmatchedRowCount,
};
pub use value::Value;
