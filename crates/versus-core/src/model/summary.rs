//! Typed rows of the comparison summaries

use super::schema::ColumnType;
use serde::Serialize;

/// One row of `tables`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub table_name: String,
    /// Source description (table name, query text or "frame")
    pub display: String,
    pub nrow: u64,
    pub ncol: usize,
}

/// One row of `by`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ByColumn {
    pub column: String,
    pub type_a: ColumnType,
    pub type_b: ColumnType,
}

/// One row of `intersection`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntersectionRow {
    pub column: String,
    pub n_diffs: u64,
    pub type_a: ColumnType,
    pub type_b: ColumnType,
}

impl IntersectionRow {
    pub fn types_differ(&self) -> bool {
        self.type_a != self.type_b
    }
}

/// One row of `unmatched_cols`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedColumn {
    pub table_name: String,
    pub column: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// One row of `unmatched_rows`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedRowCount {
    pub table_name: String,
    pub n_unmatched: u64,
}

/// Existence flags returned by `summary()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub value_diffs: bool,
    pub unmatched_cols: bool,
    pub unmatched_rows: bool,
    pub type_diffs: bool,
}

impl Summary {
    /// True when the two inputs are indistinguishable
    pub fn is_identical(&self) -> bool {
        !(self.value_diffs || self.unmatched_cols || self.unmatched_rows || self.type_diffs)
    }
}
