//! Input sources
//!
//! A source is whatever the caller hands to `compare` for one side: a table
//! already on the connection, a SELECT statement, or an in-memory frame.

use versus_core::errors::{ComparisonError, Result};
use versus_core::plan::quote_ident;
use versus_core::{ColumnType, Field, TableSchema, Value};

/// One side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Existing table or view, by name
    Table(String),
    /// SELECT (or WITH ... SELECT) statement
    Query(String),
    /// In-memory rows loaded into a private temp table
    Frame(Frame),
}

impl Source {
    pub fn table(name: impl Into<String>) -> Self {
        Source::Table(name.into())
    }

    pub fn query(sql: impl Into<String>) -> Self {
        Source::Query(sql.into())
    }

    /// Guess from text: statements starting with SELECT or WITH are queries
    pub fn parse(text: &str) -> Self {
        let head = text.trim_start().to_ascii_uppercase();
        if head.starts_with("SELECT") || head.starts_with("WITH") {
            Source::query(text)
        } else {
            Source::table(text)
        }
    }

    /// User-facing description
    pub fn display(&self) -> String {
        match self {
            Source::Table(name) => name.clone(),
            Source::Query(sql) => sql.trim().to_string(),
            Source::Frame(frame) => format!("frame ({} rows)", frame.len()),
        }
    }

    /// SELECT text producing the source's rows
    ///
    /// Frames have no text of their own until loaded; pass the table they
    /// were loaded into.
    pub fn select_sql(&self, frame_table: Option<&str>) -> Option<String> {
        match self {
            Source::Table(name) => Some(format!("SELECT * FROM {}", quote_ident(name))),
            Source::Query(sql) => Some(sql.trim().trim_end_matches(';').trim_end().to_string()),
            Source::Frame(_) => {
                frame_table.map(|table| format!("SELECT * FROM temp.{}", quote_ident(table)))
            }
        }
    }
}

impl From<Frame> for Source {
    fn from(frame: Frame) -> Self {
        Source::Frame(frame)
    }
}

/// In-memory table: typed columns plus rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Frame with `(name, declared type)` columns; an empty type means ANY
    pub fn new(columns: &[(&str, &str)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, ty)| Field::new(*name, ColumnType::new(ty)))
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_fields(columns: Vec<Field>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn push_row(&mut self, values: Vec<Value>) {
        self.rows.push(values);
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check column names and row arity before loading
    ///
    /// # Errors
    /// `DuplicateColumn` for repeated names, `InvalidArgument` for a row
    /// whose length differs from the column count.
    pub fn validate(&self, label: &str) -> Result<TableSchema> {
        let schema = TableSchema::new(label, self.columns.clone())?;
        if let Some((idx, row)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
        {
            return Err(ComparisonError::InvalidArgument {
                argument: label.to_string(),
                reason: format!(
                    "row {} has {} values, expected {}",
                    idx,
                    row.len(),
                    self.columns.len()
                ),
            });
        }
        Ok(schema)
    }

    /// Column definitions for CREATE TABLE
    ///
    /// ANY columns get no declared type so SQLite applies no affinity.
    pub fn column_defs(&self) -> String {
        self.columns
            .iter()
            .map(|f| {
                if f.column_type.as_str() == ColumnType::ANY {
                    quote_ident(&f.name)
                } else {
                    format!("{} {}", quote_ident(&f.name), f.column_type)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
