//! Typed schema descriptor
//!
//! Computed once when an input is registered and treated as immutable data
//! afterwards. Projections derive their output schema from these descriptors
//! instead of introspecting query results.

use crate::errors::{ComparisonError, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Declared column type, upper-cased; `ANY` when no type was declared
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ColumnType(String);

impl ColumnType {
    pub const ANY: &'static str = "ANY";

    pub fn new(declared: &str) -> Self {
        let trimmed = declared.trim();
        if trimmed.is_empty() {
            Self(Self::ANY.to_string())
        } else {
            Self(trimmed.to_ascii_uppercase())
        }
    }

    pub fn any() -> Self {
        Self::new(Self::ANY)
    }

    pub fn text() -> Self {
        Self::new("TEXT")
    }

    pub fn integer() -> Self {
        Self::new("INTEGER")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Field {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered field list plus name lookup
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl TableSchema {
    /// Build a schema, rejecting duplicate column names
    ///
    /// `label` names the owning input in the error.
    pub fn new(label: &str, fields: Vec<Field>) -> Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        let mut duplicates = BTreeSet::new();
        for (pos, field) in fields.iter().enumerate() {
            if index.insert(field.name.clone(), pos).is_some() {
                duplicates.insert(field.name.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(ComparisonError::DuplicateColumn {
                label: label.to_string(),
                columns: duplicates.into_iter().collect(),
            });
        }
        Ok(Self { fields, index })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&pos| &self.fields[pos])
    }

    pub fn column_type(&self, name: &str) -> Option<&ColumnType> {
        self.field(name).map(|f| &f.column_type)
    }

    /// Fields for `names`, in the given order; unknown names are skipped
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Vec<Field> {
        names
            .iter()
            .filter_map(|n| self.field(n.as_ref()).cloned())
            .collect()
    }
}
