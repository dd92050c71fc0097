//! Projection results

use super::schema::Field;
use super::value::Value;
use serde::Serialize;

/// A materialized relation: declared schema plus rows
///
/// The schema is always supplied by the producer, so a relation with zero
/// rows still describes its columns and their types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    schema: Vec<Field>,
    rows: Vec<Vec<Value>>,
}

impl Relation {
    pub fn new(schema: Vec<Field>, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    pub fn empty(schema: Vec<Field>) -> Self {
        Self::new(schema, Vec::new())
    }

    pub fn schema(&self) -> &[Field] {
        &self.schema
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.schema.iter().position(|f| f.name == name)
    }

    /// All values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.schema
                    .iter()
                    .zip(row)
                    .map(|(field, value)| {
                        let json = serde_json::to_value(value).unwrap_or(serde_json::Value::Null);
                        (field.name.clone(), json)
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    fn sample() -> Relation {
        Relation::new(
            vec![
                Field::new("id", ColumnType::integer()),
                Field::new("value", ColumnType::text()),
            ],
            vec![
                vec![Value::from(1), Value::from("x")],
                vec![Value::from(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_column_access() {
        let rel = sample();
        assert_eq!(rel.column_names(), ["id", "value"]);
        assert_eq!(
            rel.column("value").unwrap(),
            vec![&Value::from("x"), &Value::Null]
        );
        assert!(rel.column("nope").is_none());
    }

    #[test]
    fn test_empty_keeps_schema() {
        let rel = Relation::empty(sample().schema().to_vec());
        assert!(rel.is_empty());
        assert_eq!(rel.column_names(), ["id", "value"]);
    }

    #[test]
    fn test_records() {
        let records = sample().to_records();
        assert_eq!(records[0]["id"], serde_json::json!(1));
        assert_eq!(records[1]["value"], serde_json::Value::Null);
    }
}
