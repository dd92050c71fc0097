use std::collections::HashSet;

use crate::errors::{ComparisonError, Result};
use crate::model::{SideLabels, TableSchema, Value};

/// Normalize a user-supplied column list
///
/// `argument` names the parameter in the error (`by`, `columns`).
///
/// # Errors
/// Rejects an empty list, blank names and repeated names.
pub fn normalize_column_list<S: AsRef<str>>(argument: &str, columns: &[S]) -> Result<Vec<String>> {
    let invalid = |reason: String| ComparisonError::InvalidArgument {
        argument: argument.to_string(),
        reason,
    };

    if columns.is_empty() {
        return Err(invalid("must contain at least one column".to_string()));
    }

    let mut seen = HashSet::with_capacity(columns.len());
    let mut out = Vec::with_capacity(columns.len());
    for column in columns {
        let column = column.as_ref();
        if column.trim().is_empty() {
            return Err(invalid("must not contain blank column names".to_string()));
        }
        if !seen.insert(column) {
            return Err(invalid(format!("must not contain duplicates, got `{}` twice", column)));
        }
        out.push(column.to_string());
    }
    Ok(out)
}

/// Every key column must exist on the given side
///
/// # Errors
/// `MissingByColumn` listing the absent names in key order.
pub fn validate_by_exists(label: &str, schema: &TableSchema, by: &[String]) -> Result<()> {
    let missing: Vec<String> = by
        .iter()
        .filter(|column| !schema.contains(column))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ComparisonError::MissingByColumn {
            side: label.to_string(),
            columns: missing,
        })
    }
}

/// Shared columns must have identical declared types
///
/// Checked in side A column order; the first mismatch is reported.
///
/// # Errors
/// `TypeMismatch` for the first shared column whose types differ.
pub fn validate_type_compatibility(a: &TableSchema, b: &TableSchema) -> Result<()> {
    for field in a.fields() {
        if let Some(type_b) = b.column_type(&field.name) {
            if &field.column_type != type_b {
                return Err(ComparisonError::TypeMismatch {
                    column: field.name.clone(),
                    type_a: field.column_type.to_string(),
                    type_b: type_b.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Non-key columns present on both sides, in side A order
pub fn common_columns(a: &TableSchema, b: &TableSchema, by: &[String]) -> Vec<String> {
    a.column_names()
        .filter(|name| b.contains(name) && !by.iter().any(|k| k == name))
        .map(str::to_string)
        .collect()
}

/// Columns of `schema` absent from `other`, sorted by name
pub fn columns_only_in(schema: &TableSchema, other: &TableSchema) -> Vec<String> {
    let mut only: Vec<String> = schema
        .column_names()
        .filter(|name| !other.contains(name))
        .map(str::to_string)
        .collect();
    only.sort();
    only
}

/// Resolve a projection's column selection against the common columns
///
/// `None` selects every common column. The result follows common-column
/// order regardless of the order requested.
///
/// # Errors
/// `InvalidArgument` for an empty, blank or repeated selection and
/// `UnknownColumn` for names outside the common columns.
pub fn resolve_selection<S: AsRef<str>>(
    requested: Option<&[S]>,
    common: &[String],
) -> Result<Vec<String>> {
    let Some(requested) = requested else {
        return Ok(common.to_vec());
    };

    let requested = normalize_column_list("columns", requested)?;
    let unknown: Vec<String> = requested
        .iter()
        .filter(|name| !common.contains(name))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ComparisonError::UnknownColumn { columns: unknown });
    }

    Ok(common
        .iter()
        .filter(|name| requested.contains(name))
        .cloned()
        .collect())
}

/// The single column accepted by a single-column operation
///
/// # Errors
/// `NotSingleColumn` unless exactly one column is given.
pub fn single_column<'a, S: AsRef<str>>(op: &str, columns: &'a [S]) -> Result<&'a str> {
    match columns {
        [only] => Ok(only.as_ref()),
        _ => Err(ComparisonError::NotSingleColumn {
            op: op.to_string(),
            count: columns.len(),
        }),
    }
}

/// `column` must be one of the comparable columns
///
/// # Errors
/// `UnknownColumn` otherwise.
pub fn ensure_common_column(column: &str, common: &[String]) -> Result<()> {
    if common.iter().any(|c| c == column) {
        Ok(())
    } else {
        Err(ComparisonError::UnknownColumn {
            columns: vec![column.to_string()],
        })
    }
}

/// Suffix pair for wide weaves, defaulting to `_<label>`
///
/// # Errors
/// `InvalidArgument` for blank or identical suffixes.
pub fn resolve_suffix(suffix: Option<(&str, &str)>, labels: &SideLabels) -> Result<(String, String)> {
    let (a, b) = match suffix {
        Some((a, b)) => (a.to_string(), b.to_string()),
        None => (format!("_{}", labels.a()), format!("_{}", labels.b())),
    };
    let invalid = |reason: &str| ComparisonError::InvalidArgument {
        argument: "suffix".to_string(),
        reason: reason.to_string(),
    };
    if a.is_empty() || b.is_empty() {
        return Err(invalid("must be two non-empty strings"));
    }
    if a == b {
        return Err(invalid("entries must be distinct"));
    }
    Ok((a, b))
}

/// Suffixed names of a wide weave must not meet any other output column
///
/// Any selected column may end up split, so the check covers every
/// selected column whether or not it differs.
///
/// # Errors
/// `InvalidArgument` naming the first suffixed name already taken by a key,
/// a common column or another suffixed name.
pub fn ensure_distinct_wide_names(
    by: &[String],
    common: &[String],
    selected: &[String],
    suffix_a: &str,
    suffix_b: &str,
) -> Result<()> {
    let mut taken: HashSet<String> = by.iter().chain(common).cloned().collect();
    for column in selected {
        for suffix in [suffix_a, suffix_b] {
            let name = format!("{}{}", column, suffix);
            if !taken.insert(name.clone()) {
                return Err(ComparisonError::InvalidArgument {
                    argument: "suffix".to_string(),
                    reason: format!("turns `{}` into `{}`, which is already an output column", column, name),
                });
            }
        }
    }
    Ok(())
}

/// Render a key tuple as `col=value, ...` for error messages
pub fn format_key_sample(by: &[String], values: &[Value]) -> String {
    by.iter()
        .zip(values)
        .map(|(column, value)| format!("{}={}", column, value))
        .collect::<Vec<_>>()
        .join(", ")
}
