//! Input registration and validation
//!
//! Each source is wrapped in a uniquely named temp view, described once
//! into a `TableSchema` and row-counted once. The key columns are then
//! checked for existence, type compatibility (when coercion is off) and
//! uniqueness on both sides.

use std::collections::BTreeSet;

use crate::lifecycle::ArtifactLedger;
use versus_core::diff::DiffPlans;
use versus_core::errors::{ComparisonError, ExError};
use versus_core::rules::validation;
use versus_core::{Side, SideLabels, TableSchema};
use versus_core_types::{ArtifactKind, ArtifactName};
use versus_store::{Source, Substrate};

type Result<T> = std::result::Result<T, ExError>;

/// One registered input
#[derive(Debug, Clone)]
pub struct TableHandle {
    /// Temp view wrapping the source
    pub view: ArtifactName,
    pub label: String,
    /// User-facing description of the source
    pub display: String,
    pub schema: TableSchema,
    pub nrow: u64,
}

/// Register `source` as the input labelled `label`
///
/// Every artifact created is recorded in `ledger` before the next step
/// runs, so a failure part way leaves nothing unaccounted for.
pub fn register<S: Substrate + ?Sized>(
    substrate: &S,
    ledger: &mut ArtifactLedger,
    label: &str,
    source: &Source,
) -> Result<TableHandle> {
    let sql = match source {
        Source::Frame(frame) => {
            frame.validate(label)?;
            let table = ArtifactName::generate(&format!("frame_{}", label));
            ledger.record(table.clone(), ArtifactKind::Table);
            substrate.load_frame(table.as_str(), frame)?;
            source.select_sql(Some(table.as_str()))
        }
        _ => source.select_sql(None),
    }
    .ok_or_else(|| {
        ExError::from(ComparisonError::InvalidArgument {
            argument: label.to_string(),
            reason: "source could not be expressed as a query".to_string(),
        })
    })?;

    ensure_unique_names(label, &substrate.column_names(&sql)?)?;

    let view = ArtifactName::generate(&format!("input_{}", label));
    ledger.record(view.clone(), ArtifactKind::View);
    substrate.create_view(view.as_str(), &sql)?;

    let schema = TableSchema::new(label, substrate.describe(view.as_str())?)?;
    let nrow = match source {
        Source::Frame(frame) => frame.len() as u64,
        _ => substrate.count(view.as_str())?,
    };
    tracing::debug!(side = label, view = view.as_str(), nrow, "input registered");

    Ok(TableHandle {
        view,
        label: label.to_string(),
        display: source.display(),
        schema,
        nrow,
    })
}

fn ensure_unique_names(label: &str, names: &[String]) -> Result<()> {
    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<String> = names
        .iter()
        .filter(|name| !seen.insert(name.as_str()))
        .cloned()
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ComparisonError::DuplicateColumn {
            label: label.to_string(),
            columns: duplicates.into_iter().collect(),
        }
        .into())
    }
}

/// Key existence, type compatibility and key uniqueness checks
pub fn validate_inputs<S: Substrate + ?Sized>(
    substrate: &S,
    handles: &[TableHandle; 2],
    labels: &SideLabels,
    by: &[String],
    coerce: bool,
    plans: &DiffPlans,
) -> Result<()> {
    for side in Side::BOTH {
        let handle = &handles[side.index()];
        validation::validate_by_exists(labels.label(side), &handle.schema, by)?;
    }

    if !coerce {
        validation::validate_type_compatibility(&handles[0].schema, &handles[1].schema)?;
    }

    for side in Side::BOTH {
        let duplicates = plans.duplicate_key_query(side);
        if let Some(row) = substrate.query(&duplicates)?.into_iter().next() {
            return Err(ComparisonError::DuplicateKey {
                side: labels.label(side).to_string(),
                sample: validation::format_key_sample(by, &row),
            }
            .into());
        }
    }
    Ok(())
}
