use thiserror::Error;

/// Result type alias using ComparisonError
pub type Result<T> = std::result::Result<T, ComparisonError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the comparison layers is classified into one of
/// these kinds. Each kind maps to a stable code usable by tests, the CLI and
/// any outer API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Argument validation
    InvalidArgument,
    DuplicateColumn,
    MissingColumn,

    // Input integrity
    DuplicateKey,
    TypeMismatch,

    // Selection
    UnknownSide,
    UnknownColumn,

    // Lifecycle
    /// The comparison was closed and its artifacts released
    Closed,

    // Substrate
    /// The embedded SQL engine rejected or failed a statement
    Engine,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ExErrorKind::DuplicateColumn => "ERR_DUPLICATE_COLUMN",
            ExErrorKind::MissingColumn => "ERR_MISSING_COLUMN",
            ExErrorKind::DuplicateKey => "ERR_DUPLICATE_KEY",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::UnknownSide => "ERR_UNKNOWN_SIDE",
            ExErrorKind::UnknownColumn => "ERR_UNKNOWN_COLUMN",
            ExErrorKind::Closed => "ERR_CLOSED",
            ExErrorKind::Engine => "ERR_ENGINE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds raised by input or state validation, as opposed to
    /// substrate and internal failures
    pub fn is_comparison_error(&self) -> bool {
        !matches!(self, ExErrorKind::Engine | ExErrorKind::Internal)
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context (operation, side label,
/// column) for programmatic handling and debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    side: Option<String>,
    column: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            side: None,
            column: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add side label context
    pub fn with_side(mut self, side: impl Into<String>) -> Self {
        self.side = Some(side.into());
        self
    }

    /// Add column context
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the side label context, if any
    pub fn side(&self) -> Option<&str> {
        self.side.as_deref()
    }

    /// Get the column context, if any
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(side) = &self.side {
            write!(f, " (side: {})", side)?;
        }
        if let Some(column) = &self.column {
            write!(f, " (column: {})", column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Invalid-input and invalid-state failures of a comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// Malformed argument (arity, blanks, duplicates, empty selection)
    #[error("`{argument}` {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// A source exposes the same column name more than once
    #[error("`{label}` has duplicate column names: {}", .columns.join(", "))]
    DuplicateColumn { label: String, columns: Vec<String> },

    /// Key columns absent from one side
    #[error("`by` columns not found in `{side}`: {}", .columns.join(", "))]
    MissingByColumn { side: String, columns: Vec<String> },

    /// A side holds more than one row for a key tuple
    #[error("`{side}` has more than one row for by values ({sample})")]
    DuplicateKey { side: String, sample: String },

    /// Shared column with differing declared types under `coerce = false`
    #[error(
        "`coerce = false` requires compatible types. Column `{column}` has types `{type_a}` vs `{type_b}`"
    )]
    TypeMismatch {
        column: String,
        type_a: String,
        type_b: String,
    },

    /// Side identifier not among the configured labels
    #[error("`table` must be one of: {}", .allowed.join(", "))]
    UnknownSide { side: String, allowed: Vec<String> },

    /// Column outside the comparable (common, non-key) columns
    #[error("Columns not part of the comparison: {}", .columns.join(", "))]
    UnknownColumn { columns: Vec<String> },

    /// A single-column operation received several columns
    #[error("`{op}` accepts exactly one column, got {count}")]
    NotSingleColumn { op: String, count: usize },

    /// Operation attempted after `close()`
    #[error("Comparison is closed")]
    Closed,
}

/// Conversion from ComparisonError to ExError
impl From<ComparisonError> for ExError {
    fn from(err: ComparisonError) -> Self {
        let message = err.to_string();
        match err {
            ComparisonError::InvalidArgument { argument, .. } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_op(format!("validate_{}", argument))
                    .with_message(message)
            }
            ComparisonError::DuplicateColumn { label, .. } => {
                ExError::new(ExErrorKind::DuplicateColumn)
                    .with_side(label)
                    .with_message(message)
            }
            ComparisonError::MissingByColumn { side, columns } => {
                let mut ex = ExError::new(ExErrorKind::MissingColumn)
                    .with_side(side)
                    .with_message(message);
                if let Some(first) = columns.into_iter().next() {
                    ex = ex.with_column(first);
                }
                ex
            }
            ComparisonError::DuplicateKey { side, .. } => ExError::new(ExErrorKind::DuplicateKey)
                .with_op("ensure_unique_by")
                .with_side(side)
                .with_message(message),
            ComparisonError::TypeMismatch { column, .. } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_column(column)
                    .with_message(message)
            }
            ComparisonError::UnknownSide { side, .. } => ExError::new(ExErrorKind::UnknownSide)
                .with_side(side)
                .with_message(message),
            ComparisonError::UnknownColumn { columns } => {
                let mut ex = ExError::new(ExErrorKind::UnknownColumn).with_message(message);
                if let Some(first) = columns.into_iter().next() {
                    ex = ex.with_column(first);
                }
                ex
            }
            ComparisonError::NotSingleColumn { op, .. } => {
                ExError::new(ExErrorKind::InvalidArgument)
                    .with_op(op)
                    .with_message(message)
            }
            ComparisonError::Closed => ExError::new(ExErrorKind::Closed).with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidArgument,
            ExErrorKind::DuplicateColumn,
            ExErrorKind::MissingColumn,
            ExErrorKind::DuplicateKey,
            ExErrorKind::TypeMismatch,
            ExErrorKind::UnknownSide,
            ExErrorKind::UnknownColumn,
            ExErrorKind::Closed,
            ExErrorKind::Engine,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::UnknownColumn)
            .with_op("value_diffs")
            .with_column("wind")
            .with_message("no such column");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_UNKNOWN_COLUMN]"));
        assert!(text.contains("value_diffs"));
        assert!(text.contains("(column: wind)"));
    }

    #[test]
    fn test_engine_kind_is_not_a_comparison_error() {
        assert!(!ExErrorKind::Engine.is_comparison_error());
        assert!(ExErrorKind::DuplicateKey.is_comparison_error());
    }
}
