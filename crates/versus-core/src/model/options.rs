//! Comparison configuration

use super::side::SideLabels;
use crate::errors::{ComparisonError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How much of the diff state is persisted as temporary tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Materialize {
    /// Key sets and summaries are persisted at construction
    #[default]
    All,
    /// Only the summary tables are persisted; key sets are inline
    Summary,
    /// Nothing is persisted; summaries are memoized in process
    None,
}

impl Materialize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Materialize::All => "all",
            Materialize::Summary => "summary",
            Materialize::None => "none",
        }
    }

    pub fn persists_key_sets(&self) -> bool {
        matches!(self, Materialize::All)
    }

    pub fn persists_summaries(&self) -> bool {
        !matches!(self, Materialize::None)
    }
}

impl fmt::Display for Materialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Materialize {
    type Err = ComparisonError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "all" => Ok(Materialize::All),
            "summary" => Ok(Materialize::Summary),
            "none" => Ok(Materialize::None),
            other => Err(ComparisonError::InvalidArgument {
                argument: "materialize".to_string(),
                reason: format!("must be one of all, summary, none; got `{}`", other),
            }),
        }
    }
}

/// Options accepted by `compare`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Two NULLs compare equal when true
    pub allow_both_na: bool,
    /// Skip the declared-type compatibility check when true
    pub coerce: bool,
    /// Labels for side A and side B; validated at `compare`
    pub side_labels: (String, String),
    pub materialize: Materialize,
}

impl CompareOptions {
    pub fn allow_both_na(mut self, allow: bool) -> Self {
        self.allow_both_na = allow;
        self
    }

    pub fn coerce(mut self, coerce: bool) -> Self {
        self.coerce = coerce;
        self
    }

    pub fn side_labels(mut self, a: impl Into<String>, b: impl Into<String>) -> Self {
        self.side_labels = (a.into(), b.into());
        self
    }

    pub fn materialize(mut self, materialize: Materialize) -> Self {
        self.materialize = materialize;
        self
    }

    pub fn labels(&self) -> Result<SideLabels> {
        SideLabels::new(self.side_labels.0.clone(), self.side_labels.1.clone())
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            allow_both_na: true,
            coerce: true,
            side_labels: ("a".to_string(), "b".to_string()),
            materialize: Materialize::All,
        }
    }
}
