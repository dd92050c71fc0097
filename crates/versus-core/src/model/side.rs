//! Side identity and labels

use crate::errors::{ComparisonError, Result};
use serde::Serialize;

/// One of the two compared inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Position in side order (A before B)
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Validated pair of user-facing side labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideLabels {
    a: String,
    b: String,
}

impl SideLabels {
    /// Both labels must be non-blank and distinct
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Result<Self> {
        let (a, b) = (a.into(), b.into());
        if a.trim().is_empty() || b.trim().is_empty() {
            return Err(ComparisonError::InvalidArgument {
                argument: "table_id".to_string(),
                reason: "must contain two non-blank labels".to_string(),
            });
        }
        if a == b {
            return Err(ComparisonError::InvalidArgument {
                argument: "table_id".to_string(),
                reason: format!("labels must be distinct, got `{}` twice", a),
            });
        }
        Ok(Self { a, b })
    }

    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn a(&self) -> &str {
        &self.a
    }

    pub fn b(&self) -> &str {
        &self.b
    }

    /// Map a user-supplied label back to its side
    pub fn resolve(&self, label: &str) -> Result<Side> {
        if label == self.a {
            Ok(Side::A)
        } else if label == self.b {
            Ok(Side::B)
        } else {
            Err(ComparisonError::UnknownSide {
                side: label.to_string(),
                allowed: vec![self.a.clone(), self.b.clone()],
            })
        }
    }
}

impl Default for SideLabels {
    fn default() -> Self {
        Self {
            a: "a".to_string(),
            b: "b".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let labels = SideLabels::new("before", "after").unwrap();
        assert_eq!(labels.resolve("after").unwrap(), Side::B);
        assert_eq!(labels.label(Side::A), "before");
        let err = labels.resolve("c").unwrap_err();
        assert_eq!(
            err.to_string(),
            "`table` must be one of: before, after"
        );
    }

    #[test]
    fn test_invalid_labels() {
        assert!(SideLabels::new("a", "a").is_err());
        assert!(SideLabels::new(" ", "b").is_err());
    }

    #[test]
    fn test_other() {
        assert_eq!(Side::A.other(), Side::B);
        assert_eq!(Side::BOTH.map(Side::index), [0, 1]);
    }
}
