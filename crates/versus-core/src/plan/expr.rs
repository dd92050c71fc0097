use super::query::Query;
use crate::model::{ColumnType, Value};

/// Scalar expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference, optionally qualified by a relation alias
    Column {
        qualifier: Option<String>,
        name: String,
    },
    Literal(Value),
    /// Null-safe inequality (`IS NOT`)
    IsDistinct(Box<Expr>, Box<Expr>),
    /// Null-safe equality (`IS`)
    IsNotDistinct(Box<Expr>, Box<Expr>),
    IsNull(Box<Expr>),
    /// Conjunction; empty is true
    And(Vec<Expr>),
    /// Disjunction; empty is false
    Or(Vec<Expr>),
    Exists(Box<Query>),
    Cast(Box<Expr>, ColumnType),
    Gt(Box<Expr>, Box<Expr>),
    CountStar,
    /// Number of rows for which the predicate holds; 0 over no rows
    CountIf(Box<Expr>),
}

impl Expr {
    pub fn col(qualifier: &str, name: &str) -> Self {
        Expr::Column {
            qualifier: Some(qualifier.to_string()),
            name: name.to_string(),
        }
    }

    /// Unqualified column reference
    pub fn name(name: &str) -> Self {
        Expr::Column {
            qualifier: None,
            name: name.to_string(),
        }
    }

    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn is_distinct(self, other: Expr) -> Self {
        Expr::IsDistinct(Box::new(self), Box::new(other))
    }

    pub fn is_not_distinct(self, other: Expr) -> Self {
        Expr::IsNotDistinct(Box::new(self), Box::new(other))
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull(Box::new(self))
    }

    pub fn gt(self, other: Expr) -> Self {
        Expr::Gt(Box::new(self), Box::new(other))
    }

    pub fn cast(self, to: ColumnType) -> Self {
        Expr::Cast(Box::new(self), to)
    }

    pub fn exists(query: Query) -> Self {
        Expr::Exists(Box::new(query))
    }

    pub fn count_if(predicate: Expr) -> Self {
        Expr::CountIf(Box::new(predicate))
    }

    /// Conjunction that collapses a single operand
    pub fn all(mut parts: Vec<Expr>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Expr::And(parts)
        }
    }

    /// Disjunction that collapses a single operand
    pub fn any(mut parts: Vec<Expr>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Expr::Or(parts)
        }
    }

    pub fn alias(self, alias: impl Into<String>) -> SelectItem {
        SelectItem::Expr {
            expr: self,
            alias: Some(alias.into()),
        }
    }
}

/// One entry of a select list
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Expr { expr: Expr, alias: Option<String> },
    /// `*` or `alias.*`
    Wildcard(Option<String>),
}

impl From<Expr> for SelectItem {
    fn from(expr: Expr) -> Self {
        SelectItem::Expr { expr, alias: None }
    }
}
