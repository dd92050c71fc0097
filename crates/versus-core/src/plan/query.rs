use super::expr::{Expr, SelectItem};

/// Relation in a FROM clause
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    Relation {
        name: String,
        alias: Option<String>,
    },
    Subquery {
        query: Box<Query>,
        alias: String,
    },
    /// Inner join
    Join {
        left: Box<FromItem>,
        right: Box<FromItem>,
        on: Expr,
    },
    /// Left outer join; unmatched right columns read as NULL
    LeftJoin {
        left: Box<FromItem>,
        right: Box<FromItem>,
        on: Expr,
    },
}

impl FromItem {
    pub fn relation(name: &str, alias: &str) -> Self {
        FromItem::Relation {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }

    pub fn table(name: &str) -> Self {
        FromItem::Relation {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn subquery(query: Query, alias: &str) -> Self {
        FromItem::Subquery {
            query: Box::new(query),
            alias: alias.to_string(),
        }
    }

    pub fn join(self, right: FromItem, on: Expr) -> Self {
        FromItem::Join {
            left: Box::new(self),
            right: Box::new(right),
            on,
        }
    }

    pub fn left_join(self, right: FromItem, on: Expr) -> Self {
        FromItem::LeftJoin {
            left: Box::new(self),
            right: Box::new(right),
            on,
        }
    }
}

/// A single SELECT statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Select {
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Option<FromItem>,
    pub filter: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<Expr>,
    pub limit: Option<u64>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn item(mut self, item: impl Into<SelectItem>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items<I>(mut self, items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SelectItem>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn from(mut self, from: FromItem) -> Self {
        self.from = Some(from);
        self
    }

    /// Add a WHERE condition, AND-ed with any existing one
    pub fn filter(mut self, predicate: Expr) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => Expr::And(vec![existing, predicate]),
            None => predicate,
        });
        self
    }

    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    pub fn having(mut self, predicate: Expr) -> Self {
        self.having = Some(predicate);
        self
    }

    pub fn order_by(mut self, exprs: Vec<Expr>) -> Self {
        self.order_by = exprs;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn into_query(self) -> Query {
        Query::Select(Box::new(self))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Union,
    UnionAll,
}

/// A complete query
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Select(Box<Select>),
    /// Set operation over parts that carry no ORDER BY or LIMIT
    Compound { op: SetOp, parts: Vec<Query> },
}

impl Query {
    /// Combine parts with `op`; a single part is returned as is
    pub fn compound(op: SetOp, mut parts: Vec<Query>) -> Self {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Query::Compound { op, parts }
        }
    }
}

impl From<Select> for Query {
    fn from(select: Select) -> Self {
        select.into_query()
    }
}
