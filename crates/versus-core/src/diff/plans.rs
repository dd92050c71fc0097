use crate::model::{Side, Value};
use crate::plan::{Expr, FromItem, Query, Select, SelectItem, SetOp};

/// Relation aliases used for side A and side B
pub const SIDE_ALIASES: [&str; 2] = ["a", "b"];
/// Alias of a key-set subquery
pub const KEYS_ALIAS: &str = "keys";
/// Side-label column of long weaves and unmatched-both slices
pub const SIDE_COLUMN: &str = "table_name";
/// Column-name column of stacked diffs
pub const STACK_COLUMN: &str = "column";
/// Non-null marker of the outer side of an anti-join
pub const PRESENT_COLUMN: &str = "__versus_present";

fn alias(side: Side) -> &'static str {
    SIDE_ALIASES[side.index()]
}

/// Plan builders bound to one pair of registered inputs
#[derive(Debug, Clone)]
pub struct DiffPlans {
    views: [String; 2],
    by: Vec<String>,
    allow_both_na: bool,
}

impl DiffPlans {
    pub fn new(
        view_a: impl Into<String>,
        view_b: impl Into<String>,
        by: Vec<String>,
        allow_both_na: bool,
    ) -> Self {
        Self {
            views: [view_a.into(), view_b.into()],
            by,
            allow_both_na,
        }
    }

    pub fn view(&self, side: Side) -> &str {
        &self.views[side.index()]
    }

    pub fn by(&self) -> &[String] {
        &self.by
    }

    pub fn alias(&self, side: Side) -> &'static str {
        alias(side)
    }

    /// Null-safe equality of every key column between two aliases
    pub fn key_join(&self, left: &str, right: &str) -> Expr {
        Expr::all(
            self.by
                .iter()
                .map(|k| Expr::col(left, k).is_not_distinct(Expr::col(right, k)))
                .collect(),
        )
    }

    /// Side A joined to side B on the keys
    pub fn inputs_join(&self) -> FromItem {
        FromItem::relation(self.view(Side::A), alias(Side::A)).join(
            FromItem::relation(self.view(Side::B), alias(Side::B)),
            self.key_join(alias(Side::A), alias(Side::B)),
        )
    }

    /// True where `column` differs between the joined sides
    ///
    /// With `allow_both_na` two NULLs are equal; otherwise a pair of NULLs
    /// also counts as a difference.
    pub fn diff_predicate(&self, column: &str) -> Expr {
        let a = Expr::col(alias(Side::A), column);
        let b = Expr::col(alias(Side::B), column);
        let distinct = a.clone().is_distinct(b.clone());
        if self.allow_both_na {
            distinct
        } else {
            Expr::Or(vec![Expr::And(vec![a.is_null(), b.is_null()]), distinct])
        }
    }

    /// Key columns projected from `qualifier`, named after the keys
    pub fn key_items(&self, qualifier: &str) -> Vec<SelectItem> {
        self.by
            .iter()
            .map(|k| Expr::col(qualifier, k).alias(k.as_str()))
            .collect()
    }

    pub fn key_order(&self, qualifier: &str) -> Vec<Expr> {
        self.by.iter().map(|k| Expr::col(qualifier, k)).collect()
    }

    /// Keys present on both sides where any of `columns` differs
    ///
    /// A single column gives that column's diff key set.
    pub fn diff_keys_query(&self, columns: &[String]) -> Query {
        Select::new()
            .items(self.key_items(alias(Side::A)))
            .from(self.inputs_join())
            .filter(Expr::any(
                columns.iter().map(|c| self.diff_predicate(c)).collect(),
            ))
            .into_query()
    }

    /// Keys of `side` with no partner on the other side
    ///
    /// Rendered as a left join against the other side's keys, keeping the
    /// rows whose marker column came back NULL.
    pub fn unmatched_keys_query(&self, side: Side) -> Query {
        let (own, other) = (alias(side), alias(side.other()));
        let partner_keys = Select::new()
            .items(self.by.iter().map(|k| Expr::name(k)))
            .item(Expr::lit(1).alias(PRESENT_COLUMN))
            .from(FromItem::table(self.view(side.other())))
            .into_query();
        Select::new()
            .items(self.key_items(own))
            .from(
                FromItem::relation(self.view(side), own).left_join(
                    FromItem::subquery(partner_keys, other),
                    self.key_join(own, other),
                ),
            )
            .filter(Expr::col(other, PRESENT_COLUMN).is_null())
            .into_query()
    }

    /// First key tuple occurring more than once on `side`, if any
    pub fn duplicate_key_query(&self, side: Side) -> Query {
        Select::new()
            .items(self.by.iter().map(|k| Expr::name(k)))
            .from(FromItem::table(self.view(side)))
            .group_by(self.by.iter().map(|k| Expr::name(k)).collect())
            .having(Expr::CountStar.gt(Expr::lit(1)))
            .limit(1)
            .into_query()
    }

    /// One row holding the diff count of each column, in order
    ///
    /// Columns are aliased `n0`, `n1`, ... so arbitrary names stay safe.
    pub fn diff_counts_query(&self, columns: &[String]) -> Query {
        Select::new()
            .items(
                columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Expr::count_if(self.diff_predicate(c)).alias(format!("n{}", i))),
            )
            .from(self.inputs_join())
            .into_query()
    }

    /// Key columns of a persisted key-set table
    pub fn key_table_query(&self, table: &str) -> Query {
        Select::new()
            .items(self.by.iter().map(|k| Expr::name(k)))
            .from(FromItem::table(table))
            .into_query()
    }

    /// Distinct union of key sets
    pub fn union_keys(&self, parts: Vec<Query>) -> Query {
        Query::compound(SetOp::Union, parts)
    }

    /// `from` restricted to rows whose `qualifier` keys occur in `keys`
    ///
    /// Every key set is free of duplicate tuples, so the inner join never
    /// repeats a row of `from`.
    pub fn join_keys(&self, from: FromItem, keys: Query, qualifier: &str) -> FromItem {
        from.join(
            FromItem::subquery(keys, KEYS_ALIAS),
            self.key_join(qualifier, KEYS_ALIAS),
        )
    }

    /// Rows of `side` whose key is in `keys`, ordered by key
    pub fn fetch_rows(&self, side: Side, columns: &[String], keys: Query) -> Query {
        let own = alias(side);
        Select::new()
            .items(columns.iter().map(|c| Expr::col(own, c)))
            .from(self.join_keys(FromItem::relation(self.view(side), own), keys, own))
            .order_by(self.key_order(own))
            .into_query()
    }

    /// Literal rows, e.g. for persisting a summary
    ///
    /// With no rows this yields a correctly named relation that is empty.
    pub fn literal_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Query {
        let select_row = |values: Vec<Value>| {
            Select::new().items(
                columns
                    .iter()
                    .zip(values)
                    .map(|(name, value)| Expr::Literal(value).alias(*name)),
            )
        };
        if rows.is_empty() {
            let nulls = vec![Value::Null; columns.len()];
            return select_row(nulls).filter(Expr::lit(0)).into_query();
        }
        Query::compound(
            SetOp::UnionAll,
            rows.into_iter().map(|r| select_row(r).into_query()).collect(),
        )
    }
}
