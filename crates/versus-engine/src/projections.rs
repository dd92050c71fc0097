//! Projection builders
//!
//! Each projection is a pure function of the comparison state and its
//! selection arguments. Output schemas are computed from the registered
//! schemas, never from returned rows, so a projection with nothing to show
//! still returns its full column list and declared types.

use crate::comparison::{Comparison, Result};
use crate::strategy::declared_type;
use versus_core::diff::{SIDE_COLUMN, STACK_COLUMN};
use versus_core::plan::{Expr, FromItem, Query, Select, SelectItem, SetOp};
use versus_core::rules::validation;
use versus_core::{ColumnType, Field, Relation, Side};
use versus_store::Substrate;

const UNION_ALIAS: &str = "tagged";

/// Internal name of the item at `position` in a compound projection
///
/// Union parts never carry public names, so a user column called
/// `table_name` or `column` cannot collide with the label columns.
fn slot(position: usize) -> String {
    format!("c{}", position)
}

fn slotted(items: Vec<Expr>) -> Vec<SelectItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(position, expr)| expr.alias(slot(position)))
        .collect()
}

/// Declared type of a stacked value column
///
/// When every stacked column shares one declared type the values are
/// unioned as they are; otherwise each is cast to TEXT. Returns the output
/// type and whether a cast is needed.
pub fn stack_type(types: &[ColumnType]) -> (ColumnType, bool) {
    match types.split_first() {
        Some((first, rest)) if rest.iter().all(|t| t == first) => (first.clone(), false),
        Some(_) => (ColumnType::text(), true),
        None => (ColumnType::any(), false),
    }
}

impl<S: Substrate> Comparison<S> {
    fn field(&self, side: Side, column: &str) -> Field {
        Field::new(column, declared_type(self.handle(side), column))
    }

    /// Key fields typed after side A
    fn key_fields(&self) -> Vec<Field> {
        self.by.iter().map(|k| self.field(Side::A, k)).collect()
    }

    fn common_fields(&self) -> Vec<Field> {
        self.common.iter().map(|c| self.field(Side::A, c)).collect()
    }

    fn owned_selection(columns: Option<&[&str]>, common: &[String]) -> Result<Vec<String>> {
        Ok(validation::resolve_selection(columns, common)?)
    }

    fn diff_keys(&self, columns: &[String]) -> Query {
        self.key_sets.diff_keys(&self.plans, columns)
    }

    /// Wrap slotted union parts, keep the first `width` slots and order by
    /// the slots in `order`
    ///
    /// Slot `width` of every part is its hidden ordering tag.
    fn ordered_union(&self, width: usize, parts: Vec<Query>, order: Vec<usize>) -> Query {
        let at = |position: usize| Expr::col(UNION_ALIAS, &slot(position));
        Select::new()
            .items((0..width).map(at))
            .from(FromItem::subquery(
                Query::compound(SetOp::UnionAll, parts),
                UNION_ALIAS,
            ))
            .order_by(order.into_iter().map(at).collect())
            .into_query()
    }

    /// Keys where `column` differs, with both values side by side
    ///
    /// Output: key columns, `{column}_{a}`, `{column}_{b}`.
    pub fn value_diffs(&self, column: &str) -> Result<Relation> {
        self.observe("value_diffs", || {
            validation::ensure_common_column(column, &self.common)?;
            let (la, lb) = (self.labels.a(), self.labels.b());
            let name_a = format!("{}_{}", column, la);
            let name_b = format!("{}_{}", column, lb);

            let mut schema = self.key_fields();
            schema.push(Field::new(&name_a, declared_type(self.handle(Side::A), column)));
            schema.push(Field::new(&name_b, declared_type(self.handle(Side::B), column)));

            if !self.column_differs(column)? {
                return Ok(Relation::empty(schema));
            }

            let (a, b) = (self.plans.alias(Side::A), self.plans.alias(Side::B));
            let query = Select::new()
                .items(self.plans.key_items(a))
                .item(Expr::col(a, column).alias(name_a))
                .item(Expr::col(b, column).alias(name_b))
                .from(self.plans.join_keys(
                    self.plans.inputs_join(),
                    self.diff_keys(&[column.to_string()]),
                    a,
                ))
                .order_by(self.plans.key_order(a))
                .into_query();
            self.run(schema, &query)
        })
    }

    /// Value diffs of several columns stacked into one relation
    ///
    /// Output: `column`, `val_{a}`, `val_{b}`, key columns; ordered by column
    /// position, then key.
    pub fn value_diffs_stacked(&self, columns: Option<&[&str]>) -> Result<Relation> {
        self.observe("value_diffs_stacked", || {
            let selected = Self::owned_selection(columns, &self.common)?;
            let (la, lb) = (self.labels.a(), self.labels.b());
            let val_a = format!("val_{}", la);
            let val_b = format!("val_{}", lb);

            let side_types = |side: Side| -> Vec<ColumnType> {
                selected
                    .iter()
                    .map(|c| declared_type(self.handle(side), c))
                    .collect()
            };
            let (type_a, cast_a) = stack_type(&side_types(Side::A));
            let (type_b, cast_b) = stack_type(&side_types(Side::B));

            let mut schema = vec![
                Field::new(STACK_COLUMN, ColumnType::text()),
                Field::new(&val_a, type_a),
                Field::new(&val_b, type_b),
            ];
            schema.extend(self.key_fields());

            let differing = self.differing(&selected)?;
            if differing.is_empty() {
                return Ok(Relation::empty(schema));
            }

            let (a, b) = (self.plans.alias(Side::A), self.plans.alias(Side::B));
            let value = |alias: &str, column: &str, cast: bool| {
                let expr = Expr::col(alias, column);
                if cast {
                    expr.cast(ColumnType::text())
                } else {
                    expr
                }
            };
            let parts = selected
                .iter()
                .enumerate()
                .filter(|(_, c)| differing.contains(c))
                .map(|(position, column)| {
                    let mut items = vec![
                        Expr::lit(column.as_str()),
                        value(a, column, cast_a),
                        value(b, column, cast_b),
                    ];
                    items.extend(self.plans.key_order(a));
                    items.push(Expr::lit(position as i64));
                    Select::new()
                        .items(slotted(items))
                        .from(self.plans.join_keys(
                            self.plans.inputs_join(),
                            self.diff_keys(std::slice::from_ref(column)),
                            a,
                        ))
                        .into_query()
                })
                .collect();

            let width = schema.len();
            let mut order = vec![width];
            order.extend(3..3 + self.by.len());
            self.run(schema, &self.ordered_union(width, parts, order))
        })
    }

    /// Rows of one side whose key differs on any selected column
    ///
    /// Output: the full row schema of that side, ordered by key. Selected
    /// columns without differences contribute no rows.
    pub fn slice_diffs(&self, side: &str, columns: Option<&[&str]>) -> Result<Relation> {
        self.observe("slice_diffs", || {
            let side = self.labels.resolve(side)?;
            let selected = Self::owned_selection(columns, &self.common)?;
            let handle = self.handle(side);
            let schema = handle.schema.fields().to_vec();

            let differing = self.differing(&selected)?;
            if differing.is_empty() {
                return Ok(Relation::empty(schema));
            }

            let names: Vec<String> = handle.schema.column_names().map(str::to_string).collect();
            let query = self
                .plans
                .fetch_rows(side, &names, self.diff_keys(&differing));
            self.run(schema, &query)
        })
    }

    /// Rows of one side with no partner on the other side
    pub fn slice_unmatched(&self, side: &str) -> Result<Relation> {
        self.observe("slice_unmatched", || {
            let side = self.labels.resolve(side)?;
            let handle = self.handle(side);
            let schema = handle.schema.fields().to_vec();
            let names: Vec<String> = handle.schema.column_names().map(str::to_string).collect();
            let keys = self.key_sets.unmatched_keys(&self.plans, side);
            self.run(schema, &self.plans.fetch_rows(side, &names, keys))
        })
    }

    /// Unmatched rows of both sides, tagged with their side label
    ///
    /// Output: `table_name`, key columns, common columns; side A rows first,
    /// each side ordered by key.
    pub fn slice_unmatched_both(&self) -> Result<Relation> {
        self.observe("slice_unmatched_both", || {
            let mut schema = vec![Field::new(SIDE_COLUMN, ColumnType::text())];
            schema.extend(self.key_fields());
            schema.extend(self.common_fields());

            let parts = Side::BOTH
                .iter()
                .map(|&side| {
                    let keys = self.key_sets.unmatched_keys(&self.plans, side);
                    self.tagged_rows(side, keys)
                })
                .collect();

            let width = schema.len();
            let mut order = vec![width];
            order.extend(1..=self.by.len());
            self.run(schema, &self.ordered_union(width, parts, order))
        })
    }

    /// Label, keys and common columns of `side` rows whose key is in `keys`,
    /// slotted, with the side index as ordering tag
    fn tagged_rows(&self, side: Side, keys: Query) -> Query {
        let alias = self.plans.alias(side);
        let mut items = vec![Expr::lit(self.labels.label(side))];
        items.extend(self.plans.key_order(alias));
        items.extend(self.common.iter().map(|c| Expr::col(alias, c)));
        items.push(Expr::lit(side.index() as i64));
        Select::new()
            .items(slotted(items))
            .from(self.plans.join_keys(
                FromItem::relation(self.plans.view(side), alias),
                keys,
                alias,
            ))
            .into_query()
    }

    /// Differing rows with both sides woven into one row per key
    ///
    /// Output: key columns, then each common column; columns that differ
    /// within the selection are split into `{column}{suffix_a}` and
    /// `{column}{suffix_b}`. With no differing column the output keeps the
    /// unsplit shape.
    pub fn weave_diffs_wide(
        &self,
        columns: Option<&[&str]>,
        suffix: Option<(&str, &str)>,
    ) -> Result<Relation> {
        self.observe("weave_diffs_wide", || {
            let selected = Self::owned_selection(columns, &self.common)?;
            let (suffix_a, suffix_b) = validation::resolve_suffix(suffix, &self.labels)?;
            validation::ensure_distinct_wide_names(
                &self.by,
                &self.common,
                &selected,
                &suffix_a,
                &suffix_b,
            )?;
            let differing = self.differing(&selected)?;

            let mut schema = self.key_fields();
            if differing.is_empty() {
                schema.extend(self.common_fields());
                return Ok(Relation::empty(schema));
            }

            let (a, b) = (self.plans.alias(Side::A), self.plans.alias(Side::B));
            let mut items = self.plans.key_items(a);
            for column in &self.common {
                if differing.contains(column) {
                    let name_a = format!("{}{}", column, suffix_a);
                    let name_b = format!("{}{}", column, suffix_b);
                    schema.push(Field::new(&name_a, declared_type(self.handle(Side::A), column)));
                    schema.push(Field::new(&name_b, declared_type(self.handle(Side::B), column)));
                    items.push(Expr::col(a, column).alias(name_a));
                    items.push(Expr::col(b, column).alias(name_b));
                } else {
                    schema.push(self.field(Side::A, column));
                    items.push(Expr::col(a, column).alias(column.as_str()));
                }
            }

            let query = Select::new()
                .items(items)
                .from(self.plans.join_keys(
                    self.plans.inputs_join(),
                    self.diff_keys(&differing),
                    a,
                ))
                .order_by(self.plans.key_order(a))
                .into_query();
            self.run(schema, &query)
        })
    }

    /// Differing rows with both sides stacked, two tagged rows per key
    ///
    /// Output: `table_name`, key columns, common columns; ordered by key,
    /// side A before side B.
    pub fn weave_diffs_long(&self, columns: Option<&[&str]>) -> Result<Relation> {
        self.observe("weave_diffs_long", || {
            let selected = Self::owned_selection(columns, &self.common)?;
            let mut schema = vec![Field::new(SIDE_COLUMN, ColumnType::text())];
            schema.extend(self.key_fields());
            schema.extend(self.common_fields());

            let differing = self.differing(&selected)?;
            if differing.is_empty() {
                return Ok(Relation::empty(schema));
            }

            let parts = Side::BOTH
                .iter()
                .map(|&side| self.tagged_rows(side, self.diff_keys(&differing)))
                .collect();

            let width = schema.len();
            let mut order: Vec<usize> = (1..=self.by.len()).collect();
            order.push(width);
            self.run(schema, &self.ordered_union(width, parts, order))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_type_keeps_shared_type() {
        let types = [ColumnType::integer(), ColumnType::integer()];
        assert_eq!(stack_type(&types), (ColumnType::integer(), false));
    }

    #[test]
    fn test_stack_type_casts_mixed_types_to_text() {
        let types = [ColumnType::integer(), ColumnType::new("REAL")];
        assert_eq!(stack_type(&types), (ColumnType::text(), true));
    }

    #[test]
    fn test_stack_type_of_nothing() {
        assert_eq!(stack_type(&[]), (ColumnType::any(), false));
    }
}
