//! SQLite text rendering of query plans
//!
//! Output is deterministic: the same plan always renders to the same text.
//! Identifiers are always double-quoted.

use super::expr::{Expr, SelectItem};
use super::query::{FromItem, Query, Select, SetOp};
use crate::model::Value;
use std::fmt::Write;

/// Quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render a literal value
pub fn quote_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(v) => v.to_string(),
        Value::Real(v) if v.is_finite() => format!("{:?}", v),
        Value::Real(_) => "NULL".to_string(),
        Value::Text(v) => format!("'{}'", v.replace('\'', "''")),
        Value::Blob(bytes) => {
            let mut out = String::with_capacity(bytes.len() * 2 + 3);
            out.push_str("X'");
            for byte in bytes {
                let _ = write!(out, "{:02X}", byte);
            }
            out.push('\'');
            out
        }
    }
}

pub fn render(query: &Query) -> String {
    let mut out = String::new();
    write_query(&mut out, query);
    out
}

pub fn render_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_query(out: &mut String, query: &Query) {
    match query {
        Query::Select(select) => write_select(out, select),
        Query::Compound { op, parts } => {
            let sep = match op {
                SetOp::Union => " UNION ",
                SetOp::UnionAll => " UNION ALL ",
            };
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push_str(sep);
                }
                write_query(out, part);
            }
        }
    }
}

fn write_select(out: &mut String, select: &Select) {
    out.push_str("SELECT ");
    if select.distinct {
        out.push_str("DISTINCT ");
    }
    if select.items.is_empty() {
        out.push('*');
    }
    for (i, item) in select.items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match item {
            SelectItem::Expr { expr, alias } => {
                write_expr(out, expr);
                if let Some(alias) = alias {
                    out.push_str(" AS ");
                    out.push_str(&quote_ident(alias));
                }
            }
            SelectItem::Wildcard(None) => out.push('*'),
            SelectItem::Wildcard(Some(q)) => {
                out.push_str(&quote_ident(q));
                out.push_str(".*");
            }
        }
    }
    if let Some(from) = &select.from {
        out.push_str(" FROM ");
        write_from(out, from);
    }
    if let Some(filter) = &select.filter {
        out.push_str(" WHERE ");
        write_expr(out, filter);
    }
    if !select.group_by.is_empty() {
        out.push_str(" GROUP BY ");
        write_list(out, &select.group_by);
    }
    if let Some(having) = &select.having {
        out.push_str(" HAVING ");
        write_expr(out, having);
    }
    if !select.order_by.is_empty() {
        out.push_str(" ORDER BY ");
        write_list(out, &select.order_by);
    }
    if let Some(limit) = select.limit {
        let _ = write!(out, " LIMIT {}", limit);
    }
}

fn write_from(out: &mut String, from: &FromItem) {
    match from {
        FromItem::Relation { name, alias } => {
            out.push_str(&quote_ident(name));
            if let Some(alias) = alias {
                out.push_str(" AS ");
                out.push_str(&quote_ident(alias));
            }
        }
        FromItem::Subquery { query, alias } => {
            out.push('(');
            write_query(out, query);
            out.push_str(") AS ");
            out.push_str(&quote_ident(alias));
        }
        FromItem::Join { left, right, on } => write_join(out, left, "JOIN", right, on),
        FromItem::LeftJoin { left, right, on } => write_join(out, left, "LEFT JOIN", right, on),
    }
}

fn write_join(out: &mut String, left: &FromItem, keyword: &str, right: &FromItem, on: &Expr) {
    write_from(out, left);
    let _ = write!(out, " {} ", keyword);
    write_from(out, right);
    out.push_str(" ON ");
    write_expr(out, on);
}

fn write_list(out: &mut String, exprs: &[Expr]) {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, expr);
    }
}

fn write_binary(out: &mut String, left: &Expr, op: &str, right: &Expr) {
    out.push('(');
    write_expr(out, left);
    out.push_str(op);
    write_expr(out, right);
    out.push(')');
}

fn write_nary(out: &mut String, parts: &[Expr], op: &str, empty: &str) {
    match parts {
        [] => out.push_str(empty),
        [only] => write_expr(out, only),
        _ => {
            out.push('(');
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push_str(op);
                }
                write_expr(out, part);
            }
            out.push(')');
        }
    }
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Column { qualifier, name } => {
            if let Some(q) = qualifier {
                out.push_str(&quote_ident(q));
                out.push('.');
            }
            out.push_str(&quote_ident(name));
        }
        Expr::Literal(value) => out.push_str(&quote_literal(value)),
        Expr::IsDistinct(l, r) => write_binary(out, l, " IS NOT ", r),
        Expr::IsNotDistinct(l, r) => write_binary(out, l, " IS ", r),
        Expr::Gt(l, r) => write_binary(out, l, " > ", r),
        Expr::IsNull(inner) => {
            out.push('(');
            write_expr(out, inner);
            out.push_str(" IS NULL)");
        }
        Expr::And(parts) => write_nary(out, parts, " AND ", "1"),
        Expr::Or(parts) => write_nary(out, parts, " OR ", "0"),
        Expr::Exists(query) => {
            out.push_str("EXISTS (");
            write_query(out, query);
            out.push(')');
        }
        Expr::Cast(inner, to) => {
            out.push_str("CAST(");
            write_expr(out, inner);
            let _ = write!(out, " AS {})", to);
        }
        Expr::CountStar => out.push_str("COUNT(*)"),
        Expr::CountIf(predicate) => {
            out.push_str("COALESCE(SUM(CASE WHEN ");
            write_expr(out, predicate);
            out.push_str(" THEN 1 ELSE 0 END), 0)");
        }
    }
}
