//! Column qualification and expression parsing.
//!
//! Every column reference that reaches a clause builder is canonicalized to
//! `schema.table.column`. Only the missing leading parts are filled in:
//!
//! - `id` → `schema.table.id`
//! - `users.id` → `schema.users.id`
//! - `public.users.id` → unchanged

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{Error, Result};

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<name>[\w*.]+)(?:\s+AS\s+(?P<alias>\w+))?$").expect("valid alias regex")
});

static COLUMN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.]+$").expect("valid column regex"));

static ORDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<name>[\w*.]+)(?:\s+(?P<order>asc|desc))?$").expect("valid order regex")
});

static FROM_ALIAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<alias>\w+)\s*$").expect("valid from alias regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// `<name> [AS <alias>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aliased {
    pub name: String,
    pub alias: Option<String>,
}

/// `<name> [ASC|DESC]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordered {
    pub name: String,
    /// `true` for DESC.
    pub descending: bool,
}

/// Fill in the missing leading parts of a column reference.
///
/// An empty schema yields `table.column`.
pub fn qualify(column: &str, table: &str, schema: &str) -> String {
    let parts: Vec<&str> = column.split('.').collect();
    match parts.as_slice() {
        [col] => join_parts(schema, table, col),
        [tbl, col] => join_parts(schema, tbl, col),
        [_, _, _] => column.to_string(),
        _ => column.to_string(),
    }
}

fn join_parts(schema: &str, table: &str, column: &str) -> String {
    if schema.is_empty() {
        format!("{}.{}", table, column)
    } else {
        format!("{}.{}.{}", schema, table, column)
    }
}

/// Qualify every column of a list.
pub fn qualify_all<'a>(
    columns: impl IntoIterator<Item = &'a str>,
    table: &str,
    schema: &str,
) -> Vec<String> {
    columns
        .into_iter()
        .map(|c| qualify(c, table, schema))
        .collect()
}

/// `schema.table`, or just `table` when the schema is empty.
pub fn qualify_table(table: &str, schema: &str) -> String {
    if schema.is_empty() {
        table.to_string()
    } else {
        format!("{}.{}", schema, table)
    }
}

/// Parse `<name> [AS <alias>]`, case-insensitively.
pub fn parse_alias(expression: &str) -> Result<Aliased> {
    let trimmed = expression.trim();
    let caps = ALIAS_RE
        .captures(trimmed)
        .ok_or_else(|| Error::BadAlias(expression.to_string()))?;
    Ok(Aliased {
        name: caps["name"].to_string(),
        alias: caps.name("alias").map(|m| m.as_str().to_string()),
    })
}

/// Accept only `[\w.]+`.
pub fn parse_column(expression: &str) -> Result<String> {
    let trimmed = expression.trim();
    if COLUMN_RE.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(Error::BadColumn(expression.to_string()))
    }
}

/// Parse `<name> [ASC|DESC]`; no direction means ascending.
pub fn parse_order(expression: &str) -> Result<Ordered> {
    let trimmed = expression.trim();
    let caps = ORDER_RE
        .captures(trimmed)
        .ok_or_else(|| Error::BadOrder(expression.to_string()))?;
    Ok(Ordered {
        name: caps["name"].to_string(),
        descending: caps
            .name("order")
            .is_some_and(|m| m.as_str().eq_ignore_ascii_case("desc")),
    })
}

/// A sub-query alias must be a single identifier.
pub fn parse_from_alias(expression: &str) -> Result<String> {
    FROM_ALIAS_RE
        .captures(expression)
        .map(|caps| caps["alias"].to_string())
        .ok_or_else(|| Error::BadFromAlias(expression.to_string()))
}

/// Collapse whitespace runs to one space and trim.
pub fn clean_sql(sql: &str) -> String {
    WHITESPACE_RE.replace_all(sql.trim(), " ").into_owned()
}
