//! Predicates for WHERE, HAVING and join ON clauses.
//!
//! A predicate is a plain value. Nothing is rendered and nothing is bound
//! until it reaches [`apply_predicate`], the single place where predicates
//! are lowered to SQL. Clause builders differ only in which entity the
//! predicate's columns are qualified against.
//!
//! ```
//! use quarry::sql::condition::{contains, equal, not_starts_with, sum, Conditions};
//!
//! let active = Conditions::new()
//!     .and(contains("user_email", "@example.com"))
//!     .or(not_starts_with("user_name", "test"));
//! let adults = sum("user_age").greater_than_or_equal(18);
//! let by_id = equal("user_id", "01HH1QP44SYMMHTFTESFVNW770");
//! # let _ = (active, adults, by_id);
//! ```

use super::bind::{BindValue, Purpose};
use super::dialect::SqlDialect;
use super::fragment::{join_conditional, Conjunction, Fragments, Fragment};
use super::scope::Scope;
use super::token::{Comparison, Token, TokenStream};
use crate::entity::Entity;
use crate::error::Result;
use crate::value::Value;

/// Aggregate functions usable in SELECT and HAVING.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Avg,
    Min,
    Max,
    Sum,
    Count,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Avg => "AVG",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
            Aggregate::Sum => "SUM",
            Aggregate::Count => "COUNT",
        }
    }
}

/// Where the value sits inside a LIKE pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikePattern {
    /// `value%`
    StartsWith,
    /// `%value`
    EndsWith,
    /// `%value%`
    Contains,
}

impl LikePattern {
    fn purpose(&self) -> Purpose {
        match self {
            LikePattern::StartsWith => Purpose::StartsWith,
            LikePattern::EndsWith => Purpose::EndsWith,
            LikePattern::Contains => Purpose::Contains,
        }
    }

    fn wrap(&self, value: &Value) -> Value {
        let raw = value.to_key();
        let pattern = match self {
            LikePattern::StartsWith => format!("{}%", raw),
            LikePattern::EndsWith => format!("%{}", raw),
            LikePattern::Contains => format!("%{}%", raw),
        };
        Value::Text(pattern)
    }
}

/// One boolean test.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> :where<n>`
    Compare {
        column: String,
        op: Comparison,
        value: Value,
    },
    /// `LOWER(column) [NOT ]LIKE LOWER(:<pattern><n>)`
    Like {
        column: String,
        pattern: LikePattern,
        value: Value,
        negated: bool,
    },
    /// `column [NOT ]BETWEEN :between_start<n> AND :between_end<m>`
    Between {
        column: String,
        start: Value,
        end: Value,
        negated: bool,
    },
    /// `:between_columns<n> [NOT ]BETWEEN start_column AND end_column`
    BetweenColumns {
        start_column: String,
        end_column: String,
        value: Value,
        negated: bool,
    },
    /// `AGG(column) <op> :having<n>`
    Aggregate {
        function: Aggregate,
        column: String,
        op: Comparison,
        value: Value,
    },
    /// Parenthesized sub-list.
    Group(Vec<Condition>),
}

/// A predicate and the conjunction attaching it to the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub conjunction: Conjunction,
    pub predicate: Predicate,
}

/// Ordered conditions, used for groups and join ON clauses.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "conditions have no effect until applied to a query"]
pub struct Conditions {
    items: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.items.push(Condition {
            conjunction: Conjunction::And,
            predicate,
        });
        self
    }

    pub fn or(mut self, predicate: Predicate) -> Self {
        self.items.push(Condition {
            conjunction: Conjunction::Or,
            predicate,
        });
        self
    }

    /// Nested `( ... )` joined with AND.
    pub fn group(self, build: impl FnOnce(Conditions) -> Conditions) -> Self {
        let inner = build(Conditions::new());
        self.and(inner.into_group())
    }

    /// Nested `( ... )` joined with OR.
    pub fn or_group(self, build: impl FnOnce(Conditions) -> Conditions) -> Self {
        let inner = build(Conditions::new());
        self.or(inner.into_group())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.items.iter()
    }

    pub fn into_group(self) -> Predicate {
        Predicate::Group(self.items)
    }
}

impl IntoIterator for Conditions {
    type Item = Condition;
    type IntoIter = std::vec::IntoIter<Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

// ============================================================================
// Predicate constructors
// ============================================================================

/// Compare with a free-form operator. Operators outside
/// `= != <> < > <= >=` degrade to `=`.
pub fn compare(column: impl Into<String>, op: &str, value: impl Into<Value>) -> Predicate {
    Predicate::Compare {
        column: column.into(),
        op: Comparison::parse_or_eq(op),
        value: value.into(),
    }
}

fn cmp(column: impl Into<String>, op: Comparison, value: impl Into<Value>) -> Predicate {
    Predicate::Compare {
        column: column.into(),
        op,
        value: value.into(),
    }
}

pub fn equal(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    cmp(column, Comparison::Eq, value)
}

/// `column <> value`
pub fn different(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    cmp(column, Comparison::Ne, value)
}

pub fn greater_than(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    cmp(column, Comparison::Gt, value)
}

pub fn greater_than_or_equal(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    cmp(column, Comparison::Gte, value)
}

pub fn lower_than(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    cmp(column, Comparison::Lt, value)
}

pub fn lower_than_or_equal(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    cmp(column, Comparison::Lte, value)
}

fn like(
    column: impl Into<String>,
    pattern: LikePattern,
    value: impl Into<Value>,
    negated: bool,
) -> Predicate {
    Predicate::Like {
        column: column.into(),
        pattern,
        value: value.into(),
        negated,
    }
}

pub fn starts_with(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    like(column, LikePattern::StartsWith, value, false)
}

pub fn not_starts_with(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    like(column, LikePattern::StartsWith, value, true)
}

pub fn ends_with(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    like(column, LikePattern::EndsWith, value, false)
}

pub fn not_ends_with(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    like(column, LikePattern::EndsWith, value, true)
}

pub fn contains(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    like(column, LikePattern::Contains, value, false)
}

pub fn not_contains(column: impl Into<String>, value: impl Into<Value>) -> Predicate {
    like(column, LikePattern::Contains, value, true)
}

pub fn between(
    column: impl Into<String>,
    start: impl Into<Value>,
    end: impl Into<Value>,
) -> Predicate {
    Predicate::Between {
        column: column.into(),
        start: start.into(),
        end: end.into(),
        negated: false,
    }
}

pub fn not_between(
    column: impl Into<String>,
    start: impl Into<Value>,
    end: impl Into<Value>,
) -> Predicate {
    Predicate::Between {
        column: column.into(),
        start: start.into(),
        end: end.into(),
        negated: true,
    }
}

/// Test a value against a range stored in two columns.
pub fn between_columns(
    start_column: impl Into<String>,
    end_column: impl Into<String>,
    value: impl Into<Value>,
) -> Predicate {
    Predicate::BetweenColumns {
        start_column: start_column.into(),
        end_column: end_column.into(),
        value: value.into(),
        negated: false,
    }
}

pub fn not_between_columns(
    start_column: impl Into<String>,
    end_column: impl Into<String>,
    value: impl Into<Value>,
) -> Predicate {
    Predicate::BetweenColumns {
        start_column: start_column.into(),
        end_column: end_column.into(),
        value: value.into(),
        negated: true,
    }
}

/// An aggregated column awaiting its comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateColumn {
    function: Aggregate,
    column: String,
}

impl AggregateColumn {
    pub fn new(function: Aggregate, column: impl Into<String>) -> Self {
        Self {
            function,
            column: column.into(),
        }
    }

    pub fn compare(self, op: &str, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::parse_or_eq(op), value)
    }

    fn with(self, op: Comparison, value: impl Into<Value>) -> Predicate {
        Predicate::Aggregate {
            function: self.function,
            column: self.column,
            op,
            value: value.into(),
        }
    }

    pub fn equal(self, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::Eq, value)
    }

    pub fn different(self, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::Ne, value)
    }

    pub fn greater_than(self, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::Gt, value)
    }

    pub fn greater_than_or_equal(self, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::Gte, value)
    }

    pub fn lower_than(self, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::Lt, value)
    }

    pub fn lower_than_or_equal(self, value: impl Into<Value>) -> Predicate {
        self.with(Comparison::Lte, value)
    }
}

pub fn avg(column: impl Into<String>) -> AggregateColumn {
    AggregateColumn::new(Aggregate::Avg, column)
}

pub fn min(column: impl Into<String>) -> AggregateColumn {
    AggregateColumn::new(Aggregate::Min, column)
}

pub fn max(column: impl Into<String>) -> AggregateColumn {
    AggregateColumn::new(Aggregate::Max, column)
}

pub fn sum(column: impl Into<String>) -> AggregateColumn {
    AggregateColumn::new(Aggregate::Sum, column)
}

pub fn count(column: impl Into<String>) -> AggregateColumn {
    AggregateColumn::new(Aggregate::Count, column)
}

// ============================================================================
// Lowering
// ============================================================================

/// Lower `predicate` and append it to `fragments`.
///
/// Bare columns are qualified against `target`; `table.column` references
/// resolve through the scope to the main entity or a joined relation. Every value is registered through
/// the scope's bind registry; the resulting binds are recorded on
/// `fragments`. An empty group appends nothing.
pub fn apply_predicate(
    fragments: &mut Fragments<Fragment>,
    scope: &mut Scope,
    target: &Entity,
    conjunction: Conjunction,
    predicate: &Predicate,
    dialect: &dyn SqlDialect,
) -> Result<()> {
    let mut binds = vec![];
    if let Some(sql) = lower(scope, target, predicate, dialect, &mut binds)? {
        fragments.append_conditional(conjunction, sql);
        fragments.add_binds(binds);
    }
    Ok(())
}

fn lower(
    scope: &mut Scope,
    target: &Entity,
    predicate: &Predicate,
    dialect: &dyn SqlDialect,
    binds: &mut Vec<BindValue>,
) -> Result<Option<TokenStream>> {
    let mut ts = TokenStream::new();
    match predicate {
        Predicate::Compare { column, op, value } => {
            let column = scope.qualify_for(target, column);
            let bind = scope.bind(Purpose::Where, &column, value.clone())?;
            ts.ident(&column)
                .space()
                .push(Token::Cmp(*op))
                .space()
                .placeholder(&bind.name);
            binds.push(bind);
        }
        Predicate::Like {
            column,
            pattern,
            value,
            negated,
        } => {
            let column = scope.qualify_for(target, column);
            let bind = scope.bind(pattern.purpose(), &column, pattern.wrap(value))?;
            ts.append(dialect.emit_case_insensitive_like(&column, &bind.name, *negated));
            binds.push(bind);
        }
        Predicate::Between {
            column,
            start,
            end,
            negated,
        } => {
            let column = scope.qualify_for(target, column);
            let start = scope.bind(Purpose::BetweenStart, &column, start.clone())?;
            let end = scope.bind(Purpose::BetweenEnd, &column, end.clone())?;
            ts.ident(&column).space();
            if *negated {
                ts.push(Token::Not).space();
            }
            ts.push(Token::Between)
                .space()
                .placeholder(&start.name)
                .space()
                .push(Token::And)
                .space()
                .placeholder(&end.name);
            binds.push(start);
            binds.push(end);
        }
        Predicate::BetweenColumns {
            start_column,
            end_column,
            value,
            negated,
        } => {
            let start_column = scope.qualify_for(target, start_column);
            let end_column = scope.qualify_for(target, end_column);
            let bind = scope.bind(Purpose::BetweenColumns, &start_column, value.clone())?;
            ts.placeholder(&bind.name).space();
            if *negated {
                ts.push(Token::Not).space();
            }
            ts.push(Token::Between)
                .space()
                .ident(&start_column)
                .space()
                .push(Token::And)
                .space()
                .ident(&end_column);
            binds.push(bind);
        }
        Predicate::Aggregate {
            function,
            column,
            op,
            value,
        } => {
            let column = scope.qualify_for(target, column);
            let bind = scope.bind(Purpose::Having, &column, value.clone())?;
            ts.push(Token::FunctionName(function.as_str().into()))
                .lparen()
                .ident(&column)
                .rparen()
                .space()
                .push(Token::Cmp(*op))
                .space()
                .placeholder(&bind.name);
            binds.push(bind);
        }
        Predicate::Group(conditions) => {
            let mut inner = Fragments::new();
            for condition in conditions {
                if let Some(sql) = lower(scope, target, &condition.predicate, dialect, binds)? {
                    inner.append_conditional(condition.conjunction, sql);
                }
            }
            if !inner.has_fragments() {
                return Ok(None);
            }
            let (items, _) = inner.into_parts();
            ts.lparen().append(join_conditional(items)).rparen();
        }
    }
    Ok(Some(ts))
}
