//! Query orchestrator - one fluent chain, one statement.
//!
//! A [`Query`] owns one builder per clause and forwards every fluent call to
//! the builder that owns it. [`Query::render`] consumes the query and
//! concatenates clause output in a fixed order:
//!
//! ```text
//! INSERT  DELETE  UPDATE  SELECT  FROM  JOIN  WHERE  GROUP BY  HAVING  ORDER BY  LIMIT/OFFSET
//! ```
//!
//! INSERT, DELETE and UPDATE only produce output when they were invoked, so
//! the same order yields both read and write statements.
//!
//! ```
//! use std::sync::Arc;
//! use quarry::prelude::*;
//!
//! # fn main() -> quarry::Result<()> {
//! let users = Entity::new("users")
//!     .schema("public")
//!     .primary_key("user_id")
//!     .column("user_id", ColumnType::Varchar)
//!     .column("user_name", ColumnType::Varchar);
//! let catalog = Arc::new(Catalog::new().with(users)?);
//!
//! let statement = Query::new(catalog, "users")?
//!     .select(["user_id", "user_name AS name"])?
//!     .filter(starts_with("user_name", "Ful"))?
//!     .order_by_desc("user_id")?
//!     .limit(10)
//!     .render();
//!
//! assert_eq!(
//!     statement.sql,
//!     "SELECT public.users.user_id, public.users.user_name AS name FROM public.users \
//!      WHERE LOWER(public.users.user_name) LIKE LOWER(:starts_with0) \
//!      ORDER BY public.users.user_id DESC LIMIT 10"
//! );
//! # Ok(())
//! # }
//! ```

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use super::bind::BindValue;
use super::clause::{
    DeleteClause, FilterClause, FromClause, GroupByClause, GroupFunction, HavingClause,
    InsertClause, JoinClause, JoinKind, OrderByClause, Pagination, Rendered, SelectClause,
    SelectColumn, UpdateClause,
};
use super::condition::{Aggregate, Conditions, Predicate};
use super::dialect::{Postgres, SqlDialect};
use super::fragment::Conjunction;
use super::qualify::clean_sql;
use super::scope::Scope;
use super::token::{Token, TokenStream};
use crate::entity::{Catalog, Entity};
use crate::error::{Error, Result};
use crate::value::Record;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(?P<name>[a-z_]+\d+)").expect("valid placeholder regex"));

/// What a rendered statement does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StatementKind::Select => "select",
            StatementKind::Insert => "insert",
            StatementKind::Update => "update",
            StatementKind::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

/// A rendered statement: SQL text, its binds and the select index.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<BindValue>,
    /// SELECT list in render order; empty for write statements.
    pub select_index: Vec<SelectColumn>,
    pub kind: StatementKind,
}

impl Statement {
    /// The SQL with every placeholder replaced by its literal value.
    ///
    /// For inspection only; executed statements keep their placeholders.
    pub fn inline(&self, dialect: &dyn SqlDialect) -> String {
        let literals: HashMap<&str, String> = self
            .binds
            .iter()
            .map(|b| (b.name.as_str(), dialect.format_literal(&b.value)))
            .collect();
        let inlined = PLACEHOLDER_RE.replace_all(&self.sql, |caps: &Captures| {
            literals
                .get(&caps["name"])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        clean_sql(&inlined)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// One fluent chain over one entity.
#[derive(Debug, Clone)]
#[must_use = "Query has no effect until rendered"]
pub struct Query {
    scope: Scope,
    dialect: Arc<dyn SqlDialect>,
    select: SelectClause,
    from: FromClause,
    joins: JoinClause,
    filter: FilterClause,
    group_by: GroupByClause,
    having: HavingClause,
    order_by: OrderByClause,
    insert: InsertClause,
    update: UpdateClause,
    delete: DeleteClause,
    pagination: Pagination,
    filtered: bool,
    forced: bool,
}

impl Query {
    /// Start a chain over the catalog entity `entity`.
    pub fn new(catalog: Arc<Catalog>, entity: &str) -> Result<Self> {
        let entity = catalog.get(entity)?;
        Ok(Self::for_entity(catalog, entity))
    }

    pub fn for_entity(catalog: Arc<Catalog>, entity: Arc<Entity>) -> Self {
        Self::with_scope(Scope::new(catalog, entity), Arc::new(Postgres))
    }

    fn with_scope(scope: Scope, dialect: Arc<dyn SqlDialect>) -> Self {
        Self {
            scope,
            dialect,
            select: SelectClause::new(),
            from: FromClause::new(),
            joins: JoinClause::new(),
            filter: FilterClause::new(),
            group_by: GroupByClause::new(),
            having: HavingClause::new(),
            order_by: OrderByClause::new(),
            insert: InsertClause::new(),
            update: UpdateClause::new(),
            delete: DeleteClause::new(),
            pagination: Pagination::new(),
            filtered: false,
            forced: false,
        }
    }

    pub fn with_dialect(mut self, dialect: Arc<dyn SqlDialect>) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn entity(&self) -> &Arc<Entity> {
        self.scope.entity()
    }

    pub fn dialect(&self) -> &dyn SqlDialect {
        self.dialect.as_ref()
    }

    // =========================================================================
    // SELECT
    // =========================================================================

    /// Add columns to the SELECT list. See [`SelectClause::columns`].
    pub fn select<I, S>(mut self, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.select.columns(&self.scope, columns)?;
        Ok(self)
    }

    fn aggregate(mut self, function: Aggregate, expression: &str) -> Result<Self> {
        self.select.aggregate(&self.scope, function, expression)?;
        Ok(self)
    }

    /// `AVG(column)[ AS alias]`
    pub fn avg(self, expression: &str) -> Result<Self> {
        self.aggregate(Aggregate::Avg, expression)
    }

    pub fn min(self, expression: &str) -> Result<Self> {
        self.aggregate(Aggregate::Min, expression)
    }

    pub fn max(self, expression: &str) -> Result<Self> {
        self.aggregate(Aggregate::Max, expression)
    }

    pub fn sum(self, expression: &str) -> Result<Self> {
        self.aggregate(Aggregate::Sum, expression)
    }

    pub fn count(self, expression: &str) -> Result<Self> {
        self.aggregate(Aggregate::Count, expression)
    }

    // =========================================================================
    // FROM
    // =========================================================================

    pub fn from_table(mut self, expression: &str) -> Result<Self> {
        self.from.table(&self.scope, expression)?;
        Ok(self)
    }

    /// `FROM (sub-query) AS alias`. The sub-query is built over the same
    /// entity and continues this statement's placeholder numbering.
    pub fn from_query(
        mut self,
        alias: &str,
        build: impl FnOnce(Query) -> Result<Query>,
    ) -> Result<Self> {
        let nested = build(Query::with_scope(self.scope.fork(), self.dialect.clone()))?;
        let (parts, nested_scope) = nested.into_parts();
        self.scope.absorb(&nested_scope);
        self.from.subquery(parts.rendered, alias)?;
        Ok(self)
    }

    // =========================================================================
    // JOIN
    // =========================================================================

    /// Join a declared relation, optionally aliased (`"tokens AS t"`), with
    /// extra ON conditions.
    pub fn join_with(
        mut self,
        kind: JoinKind,
        relation: &str,
        on: impl FnOnce(Conditions) -> Conditions,
    ) -> Result<Self> {
        let conditions = on(Conditions::new());
        self.joins.join(
            &mut self.scope,
            kind,
            relation,
            conditions,
            self.dialect.as_ref(),
        )?;
        Ok(self)
    }

    /// `INNER JOIN`
    pub fn join(self, relation: &str) -> Result<Self> {
        self.join_with(JoinKind::Inner, relation, |c| c)
    }

    pub fn left_join(self, relation: &str) -> Result<Self> {
        self.join_with(JoinKind::Left, relation, |c| c)
    }

    pub fn right_join(self, relation: &str) -> Result<Self> {
        self.join_with(JoinKind::Right, relation, |c| c)
    }

    pub fn full_join(self, relation: &str) -> Result<Self> {
        self.join_with(JoinKind::Full, relation, |c| c)
    }

    // =========================================================================
    // WHERE
    // =========================================================================

    fn push_filter(mut self, conjunction: Conjunction, predicate: Predicate) -> Result<Self> {
        self.filtered = true;
        self.filter.push(
            &mut self.scope,
            conjunction,
            &predicate,
            self.dialect.as_ref(),
        )?;
        Ok(self)
    }

    /// Add a WHERE predicate joined with AND.
    pub fn filter(self, predicate: Predicate) -> Result<Self> {
        self.push_filter(Conjunction::And, predicate)
    }

    /// Add a WHERE predicate joined with OR.
    pub fn or_filter(self, predicate: Predicate) -> Result<Self> {
        self.push_filter(Conjunction::Or, predicate)
    }

    /// Parenthesized WHERE group joined with AND. An empty group adds nothing.
    pub fn filter_group(self, build: impl FnOnce(Conditions) -> Conditions) -> Result<Self> {
        self.push_filter(Conjunction::And, build(Conditions::new()).into_group())
    }

    pub fn or_filter_group(self, build: impl FnOnce(Conditions) -> Conditions) -> Result<Self> {
        self.push_filter(Conjunction::Or, build(Conditions::new()).into_group())
    }

    // =========================================================================
    // GROUP BY / HAVING / ORDER BY
    // =========================================================================

    fn push_group_by(mut self, column: &str, function: GroupFunction) -> Result<Self> {
        self.group_by.push(&self.scope, column, function)?;
        Ok(self)
    }

    pub fn group_by(self, column: &str) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Plain)
    }

    /// `LEFT(column, length)`
    pub fn group_by_left(self, column: &str, length: u32) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Left(length))
    }

    /// `RIGHT(column, length)`
    pub fn group_by_right(self, column: &str, length: u32) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Right(length))
    }

    pub fn group_by_upper(self, column: &str) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Upper)
    }

    pub fn group_by_lower(self, column: &str) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Lower)
    }

    pub fn group_by_length(self, column: &str) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Length)
    }

    pub fn group_by_trim(self, column: &str) -> Result<Self> {
        self.push_group_by(column, GroupFunction::Trim)
    }

    fn push_having(mut self, conjunction: Conjunction, predicate: Predicate) -> Result<Self> {
        self.having.push(
            &mut self.scope,
            conjunction,
            &predicate,
            self.dialect.as_ref(),
        )?;
        Ok(self)
    }

    /// Add a HAVING predicate joined with AND, e.g. `sum("user_age").equal(16)`.
    pub fn having(self, predicate: Predicate) -> Result<Self> {
        self.push_having(Conjunction::And, predicate)
    }

    pub fn or_having(self, predicate: Predicate) -> Result<Self> {
        self.push_having(Conjunction::Or, predicate)
    }

    pub fn having_group(self, build: impl FnOnce(Conditions) -> Conditions) -> Result<Self> {
        self.push_having(Conjunction::And, build(Conditions::new()).into_group())
    }

    pub fn or_having_group(self, build: impl FnOnce(Conditions) -> Conditions) -> Result<Self> {
        self.push_having(Conjunction::Or, build(Conditions::new()).into_group())
    }

    /// `"column"`, `"column asc"` or `"column desc"`.
    pub fn order_by(mut self, expression: &str) -> Result<Self> {
        self.order_by.push_expression(&self.scope, expression)?;
        Ok(self)
    }

    pub fn order_by_asc(mut self, column: &str) -> Result<Self> {
        self.order_by.push_column(&self.scope, column, false)?;
        Ok(self)
    }

    pub fn order_by_desc(mut self, column: &str) -> Result<Self> {
        self.order_by.push_column(&self.scope, column, true)?;
        Ok(self)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub fn insert(mut self, record: &Record) -> Result<Self> {
        self.insert.insert(&mut self.scope, record)?;
        Ok(self)
    }

    pub fn insert_multiple(mut self, records: &[Record]) -> Result<Self> {
        self.insert.insert_multiple(&mut self.scope, records)?;
        Ok(self)
    }

    pub fn update(mut self, record: &Record) -> Result<Self> {
        self.update.update(&mut self.scope, record)?;
        Ok(self)
    }

    pub fn delete(mut self) -> Self {
        self.delete.delete(&self.scope);
        self
    }

    /// Allow an UPDATE or DELETE without WHERE to pass the guard.
    pub fn force(mut self) -> Self {
        self.forced = true;
        self
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn limit(mut self, limit: u64) -> Self {
        self.pagination.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.pagination.offset(offset);
        self
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn kind(&self) -> StatementKind {
        if !self.insert.is_empty() {
            StatementKind::Insert
        } else if !self.delete.is_empty() {
            StatementKind::Delete
        } else if !self.update.is_empty() {
            StatementKind::Update
        } else {
            StatementKind::Select
        }
    }

    /// Whether any WHERE-family method was called.
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn has_select(&self) -> bool {
        !self.select.is_empty()
    }

    /// Reject an UPDATE or DELETE that would touch every row.
    ///
    /// Rendering never checks this; only execution does.
    pub fn check_guard(&self) -> Result<()> {
        if self.filtered || self.forced {
            return Ok(());
        }
        match self.kind() {
            StatementKind::Delete => {
                warn!(table = %self.entity().qualified_table(), "delete without where rejected");
                Err(Error::UnguardedDelete)
            }
            StatementKind::Update => {
                warn!(table = %self.entity().qualified_table(), "update without where rejected");
                Err(Error::UnguardedUpdate)
            }
            _ => Ok(()),
        }
    }

    /// The SELECT list as it will be rendered.
    pub fn select_index(&self) -> Vec<SelectColumn> {
        self.select.index()
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Consume the chain and produce its statement.
    pub fn render(self) -> Statement {
        let dialect = self.dialect.clone();
        let (parts, _) = self.into_parts();
        let sql = clean_sql(&parts.rendered.sql.serialize(dialect.as_ref()));
        debug!(
            kind = %parts.kind,
            binds = parts.rendered.binds.len(),
            "rendered statement"
        );
        Statement {
            sql,
            binds: parts.rendered.binds,
            select_index: parts.select_index,
            kind: parts.kind,
        }
    }

    /// Render and return only the SQL text.
    pub fn to_sql(self) -> String {
        self.render().sql
    }

    fn into_parts(self) -> (Parts, Scope) {
        let kind = self.kind();
        let select_index = self.select.index();
        let has_select = !self.select.is_empty();
        let main_table = self.scope.entity().qualified_table();

        let mut from = self.from.render();
        if from.is_empty() && has_select {
            let mut ts = TokenStream::new();
            ts.push(Token::From).space().ident(main_table);
            from = Rendered::new(ts, vec![]);
        }

        let clauses = [
            self.insert.render(),
            self.delete.render(),
            self.update.render(),
            self.select.render(),
            from,
            self.joins.render(),
            self.filter.render(),
            self.group_by.render(),
            self.having.render(),
            self.order_by.render(),
            self.pagination.render(self.dialect.as_ref()),
        ];

        let mut sql = TokenStream::new();
        let mut binds = vec![];
        for clause in clauses.into_iter().filter(|c| !c.is_empty()) {
            if !sql.is_empty() {
                sql.space();
            }
            sql.append(clause.sql);
            binds.extend(clause.binds);
        }

        let parts = Parts {
            rendered: Rendered::new(sql, binds),
            select_index,
            kind,
        };
        (parts, self.scope)
    }
}

struct Parts {
    rendered: Rendered,
    select_index: Vec<SelectColumn>,
    kind: StatementKind,
}
