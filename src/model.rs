//! Data-access facade.
//!
//! A [`Model`] binds one catalog entity to an [`Executor`]. Fluent calls
//! accumulate into a [`Query`]; terminal calls (`get`, `find`, `insert`,
//! `execute`, ...) render it, hand the statement to the executor and start
//! over from a fresh query, so nothing of one statement leaks into the next.
//!
//! In debug mode nothing real is executed: each statement is captured with
//! its literals inlined and the executor receives a harmless probe instead.
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
//! let mut model = Model::new(catalog, "users", DryRun::new())?.debug(true);
//! model.filter(contains("user_name", "james"))?.delete()?;
//!
//! assert_eq!(
//!     model.take_sql(),
//!     vec!["DELETE FROM public.users WHERE LOWER(public.users.user_name) LIKE LOWER('%james%')"]
//! );
//! # Ok(())
//! # }
//! ```

use serde_json::Value as Json;
use std::mem;
use std::sync::Arc;
use tracing::{info, warn};

use crate::entity::{Catalog, Entity};
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::sql::condition::{equal, Conditions, Predicate};
use crate::sql::{JoinKind, Postgres, Query, SqlDialect, Statement};
use crate::tree;
use crate::value::{Record, Value};

#[derive(Debug)]
pub struct Model<E: Executor> {
    catalog: Arc<Catalog>,
    entity: Arc<Entity>,
    executor: E,
    dialect: Arc<dyn SqlDialect>,
    query: Query,
    debug: bool,
    captured: Vec<String>,
}

impl<E: Executor> Model<E> {
    pub fn new(catalog: Arc<Catalog>, entity: &str, executor: E) -> Result<Self> {
        let entity = catalog.get(entity)?;
        let dialect: Arc<dyn SqlDialect> = Arc::new(Postgres);
        let query = Query::for_entity(catalog.clone(), entity.clone()).with_dialect(dialect.clone());
        Ok(Self {
            catalog,
            entity,
            executor,
            dialect,
            query,
            debug: false,
            captured: vec![],
        })
    }

    /// Capture statements instead of running them.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Captured debug SQL, oldest first. Clears the capture.
    pub fn take_sql(&mut self) -> Vec<String> {
        mem::take(&mut self.captured)
    }

    fn fresh(&self) -> Query {
        Query::for_entity(self.catalog.clone(), self.entity.clone()).with_dialect(self.dialect.clone())
    }

    /// Detach the pending query, leaving a fresh one in its place.
    fn take_query(&mut self) -> Query {
        let fresh = self.fresh();
        mem::replace(&mut self.query, fresh)
    }

    /// Run one fluent step against the pending query. On error the pending
    /// query is discarded.
    pub fn apply(&mut self, step: impl FnOnce(Query) -> Result<Query>) -> Result<&mut Self> {
        let query = self.take_query();
        self.query = step(query)?;
        Ok(self)
    }

    // =========================================================================
    // Fluent surface
    // =========================================================================

    pub fn select<I, S>(&mut self, columns: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|q| q.select(columns))
    }

    pub fn avg(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.avg(expression))
    }

    pub fn min(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.min(expression))
    }

    pub fn max(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.max(expression))
    }

    pub fn sum(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.sum(expression))
    }

    pub fn count(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.count(expression))
    }

    pub fn from_table(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.from_table(expression))
    }

    pub fn from_query(
        &mut self,
        alias: &str,
        build: impl FnOnce(Query) -> Result<Query>,
    ) -> Result<&mut Self> {
        self.apply(|q| q.from_query(alias, build))
    }

    /// INNER JOIN every named relation, in order.
    pub fn with<I, S>(&mut self, relations: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply(|mut q| {
            for relation in relations {
                q = q.join(relation.as_ref())?;
            }
            Ok(q)
        })
    }

    pub fn join_with(
        &mut self,
        kind: JoinKind,
        relation: &str,
        on: impl FnOnce(Conditions) -> Conditions,
    ) -> Result<&mut Self> {
        self.apply(|q| q.join_with(kind, relation, on))
    }

    pub fn join(&mut self, relation: &str) -> Result<&mut Self> {
        self.apply(|q| q.join(relation))
    }

    pub fn left_join(&mut self, relation: &str) -> Result<&mut Self> {
        self.apply(|q| q.left_join(relation))
    }

    pub fn right_join(&mut self, relation: &str) -> Result<&mut Self> {
        self.apply(|q| q.right_join(relation))
    }

    pub fn full_join(&mut self, relation: &str) -> Result<&mut Self> {
        self.apply(|q| q.full_join(relation))
    }

    pub fn filter(&mut self, predicate: Predicate) -> Result<&mut Self> {
        self.apply(|q| q.filter(predicate))
    }

    pub fn or_filter(&mut self, predicate: Predicate) -> Result<&mut Self> {
        self.apply(|q| q.or_filter(predicate))
    }

    pub fn filter_group(&mut self, build: impl FnOnce(Conditions) -> Conditions) -> Result<&mut Self> {
        self.apply(|q| q.filter_group(build))
    }

    pub fn or_filter_group(
        &mut self,
        build: impl FnOnce(Conditions) -> Conditions,
    ) -> Result<&mut Self> {
        self.apply(|q| q.or_filter_group(build))
    }

    pub fn group_by(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.group_by(column))
    }

    pub fn group_by_left(&mut self, column: &str, length: u32) -> Result<&mut Self> {
        self.apply(|q| q.group_by_left(column, length))
    }

    pub fn group_by_right(&mut self, column: &str, length: u32) -> Result<&mut Self> {
        self.apply(|q| q.group_by_right(column, length))
    }

    pub fn group_by_upper(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.group_by_upper(column))
    }

    pub fn group_by_lower(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.group_by_lower(column))
    }

    pub fn group_by_length(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.group_by_length(column))
    }

    pub fn group_by_trim(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.group_by_trim(column))
    }

    pub fn having(&mut self, predicate: Predicate) -> Result<&mut Self> {
        self.apply(|q| q.having(predicate))
    }

    pub fn or_having(&mut self, predicate: Predicate) -> Result<&mut Self> {
        self.apply(|q| q.or_having(predicate))
    }

    pub fn having_group(&mut self, build: impl FnOnce(Conditions) -> Conditions) -> Result<&mut Self> {
        self.apply(|q| q.having_group(build))
    }

    pub fn or_having_group(
        &mut self,
        build: impl FnOnce(Conditions) -> Conditions,
    ) -> Result<&mut Self> {
        self.apply(|q| q.or_having_group(build))
    }

    pub fn order_by(&mut self, expression: &str) -> Result<&mut Self> {
        self.apply(|q| q.order_by(expression))
    }

    pub fn order_by_asc(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.order_by_asc(column))
    }

    pub fn order_by_desc(&mut self, column: &str) -> Result<&mut Self> {
        self.apply(|q| q.order_by_desc(column))
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        let query = self.take_query();
        self.query = query.limit(limit);
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        let query = self.take_query();
        self.query = query.offset(offset);
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Run the pending SELECT and fold its rows into a result tree. A chain
    /// without a SELECT list selects every declared column.
    pub fn get(&mut self) -> Result<Json> {
        let mut query = self.take_query();
        if !query.has_select() {
            query = query.select(["*"])?;
        }
        let statement = query.render();
        self.dispatch(&statement)?;
        let rows = self.executor.fetch_rows()?;
        tree::assemble(&self.catalog, &self.entity, &statement.select_index, rows)
    }

    /// `limit(limit)` then [`get`](Self::get).
    pub fn first(&mut self, limit: u64) -> Result<Json> {
        self.limit(limit).get()
    }

    /// The tree entry of the record whose primary key is `id`.
    ///
    /// When the primary key is not among `columns` the tree is keyed by row
    /// ordinal, so the first entry is returned.
    pub fn find<I, S>(&mut self, id: impl Into<Value>, columns: I) -> Result<Option<Json>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into();
        let pk = self.entity.primary_key.clone();
        self.select(columns)?.filter(equal(pk, id.clone()))?;
        let tree = self.first(1)?;

        let Json::Object(mut entries) = tree else {
            return Ok(None);
        };
        if let Some(entry) = entries.remove(&id.to_key()) {
            return Ok(Some(entry));
        }
        Ok(entries.into_iter().next().map(|(_, entry)| entry))
    }

    fn exists(&mut self, id: &Value) -> Result<bool> {
        let pk = self.entity.primary_key.clone();
        Ok(self.find(id.clone(), [pk])?.is_some())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert one record now; returns the driver row count.
    pub fn insert(&mut self, record: &Record) -> Result<u64> {
        self.apply(|q| q.insert(record))?;
        self.execute()
    }

    /// Insert every record in one statement; returns the driver row count.
    /// An empty slice runs nothing.
    pub fn insert_multiple(&mut self, records: &[Record]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }
        self.apply(|q| q.insert_multiple(records))?;
        self.execute()
    }

    /// UPDATE the rows matched by the filters staged so far.
    pub fn update(&mut self, record: &Record) -> Result<u64> {
        self.apply(|q| q.update(record))?;
        self.execute()
    }

    /// UPDATE without requiring a filter.
    pub fn force_update(&mut self, record: &Record) -> Result<u64> {
        self.apply(|q| Ok(q.update(record)?.force()))?;
        self.execute()
    }

    /// UPDATE the record whose primary key is `id`.
    ///
    /// Outside debug mode a missing record is [`Error::RecordNotFound`].
    pub fn update_by_id(&mut self, id: impl Into<Value>, record: &Record) -> Result<u64> {
        let id = id.into();
        if !self.exists(&id)? && !self.debug {
            let table = self.entity.qualified_table();
            warn!(%table, id = %id, "record not found");
            return Err(Error::RecordNotFound {
                table,
                id: id.to_string(),
            });
        }
        let pk = self.entity.primary_key.clone();
        self.filter(equal(pk, id))?;
        self.update(record)
    }

    /// UPDATE the record whose primary key is `id`, or INSERT it (with the
    /// primary key added) when it does not exist.
    pub fn update_or_insert(&mut self, id: impl Into<Value>, record: &Record) -> Result<u64> {
        let id = id.into();
        if self.exists(&id)? {
            return self.update_by_id(id, record);
        }
        let pk = &self.entity.primary_key;
        let mut record = record.clone();
        if !record.iter().any(|(column, _)| column == pk) {
            record.push((pk.clone(), id));
        }
        self.insert(&record)
    }

    /// DELETE the rows matched by the filters staged so far.
    pub fn delete(&mut self) -> Result<u64> {
        self.apply(|q| Ok(q.delete()))?;
        self.execute()
    }

    /// DELETE without requiring a filter.
    pub fn force_delete(&mut self) -> Result<u64> {
        self.apply(|q| Ok(q.delete().force()))?;
        self.execute()
    }

    pub fn delete_by_id(&mut self, id: impl Into<Value>) -> Result<u64> {
        let pk = self.entity.primary_key.clone();
        self.filter(equal(pk, id))?;
        self.delete()
    }

    /// Run the pending statement and return the driver row count.
    pub fn execute(&mut self) -> Result<u64> {
        let query = self.take_query();
        query.check_guard()?;
        let statement = query.render();
        self.dispatch(&statement)?;
        Ok(self.executor.row_count())
    }

    fn dispatch(&mut self, statement: &Statement) -> Result<()> {
        info!(kind = %statement.kind, table = %self.entity.qualified_table(), debug = self.debug, "dispatch");
        if self.debug {
            self.captured.push(statement.inline(self.dialect.as_ref()));
            let probe = format!(
                "SELECT {} FROM {} WHERE 1=2",
                self.entity.qualified_primary_key(),
                self.entity.qualified_table()
            );
            return self.executor.execute(&probe, &[]);
        }
        self.executor.execute(&statement.sql, &statement.binds)
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    pub fn begin_transaction(&mut self) -> Result<()> {
        self.executor.begin_transaction()
    }

    pub fn commit(&mut self) -> Result<()> {
        self.executor.commit()
    }

    pub fn rollback(&mut self) -> Result<()> {
        self.executor.rollback()
    }

    /// Run `work` inside a transaction: commit on `Ok`, roll back on `Err`.
    pub fn transaction<T>(&mut self, work: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.begin_transaction()?;
        match work(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                self.rollback()?;
                Err(err)
            }
        }
    }
}
