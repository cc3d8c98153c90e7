//! The execution collaborator.
//!
//! The composition engine never talks to a database itself. Rendered SQL and
//! its ordered binds are handed to an [`Executor`], which reports row counts
//! and hands back positional rows.
//!
//! Two executors ship with the crate:
//!
//! - [`DryRun`] records every statement and returns no rows.
//! - [`Scripted`] replays queued results, one per executed statement.

use std::collections::{BTreeMap, VecDeque};
use tracing::trace;

use crate::error::Result;
use crate::sql::BindValue;
use crate::value::Value;

/// Runs rendered statements.
///
/// Calls are strictly sequential: `execute` is followed by any number of
/// `row_count` / `column_count` / `fetch_*` calls describing that statement.
pub trait Executor {
    // =========================================================================
    // Statements
    // =========================================================================

    /// Execute `sql` with binds in placeholder order.
    fn execute(&mut self, sql: &str, binds: &[BindValue]) -> Result<()>;

    /// Rows affected (or returned) by the last statement.
    fn row_count(&self) -> u64;

    /// Width of the last statement's result set.
    fn column_count(&self) -> usize;

    /// Rows of the last statement, positional.
    fn fetch_rows(&mut self) -> Result<Vec<Vec<Value>>>;

    /// Rows of the last statement keyed by column name.
    ///
    /// Drivers that only produce positional rows keep the default.
    fn fetch_records(&mut self) -> Result<Vec<BTreeMap<String, Value>>> {
        Ok(vec![])
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    fn begin_transaction(&mut self) -> Result<()> {
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn execute(&mut self, sql: &str, binds: &[BindValue]) -> Result<()> {
        (**self).execute(sql, binds)
    }

    fn row_count(&self) -> u64 {
        (**self).row_count()
    }

    fn column_count(&self) -> usize {
        (**self).column_count()
    }

    fn fetch_rows(&mut self) -> Result<Vec<Vec<Value>>> {
        (**self).fetch_rows()
    }

    fn fetch_records(&mut self) -> Result<Vec<BTreeMap<String, Value>>> {
        (**self).fetch_records()
    }

    fn begin_transaction(&mut self) -> Result<()> {
        (**self).begin_transaction()
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn rollback(&mut self) -> Result<()> {
        (**self).rollback()
    }
}

/// A statement as an executor received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Transaction control calls, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionEvent {
    Begin,
    Commit,
    Rollback,
}

/// Records statements without running them.
#[derive(Debug, Clone, Default)]
pub struct DryRun {
    executed: Vec<Executed>,
    transactions: Vec<TransactionEvent>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executed(&self) -> &[Executed] {
        &self.executed
    }

    pub fn transactions(&self) -> &[TransactionEvent] {
        &self.transactions
    }
}

impl Executor for DryRun {
    fn execute(&mut self, sql: &str, binds: &[BindValue]) -> Result<()> {
        trace!(sql, "dry run");
        self.executed.push(Executed {
            sql: sql.to_string(),
            binds: binds.to_vec(),
        });
        Ok(())
    }

    fn row_count(&self) -> u64 {
        0
    }

    fn column_count(&self) -> usize {
        0
    }

    fn fetch_rows(&mut self) -> Result<Vec<Vec<Value>>> {
        Ok(vec![])
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.transactions.push(TransactionEvent::Begin);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.transactions.push(TransactionEvent::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.transactions.push(TransactionEvent::Rollback);
        Ok(())
    }
}

/// Result handed back for one executed statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedResult {
    pub rows: Vec<Vec<Value>>,
    pub row_count: u64,
}

impl ScriptedResult {
    /// A result set; the row count is the number of rows.
    pub fn rows(rows: Vec<Vec<Value>>) -> Self {
        let row_count = rows.len() as u64;
        Self { rows, row_count }
    }

    /// A write that affected `row_count` rows.
    pub fn affected(row_count: u64) -> Self {
        Self {
            rows: vec![],
            row_count,
        }
    }
}

/// Replays queued results in order. Once the queue is empty every statement
/// returns no rows and a zero count.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    queue: VecDeque<ScriptedResult>,
    current: ScriptedResult,
    executed: Vec<Executed>,
    transactions: Vec<TransactionEvent>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next statement.
    pub fn push(mut self, result: ScriptedResult) -> Self {
        self.queue.push_back(result);
        self
    }

    pub fn executed(&self) -> &[Executed] {
        &self.executed
    }

    pub fn transactions(&self) -> &[TransactionEvent] {
        &self.transactions
    }
}

impl Executor for Scripted {
    fn execute(&mut self, sql: &str, binds: &[BindValue]) -> Result<()> {
        self.current = self.queue.pop_front().unwrap_or_default();
        trace!(sql, rows = self.current.rows.len(), "scripted");
        self.executed.push(Executed {
            sql: sql.to_string(),
            binds: binds.to_vec(),
        });
        Ok(())
    }

    fn row_count(&self) -> u64 {
        self.current.row_count
    }

    fn column_count(&self) -> usize {
        self.current.rows.first().map(Vec::len).unwrap_or(0)
    }

    fn fetch_rows(&mut self) -> Result<Vec<Vec<Value>>> {
        Ok(std::mem::take(&mut self.current.rows))
    }

    fn begin_transaction(&mut self) -> Result<()> {
        self.transactions.push(TransactionEvent::Begin);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.transactions.push(TransactionEvent::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.transactions.push(TransactionEvent::Rollback);
        Ok(())
    }
}
