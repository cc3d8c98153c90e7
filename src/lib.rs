//! # Quarry
//!
//! Fluent SQL composition with safe bind tracking and relation-aware result
//! trees.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │               Catalog (Entity Descriptors)               │
//! │   (table, schema, primary key, columns, relations)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model / query]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Clause Builders                         │
//! │  select, from, join, where, group by, having, order by,  │
//! │  insert, update, delete, pagination                      │
//! │          + Bind Registry (typed placeholders)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Statement (SQL + ordered binds + select index)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [executor]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Positional rows ──▶ Result tree             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every user value travels as a bind; identifiers are qualified against
//! the catalog before they reach the SQL text.

pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod model;
pub mod sql;
pub mod tree;
pub mod value;

pub use entity::{Catalog, CatalogError, ColumnType, Entity, Relation};
pub use error::{Error, ErrorKind, Result};
pub use executor::{DryRun, Executor, Scripted, ScriptedResult};
pub use model::Model;
pub use sql::{Query, Statement, StatementKind};
pub use value::{Record, Value};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::entity::{Catalog, ColumnType, Entity, Relation};
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::executor::{DryRun, Executor, Scripted, ScriptedResult};
    pub use crate::model::Model;
    pub use crate::record;
    pub use crate::sql::condition::{
        // WHERE
        between,
        between_columns,
        compare,
        contains,
        different,
        ends_with,
        equal,
        greater_than,
        greater_than_or_equal,
        lower_than,
        lower_than_or_equal,
        not_between,
        not_between_columns,
        not_contains,
        not_ends_with,
        not_starts_with,
        starts_with,
        // HAVING
        avg,
        count,
        max,
        min,
        sum,
        // Types
        Conditions,
        Predicate,
    };
    pub use crate::sql::{JoinKind, Query, Statement, StatementKind};
    pub use crate::value::{Record, Value};
}
