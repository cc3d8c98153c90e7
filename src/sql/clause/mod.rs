//! Clause builders.
//!
//! Each builder owns a [`Fragments`](super::fragment::Fragments)
//! accumulator, validates and qualifies its input against the statement's
//! [`Scope`](super::scope::Scope), and renders its clause exactly once by
//! consuming itself. The query orchestrator decides the order in which
//! rendered clauses are concatenated.

mod delete;
mod filter;
mod from;
mod group_by;
mod having;
mod insert;
mod join;
mod order_by;
mod pagination;
mod select;
mod update;

pub use delete::DeleteClause;
pub use filter::FilterClause;
pub use from::FromClause;
pub use group_by::{GroupByClause, GroupFunction};
pub use having::HavingClause;
pub use insert::InsertClause;
pub use join::{JoinClause, JoinKind};
pub use order_by::OrderByClause;
pub use pagination::Pagination;
pub use select::{SelectClause, SelectColumn};
pub use update::UpdateClause;

use super::bind::BindValue;
use super::token::TokenStream;

/// A clause's SQL and the binds it references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub sql: TokenStream,
    pub binds: Vec<BindValue>,
}

impl Rendered {
    pub fn new(sql: TokenStream, binds: Vec<BindValue>) -> Self {
        Self { sql, binds }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}
