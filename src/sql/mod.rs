//! SQL composition engine.
//!
//! - [`query`] - the orchestrator and the [`Statement`] it renders to
//! - [`clause`] - one builder per SQL clause
//! - [`condition`] - predicates for WHERE, HAVING and join ON
//! - [`scope`] - per-statement state: entity, joined relations, binds
//! - [`bind`] - placeholder allocation and datatype lookup
//! - [`qualify`] - column qualification and expression grammars
//! - [`fragment`] - the accumulator every builder is built on
//! - [`token`] - tokens that serialize against a [`dialect`]

pub mod bind;
pub mod clause;
pub mod condition;
pub mod dialect;
pub mod fragment;
pub mod qualify;
pub mod query;
pub mod scope;
pub mod token;

pub use bind::{BindValue, Purpose};
pub use clause::{GroupFunction, JoinKind, SelectColumn};
pub use condition::{Aggregate, Condition, Conditions, Predicate};
pub use dialect::{Postgres, SqlDialect};
pub use fragment::Conjunction;
pub use query::{Query, Statement, StatementKind};
pub use token::{Token, TokenStream};
