//! PostgreSQL SQL dialect.
//!
//! PostgreSQL features used here:
//! - Named bind placeholders (`:name`), resolved by the driver
//! - Native boolean type (true/false)
//! - LIMIT/OFFSET pagination

use super::helpers;
use super::SqlDialect;

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    // Uses default emit_limit_offset (LIMIT ... OFFSET ...)
}
