//! SQL dialect definitions and formatting rules.
//!
//! The composition engine targets a single dialect, but every literal
//! template that differs between databases goes through [`SqlDialect`]:
//!
//! - Bind placeholder prefix (`:name`)
//! - String, boolean, float and NULL literals (used when inlining binds)
//! - Pagination: `LIMIT n OFFSET m`
//! - Case-insensitive `LIKE`, emulated as `LOWER(x) LIKE LOWER(y)`
//!
//! Swapping dialects means swapping these templates, not the orchestration.

pub mod helpers;
mod postgres;

pub use postgres::Postgres;

use super::token::{Token, TokenStream};
use crate::value::Value;

/// SQL dialect trait - defines how dialect-sensitive constructs are rendered.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    // =========================================================================
    // Placeholders and Literals
    // =========================================================================

    /// Prefix placed before a named bind placeholder.
    fn placeholder_prefix(&self) -> &'static str {
        ":"
    }

    /// Quote a string literal with `''` escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a boolean literal.
    fn format_bool(&self, b: bool) -> &'static str;

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Render a bound value as an inline literal.
    ///
    /// Only used to produce human-readable statements; executed statements
    /// always keep their placeholders.
    fn format_literal(&self, value: &Value) -> String {
        match value {
            Value::Null => self.format_null().to_string(),
            Value::Bool(b) => self.format_bool(*b).to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => helpers::format_float(*f),
            Value::Text(s) => self.quote_string(s),
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit LIMIT/OFFSET or equivalent pagination clause.
    fn emit_limit_offset(&self, limit: Option<u64>, offset: Option<u64>) -> TokenStream {
        helpers::emit_limit_offset_standard(limit, offset)
    }

    // =========================================================================
    // Pattern Matching
    // =========================================================================

    /// Emit a case-insensitive `LIKE` between a column and a placeholder.
    fn emit_case_insensitive_like(
        &self,
        column: &str,
        placeholder: &str,
        negated: bool,
    ) -> TokenStream {
        helpers::emit_lower_like(column, placeholder, negated)
    }
}

/// Shorthand for a single-token stream, used by dialect helpers.
pub(crate) fn single(token: Token) -> TokenStream {
    TokenStream::from(token)
}
