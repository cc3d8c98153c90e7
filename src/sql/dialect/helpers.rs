//! Shared helper functions for SQL dialect implementations.

use super::super::token::{Token, TokenStream};
use super::single;

// =============================================================================
// Literals
// =============================================================================

/// Quote string with single quotes (standard SQL).
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Format boolean as literal true/false.
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Format a float with the shortest round-tripping representation.
///
/// Non-finite values have no SQL literal and render as NULL.
pub fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return "NULL".into();
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format(f).to_string()
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit LIMIT ... OFFSET ... (standard SQL).
pub fn emit_limit_offset_standard(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(lim) = limit {
        ts.push(Token::Limit)
            .space()
            .push(Token::LitInt(lim));
    }

    if let Some(off) = offset {
        if limit.is_some() {
            ts.space();
        }
        ts.push(Token::Offset)
            .space()
            .push(Token::LitInt(off));
    }

    ts
}

// =============================================================================
// Pattern Matching
// =============================================================================

/// `LOWER(col) [NOT ]LIKE LOWER(:placeholder)`
pub fn emit_lower_like(column: &str, placeholder: &str, negated: bool) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.append(lower(single(Token::Ident(column.into()))));
    ts.space();
    if negated {
        ts.push(Token::Not).space();
    }
    ts.push(Token::Like).space();
    ts.append(lower(single(Token::Placeholder(placeholder.into()))));
    ts
}

fn lower(inner: TokenStream) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::FunctionName("LOWER".into()))
        .lparen()
        .append(inner)
        .rparen();
    ts
}
