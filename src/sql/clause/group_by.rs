//! GROUP BY clause.

use super::Rendered;
use crate::error::Result;
use crate::sql::fragment::Fragments;
use crate::sql::qualify::parse_column;
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};

/// Transformation applied to a grouped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupFunction {
    #[default]
    Plain,
    /// `LEFT(col, n)`
    Left(u32),
    /// `RIGHT(col, n)`
    Right(u32),
    Upper,
    Lower,
    Length,
    Trim,
}

impl GroupFunction {
    fn to_tokens(self, column: String) -> TokenStream {
        let mut ts = TokenStream::new();
        let name = match self {
            GroupFunction::Plain => {
                ts.ident(column);
                return ts;
            }
            GroupFunction::Left(_) => "LEFT",
            GroupFunction::Right(_) => "RIGHT",
            GroupFunction::Upper => "UPPER",
            GroupFunction::Lower => "LOWER",
            GroupFunction::Length => "LENGTH",
            GroupFunction::Trim => "TRIM",
        };
        ts.push(Token::FunctionName(name.into())).lparen().ident(column);
        if let GroupFunction::Left(n) | GroupFunction::Right(n) = self {
            ts.comma().space().push(Token::LitInt(u64::from(n)));
        }
        ts.rparen();
        ts
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupByClause {
    fragments: Fragments<TokenStream>,
}

impl GroupByClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: &Scope, column: &str, function: GroupFunction) -> Result<()> {
        let column = scope.qualify(&parse_column(column)?);
        self.fragments.append(function.to_tokens(column));
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        !self.fragments.has_fragments()
    }

    pub fn render(self) -> Rendered {
        let (items, _) = self.fragments.into_parts();
        if items.is_empty() {
            return Rendered::default();
        }
        let mut ts = TokenStream::new();
        ts.push(Token::GroupBy).space().comma_separated(items);
        Rendered::new(ts, vec![])
    }
}
