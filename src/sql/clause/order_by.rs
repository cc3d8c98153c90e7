//! ORDER BY clause.

use super::Rendered;
use crate::error::Result;
use crate::sql::fragment::Fragments;
use crate::sql::qualify::{parse_column, parse_order};
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};

#[derive(Debug, Clone, Default)]
pub struct OrderByClause {
    fragments: Fragments<TokenStream>,
}

impl OrderByClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// `"col"`, `"col asc"` or `"col desc"`.
    pub fn push_expression(&mut self, scope: &Scope, expression: &str) -> Result<()> {
        let ordered = parse_order(expression)?;
        self.push_column(scope, &ordered.name, ordered.descending)
    }

    pub fn push_column(&mut self, scope: &Scope, column: &str, descending: bool) -> Result<()> {
        let column = scope.qualify(&parse_column(column)?);
        let mut ts = TokenStream::new();
        ts.ident(column)
            .space()
            .push(if descending { Token::Desc } else { Token::Asc });
        self.fragments.append(ts);
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
        ts.push(Token::OrderBy).space().comma_separated(items);
        Rendered::new(ts, vec![])
    }
}
