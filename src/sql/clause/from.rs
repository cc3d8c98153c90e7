//! FROM source: a table or a parenthesized sub-query.

use super::Rendered;
use crate::error::Result;
use crate::sql::fragment::Fragments;
use crate::sql::qualify::{parse_alias, parse_from_alias, qualify_table};
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};

#[derive(Debug, Clone, Default)]
pub struct FromClause {
    fragments: Fragments<TokenStream>,
}

impl FromClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// `table [AS alias]`; an unqualified table takes the main entity's schema.
    /// Replaces any previous source.
    pub fn table(&mut self, scope: &Scope, expression: &str) -> Result<()> {
        let aliased = parse_alias(expression)?;
        let table = if aliased.name.contains('.') {
            aliased.name
        } else {
            qualify_table(&aliased.name, &scope.entity().schema)
        };
        let mut ts = TokenStream::new();
        ts.ident(table);
        if let Some(alias) = aliased.alias {
            ts.space().push(Token::As).space().ident(alias);
        }
        self.fragments.clear();
        self.fragments.append(ts);
        Ok(())
    }

    /// `(sub-query) AS alias`. Replaces any previous source.
    pub fn subquery(&mut self, subquery: Rendered, alias: &str) -> Result<()> {
        let alias = parse_from_alias(alias)?;
        let mut ts = TokenStream::new();
        ts.lparen()
            .append(subquery.sql)
            .rparen()
            .space()
            .push(Token::As)
            .space()
            .ident(alias);
        self.fragments.clear();
        self.fragments.append(ts);
        self.fragments.add_binds(subquery.binds);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        !self.fragments.has_fragments()
    }

    pub fn render(self) -> Rendered {
        let (sources, binds) = self.fragments.into_parts();
        let Some(source) = sources.into_iter().next() else {
            return Rendered::default();
        };
        let mut ts = TokenStream::new();
        ts.push(Token::From).space().append(source);
        Rendered::new(ts, binds)
    }
}
