//! INSERT statements, single and multi-row.

use super::Rendered;
use crate::error::{Error, Result};
use crate::sql::bind::Purpose;
use crate::sql::fragment::Fragments;
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};
use crate::value::Record;

#[derive(Debug, Clone, Default)]
pub struct InsertClause {
    fragments: Fragments<TokenStream>,
}

impl InsertClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// `INSERT INTO table (c1, c2) VALUES (:insert0, :insert1);`
    pub fn insert(&mut self, scope: &mut Scope, record: &Record) -> Result<()> {
        if record.is_empty() {
            return Err(Error::EmptyRecord("insert"));
        }
        let columns: Vec<&str> = record.iter().map(|(c, _)| c.as_str()).collect();
        let mut binds = vec![];
        let mut placeholders = vec![];
        for (column, value) in record {
            let qualified = scope.qualify(column);
            let bind = scope.bind(Purpose::Insert, &qualified, value.clone())?;
            placeholders.push(TokenStream::from(Token::Placeholder(bind.name.clone())));
            binds.push(bind);
        }

        let mut ts = head(scope, &columns);
        ts.lparen().comma_separated(placeholders).rparen();
        self.fragments.append(ts);
        self.fragments.add_binds(binds);
        Ok(())
    }

    /// One statement with a tuple per record. Column order comes from the
    /// first record and every other record must repeat it; an empty slice
    /// adds nothing.
    pub fn insert_multiple(&mut self, scope: &mut Scope, records: &[Record]) -> Result<()> {
        let Some(first) = records.first() else {
            return Ok(());
        };
        if first.is_empty() {
            return Err(Error::EmptyRecord("insert"));
        }
        let columns: Vec<&str> = first.iter().map(|(c, _)| c.as_str()).collect();

        for (row, record) in records.iter().enumerate() {
            let same = record.len() == columns.len()
                && record.iter().zip(&columns).all(|((c, _), expected)| c.as_str() == *expected);
            if !same {
                return Err(Error::MismatchedInsertRow {
                    row,
                    expected: columns.join(", "),
                });
            }
        }

        let mut binds = vec![];
        let mut tuples = vec![];
        for record in records {
            let mut tuple = TokenStream::new();
            tuple.lparen();
            for (i, (column, value)) in record.iter().enumerate() {
                let qualified = scope.qualify(column);
                let bind = scope.bind(Purpose::Insert, &qualified, value.clone())?;
                if i > 0 {
                    tuple.comma();
                }
                tuple.placeholder(&bind.name);
                binds.push(bind);
            }
            tuple.rparen();
            tuples.push(tuple);
        }

        let mut ts = head(scope, &columns);
        ts.comma_separated(tuples);
        self.fragments.append(ts);
        self.fragments.add_binds(binds);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        !self.fragments.has_fragments()
    }

    pub fn render(self) -> Rendered {
        let (statements, binds) = self.fragments.into_parts();
        let mut ts = TokenStream::new();
        for (i, statement) in statements.into_iter().enumerate() {
            if i > 0 {
                ts.space();
            }
            ts.append(statement).push(Token::Semicolon);
        }
        Rendered::new(ts, binds)
    }
}

/// `INSERT INTO table (c1, c2) VALUES `
fn head(scope: &Scope, columns: &[&str]) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Insert)
        .space()
        .push(Token::Into)
        .space()
        .ident(scope.entity().qualified_table())
        .space()
        .lparen()
        .comma_separated(columns.iter().map(|c| TokenStream::from(Token::Ident(c.to_string()))))
        .rparen()
        .space()
        .push(Token::Values)
        .space();
    ts
}
