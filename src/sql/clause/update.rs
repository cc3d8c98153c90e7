//! UPDATE ... SET. The WHERE clause is appended by the query.

use super::Rendered;
use crate::error::{Error, Result};
use crate::sql::bind::Purpose;
use crate::sql::fragment::Fragments;
use crate::sql::scope::Scope;
use crate::sql::token::{Comparison, Token, TokenStream};
use crate::value::Record;

#[derive(Debug, Clone, Default)]
pub struct UpdateClause {
    fragments: Fragments<TokenStream>,
}

impl UpdateClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// `UPDATE table SET c1 = :update0, c2 = :update1`
    pub fn update(&mut self, scope: &mut Scope, record: &Record) -> Result<()> {
        if record.is_empty() {
            return Err(Error::EmptyRecord("update"));
        }
        let mut binds = vec![];
        let mut assignments = vec![];
        for (column, value) in record {
            let qualified = scope.qualify(column);
            let bind = scope.bind(Purpose::Update, &qualified, value.clone())?;
            let mut assignment = TokenStream::new();
            assignment
                .ident(column)
                .space()
                .push(Token::Cmp(Comparison::Eq))
                .space()
                .placeholder(&bind.name);
            assignments.push(assignment);
            binds.push(bind);
        }

        let mut ts = TokenStream::new();
        ts.push(Token::Update)
            .space()
            .ident(scope.entity().qualified_table())
            .space()
            .push(Token::Set)
            .space()
            .comma_separated(assignments);
        self.fragments.clear();
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
        for statement in statements {
            ts.append(statement);
        }
        Rendered::new(ts, binds)
    }
}
