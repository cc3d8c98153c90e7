//! DELETE FROM. The WHERE clause is appended by the query.

use super::Rendered;
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};

#[derive(Debug, Clone, Default)]
pub struct DeleteClause {
    table: Option<String>,
}

impl DeleteClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete(&mut self, scope: &Scope) {
        self.table = Some(scope.entity().qualified_table());
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_none()
    }

    pub fn render(self) -> Rendered {
        let Some(table) = self.table else {
            return Rendered::default();
        };
        let mut ts = TokenStream::new();
        ts.push(Token::Delete)
            .space()
            .push(Token::From)
            .space()
            .ident(table);
        Rendered::new(ts, vec![])
    }
}
