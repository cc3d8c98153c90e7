//! HAVING clause.

use super::filter::render_conditional;
use super::Rendered;
use crate::error::Result;
use crate::sql::condition::{apply_predicate, Predicate};
use crate::sql::dialect::SqlDialect;
use crate::sql::fragment::{Conjunction, Fragment, Fragments};
use crate::sql::scope::Scope;
use crate::sql::token::Token;

/// Aggregate predicates, rendered as `HAVING ...`.
#[derive(Debug, Clone, Default)]
pub struct HavingClause {
    fragments: Fragments<Fragment>,
}

impl HavingClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        scope: &mut Scope,
        conjunction: Conjunction,
        predicate: &Predicate,
        dialect: &dyn SqlDialect,
    ) -> Result<()> {
        let entity = scope.entity().clone();
        apply_predicate(
            &mut self.fragments,
            scope,
            &entity,
            conjunction,
            predicate,
            dialect,
        )
    }

    pub fn is_empty(&self) -> bool {
        !self.fragments.has_fragments()
    }

    pub fn render(self) -> Rendered {
        render_conditional(Token::Having, self.fragments)
    }
}
