//! WHERE clause.

use super::Rendered;
use crate::error::Result;
use crate::sql::condition::{apply_predicate, Predicate};
use crate::sql::dialect::SqlDialect;
use crate::sql::fragment::{join_conditional, Conjunction, Fragment, Fragments};
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};

/// Predicates qualified against the main entity, rendered as `WHERE ...`.
#[derive(Debug, Clone, Default)]
pub struct FilterClause {
    fragments: Fragments<Fragment>,
}

impl FilterClause {
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
        render_conditional(Token::Where, self.fragments)
    }
}

/// `KEYWORD a [AND|OR b ...]`, or nothing when there are no fragments.
pub(super) fn render_conditional(keyword: Token, fragments: Fragments<Fragment>) -> Rendered {
    let (items, binds) = fragments.into_parts();
    if items.is_empty() {
        return Rendered::default();
    }
    let mut ts = TokenStream::new();
    ts.push(keyword).space().append(join_conditional(items));
    Rendered::new(ts, binds)
}
