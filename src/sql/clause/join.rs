//! JOIN clauses over declared relations.

use tracing::debug;

use super::Rendered;
use crate::error::Result;
use crate::sql::condition::{apply_predicate, Conditions};
use crate::sql::dialect::SqlDialect;
use crate::sql::fragment::{join_conditional, Fragments};
use crate::sql::qualify::parse_alias;
use crate::sql::scope::Scope;
use crate::sql::token::{Comparison, Token, TokenStream};

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    fn keyword(&self) -> Token {
        match self {
            JoinKind::Inner => Token::Inner,
            JoinKind::Left => Token::Left,
            JoinKind::Right => Token::Right,
            JoinKind::Full => Token::Full,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinClause {
    fragments: Fragments<TokenStream>,
}

impl JoinClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// `KIND JOIN schema.table [AS alias] ON fk = lk [AND (extra)]`
    ///
    /// `expression` names a relation declared on the main entity, optionally
    /// aliased. Extra conditions are qualified against the related entity
    /// and parenthesized when there is more than one.
    pub fn join(
        &mut self,
        scope: &mut Scope,
        kind: JoinKind,
        expression: &str,
        on: Conditions,
        dialect: &dyn SqlDialect,
    ) -> Result<()> {
        let aliased = parse_alias(expression)?;
        let joined = scope.join_relation(&aliased.name, aliased.alias)?;
        let main_table = scope.entity().table_name().to_string();

        let mut ts = TokenStream::new();
        ts.push(kind.keyword())
            .space()
            .push(Token::Join)
            .space()
            .ident(joined.entity.qualified_table());
        if let Some(alias) = &joined.alias {
            ts.space().push(Token::As).space().ident(alias);
        }
        ts.space()
            .push(Token::On)
            .space()
            .ident(format!("{}.{}", joined.reference(), joined.relation.foreign_key))
            .space()
            .push(Token::Cmp(Comparison::Eq))
            .space()
            .ident(format!("{}.{}", main_table, joined.relation.local_key));

        let mut extra = Fragments::new();
        for condition in on {
            apply_predicate(
                &mut extra,
                scope,
                &joined.entity,
                condition.conjunction,
                &condition.predicate,
                dialect,
            )?;
        }
        let (conditions, binds) = extra.into_parts();
        if !conditions.is_empty() {
            let wrap = conditions.len() > 1;
            ts.space().push(Token::And).space();
            if wrap {
                ts.lparen();
            }
            ts.append(join_conditional(conditions));
            if wrap {
                ts.rparen();
            }
        }

        debug!(relation = %joined.relation.name, ?kind, "joined relation");
        self.fragments.append(ts);
        self.fragments.add_binds(binds);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        !self.fragments.has_fragments()
    }

    pub fn render(self) -> Rendered {
        let (joins, binds) = self.fragments.into_parts();
        let mut ts = TokenStream::new();
        for (i, join) in joins.into_iter().enumerate() {
            if i > 0 {
                ts.space();
            }
            ts.append(join);
        }
        Rendered::new(ts, binds)
    }
}
