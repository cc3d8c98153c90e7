//! Fragment accumulator shared by every clause builder.
//!
//! A builder appends fragments (and the bind values they reference) in call
//! order. Rendering drains the accumulator: a builder's output can be taken
//! exactly once, after which it is empty again.

use super::bind::BindValue;
use super::token::{Token, TokenStream};

/// How a conditional fragment attaches to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    /// First fragment of a builder.
    #[default]
    None,
    And,
    Or,
}

impl Conjunction {
    pub fn token(&self) -> Option<Token> {
        match self {
            Conjunction::None => None,
            Conjunction::And => Some(Token::And),
            Conjunction::Or => Some(Token::Or),
        }
    }
}

/// One unit of conditional SQL: `{sql, conjunction}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub conjunction: Conjunction,
    pub sql: TokenStream,
}

/// Ordered fragments plus the bind values they reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragments<T> {
    items: Vec<T>,
    binds: Vec<BindValue>,
}

impl<T> Default for Fragments<T> {
    fn default() -> Self {
        Self {
            items: vec![],
            binds: vec![],
        }
    }
}

impl<T> Fragments<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, fragment: T) {
        self.items.push(fragment);
    }

    pub fn has_fragments(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn fragments(&self) -> &[T] {
        &self.items
    }

    /// Return the current fragments and leave the accumulator empty.
    pub fn drain(&mut self) -> Vec<T> {
        self.binds.clear();
        std::mem::take(&mut self.items)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.binds.clear();
    }

    pub fn add_binds(&mut self, binds: impl IntoIterator<Item = BindValue>) {
        self.binds.extend(binds);
    }

    /// Consume the accumulator into its fragments and binds.
    pub fn into_parts(self) -> (Vec<T>, Vec<BindValue>) {
        (self.items, self.binds)
    }
}

impl Fragments<Fragment> {
    /// Append a conditional fragment. The first fragment never carries a
    /// conjunction, whatever was requested.
    pub fn append_conditional(&mut self, requested: Conjunction, sql: TokenStream) {
        let conjunction = if self.has_fragments() {
            match requested {
                Conjunction::None => Conjunction::And,
                other => other,
            }
        } else {
            Conjunction::None
        };
        self.append(Fragment { conjunction, sql });
    }
}

/// Join conditional fragments with their conjunctions.
pub fn join_conditional(fragments: Vec<Fragment>) -> TokenStream {
    let mut ts = TokenStream::new();
    for fragment in fragments {
        if let Some(token) = fragment.conjunction.token() {
            ts.space().push(token).space();
        }
        ts.append(fragment.sql);
    }
    ts
}
