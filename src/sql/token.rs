//! SQL Tokens - the atomic units of SQL output.
//!
//! Clause builders emit tokens instead of raw strings so that keyword
//! spelling, literal formatting and placeholder syntax stay in one place.

use super::dialect::SqlDialect;

/// Comparison operators accepted by WHERE, HAVING and join conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    /// `!=`
    NotEq,
    /// `<>`
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::NotEq => "!=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Gt => ">",
            Comparison::Lte => "<=",
            Comparison::Gte => ">=",
        }
    }

    /// Parse a free-form comparison; anything outside the whitelist becomes `=`.
    pub fn parse_or_eq(op: &str) -> Self {
        match op.trim() {
            "!=" => Comparison::NotEq,
            "<>" => Comparison::Ne,
            "<" => Comparison::Lt,
            ">" => Comparison::Gt,
            "<=" => Comparison::Lte,
            ">=" => Comparison::Gte,
            _ => Comparison::Eq,
        }
    }
}

/// SQL Token - every element a clause builder can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    GroupBy,
    Having,
    OrderBy,
    Asc,
    Desc,
    Limit,
    Offset,
    Between,
    Like,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,

    // === Punctuation ===
    Comma,
    LParen,
    RParen,
    Semicolon,

    // === Operators ===
    Cmp(Comparison),

    // === Whitespace ===
    Space,

    // === Dynamic Content ===
    /// Already-qualified identifier (`schema.table.column`), emitted verbatim.
    Ident(String),
    /// Named bind placeholder without its prefix.
    Placeholder(String),
    /// Non-negative integer literal (counts, lengths, pagination).
    LitInt(u64),
    /// String literal
    LitString(String),
    /// Boolean literal
    LitBool(bool),
    /// Function name, upper-cased on output.
    FunctionName(String),
}

impl Token {
    /// Serialize this token to a string for the given dialect.
    pub fn serialize(&self, dialect: &dyn SqlDialect) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Not => "NOT".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::Inner => "INNER".into(),
            Token::Left => "LEFT".into(),
            Token::Right => "RIGHT".into(),
            Token::Full => "FULL".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::Having => "HAVING".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Between => "BETWEEN".into(),
            Token::Like => "LIKE".into(),
            Token::Insert => "INSERT".into(),
            Token::Into => "INTO".into(),
            Token::Values => "VALUES".into(),
            Token::Update => "UPDATE".into(),
            Token::Set => "SET".into(),
            Token::Delete => "DELETE".into(),

            Token::Comma => ",".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
            Token::Semicolon => ";".into(),

            Token::Cmp(op) => op.as_str().into(),

            Token::Space => " ".into(),

            Token::Ident(name) => name.clone(),
            Token::Placeholder(name) => format!("{}{}", dialect.placeholder_prefix(), name),
            Token::LitInt(n) => n.to_string(),
            Token::LitString(s) => dialect.quote_string(s),
            Token::LitBool(b) => dialect.format_bool(*b).into(),
            Token::FunctionName(name) => name.to_uppercase(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens);
        self
    }

    /// Append `items` separated by `, `.
    pub fn comma_separated(&mut self, items: impl IntoIterator<Item = TokenStream>) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.comma().space();
            }
            self.append(item);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, dialect: &dyn SqlDialect) -> String {
        self.tokens.iter().map(|t| t.serialize(dialect)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn ident(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Token::Ident(name.into()))
    }
    pub fn placeholder(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Token::Placeholder(name.into()))
    }
}

impl From<Token> for TokenStream {
    fn from(token: Token) -> Self {
        Self {
            tokens: vec![token],
        }
    }
}
