//! SELECT list.

use std::fmt;

use super::Rendered;
use crate::error::{Error, Result};
use crate::sql::condition::Aggregate;
use crate::sql::fragment::Fragments;
use crate::sql::qualify::{parse_alias, parse_column, qualify};
use crate::sql::scope::Scope;
use crate::sql::token::{Token, TokenStream};

/// One entry of the SELECT list, as it appears in the rendered statement.
///
/// The ordered list of these is the select index used to shape fetched rows
/// into result trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectColumn {
    /// Qualified column or aggregate expression.
    pub expression: String,
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            alias: None,
        }
    }

    pub fn aliased(expression: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            alias: Some(alias.into()),
        }
    }

    /// Split a rendered entry on ` AS `.
    pub fn parse(entry: &str) -> Self {
        match entry.rsplit_once(" AS ") {
            Some((expression, alias)) => Self::aliased(expression.trim(), alias.trim()),
            None => Self::new(entry.trim()),
        }
    }

    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.ident(&self.expression);
        if let Some(alias) = &self.alias {
            ts.space().push(Token::As).space().ident(alias);
        }
        ts
    }
}

impl fmt::Display for SelectColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{} AS {}", self.expression, alias),
            None => write!(f, "{}", self.expression),
        }
    }
}

impl From<&str> for SelectColumn {
    fn from(entry: &str) -> Self {
        SelectColumn::parse(entry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectClause {
    fragments: Fragments<SelectColumn>,
}

impl SelectClause {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add columns. Accepted forms:
    ///
    /// - `col`, `table.col`, `schema.table.col`, each with optional `AS alias`
    /// - `*` for every declared column of the main entity
    /// - `relation.*` for every declared column of a joined relation
    /// - `*.*` alone for the main entity plus every joined relation
    ///
    /// Nothing is added if any entry is rejected.
    pub fn columns<I, S>(&mut self, scope: &Scope, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<S> = columns.into_iter().collect();
        let mut expanded = vec![];

        if let [only] = columns.as_slice() {
            if only.as_ref().trim() == "*.*" {
                expanded.extend(all_columns(scope, &scope.entity().name)?);
                let mut seen = vec![];
                for joined in scope.joined() {
                    if seen.contains(&joined.relation.name) {
                        continue;
                    }
                    seen.push(joined.relation.name.clone());
                    expanded.extend(all_columns(scope, &joined.relation.name)?);
                }
                self.extend(expanded);
                return Ok(());
            }
        }

        for column in &columns {
            expanded.extend(expand(scope, column.as_ref())?);
        }
        self.extend(expanded);
        Ok(())
    }

    /// Add `AGG(column)[ AS alias]`, qualified against the main entity.
    pub fn aggregate(&mut self, scope: &Scope, function: Aggregate, expression: &str) -> Result<()> {
        let aliased = parse_alias(expression)?;
        let column = if aliased.name == "*" {
            aliased.name
        } else {
            scope.qualify(&parse_column(&aliased.name)?)
        };
        self.fragments.append(SelectColumn {
            expression: format!("{}({})", function.as_str(), column),
            alias: aliased.alias,
        });
        Ok(())
    }

    fn extend(&mut self, columns: Vec<SelectColumn>) {
        for column in columns {
            self.fragments.append(column);
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.fragments.has_fragments()
    }

    /// The select list as it will be rendered.
    pub fn index(&self) -> Vec<SelectColumn> {
        self.fragments.fragments().to_vec()
    }

    pub fn render(mut self) -> Rendered {
        let columns = self.fragments.drain();
        if columns.is_empty() {
            return Rendered::default();
        }
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .comma_separated(columns.iter().map(SelectColumn::to_tokens));
        Rendered::new(ts, vec![])
    }
}

fn expand(scope: &Scope, column: &str) -> Result<Vec<SelectColumn>> {
    let aliased = parse_alias(column)?;
    let parts: Vec<&str> = aliased.name.split('.').collect();
    let (owner, name) = match parts.as_slice() {
        [name] => (scope.entity().name.as_str(), *name),
        [owner, name] => (*owner, *name),
        [_, owner, name] => (*owner, *name),
        _ => return Err(Error::BadColumn(column.to_string())),
    };

    if name == "*" {
        return all_columns(scope, owner);
    }

    let entity = scope.owner(owner)?;
    Ok(vec![SelectColumn {
        expression: qualify(name, entity.table_name(), &entity.schema),
        alias: aliased.alias,
    }])
}

fn all_columns(scope: &Scope, owner: &str) -> Result<Vec<SelectColumn>> {
    let entity = scope.owner(owner)?;
    Ok(entity
        .column_names()
        .map(|c| SelectColumn::new(entity.qualify(c)))
        .collect())
}
