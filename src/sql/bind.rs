//! Bind registry: collision-free placeholders with declared datatypes.
//!
//! Placeholders are `<prefix><purpose><n>` where `n` is a counter shared by
//! every builder of one statement, so two binds of the same statement never
//! share a name. The datatype of each bind is looked up in the merged
//! definition map (the main entity plus every joined relation) when the bind
//! is registered.

use std::collections::BTreeMap;
use tracing::trace;

use super::dialect::SqlDialect;
use crate::entity::{ColumnType, Entity, ParamKind};
use crate::error::{Error, Result};
use crate::value::Value;

/// Why a value is being bound. Becomes the placeholder's name stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Where,
    StartsWith,
    EndsWith,
    Contains,
    BetweenStart,
    BetweenEnd,
    BetweenColumns,
    Having,
    Insert,
    Update,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Where => "where",
            Purpose::StartsWith => "starts_with",
            Purpose::EndsWith => "ends_with",
            Purpose::Contains => "contains",
            Purpose::BetweenStart => "between_start",
            Purpose::BetweenEnd => "between_end",
            Purpose::BetweenColumns => "between_columns",
            Purpose::Having => "having",
            Purpose::Insert => "insert",
            Purpose::Update => "update",
        }
    }
}

/// A value destined for parameterized substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct BindValue {
    /// Qualified column the value is compared with or stored into.
    pub column: String,
    /// Placeholder name without the dialect prefix.
    pub name: String,
    pub value: Value,
    pub column_type: ColumnType,
}

impl BindValue {
    /// Placeholder as it appears in rendered SQL.
    pub fn placeholder(&self, dialect: &dyn SqlDialect) -> String {
        format!("{}{}", dialect.placeholder_prefix(), self.name)
    }

    pub fn param_kind(&self) -> ParamKind {
        self.column_type.param_kind()
    }
}

/// Qualified column name → datatype, for the main entity and every joined relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    columns: BTreeMap<String, ColumnType>,
}

impl Definitions {
    pub fn for_entity(entity: &Entity) -> Self {
        let mut definitions = Self::default();
        definitions.merge(entity);
        definitions
    }

    pub fn merge(&mut self, entity: &Entity) {
        self.columns.extend(entity.definitions());
    }

    pub fn get(&self, qualified: &str) -> Option<ColumnType> {
        self.columns.get(qualified).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Allocates placeholders for one statement.
#[derive(Debug, Clone, Default)]
pub struct BindRegistry {
    next: usize,
    definitions: Definitions,
}

impl BindRegistry {
    pub fn new(entity: &Entity) -> Self {
        Self {
            next: 0,
            definitions: Definitions::for_entity(entity),
        }
    }

    /// Make a joined relation's columns bindable.
    pub fn merge(&mut self, entity: &Entity) {
        self.definitions.merge(entity);
    }

    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    pub fn column_type(&self, qualified: &str) -> Result<ColumnType> {
        self.definitions
            .get(qualified)
            .ok_or_else(|| Error::UndeclaredColumn(qualified.to_string()))
    }

    /// Register a bind for `column` and return the entry.
    pub fn register(
        &mut self,
        purpose: Purpose,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<BindValue> {
        let column_type = self.column_type(column)?;
        let name = format!("{}{}", purpose.as_str(), self.next);
        self.next += 1;
        trace!(placeholder = %name, column, "registered bind");
        Ok(BindValue {
            column: column.to_string(),
            name,
            value: value.into(),
            column_type,
        })
    }

    /// Registry for a nested statement that continues this one's numbering.
    pub fn fork(&self, entity: &Entity) -> Self {
        Self {
            next: self.next,
            definitions: Definitions::for_entity(entity),
        }
    }

    /// Continue numbering after a forked registry was used.
    pub fn absorb(&mut self, forked: &BindRegistry) {
        self.next = self.next.max(forked.next);
    }
}
