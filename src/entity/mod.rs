//! Entity descriptors: static metadata for one mapped table.
//!
//! An [`Entity`] names its table, schema and primary key, declares its
//! columns with a semantic [`ColumnType`], and lists [`Relation`]s to other
//! entities by name. Relations are resolved lazily through a [`Catalog`]
//! the first time a query joins them.

mod catalog;

pub use catalog::{Catalog, CatalogError};

use serde::{Deserialize, Serialize};

use crate::sql::qualify::{qualify, qualify_table};

/// Semantic datatype of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Decimal,
    Boolean,
    Text,
    #[serde(alias = "string")]
    Varchar,
    Date,
    Timestamp,
}

/// How a driver should bind a value of a given [`ColumnType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Str,
    Bool,
}

impl ColumnType {
    pub fn param_kind(&self) -> ParamKind {
        match self {
            ColumnType::Integer => ParamKind::Int,
            ColumnType::Boolean => ParamKind::Bool,
            ColumnType::Decimal
            | ColumnType::Text
            | ColumnType::Varchar
            | ColumnType::Date
            | ColumnType::Timestamp => ParamKind::Str,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
            ColumnType::Varchar => "varchar",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

/// A named relation from one entity to another.
///
/// The join condition is `<related table>.<foreign_key> = <owner table>.<local_key>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Name used by `join`/`with` and as the nesting key in result trees.
    pub name: String,
    /// Catalog name of the related entity.
    pub entity: String,
    /// Column on the related table.
    pub foreign_key: String,
    /// Column on the owning table.
    pub local_key: String,
}

impl Relation {
    pub fn new(
        name: impl Into<String>,
        entity: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            foreign_key: foreign_key.into(),
            local_key: local_key.into(),
        }
    }
}

/// Metadata for one relational table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Entity {
    /// Catalog name.
    pub name: String,
    /// Table name; defaults to `name`.
    #[serde(default)]
    pub table: String,
    /// Schema; may be empty.
    #[serde(default)]
    pub schema: String,
    pub primary_key: String,
    /// Declared columns, in declaration order.
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Declared relations, in declaration order.
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Entity {
    /// Create an entity whose table equals its name and whose primary key is `id`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            schema: String::new(),
            primary_key: "id".into(),
            columns: vec![],
            relations: vec![],
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.columns.push(Column {
            name: name.into(),
            column_type,
        });
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Table name, falling back to the catalog name.
    pub fn table_name(&self) -> &str {
        if self.table.is_empty() {
            &self.name
        } else {
            &self.table
        }
    }

    /// `schema.table`
    pub fn qualified_table(&self) -> String {
        qualify_table(self.table_name(), &self.schema)
    }

    /// `schema.table.column` for a column of this entity.
    pub fn qualify(&self, column: &str) -> String {
        qualify(column, self.table_name(), &self.schema)
    }

    /// `schema.table.primary_key`
    pub fn qualified_primary_key(&self) -> String {
        self.qualify(&self.primary_key)
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .map(|c| c.column_type)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Qualified column names paired with their types.
    pub fn definitions(&self) -> impl Iterator<Item = (String, ColumnType)> + '_ {
        self.columns
            .iter()
            .map(|c| (self.qualify(&c.name), c.column_type))
    }

    pub fn find_relation(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}
