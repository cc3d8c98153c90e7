//! A named collection of entity descriptors.
//!
//! Catalogs are usually loaded from TOML:
//!
//! ```toml
//! schema = "public"
//!
//! [[entities]]
//! name = "users"
//! primary_key = "user_id"
//! columns = [
//!     { name = "user_id", type = "varchar" },
//!     { name = "user_age", type = "integer" },
//! ]
//! relations = [
//!     { name = "tokens", entity = "tokens", foreign_key = "token_tokenable_id", local_key = "user_id" },
//! ]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Entity;
use crate::error::{Error, Result};

/// Error type for catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] Error),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    schema: String,
    #[serde(default)]
    entities: Vec<Entity>,
}

/// Entities addressable by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: BTreeMap<String, Arc<Entity>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Catalog::insert`].
    pub fn with(mut self, entity: Entity) -> Result<Self> {
        self.insert(entity)?;
        Ok(self)
    }

    /// Add an entity; a second entity with the same name is rejected.
    pub fn insert(&mut self, mut entity: Entity) -> Result<()> {
        if entity.table.is_empty() {
            entity.table = entity.name.clone();
        }
        if self.entities.contains_key(&entity.name) {
            return Err(Error::DuplicateEntity(entity.name));
        }
        self.entities.insert(entity.name.clone(), Arc::new(entity));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<Entity>> {
        self.entities
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownEntity(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Entity>> {
        self.entities.values()
    }

    /// Check that every relation points at a known entity and that each
    /// primary key and relation key is a declared column.
    pub fn validate(&self) -> Result<()> {
        for entity in self.entities.values() {
            if entity.column_type(&entity.primary_key).is_none() {
                return Err(Error::UndeclaredColumn(entity.qualified_primary_key()));
            }
            for relation in &entity.relations {
                let target = self.get(&relation.entity)?;
                if entity.column_type(&relation.local_key).is_none() {
                    return Err(Error::UndeclaredColumn(entity.qualify(&relation.local_key)));
                }
                if target.column_type(&relation.foreign_key).is_none() {
                    return Err(Error::UndeclaredColumn(target.qualify(&relation.foreign_key)));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a catalog document.
    pub fn from_toml_str(source: &str) -> std::result::Result<Self, CatalogError> {
        Self::from_toml_str_with_schema(source, "")
    }

    /// Like [`Catalog::from_toml_str`], with `default_schema` applied when
    /// neither the entity nor the document names a schema.
    pub fn from_toml_str_with_schema(
        source: &str,
        default_schema: &str,
    ) -> std::result::Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(source)?;
        let schema = if file.schema.is_empty() {
            default_schema
        } else {
            file.schema.as_str()
        };
        let mut catalog = Catalog::new();
        for mut entity in file.entities {
            if entity.schema.is_empty() {
                entity.schema = schema.to_string();
            }
            catalog.insert(entity)?;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, CatalogError> {
        Self::from_file_with_schema(path, "")
    }

    pub fn from_file_with_schema<P: AsRef<Path>>(
        path: P,
        default_schema: &str,
    ) -> std::result::Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str_with_schema(&content, default_schema)
    }
}
