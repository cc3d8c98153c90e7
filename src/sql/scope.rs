//! Per-statement state shared by every clause builder.
//!
//! A [`Scope`] knows the main entity, the relations joined so far (in join
//! order) and the bind registry. Relation descriptors are resolved through
//! the catalog the first time they are joined and cached for the rest of the
//! statement.

use std::sync::Arc;
use tracing::debug;

use super::bind::{BindRegistry, BindValue, Purpose};
use crate::entity::{Catalog, Entity, Relation};
use crate::error::{Error, Result};
use crate::value::Value;

/// A relation brought into the statement by a JOIN.
#[derive(Debug, Clone)]
pub struct JoinedRelation {
    pub relation: Relation,
    pub alias: Option<String>,
    pub entity: Arc<Entity>,
}

impl JoinedRelation {
    /// Name used to reference the relation's columns in ON clauses.
    pub fn reference(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.entity.table_name())
    }

    fn answers_to(&self, segment: &str) -> bool {
        self.relation.name == segment
            || self.entity.table_name() == segment
            || self.alias.as_deref() == Some(segment)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    catalog: Arc<Catalog>,
    entity: Arc<Entity>,
    joined: Vec<JoinedRelation>,
    registry: BindRegistry,
}

impl Scope {
    pub fn new(catalog: Arc<Catalog>, entity: Arc<Entity>) -> Self {
        let registry = BindRegistry::new(&entity);
        Self {
            catalog,
            entity,
            joined: vec![],
            registry,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn entity(&self) -> &Arc<Entity> {
        &self.entity
    }

    pub fn joined(&self) -> &[JoinedRelation] {
        &self.joined
    }

    /// Resolve a declared relation and record it as joined.
    ///
    /// Joining the same relation twice resolves to the cached descriptor.
    pub fn join_relation(&mut self, name: &str, alias: Option<String>) -> Result<JoinedRelation> {
        let relation = self
            .entity
            .find_relation(name)
            .cloned()
            .ok_or_else(|| Error::UnknownRelation {
                entity: self.entity.name.clone(),
                relation: name.to_string(),
            })?;

        let entity = match self.joined.iter().find(|j| j.relation.name == name) {
            Some(cached) => cached.entity.clone(),
            None => {
                let entity = self.catalog.get(&relation.entity)?;
                debug!(relation = name, table = %entity.qualified_table(), "resolved relation");
                self.registry.merge(&entity);
                entity
            }
        };

        let joined = JoinedRelation {
            relation,
            alias,
            entity,
        };
        self.joined.push(joined.clone());
        Ok(joined)
    }

    /// Find a joined relation by relation name, table name or alias.
    pub fn joined_entity(&self, segment: &str) -> Option<&Arc<Entity>> {
        self.joined
            .iter()
            .find(|j| j.answers_to(segment))
            .map(|j| &j.entity)
    }

    /// Entity owning the columns referenced through `segment`, which may be
    /// the main table or any joined relation.
    pub fn owner(&self, segment: &str) -> Result<Arc<Entity>> {
        if segment == self.entity.table_name() || segment == self.entity.name {
            return Ok(self.entity.clone());
        }
        self.joined_entity(segment)
            .cloned()
            .ok_or_else(|| Error::RelationNotJoined(segment.to_string()))
    }

    /// Qualify a column against the main entity.
    pub fn qualify(&self, column: &str) -> String {
        self.entity.qualify(column)
    }

    /// Qualify a predicate column.
    ///
    /// A bare name belongs to `target`. In `table.column` and
    /// `schema.table.column` the table segment may name the main entity, a
    /// joined relation or a join alias, and the column lands on that entity's
    /// table and schema. Segments nothing answers to are qualified literally
    /// and fail later as undeclared columns.
    pub fn qualify_for(&self, target: &Entity, column: &str) -> String {
        let parts: Vec<&str> = column.split('.').collect();
        let (segment, name) = match parts.as_slice() {
            [segment, name] | [_, segment, name] => (*segment, *name),
            _ => return target.qualify(column),
        };
        if segment == target.table_name() || segment == target.name {
            return target.qualify(name);
        }
        match self.owner(segment) {
            Ok(entity) => entity.qualify(name),
            Err(_) => target.qualify(column),
        }
    }

    pub fn bind(
        &mut self,
        purpose: Purpose,
        column: &str,
        value: impl Into<Value>,
    ) -> Result<BindValue> {
        self.registry.register(purpose, column, value)
    }

    pub fn registry(&self) -> &BindRegistry {
        &self.registry
    }

    /// Scope for a nested statement over the same entity. Its placeholders
    /// continue this scope's numbering.
    pub fn fork(&self) -> Scope {
        Scope {
            catalog: self.catalog.clone(),
            entity: self.entity.clone(),
            joined: vec![],
            registry: self.registry.fork(&self.entity),
        }
    }

    /// Take back the numbering of a forked scope.
    pub fn absorb(&mut self, forked: &Scope) {
        self.registry.absorb(&forked.registry);
    }
}
