//! Result tree assembly.
//!
//! A joined SELECT returns flat positional rows. Given the select index that
//! produced them, [`assemble`] folds the rows into one entry per main primary
//! key, with each joined relation nested under its own primary key:
//!
//! ```text
//! {
//!   "<user_id>": {
//!     "user_name": "...",
//!     "tokens": {
//!       "<token_id>": { "token_ip": "..." },
//!       "<token_id>": { "token_ip": "..." }
//!     }
//!   }
//! }
//! ```
//!
//! Rows sharing a main primary key merge into one entry; each distinct
//! related row stays a separate entry under the relation.

use serde_json::{Map, Value as Json};

use crate::entity::{Catalog, Entity};
use crate::error::{Error, Result};
use crate::sql::SelectColumn;
use crate::value::Value;

/// Where one select-index column lands in the tree.
#[derive(Debug, Clone, PartialEq)]
enum Placement {
    /// Field of the main entry.
    Main { key: String },
    /// Field of a related row, nested under `relation`.
    Relation {
        relation: String,
        pk: Option<usize>,
        key: String,
    },
}

fn is_path(expression: &str) -> bool {
    !expression.is_empty()
        && expression
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

fn place(catalog: &Catalog, entity: &Entity, index: &[SelectColumn], column: &SelectColumn) -> Placement {
    let expression = column.expression.as_str();
    let named = |fallback: &str| column.alias.clone().unwrap_or_else(|| fallback.to_string());

    if !is_path(expression) {
        return Placement::Main {
            key: named(expression),
        };
    }

    let parts: Vec<&str> = expression.split('.').collect();
    let [.., table, name] = parts.as_slice() else {
        return Placement::Main {
            key: named(expression),
        };
    };

    if *table == entity.table_name() {
        return Placement::Main { key: named(name) };
    }

    let related = entity.relations.iter().find_map(|relation| {
        let target = catalog.get(&relation.entity).ok()?;
        (relation.name == *table || target.table_name() == *table).then(|| (relation, target))
    });

    match related {
        Some((relation, target)) => {
            let pk = target.qualified_primary_key();
            Placement::Relation {
                relation: relation.name.clone(),
                pk: index.iter().position(|c| c.expression == pk),
                key: named(name),
            }
        }
        None => Placement::Relation {
            relation: table.to_string(),
            pk: None,
            key: named(name),
        },
    }
}

fn object_at<'a>(map: &'a mut Map<String, Json>, key: &str) -> &'a mut Map<String, Json> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Json::Object(Map::new()));
    if !slot.is_object() {
        *slot = Json::Object(Map::new());
    }
    match slot {
        Json::Object(inner) => inner,
        _ => unreachable!("slot was just made an object"),
    }
}

/// Fold positional `rows`, aligned to `index`, into a tree keyed by the
/// primary key of `entity`.
///
/// When a primary key is not part of the index, the row ordinal is used as
/// its key. Related fields of a row whose related primary key is NULL (an
/// unmatched outer join) are left out.
pub fn assemble(
    catalog: &Catalog,
    entity: &Entity,
    index: &[SelectColumn],
    rows: Vec<Vec<Value>>,
) -> Result<Json> {
    let main_pk = entity.qualified_primary_key();
    let main_pk_position = index.iter().position(|c| c.expression == main_pk);
    let placements: Vec<Placement> = index
        .iter()
        .map(|column| place(catalog, entity, index, column))
        .collect();

    let mut tree = Map::new();
    for (ordinal, row) in rows.into_iter().enumerate() {
        if row.len() != index.len() {
            return Err(Error::RowShape {
                row: ordinal,
                expected: index.len(),
                found: row.len(),
            });
        }

        let key_of = |position: Option<usize>| {
            position
                .map(|p| row[p].to_key())
                .unwrap_or_else(|| ordinal.to_string())
        };
        let entry_key = key_of(main_pk_position);

        let mut fields = Map::new();
        for (placement, value) in placements.iter().zip(&row) {
            match placement {
                Placement::Main { key } => {
                    fields.insert(key.clone(), value.to_json());
                }
                Placement::Relation { relation, pk, key } => {
                    if pk.is_some_and(|p| row[p].is_null()) {
                        continue;
                    }
                    let related = object_at(object_at(&mut fields, relation), &key_of(*pk));
                    related.insert(key.clone(), value.to_json());
                }
            }
        }

        merge(object_at(&mut tree, &entry_key), fields);
    }
    Ok(Json::Object(tree))
}

/// Deep-merge `source` into `target`; objects merge, scalars overwrite.
fn merge(target: &mut Map<String, Json>, source: Map<String, Json>) {
    for (key, value) in source {
        match value {
            Json::Object(inner) => merge(object_at(target, &key), inner),
            scalar => {
                target.insert(key, scalar);
            }
        }
    }
}
