//! Name-based metadata lookup
//!
//! Typed builder calls carry their `EntityMeta` directly. Everything that only
//! knows an entity by name (replayed method queues, deserialized predicates)
//! goes through a `MetadataResolver`.

use crate::errors::QueryError;
use crate::metadata::{ColumnRef, Entity, EntityMeta, QUERY_RESULT_META};
use crate::validation::ValidatedIdentifier;
use std::collections::HashMap;

pub trait MetadataResolver: Send + Sync + std::fmt::Debug {
    fn entity(&self, name: &str) -> Result<&'static EntityMeta, QueryError>;

    fn table_name_for(&self, name: &str) -> Result<&'static str, QueryError> {
        Ok(self.entity(name)?.table)
    }

    fn column_for(&self, entity: &str, property: &str) -> Result<ColumnRef, QueryError> {
        self.entity(entity)?.resolve(property)
    }
}

/// Registry of the entities known to a `QueryHaus` instance
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: HashMap<String, &'static EntityMeta>,
    validate_identifiers: bool,
}

impl EntityRegistry {
    pub fn new(validate_identifiers: bool) -> Self {
        let mut entities = HashMap::new();
        entities.insert(QUERY_RESULT_META.name.to_string(), &QUERY_RESULT_META);
        Self {
            entities,
            validate_identifiers,
        }
    }

    pub fn register<T: Entity>(&mut self) -> Result<(), QueryError> {
        self.register_meta(T::metadata())
    }

    pub fn register_meta(&mut self, meta: &'static EntityMeta) -> Result<(), QueryError> {
        if self.validate_identifiers && !meta.is_query_result() {
            ValidatedIdentifier::new(meta.table)?;
            for column in meta.columns {
                ValidatedIdentifier::new(column.column)?;
            }
        }

        debug_log!(
            "[REGISTRY] Registered {} -> {} ({} columns)",
            meta.name,
            meta.table,
            meta.columns.len()
        );
        self.entities.insert(meta.name.to_string(), meta);
        Ok(())
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

    /// Registered entity names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MetadataResolver for EntityRegistry {
    fn entity(&self, name: &str) -> Result<&'static EntityMeta, QueryError> {
        self.entities
            .get(name)
            .copied()
            .ok_or_else(|| QueryError::UnknownEntity(name.to_string()))
    }
}
