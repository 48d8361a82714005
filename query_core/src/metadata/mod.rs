//! Entity metadata
//!
//! Entities describe their physical table and columns through a static
//! `EntityMeta`, normally generated by `#[derive(Entity)]`. The compiler never
//! inspects Rust types at runtime; it only reads these tables.

pub mod registry;

pub use registry::{EntityRegistry, MetadataResolver};

use crate::errors::QueryError;
use crate::expression::PropertyExpression;
use crate::query_builder::command::TransactionType;
use serde::{Deserialize, Serialize};
use type_mapping::DbType;

/// Which transaction kinds an entity or column takes part in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions {
    pub select: bool,
    pub insert: bool,
    pub update: bool,
    pub delete: bool,
    pub truncate: bool,
}

impl Permissions {
    pub const ALL: Permissions = Permissions {
        select: true,
        insert: true,
        update: true,
        delete: true,
        truncate: true,
    };

    pub const READ_ONLY: Permissions = Permissions {
        select: true,
        insert: false,
        update: false,
        delete: false,
        truncate: false,
    };

    pub fn allows(&self, transaction: TransactionType) -> bool {
        match transaction {
            TransactionType::Select => self.select,
            TransactionType::Insert => self.insert,
            TransactionType::Update => self.update,
            TransactionType::Delete => self.delete,
            TransactionType::Truncate => self.truncate,
            TransactionType::Unknown => false,
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// A mapped table or view
    Table,
    /// Untyped result rows; read-only and without declared columns
    QueryResult,
}

/// Static description of one mapped column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMeta {
    pub property: &'static str,
    pub column: &'static str,
    pub db_type: DbType,
    pub size: Option<u32>,
    pub permissions: Permissions,
    pub primary_key: bool,
}

/// Static description of one entity
#[derive(Debug, PartialEq, Eq)]
pub struct EntityMeta {
    pub name: &'static str,
    pub table: &'static str,
    pub kind: EntityKind,
    pub permissions: Permissions,
    pub columns: &'static [ColumnMeta],
}

impl EntityMeta {
    /// Look up a column by property name, falling back once to the
    /// backing-field spelling (`UnitPrice` -> `_unitPrice`).
    pub fn column(&self, property: &str) -> Option<&'static ColumnMeta> {
        let columns: &'static [ColumnMeta] = self.columns;
        columns
            .iter()
            .find(|c| c.property == property)
            .or_else(|| {
                let mangled = mangled_field_name(property);
                columns.iter().find(|c| c.property == mangled)
            })
    }

    /// Resolve a property to a column reference or fail with `MetadataResolution`
    pub fn resolve(&self, property: &str) -> Result<ColumnRef, QueryError> {
        self.column(property)
            .map(|column| ColumnRef::new(self, column))
            .ok_or_else(|| QueryError::MetadataResolution {
                entity: self.name.to_string(),
                property: property.to_string(),
            })
    }

    pub fn is_query_result(&self) -> bool {
        self.kind == EntityKind::QueryResult
    }

    /// Columns that receive values when an insert names no properties
    pub fn insertable_columns(&self) -> impl Iterator<Item = &'static ColumnMeta> {
        let columns: &'static [ColumnMeta] = self.columns;
        columns.iter().filter(|c| c.permissions.insert)
    }

    /// Columns rendered by a select that names no properties
    pub fn selectable_columns(&self) -> impl Iterator<Item = &'static ColumnMeta> {
        let columns: &'static [ColumnMeta] = self.columns;
        columns.iter().filter(|c| c.permissions.select)
    }
}

/// `_` followed by the property with its first letter lower-cased
pub fn mangled_field_name(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("_{}{}", first.to_lowercase(), chars.as_str()),
        None => "_".to_string(),
    }
}

/// A column resolved against its entity, carried by predicate nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
    pub db_type: DbType,
    pub size: Option<u32>,
    pub permissions: Permissions,
}

impl ColumnRef {
    pub fn new(entity: &EntityMeta, column: &ColumnMeta) -> Self {
        Self {
            table: entity.table.to_string(),
            column: column.column.to_string(),
            db_type: column.db_type,
            size: column.size,
            permissions: column.permissions,
        }
    }

    /// `Table.Column`
    pub fn reference(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// Implemented by mapped types, usually through `#[derive(Entity)]`
pub trait Entity {
    fn metadata() -> &'static EntityMeta;

    /// Predicate node for one of this entity's properties
    fn prop(property: &str) -> Result<PropertyExpression, QueryError>
    where
        Self: Sized,
    {
        PropertyExpression::of::<Self>(property)
    }
}

pub static QUERY_RESULT_META: EntityMeta = EntityMeta {
    name: "QueryResult",
    table: "QueryResult",
    kind: EntityKind::QueryResult,
    permissions: Permissions::READ_ONLY,
    columns: &[],
};

/// Pseudo-entity for untyped result rows
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryResult;

impl Entity for QueryResult {
    fn metadata() -> &'static EntityMeta {
        &QUERY_RESULT_META
    }
}
