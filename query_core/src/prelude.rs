//! Convenience re-exports for building queries

// Predicates
pub use crate::expression::{FunctionKind, LogicalOperator, Operand, Operator, PropertyExpression};

// Metadata
pub use crate::metadata::{Entity, EntityMeta, EntityRegistry, MetadataResolver, QueryResult};

// Building and replay
pub use crate::dialect::{Dialect, DialectKind};
pub use crate::query_builder::{
    CommandBuilder, DmlBuilder, JoinType, Pagination, SortOrder, StorageCommand, SubQuery,
    TransactionType, UpdateOperation,
};
pub use crate::replay::DeferredQuery;

// Error types
pub use crate::errors::QueryError;

pub use type_mapping::SqlValue;
