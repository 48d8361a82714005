//! Query Core - expression compiler for QueryHaus
//!
//! This crate turns typed predicate trees and fluent DML calls into
//! dialect-specific SQL text with named parameters. It holds the predicate
//! model, the entity metadata contract, the dialects and the runtime replay
//! engine used for deferred queries.

#[doc(hidden)]
pub use tracing as __tracing;

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod dialect;
pub mod errors;
pub mod expression;
pub mod metadata;
pub mod options;
pub mod prelude;
pub mod query_builder;
pub mod replay;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use dialect::{Dialect, DialectKind};
pub use errors::QueryError;
pub use expression::{LogicalOperator, Operand, Operator, PropertyExpression};
pub use metadata::{
    ColumnMeta, ColumnRef, Entity, EntityKind, EntityMeta, EntityRegistry, MetadataResolver,
    Permissions, QueryResult,
};
pub use options::CompilerOptions;
pub use query_builder::{
    CommandBuilder, DmlBuilder, JoinType, Pagination, SortOrder, StorageCommand, SubQuery,
    TransactionType, UpdateOperation,
};
pub use replay::DeferredQuery;
pub use validation::{ValidatedIdentifier, ValidationError};
