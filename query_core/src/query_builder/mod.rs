//! Query builder
//!
//! `CommandBuilder` turns `DmlBuilder` calls into a `StorageCommand`.

pub mod builder;
pub mod command;
pub mod join;
pub mod ordering;
pub mod pagination;
pub mod parameter;
pub mod select_cache;
pub mod sql_generation;
pub mod subquery;
pub mod update;


#[cfg(test)]
mod integration_tests;

pub use builder::{CommandBuilder, DmlBuilder};
pub use command::{StorageCommand, TransactionType};
pub use join::JoinType;
pub use ordering::SortOrder;
pub use pagination::Pagination;
pub use parameter::{Parameter, ParameterDirection};
pub use subquery::SubQuery;
pub use update::UpdateOperation;
