//! Unified type mapping between Rust values and SQL parameters
//! This crate provides the value and column-type vocabulary shared by the compiler,
//! the entity derive macro and the storage providers

pub mod serialize;
pub mod sql;
pub mod types;
pub mod validate;

pub use serialize::serialize_to_sql_record;
pub use sql::{db_type_size_hint, is_optional_type, rust_type_to_db_type, DbType};
pub use types::{SqlValue, ToSqlRecord};
pub use validate::supports_direct_sql_conversion;
