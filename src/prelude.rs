//! Convenience re-exports for common QueryHaus usage
//!
//! # Example
//!
//! ```rust
//! use queryhaus::prelude::*;
//!
//! let haus = QueryHaus::new(DialectKind::Postgres);
//! assert_eq!(haus.dialect(), DialectKind::Postgres);
//! ```

// Core QueryHaus components
pub use crate::core::QueryHaus;
pub use crate::errors::QueryHausError;
pub use crate::provider::{PostgresProvider, StorageProvider};

// Re-export centralized config
pub use config::{AppConfig, CompilerConfig, DatabaseConfig};

// Predicates, builders and replay
pub use query_core::prelude::*;
pub use query_core::CompilerOptions;

// Derive macros for entity metadata and records
pub use entity_derive::{Entity, SqlRecord};
pub use type_mapping::{DbType, ToSqlRecord};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
