//! # QueryHaus
//!
//! An ORM query expression compiler: typed predicates and fluent DML calls are
//! compiled into dialect-specific SQL with ordered, named parameters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use queryhaus::prelude::*;
//!
//! #[derive(Entity, SqlRecord)]
//! #[entity(table = "Product")]
//! pub struct Product {
//!     #[column(name = "ProductID", property = "ID", primary_key, readonly)]
//!     pub id: i32,
//!
//!     #[column(name = "ProductName", size = 40)]
//!     pub name: String,
//!
//!     #[column(name = "UnitPrice")]
//!     pub unit_price: f64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!
//!     let mut haus = QueryHaus::from_config(&config.compiler)?;
//!     haus.register::<Product>()?;
//!
//!     let mut query = haus.deferred();
//!     query
//!         .select_all()?
//!         .from::<Product>()?
//!         .filter(Product::prop("ID")?.equal(355))?;
//!
//!     let command = haus.compile(&query)?;
//!     println!("{}", command.sql());
//!
//!     let provider = haus.connect(&config.database).await?;
//!     let rows = provider.fetch_rows(&command).await?;
//!     println!("{} rows", rows.len());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
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
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

// Derived code names `::queryhaus::...`, including inside this crate's tests
extern crate self as queryhaus;

pub mod core;
pub mod errors;
pub mod prelude;
pub mod provider;

// Re-export the main public types for convenience
pub use core::QueryHaus;
pub use errors::QueryHausError;
pub use provider::{PostgresProvider, StorageProvider};

// Re-export centralized config
pub use config::{AppConfig, CompilerConfig, DatabaseConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use entity_derive::{Entity, SqlRecord};
pub use query_core;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
