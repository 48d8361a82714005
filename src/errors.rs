//! Error types for the QueryHaus crate
//!
//! This module contains all error types that can be returned by QueryHaus operations.

use query_core::QueryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryHausError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("No storage provider available for the {0} dialect")]
    UnsupportedProvider(String),

    #[error("Parameter {parameter} was not compiled for the {expected} dialect")]
    DialectMismatch { expected: String, parameter: String },
}
