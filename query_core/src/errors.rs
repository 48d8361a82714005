use crate::validation::ValidationError;
use thiserror::Error;

/// Failures raised while compiling a command.
///
/// None of these are recoverable for the command being built: a builder that
/// returned one keeps returning it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Metadata resolution error: '{property}' does not map to a column of '{entity}'")]
    MetadataResolution { entity: String, property: String },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Empty argument: {operator} on '{property}' needs at least one value")]
    EmptyArgument { property: String, operator: String },

    #[error("Ordering error: {0}")]
    Ordering(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Permission denied: {operation} is not allowed on '{entity}'")]
    PermissionDenied { entity: String, operation: String },

    #[error("Method resolution error: {method}: {reason}")]
    MethodResolution { method: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Serialization(err.to_string())
    }
}
