//! Compiler options derived from the `[compiler]` configuration section.

use crate::dialect::{Dialect, DialectKind};
use crate::errors::QueryError;
use config::CompilerConfig;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Reuse the default column list of an entity across builders
    pub cache_select_statements: bool,
    /// Maximum parameters per command, 0 for no limit
    pub max_parameters: usize,
    /// Validate identifiers when entities are registered
    pub validate_identifiers: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            cache_select_statements: true,
            max_parameters: 0,
            validate_identifiers: true,
        }
    }
}

impl From<&CompilerConfig> for CompilerOptions {
    fn from(config: &CompilerConfig) -> Self {
        Self {
            cache_select_statements: config.cache_select_statements,
            max_parameters: config.max_parameters,
            validate_identifiers: config.validate_identifiers,
        }
    }
}

/// Resolve the dialect named in the configuration
pub fn dialect_from_config(config: &CompilerConfig) -> Result<Arc<dyn Dialect>, QueryError> {
    Ok(DialectKind::from_str(&config.dialect)?.dialect())
}
