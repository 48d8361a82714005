use crate::dialect::{limit_offset_clause, Dialect, DialectKind};
use crate::errors::QueryError;
use crate::expression::FunctionKind;
use crate::query_builder::pagination::Pagination;

/// MySQL cannot spell OFFSET without LIMIT; its manual suggests the maximum row count
const UNBOUNDED_LIMIT: &str = "18446744073709551615";

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::MySql
    }

    fn parameter_prefix(&self) -> &'static str {
        "?"
    }

    fn function_open(&self, kind: FunctionKind) -> &'static str {
        match kind {
            FunctionKind::Substring => "SUBSTRING(",
            other => other.standard_open(),
        }
    }

    fn supports_row_limit(&self) -> bool {
        true
    }

    fn row_limit_clause(&self, limit: u64) -> Result<String, QueryError> {
        Ok(format!(" LIMIT {}", limit))
    }

    fn pagination_clause(&self, pagination: &Pagination) -> String {
        limit_offset_clause(pagination, Some(UNBOUNDED_LIMIT))
    }
}
