use crate::dialect::{limit_offset_clause, Dialect, DialectKind};
use crate::errors::QueryError;
use crate::query_builder::pagination::Pagination;

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn parameter_prefix(&self) -> &'static str {
        "$"
    }

    fn supports_row_limit(&self) -> bool {
        true
    }

    fn row_limit_clause(&self, limit: u64) -> Result<String, QueryError> {
        Ok(format!(" LIMIT {}", limit))
    }

    fn pagination_clause(&self, pagination: &Pagination) -> String {
        limit_offset_clause(pagination, None)
    }
}
