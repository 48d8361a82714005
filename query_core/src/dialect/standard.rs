use crate::dialect::{offset_fetch_clause, Dialect, DialectKind};
use crate::query_builder::pagination::Pagination;

/// ANSI SQL:2008 spelling
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDialect;

impl Dialect for StandardDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Standard
    }

    fn parameter_prefix(&self) -> &'static str {
        "@p"
    }

    fn pagination_clause(&self, pagination: &Pagination) -> String {
        offset_fetch_clause(pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QueryError;
    use crate::expression::FunctionKind;

    #[test]
    fn test_standard_rejects_row_limit() {
        let dialect = StandardDialect;
        assert!(!dialect.supports_row_limit());
        assert!(matches!(
            dialect.row_limit_clause(10),
            Err(QueryError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_standard_functions_and_pages() {
        let dialect = StandardDialect;
        assert_eq!(dialect.function_open(FunctionKind::Length), "LENGTH(");
        assert_eq!(
            dialect.pagination_clause(&Pagination::page(1, 20)),
            " OFFSET 20 ROWS FETCH NEXT 20 ROWS ONLY"
        );
    }
}
