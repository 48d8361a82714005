use crate::dialect::{offset_fetch_clause, Dialect, DialectKind};
use crate::expression::FunctionKind;
use crate::query_builder::pagination::Pagination;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::SqlServer
    }

    fn parameter_prefix(&self) -> &'static str {
        "@p"
    }

    fn function_open(&self, kind: FunctionKind) -> &'static str {
        match kind {
            FunctionKind::Length => "LEN(",
            FunctionKind::Substring => "SUBSTRING(",
            // TRIM() only exists from SQL Server 2017 on
            FunctionKind::Trim => "LTRIM(RTRIM(",
            other => other.standard_open(),
        }
    }

    fn substring_length(&self, inner: &str) -> Option<String> {
        Some(format!("LEN({})", inner))
    }

    fn pagination_requires_order(&self) -> bool {
        true
    }

    fn pagination_clause(&self, pagination: &Pagination) -> String {
        offset_fetch_clause(pagination)
    }
}
