//! SQL dialects
//!
//! A dialect decides how parameters are named, how a row limit or a page is
//! appended, and which opening text each function uses.

pub mod mysql;
pub mod postgres;
pub mod sqlserver;
pub mod standard;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlserver::SqlServerDialect;
pub use standard::StandardDialect;

use crate::errors::QueryError;
use crate::expression::FunctionKind;
use crate::query_builder::pagination::Pagination;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub trait Dialect: Send + Sync + fmt::Debug {
    fn kind(&self) -> DialectKind;

    fn parameter_prefix(&self) -> &'static str;

    fn function_open(&self, kind: FunctionKind) -> &'static str {
        kind.standard_open()
    }

    /// Length argument for a substring given only its start; `None` when the
    /// dialect accepts SUBSTRING without one
    fn substring_length(&self, _inner: &str) -> Option<String> {
        None
    }

    /// OFFSET paging is only accepted after an ORDER BY
    fn pagination_requires_order(&self) -> bool {
        false
    }

    fn supports_row_limit(&self) -> bool {
        false
    }

    /// Trailing clause for `select_limit`
    fn row_limit_clause(&self, limit: u64) -> Result<String, QueryError> {
        Err(QueryError::UnsupportedOperation(format!(
            "the {} dialect has no row limit for {} rows; use Pagination instead",
            self.kind(),
            limit
        )))
    }

    /// Trailing clause for a page; empty when the page is empty
    fn pagination_clause(&self, pagination: &Pagination) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialectKind {
    Standard,
    SqlServer,
    MySql,
    Postgres,
}

impl DialectKind {
    /// Name used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::Standard => "standard",
            DialectKind::SqlServer => "sqlserver",
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "postgres",
        }
    }

    pub fn dialect(self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::Standard => Arc::new(StandardDialect),
            DialectKind::SqlServer => Arc::new(SqlServerDialect),
            DialectKind::MySql => Arc::new(MySqlDialect),
            DialectKind::Postgres => Arc::new(PostgresDialect),
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(DialectKind::Standard),
            "sqlserver" => Ok(DialectKind::SqlServer),
            "mysql" => Ok(DialectKind::MySql),
            "postgres" => Ok(DialectKind::Postgres),
            _ => Err(QueryError::UnknownDialect(s.to_string())),
        }
    }
}

/// ` OFFSET n ROWS FETCH NEXT m ROWS ONLY`
pub(crate) fn offset_fetch_clause(pagination: &Pagination) -> String {
    if pagination.is_empty() {
        return String::new();
    }
    let mut clause = format!(" OFFSET {} ROWS", pagination.offset.unwrap_or(0));
    if let Some(limit) = pagination.limit {
        clause.push_str(&format!(" FETCH NEXT {} ROWS ONLY", limit));
    }
    clause
}

/// ` LIMIT m OFFSET n`; `offset_without_limit` fills the limit when only an
/// offset is given, for dialects that cannot spell OFFSET alone
pub(crate) fn limit_offset_clause(
    pagination: &Pagination,
    offset_without_limit: Option<&str>,
) -> String {
    let mut clause = String::new();
    match (pagination.limit, offset_without_limit) {
        (Some(limit), _) => clause.push_str(&format!(" LIMIT {}", limit)),
        (None, Some(fill)) if pagination.offset.is_some() => {
            clause.push_str(&format!(" LIMIT {}", fill))
        }
        _ => {}
    }
    if let Some(offset) = pagination.offset {
        clause.push_str(&format!(" OFFSET {}", offset));
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_config_name() {
        assert_eq!("postgres".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!("MySQL".parse::<DialectKind>().unwrap(), DialectKind::MySql);
        assert_eq!(
            "oracle".parse::<DialectKind>().unwrap_err(),
            QueryError::UnknownDialect("oracle".to_string())
        );
    }

    #[test]
    fn test_kind_names_match_config() {
        for kind in [
            DialectKind::Standard,
            DialectKind::SqlServer,
            DialectKind::MySql,
            DialectKind::Postgres,
        ] {
            assert!(config::KNOWN_DIALECTS.contains(&kind.name()));
            assert_eq!(kind.dialect().kind(), kind);
        }
    }

    #[test]
    fn test_shared_clauses() {
        assert_eq!(offset_fetch_clause(&Pagination::new()), "");
        assert_eq!(
            offset_fetch_clause(&Pagination::new().with_limit(5)),
            " OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"
        );
        assert_eq!(
            limit_offset_clause(&Pagination::new().with_offset(7), None),
            " OFFSET 7"
        );
        assert_eq!(
            limit_offset_clause(&Pagination::new().with_offset(7), Some("99")),
            " LIMIT 99 OFFSET 7"
        );
    }
}
