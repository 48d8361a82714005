//! Storage providers
//!
//! A provider executes compiled `StorageCommand`s. `PostgresProvider` binds
//! the command's parameters, in order, onto an `sqlx` query.

use async_trait::async_trait;
use config::DatabaseConfig;
use query_core::query_builder::Parameter;
use query_core::{DialectKind, StorageCommand};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use std::time::Duration;
use type_mapping::{DbType, SqlValue};

use crate::errors::QueryHausError;

#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Dialect the provider's commands must be compiled with
    fn dialect(&self) -> DialectKind;

    /// Run a command and return the number of affected rows
    async fn execute(&self, command: &StorageCommand) -> Result<u64, QueryHausError>;

    /// Run a select and return each row as a JSON object
    async fn fetch_rows(
        &self,
        command: &StorageCommand,
    ) -> Result<Vec<serde_json::Value>, QueryHausError>;
}

/// PostgreSQL provider over an `sqlx` pool
#[derive(Debug, Clone)]
pub struct PostgresProvider {
    pool: PgPool,
}

impl PostgresProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from the `[database]` section
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, QueryHausError> {
        let connection_string = config.connection_string();

        let mut pool_options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;
        Ok(Self { pool })
    }

    /// Get database pool reference
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), QueryHausError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Every parameter must be a `$n` placeholder
    pub fn check_command(command: &StorageCommand) -> Result<(), QueryHausError> {
        for parameter in command.parameters() {
            let positional = parameter
                .name
                .strip_prefix('$')
                .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
            if !positional {
                return Err(QueryHausError::DialectMismatch {
                    expected: DialectKind::Postgres.to_string(),
                    parameter: parameter.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Bind one parameter; NULL takes the column's declared type when known
fn bind_parameter<'q>(
    query: Query<'q, Postgres, PgArguments>,
    parameter: &Parameter,
) -> Query<'q, Postgres, PgArguments> {
    match &parameter.value {
        SqlValue::Null => match parameter.db_type {
            Some(DbType::Boolean) => query.bind(None::<bool>),
            Some(DbType::SmallInt) => query.bind(None::<i16>),
            Some(DbType::Integer) => query.bind(None::<i32>),
            Some(DbType::BigInt) => query.bind(None::<i64>),
            Some(DbType::Real | DbType::Double | DbType::Decimal) => query.bind(None::<f64>),
            Some(DbType::Uuid) => query.bind(None::<uuid::Uuid>),
            Some(DbType::Date | DbType::Timestamp) => {
                query.bind(None::<chrono::DateTime<chrono::Utc>>)
            }
            Some(DbType::Json) => query.bind(None::<serde_json::Value>),
            Some(DbType::Binary) => query.bind(None::<Vec<u8>>),
            _ => query.bind(None::<String>),
        },
        SqlValue::Boolean(v) => query.bind(*v),
        SqlValue::SmallInt(v) => query.bind(*v),
        SqlValue::Integer(v) => query.bind(*v),
        SqlValue::BigInt(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Uuid(v) => query.bind(*v),
        SqlValue::Timestamp(v) => query.bind(*v),
        // Without a decimal crate in the stack, numerics travel as float8
        SqlValue::Decimal(v) => match v.parse::<f64>() {
            Ok(number) => query.bind(number),
            Err(_) => query.bind(v.clone()),
        },
        SqlValue::Json(v) => query.bind(v.clone()),
        SqlValue::Bytes(v) => query.bind(v.clone()),
    }
}

fn bind_all<'q>(sql: &'q str, command: &StorageCommand) -> Query<'q, Postgres, PgArguments> {
    command
        .parameters()
        .iter()
        .fold(sqlx::query(sql), bind_parameter)
}

#[async_trait]
impl StorageProvider for PostgresProvider {
    fn dialect(&self) -> DialectKind {
        DialectKind::Postgres
    }

    async fn execute(&self, command: &StorageCommand) -> Result<u64, QueryHausError> {
        Self::check_command(command)?;
        crate::debug_log!(
            "[EXECUTE] {} {} ({} parameters)",
            command.name(),
            command.sql(),
            command.parameters().len()
        );

        let result = bind_all(command.sql(), command).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_rows(
        &self,
        command: &StorageCommand,
    ) -> Result<Vec<serde_json::Value>, QueryHausError> {
        Self::check_command(command)?;
        let sql = format!("SELECT to_jsonb(q) FROM ({}) AS q", command.sql());
        crate::debug_log!("[EXECUTE] {} {}", command.name(), sql);

        let rows = bind_all(&sql, command).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<serde_json::Value, _>(0).map_err(QueryHausError::from))
            .collect()
    }
}
