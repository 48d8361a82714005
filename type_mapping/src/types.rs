//! Type mapping definitions
//!
//! This module provides the runtime value carried by command parameters
//! and the conversions from common Rust types.

use crate::sql::DbType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A parameter value bound to a compiled command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Boolean(bool),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(chrono::DateTime<chrono::Utc>),
    Decimal(String), // Store as string to preserve precision
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Wrap any serializable value as a JSON parameter
    pub fn json_of<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => SqlValue::Json(json),
            Err(_) => SqlValue::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// The column type this value would naturally bind to
    pub fn natural_db_type(&self) -> Option<DbType> {
        match self {
            SqlValue::Null => None,
            SqlValue::Boolean(_) => Some(DbType::Boolean),
            SqlValue::SmallInt(_) => Some(DbType::SmallInt),
            SqlValue::Integer(_) => Some(DbType::Integer),
            SqlValue::BigInt(_) => Some(DbType::BigInt),
            SqlValue::Float(_) => Some(DbType::Double),
            SqlValue::Text(_) => Some(DbType::Text),
            SqlValue::Uuid(_) => Some(DbType::Uuid),
            SqlValue::Timestamp(_) => Some(DbType::Timestamp),
            SqlValue::Decimal(_) => Some(DbType::Decimal),
            SqlValue::Json(_) => Some(DbType::Json),
            SqlValue::Bytes(_) => Some(DbType::Binary),
        }
    }
}

/// Trait for converting a model instance into `(property, value)` pairs
pub trait ToSqlRecord {
    fn to_sql_record(&self) -> Vec<(&'static str, SqlValue)>;
}

impl From<String> for SqlValue {
    fn from(val: String) -> Self {
        SqlValue::Text(val)
    }
}

impl From<&str> for SqlValue {
    fn from(val: &str) -> Self {
        SqlValue::Text(val.to_string())
    }
}

impl From<&String> for SqlValue {
    fn from(val: &String) -> Self {
        SqlValue::Text(val.clone())
    }
}

impl From<i8> for SqlValue {
    fn from(val: i8) -> Self {
        SqlValue::SmallInt(val as i16)
    }
}

impl From<i16> for SqlValue {
    fn from(val: i16) -> Self {
        SqlValue::SmallInt(val)
    }
}

impl From<i32> for SqlValue {
    fn from(val: i32) -> Self {
        SqlValue::Integer(val)
    }
}

impl From<u16> for SqlValue {
    fn from(val: u16) -> Self {
        SqlValue::Integer(val as i32)
    }
}

impl From<u32> for SqlValue {
    fn from(val: u32) -> Self {
        SqlValue::BigInt(val as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(val: i64) -> Self {
        SqlValue::BigInt(val)
    }
}

impl From<f32> for SqlValue {
    fn from(val: f32) -> Self {
        SqlValue::Float(val as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(val: f64) -> Self {
        SqlValue::Float(val)
    }
}

impl From<bool> for SqlValue {
    fn from(val: bool) -> Self {
        SqlValue::Boolean(val)
    }
}

impl From<Uuid> for SqlValue {
    fn from(val: Uuid) -> Self {
        SqlValue::Uuid(val)
    }
}

impl From<chrono::DateTime<chrono::Utc>> for SqlValue {
    fn from(val: chrono::DateTime<chrono::Utc>) -> Self {
        SqlValue::Timestamp(val)
    }
}

impl From<chrono::NaiveDateTime> for SqlValue {
    fn from(val: chrono::NaiveDateTime) -> Self {
        SqlValue::Timestamp(val.and_utc())
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(val: serde_json::Value) -> Self {
        SqlValue::Json(val)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(val: Vec<u8>) -> Self {
        SqlValue::Bytes(val)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
