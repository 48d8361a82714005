//! Serialization utilities
//!
//! This module converts serializable Rust data into `(field, SqlValue)` records.

use crate::types::SqlValue;
use serde::Serialize;

/// Convert serializable data into an ordered record, using JSON serialization as the bridge.
///
/// Fields come out in JSON object key order. Non-object data yields an empty record.
pub fn serialize_to_sql_record<T: Serialize>(data: &T) -> Vec<(String, SqlValue)> {
    let mut record = Vec::new();

    if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(data) {
        for (key, value) in map {
            let sql_value = match value {
                serde_json::Value::String(s) => {
                    // Try to parse as RFC3339 timestamp first
                    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&s) {
                        SqlValue::Timestamp(dt.with_timezone(&chrono::Utc))
                    } else {
                        SqlValue::Text(s)
                    }
                }
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        if i >= i32::MIN as i64 && i <= i32::MAX as i64 {
                            SqlValue::Integer(i as i32)
                        } else {
                            SqlValue::BigInt(i)
                        }
                    } else if let Some(f) = n.as_f64() {
                        SqlValue::Float(f)
                    } else {
                        SqlValue::Json(serde_json::Value::Number(n))
                    }
                }
                serde_json::Value::Bool(b) => SqlValue::Boolean(b),
                serde_json::Value::Null => SqlValue::Null,
                other => SqlValue::Json(other),
            };
            record.push((key, sql_value));
        }
    }

    record
}
