//! SQL type conversion utilities
//!
//! This module handles conversion between Rust types
//! and the declared column types used for parameter metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared database type of a column or parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Decimal,
    VarChar,
    Text,
    Uuid,
    Date,
    Timestamp,
    Json,
    Binary,
}

impl DbType {
    /// Variant name, used by code generation to emit `DbType::<Variant>`
    pub fn variant_name(&self) -> &'static str {
        match self {
            DbType::Boolean => "Boolean",
            DbType::SmallInt => "SmallInt",
            DbType::Integer => "Integer",
            DbType::BigInt => "BigInt",
            DbType::Real => "Real",
            DbType::Double => "Double",
            DbType::Decimal => "Decimal",
            DbType::VarChar => "VarChar",
            DbType::Text => "Text",
            DbType::Uuid => "Uuid",
            DbType::Date => "Date",
            DbType::Timestamp => "Timestamp",
            DbType::Json => "Json",
            DbType::Binary => "Binary",
        }
    }

    /// Generic SQL spelling of the type
    pub fn sql_name(&self) -> &'static str {
        match self {
            DbType::Boolean => "BOOLEAN",
            DbType::SmallInt => "SMALLINT",
            DbType::Integer => "INTEGER",
            DbType::BigInt => "BIGINT",
            DbType::Real => "REAL",
            DbType::Double => "DOUBLE PRECISION",
            DbType::Decimal => "NUMERIC",
            DbType::VarChar => "VARCHAR",
            DbType::Text => "TEXT",
            DbType::Uuid => "UUID",
            DbType::Date => "DATE",
            DbType::Timestamp => "TIMESTAMP WITH TIME ZONE",
            DbType::Json => "JSONB",
            DbType::Binary => "BYTEA",
        }
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Map Rust type names to declared column types
pub fn rust_type_to_db_type(rust_type: &str) -> DbType {
    // Normalize type string by removing all whitespace for consistent matching
    let normalized = rust_type.replace(' ', "");
    let inner = normalized
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(&normalized);

    match inner {
        "Uuid" | "uuid::Uuid" => DbType::Uuid,
        "String" | "&str" | "&'staticstr" => DbType::VarChar,
        "i8" | "i16" => DbType::SmallInt,
        "i32" | "u16" => DbType::Integer,
        "i64" | "u32" => DbType::BigInt,
        "u64" | "rust_decimal::Decimal" | "bigdecimal::BigDecimal" => DbType::Decimal,
        "f32" => DbType::Real,
        "f64" => DbType::Double,
        "bool" => DbType::Boolean,
        "chrono::DateTime<chrono::Utc>" | "DateTime<Utc>" | "chrono::NaiveDateTime"
        | "NaiveDateTime" => DbType::Timestamp,
        "chrono::NaiveDate" | "NaiveDate" => DbType::Date,
        "serde_json::Value" | "Value" => DbType::Json,
        "Vec<u8>" => DbType::Binary,
        _ => DbType::Json, // default fallback: serialized as JSON
    }
}

/// Check if a Rust type is Optional (nullable in SQL)
pub fn is_optional_type(rust_type: &str) -> bool {
    rust_type.trim().starts_with("Option")
}

/// Get size hint for a declared type (fixed-width types only)
pub fn db_type_size_hint(db_type: DbType) -> Option<u32> {
    match db_type {
        DbType::Boolean => Some(1),
        DbType::SmallInt => Some(2),
        DbType::Integer => Some(4),
        DbType::BigInt => Some(8),
        DbType::Real => Some(4),
        DbType::Double => Some(8),
        DbType::Uuid => Some(16),
        DbType::Date => Some(4),
        DbType::Timestamp => Some(8),
        _ => None, // Variable size types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_type_mapping() {
        assert_eq!(rust_type_to_db_type("i64"), DbType::BigInt);
        assert_eq!(rust_type_to_db_type("Option < String >"), DbType::VarChar);
        assert_eq!(rust_type_to_db_type("chrono::DateTime<chrono::Utc>"), DbType::Timestamp);
        assert_eq!(rust_type_to_db_type("MyStruct"), DbType::Json);
    }

    #[test]
    fn test_size_hint() {
        assert_eq!(db_type_size_hint(DbType::Integer), Some(4));
        assert_eq!(db_type_size_hint(DbType::VarChar), None);
    }

    #[test]
    fn test_optional() {
        assert!(is_optional_type("Option<i32>"));
        assert!(!is_optional_type("i32"));
    }
}
