//! Validation utilities for type mapping
//!
//! This module provides validation functions
//! for type mapping operations.

/// Check if a Rust type converts directly into `SqlValue` via `From`
pub fn supports_direct_sql_conversion(rust_type: &str) -> bool {
    let normalized = rust_type.replace(' ', "");
    let inner = normalized
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(&normalized);

    matches!(
        inner,
        "String"
            | "&str"
            | "i8"
            | "i16"
            | "i32"
            | "i64"
            | "u16"
            | "u32"
            | "f32"
            | "f64"
            | "bool"
            | "Uuid"
            | "uuid::Uuid"
            | "chrono::DateTime<chrono::Utc>"
            | "DateTime<Utc>"
            | "chrono::NaiveDateTime"
            | "NaiveDateTime"
            | "serde_json::Value"
            | "Value"
            | "Vec<u8>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_conversion() {
        assert!(supports_direct_sql_conversion("i32"));
        assert!(supports_direct_sql_conversion("Option<String>"));
        assert!(!supports_direct_sql_conversion("u64"));
        assert!(!supports_direct_sql_conversion("Vec<String>"));
    }
}
