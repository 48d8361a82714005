//! Identifier validation
//!
//! Table, column and alias names are written into SQL text verbatim, so every name
//! that reaches the compiler is checked here first.

use std::fmt;
use thiserror::Error;

/// Why a name was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("'{0}' may only contain ASCII letters, digits and underscores")]
    InvalidCharacters(String),

    #[error("'{name}' is {length} characters long, the limit is {max_length}")]
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },

    #[error("identifier is empty")]
    Empty,

    #[error("'{0}' must start with a letter or underscore")]
    InvalidStartCharacter(String),

    #[error("'{0}' is a reserved SQL keyword")]
    ReservedKeyword(String),
}

/// PostgreSQL allows 63 bytes, MySQL 64, SQL Server 128; the strictest wins
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Keywords no table or column may be named after
const RESERVED_KEYWORDS: &[&str] = &[
    "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CROSS", "DELETE", "DESC",
    "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FETCH", "FROM", "FULL", "GROUP", "HAVING",
    "IN", "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
    "OFFSET", "ON", "OR", "ORDER", "OUTER", "RIGHT", "ROWS", "SELECT", "SET", "TABLE",
    "THEN", "TOP", "TRUNCATE", "UNION", "UPDATE", "VALUES", "WHEN", "WHERE",
];

/// A validated table or column name that is safe to write into SQL text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedIdentifier(String);

impl ValidatedIdentifier {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        validate_shape(name)?;
        if is_reserved_keyword(name) {
            return Err(ValidationError::ReservedKeyword(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ValidatedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aliases only need a safe shape; `Count` or `Total` are fine as result labels
pub fn validate_alias(alias: &str) -> Result<(), ValidationError> {
    validate_shape(alias)
}

/// Check if a name is a reserved SQL keyword
pub fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

fn validate_shape(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::Empty);
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            length: name.len(),
            max_length: MAX_IDENTIFIER_LENGTH,
        });
    }

    let first_char = name.chars().next().ok_or(ValidationError::Empty)?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(ValidationError::InvalidStartCharacter(name.to_string()));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::InvalidCharacters(name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        let valid_names = [
            "Product",
            "order_details",
            "_unitPrice",
            "Table123",
            "a",
            &"a".repeat(63),
        ];

        for name in valid_names {
            assert!(
                ValidatedIdentifier::new(name).is_ok(),
                "Should accept valid name: {}",
                name
            );
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        let test_cases = [
            ("", ValidationError::Empty),
            (
                "1Product",
                ValidationError::InvalidStartCharacter("1Product".to_string()),
            ),
            (
                "unit-price",
                ValidationError::InvalidCharacters("unit-price".to_string()),
            ),
            (
                "Product; DROP TABLE Product",
                ValidationError::InvalidCharacters("Product; DROP TABLE Product".to_string()),
            ),
            ("Select", ValidationError::ReservedKeyword("Select".to_string())),
            ("order", ValidationError::ReservedKeyword("order".to_string())),
        ];

        for (name, expected_error) in test_cases {
            let result = ValidatedIdentifier::new(name);
            assert_eq!(result.unwrap_err(), expected_error, "for name {:?}", name);
        }
    }

    #[test]
    fn test_too_long_identifier() {
        let long_name = "a".repeat(64);
        match ValidatedIdentifier::new(&long_name).unwrap_err() {
            ValidationError::TooLong {
                length, max_length, ..
            } => {
                assert_eq!(length, 64);
                assert_eq!(max_length, MAX_IDENTIFIER_LENGTH);
            }
            other => panic!("Expected TooLong error, got {:?}", other),
        }
    }

    #[test]
    fn test_alias_allows_keywords_but_not_injection() {
        assert!(validate_alias("Count").is_ok());
        assert!(validate_alias("Total_Price").is_ok());
        assert!(validate_alias("x FROM users --").is_err());
        assert!(validate_alias("").is_err());
    }

    #[test]
    fn test_display() {
        let name = ValidatedIdentifier::new("Product").unwrap();
        assert_eq!(format!("{}", name), "Product");
        assert_eq!(name.into_string(), "Product");
    }
}
