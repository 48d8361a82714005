//! Command parameters
//!
//! Values never enter the SQL text. Each one becomes a named parameter whose
//! name is the dialect prefix followed by its 1-based position.

use serde::{Deserialize, Serialize};
use type_mapping::{DbType, SqlValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterDirection {
    #[default]
    Input,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: SqlValue,
    /// Declared type of the originating column; `None` when untyped
    pub db_type: Option<DbType>,
    pub size: Option<u32>,
    pub direction: ParameterDirection,
}

impl Parameter {
    pub fn new(name: String, value: SqlValue, db_type: Option<DbType>, size: Option<u32>) -> Self {
        Self {
            name,
            value,
            db_type,
            size,
            direction: ParameterDirection::Input,
        }
    }

    pub fn untyped(name: String, value: SqlValue) -> Self {
        Self::new(name, value, None, None)
    }
}

pub fn parameter_name(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index)
}

fn continues_identifier(rest: &str) -> bool {
    rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
}

/// Rewrite parameter names in one pass. A name only matches where it is not
/// followed by another identifier character, so `@p1` never touches `@p10`,
/// and replaced text is never rescanned.
pub fn rename_parameters(sql: &str, renames: &[(String, String)]) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut rest = sql;

    while !rest.is_empty() {
        let hit = renames
            .iter()
            .filter(|(old, _)| {
                !old.is_empty() && rest.starts_with(old.as_str()) && !continues_identifier(&rest[old.len()..])
            })
            .max_by_key(|(old, _)| old.len());

        match hit {
            Some((old, new)) => {
                out.push_str(new);
                rest = &rest[old.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    out.push(c);
                }
                rest = chars.as_str();
            }
        }
    }

    out
}
