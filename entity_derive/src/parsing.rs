//! Parsing utilities for entity and column attributes
//!
//! This module handles the parsing of `#[entity]` and `#[column]` attributes
//! and validation of table and column names.

use quote::quote;
use syn::{Attribute, Data, Error, Fields, Ident, LitInt, LitStr, Result};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Mirrors `query_core::validation` so a derive fails where registration would
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ALL", "AND", "AS", "ASC", "BETWEEN", "BY", "CASE", "CROSS", "DELETE", "DESC",
        "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FETCH", "FROM", "FULL", "GROUP", "HAVING",
        "IN", "INNER", "INSERT", "INTO", "IS", "JOIN", "LEFT", "LIKE", "LIMIT", "NOT", "NULL",
        "OFFSET", "ON", "OR", "ORDER", "OUTER", "RIGHT", "ROWS", "SELECT", "SET", "TABLE",
        "THEN", "TOP", "TRUNCATE", "UNION", "UPDATE", "VALUES", "WHEN", "WHERE",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

/// Transaction kinds an `#[entity(deny(...))]` list may name
const DENIABLE: &[&str] = &["select", "insert", "update", "delete", "truncate"];

#[derive(Debug)]
pub struct EntityInfo {
    pub name: String,
    pub table: String,
    pub read_only: bool,
    pub denied: Vec<String>,
}

impl EntityInfo {
    pub fn allows(&self, transaction: &str) -> bool {
        if self.read_only && transaction != "select" {
            return false;
        }
        !self.denied.iter().any(|d| d == transaction)
    }
}

#[derive(Debug)]
pub struct ColumnInfo {
    pub field: Ident,
    pub property: String,
    pub column: String,
    pub rust_type: String,
    pub size: Option<u32>,
    pub primary_key: bool,
    pub readonly: bool,
    pub skip: bool,
}

pub fn parse_entity_attributes(ident: &Ident, attrs: &[Attribute]) -> Result<EntityInfo> {
    let mut info = EntityInfo {
        name: ident.to_string(),
        table: ident.to_string(),
        read_only: false,
        denied: Vec::new(),
    };
    let mut table_span = ident.span();

    for attr in attrs.iter().filter(|a| a.path().is_ident("entity")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                table_span = lit.span();
                info.table = lit.value();
                Ok(())
            } else if meta.path.is_ident("read_only") {
                info.read_only = true;
                Ok(())
            } else if meta.path.is_ident("deny") {
                meta.parse_nested_meta(|op| {
                    let name = op
                        .path
                        .get_ident()
                        .map(|i| i.to_string())
                        .unwrap_or_default();
                    if !DENIABLE.contains(&name.as_str()) {
                        return Err(op.error(format!(
                            "unknown operation '{}': expected one of {}",
                            name,
                            DENIABLE.join(", ")
                        )));
                    }
                    info.denied.push(name);
                    Ok(())
                })
            } else {
                Err(meta.error("unknown entity attribute: expected table, read_only or deny(...)"))
            }
        })?;
    }

    // Validate table name at compile time with proper error handling
    validate_table_name_syn(&info.table, table_span)?;
    Ok(info)
}

pub fn parse_column_attributes(data: &Data) -> Result<Vec<ColumnInfo>> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "Entity can only be derived for structs with named fields",
        ));
    };

    let mut columns = Vec::new();
    for field in &fields_named.named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let ty = &field.ty;
        // Normalize type string by removing all whitespace for consistent matching
        let rust_type = quote!(#ty).to_string().replace(' ', "");

        let mut column = ColumnInfo {
            field: field_name.clone(),
            property: field_name.to_string(),
            column: field_name.to_string(),
            rust_type,
            size: None,
            primary_key: false,
            readonly: false,
            skip: false,
        };
        let mut column_span = field_name.span();

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("column")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    column_span = lit.span();
                    column.column = lit.value();
                } else if meta.path.is_ident("property") {
                    let lit: LitStr = meta.value()?.parse()?;
                    column.property = lit.value();
                } else if meta.path.is_ident("size") {
                    let lit: LitInt = meta.value()?.parse()?;
                    column.size = Some(lit.base10_parse()?);
                } else if meta.path.is_ident("primary_key") {
                    column.primary_key = true;
                } else if meta.path.is_ident("readonly") {
                    column.readonly = true;
                } else if meta.path.is_ident("skip") {
                    column.skip = true;
                } else {
                    return Err(meta.error(
                        "unknown column attribute: expected name, property, size, primary_key, readonly or skip",
                    ));
                }
                Ok(())
            })?;
        }

        if !column.skip {
            validate_column_name_syn(&column.column, column_span)?;
            if column.property.is_empty() {
                return Err(Error::new(column_span, "property name cannot be empty"));
            }
        }
        columns.push(column);
    }

    let mut seen = std::collections::HashSet::new();
    for column in columns.iter().filter(|c| !c.skip) {
        if !seen.insert(column.property.as_str()) {
            return Err(Error::new(
                column.field.span(),
                format!("property '{}' is mapped twice", column.property),
            ));
        }
    }

    Ok(columns)
}
