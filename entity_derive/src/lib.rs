//! Procedural macros for generating entity metadata
//!
//! This crate provides the `Entity` derive, which emits the static
//! `EntityMeta` the query compiler resolves properties against, and the
//! `SqlRecord` derive used by `values_from`.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parsing;

use codegen::{generate_entity_impl, generate_record_impl};
use parsing::{parse_column_attributes, parse_entity_attributes};

/// Derive macro for the `Entity` trait
///
/// ```rust,ignore
/// use queryhaus::prelude::*;
///
/// #[derive(Entity)]
/// #[entity(table = "Product", deny(truncate))]
/// pub struct Product {
///     #[column(name = "ProductID", property = "ID", primary_key, readonly)]
///     pub id: i32,
///
///     #[column(name = "ProductName", size = 40)]
///     pub name: String,
///
///     pub unit_price: f64,
///
///     #[column(skip)]
///     pub loaded_at: Option<chrono::DateTime<chrono::Utc>>,
/// }
/// ```
///
/// Column and property names default to the field name. Table and column
/// names are validated at compile time.
#[proc_macro_derive(Entity, attributes(entity, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let entity = match parse_entity_attributes(&input.ident, &input.attrs) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let columns = match parse_column_attributes(&input.data) {
        Ok(columns) => columns,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_entity_impl(&input.ident, &entity, &columns))
}

/// Derive macro for `ToSqlRecord`, pairing each mapped property with its value
///
/// Honors the same `#[column(property = "...", skip)]` attributes as `Entity`.
#[proc_macro_derive(SqlRecord, attributes(column))]
pub fn derive_sql_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let columns = match parse_column_attributes(&input.data) {
        Ok(columns) => columns,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_record_impl(&input.ident, &columns))
}
