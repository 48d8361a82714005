//! Code generation for entity metadata and record conversion
//!
//! Generated code refers to the runtime only through `::queryhaus`, so user
//! crates need a single dependency.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Ident;
use type_mapping::{db_type_size_hint, rust_type_to_db_type, supports_direct_sql_conversion};

use crate::parsing::{ColumnInfo, EntityInfo};

fn permissions_tokens(
    select: bool,
    insert: bool,
    update: bool,
    delete: bool,
    truncate: bool,
) -> TokenStream {
    quote! {
        ::queryhaus::query_core::metadata::Permissions {
            select: #select,
            insert: #insert,
            update: #update,
            delete: #delete,
            truncate: #truncate,
        }
    }
}

fn column_tokens(column: &ColumnInfo) -> TokenStream {
    let property = &column.property;
    let name = &column.column;
    let db_type = rust_type_to_db_type(&column.rust_type);
    let variant = format_ident!("{}", db_type.variant_name());
    let size = match column.size.or_else(|| db_type_size_hint(db_type)) {
        Some(size) => quote! { ::core::option::Option::Some(#size) },
        None => quote! { ::core::option::Option::None },
    };
    // Read-only columns are never written; keys keep their value once inserted
    let permissions = permissions_tokens(
        true,
        !column.readonly,
        !column.readonly && !column.primary_key,
        true,
        true,
    );
    let primary_key = column.primary_key;

    quote! {
        ::queryhaus::query_core::metadata::ColumnMeta {
            property: #property,
            column: #name,
            db_type: ::queryhaus::type_mapping::DbType::#variant,
            size: #size,
            permissions: #permissions,
            primary_key: #primary_key,
        }
    }
}

pub fn generate_entity_impl(name: &Ident, entity: &EntityInfo, columns: &[ColumnInfo]) -> TokenStream {
    let entity_name = &entity.name;
    let table = &entity.table;
    let permissions = permissions_tokens(
        entity.allows("select"),
        entity.allows("insert"),
        entity.allows("update"),
        entity.allows("delete"),
        entity.allows("truncate"),
    );
    let column_metas: Vec<TokenStream> = columns
        .iter()
        .filter(|c| !c.skip)
        .map(column_tokens)
        .collect();

    quote! {
        impl ::queryhaus::query_core::metadata::Entity for #name {
            fn metadata() -> &'static ::queryhaus::query_core::metadata::EntityMeta {
                static META: ::queryhaus::query_core::metadata::EntityMeta =
                    ::queryhaus::query_core::metadata::EntityMeta {
                        name: #entity_name,
                        table: #table,
                        kind: ::queryhaus::query_core::metadata::EntityKind::Table,
                        permissions: #permissions,
                        columns: &[#(#column_metas),*],
                    };
                &META
            }
        }
    }
}

pub fn generate_record_impl(name: &Ident, columns: &[ColumnInfo]) -> TokenStream {
    let pairs = columns.iter().filter(|c| !c.skip).map(|column| {
        let field = &column.field;
        let property = &column.property;
        if supports_direct_sql_conversion(&column.rust_type) {
            quote! {
                (#property, ::queryhaus::type_mapping::SqlValue::from(::core::clone::Clone::clone(&self.#field)))
            }
        } else {
            quote! {
                (#property, ::queryhaus::type_mapping::SqlValue::json_of(&self.#field))
            }
        }
    });

    quote! {
        impl ::queryhaus::type_mapping::ToSqlRecord for #name {
            fn to_sql_record(&self) -> ::std::vec::Vec<(&'static str, ::queryhaus::type_mapping::SqlValue)> {
                ::std::vec![#(#pairs),*]
            }
        }
    }
}
