//! Northwind-style entities shared by unit tests

use crate::dialect::DialectKind;
use crate::metadata::{ColumnMeta, Entity, EntityKind, EntityMeta, EntityRegistry, Permissions};
use crate::query_builder::CommandBuilder;
use std::sync::Arc;
use type_mapping::DbType;

const IDENTITY: Permissions = Permissions {
    insert: false,
    update: false,
    ..Permissions::ALL
};

const HIDDEN: Permissions = Permissions {
    select: false,
    ..Permissions::ALL
};

const fn column(
    property: &'static str,
    column: &'static str,
    db_type: DbType,
    size: Option<u32>,
) -> ColumnMeta {
    ColumnMeta {
        property,
        column,
        db_type,
        size,
        permissions: Permissions::ALL,
        primary_key: false,
    }
}

const fn key(property: &'static str, column: &'static str) -> ColumnMeta {
    ColumnMeta {
        property,
        column,
        db_type: DbType::Integer,
        size: None,
        permissions: IDENTITY,
        primary_key: true,
    }
}

pub static PRODUCT: EntityMeta = EntityMeta {
    name: "Product",
    table: "Product",
    kind: EntityKind::Table,
    permissions: Permissions::ALL,
    columns: &[
        key("ID", "ProductID"),
        column("ProductName", "ProductName", DbType::VarChar, Some(40)),
        column("SupplierID", "SupplierID", DbType::Integer, None),
        column("CategoryID", "CategoryID", DbType::Integer, None),
        column("UnitPrice", "UnitPrice", DbType::Decimal, None),
        column("UnitsInStock", "UnitsInStock", DbType::SmallInt, None),
        column("_discontinued", "Discontinued", DbType::Boolean, None),
    ],
};

pub static CATEGORY: EntityMeta = EntityMeta {
    name: "Category",
    table: "Category",
    kind: EntityKind::Table,
    permissions: Permissions::ALL,
    columns: &[
        key("CategoryID", "CategoryID"),
        column("CategoryName", "CategoryName", DbType::VarChar, Some(15)),
    ],
};

pub static SUPPLIER: EntityMeta = EntityMeta {
    name: "Supplier",
    table: "Supplier",
    kind: EntityKind::Table,
    permissions: Permissions {
        truncate: false,
        ..Permissions::ALL
    },
    columns: &[
        key("SupplierID", "SupplierID"),
        column("CompanyName", "CompanyName", DbType::VarChar, Some(40)),
        column("Country", "Country", DbType::VarChar, Some(15)),
        ColumnMeta {
            property: "Phone",
            column: "Phone",
            db_type: DbType::VarChar,
            size: Some(24),
            permissions: HIDDEN,
            primary_key: false,
        },
    ],
};

pub static PRODUCT_SUMMARY: EntityMeta = EntityMeta {
    name: "ProductSummary",
    table: "ProductSummaryView",
    kind: EntityKind::Table,
    permissions: Permissions::READ_ONLY,
    columns: &[
        column("ProductName", "ProductName", DbType::VarChar, Some(40)),
        column("CategoryName", "CategoryName", DbType::VarChar, Some(15)),
    ],
};

pub struct Product;
pub struct Category;
pub struct Supplier;
pub struct ProductSummary;

impl Entity for Product {
    fn metadata() -> &'static EntityMeta {
        &PRODUCT
    }
}

impl Entity for Category {
    fn metadata() -> &'static EntityMeta {
        &CATEGORY
    }
}

impl Entity for Supplier {
    fn metadata() -> &'static EntityMeta {
        &SUPPLIER
    }
}

impl Entity for ProductSummary {
    fn metadata() -> &'static EntityMeta {
        &PRODUCT_SUMMARY
    }
}

pub fn registry() -> Arc<EntityRegistry> {
    let mut registry = EntityRegistry::default();
    registry.register::<Product>().unwrap();
    registry.register::<Category>().unwrap();
    registry.register::<Supplier>().unwrap();
    registry.register::<ProductSummary>().unwrap();
    Arc::new(registry)
}

pub fn builder(kind: DialectKind) -> CommandBuilder {
    CommandBuilder::for_kind(kind, registry())
}
