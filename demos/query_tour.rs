//! A tour of the query compiler
//!
//! Builds a handful of commands, records one query and replays it against
//! every dialect. Run with `cargo run --example query_tour`.

use queryhaus::prelude::*;

#[derive(Entity, SqlRecord)]
#[entity(table = "Products", deny(truncate))]
pub struct Product {
    #[column(name = "ProductID", property = "ID", primary_key, readonly)]
    pub id: i32,

    #[column(name = "ProductName", property = "Name", size = 40)]
    pub name: String,

    #[column(name = "CategoryID", property = "CategoryID")]
    pub category_id: i32,

    #[column(name = "UnitPrice", property = "UnitPrice")]
    pub unit_price: f64,

    #[column(name = "Discontinued", property = "Discontinued")]
    pub discontinued: bool,
}

#[derive(Entity)]
#[entity(table = "Categories", read_only)]
pub struct Category {
    #[column(name = "CategoryID", property = "ID", primary_key)]
    pub id: i32,

    #[column(name = "CategoryName", property = "Name", size = 15)]
    pub name: String,
}

fn print_command(title: &str, command: &StorageCommand) {
    println!("-- {}", title);
    println!("{}", command.sql());
    for parameter in command.parameters() {
        println!("   {} = {:?}", parameter.name, parameter.value);
    }
    println!();
}

fn main() -> anyhow::Result<()> {
    let mut haus = QueryHaus::new(DialectKind::SqlServer);
    haus.register::<Product>()?;
    haus.register::<Category>()?;

    // Typed builder
    let mut builder = haus.builder();
    builder
        .select(vec![
            Category::prop("Name")?,
            Product::prop("UnitPrice")?.avg().alias("AveragePrice"),
        ])?
        .from::<Product>()?
        .join::<Category>(
            JoinType::Inner,
            Product::prop("CategoryID")?.equal_property(Category::prop("ID")?),
        )?
        .filter(Product::prop("Discontinued")?.equal(false))?
        .group_by(vec![Category::prop("Name")?])?
        .having(Product::prop("UnitPrice")?.avg().greater_than(25.0))?
        .order_by(vec![Category::prop("Name")?.asc()])?;
    print_command("average price per category", builder.to_command()?);

    let mut builder = haus.builder();
    builder.insert::<Product>(vec![])?.values_from(&Product {
        id: 0,
        name: "Chai".to_string(),
        category_id: 1,
        unit_price: 18.0,
        discontinued: false,
    })?;
    print_command("insert from a record", builder.to_command()?);

    let mut builder = haus.builder();
    builder
        .update::<Product>()?
        .set_operation(
            Product::prop("UnitPrice")?,
            UpdateOperation::Multiply(SqlValue::from(1.1)),
        )?
        .filter(Product::prop("Name")?.starts_with("Ch"))?;
    print_command("price increase", builder.to_command()?);

    // Permission checks happen before any SQL is produced
    if let Err(e) = haus.builder().truncate::<Product>() {
        println!("-- truncate refused: {}\n", e);
    }

    // Record once, compile per dialect
    let mut query = haus.deferred();
    query
        .select(vec![Product::prop("Name")?, Product::prop("UnitPrice")?])?
        .from::<Product>()?
        .filter(
            Product::prop("UnitPrice")?
                .between(10.0, 20.0)
                .and(Product::prop("Name")?.to_upper().contains("TEA").not()),
        )?
        .order_by(vec![Product::prop("UnitPrice")?.desc()])?
        .paginate(Pagination::page(0, 5))?;
    println!("-- recorded query\n{}\n", query.to_json()?);

    for kind in [
        DialectKind::Standard,
        DialectKind::SqlServer,
        DialectKind::MySql,
        DialectKind::Postgres,
    ] {
        let mut dialect_haus = QueryHaus::new(kind);
        dialect_haus.register::<Product>()?;
        let command = dialect_haus.compile(&query)?;
        print_command(&format!("replayed for {}", kind), &command);
    }

    Ok(())
}
