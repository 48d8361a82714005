//! Round trip of compiled commands through PostgreSQL
//!
//! Needs a live database: set DATABASE_URL and run with `--ignored`.

use queryhaus::prelude::*;
use serde_json::json;
use sqlx::PgPool;

#[derive(Entity, SqlRecord)]
#[entity(table = "qh_shippers")]
pub struct Shipper {
    #[column(name = "shipper_id", property = "ID", primary_key, readonly)]
    pub id: i32,

    #[column(name = "company_name", size = 40)]
    pub company_name: String,

    #[column(name = "phone", size = 24)]
    pub phone: Option<String>,

    #[column(name = "details")]
    pub details: serde_json::Value,
}

async fn setup_pool() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

async fn recreate_table(pool: &PgPool) {
    sqlx::query("DROP TABLE IF EXISTS qh_shippers CASCADE")
        .execute(pool)
        .await
        .expect("Failed to drop table");
    sqlx::query(
        "CREATE TABLE qh_shippers (
            shipper_id SERIAL PRIMARY KEY,
            company_name VARCHAR(40) NOT NULL,
            phone VARCHAR(24),
            details JSONB NOT NULL
        )",
    )
    .execute(pool)
    .await
    .expect("Failed to create table");
}

fn haus() -> QueryHaus {
    let mut haus = QueryHaus::new(DialectKind::Postgres);
    haus.register::<Shipper>().unwrap();
    haus
}

#[tokio::test]
#[ignore]
async fn test_insert_select_delete() {
    let pool = setup_pool().await;
    recreate_table(&pool).await;
    let provider = PostgresProvider::new(pool.clone());
    provider.health_check().await.unwrap();
    let haus = haus();

    let mut insert = haus.deferred();
    insert.insert::<Shipper>(vec![]).unwrap();
    for (name, phone) in [("Speedy Express", Some("(503) 555-9831")), ("United Package", None)] {
        insert
            .values_from(&Shipper {
                id: 0,
                company_name: name.to_string(),
                phone: phone.map(str::to_string),
                details: json!({"regions": ["north", "west"]}),
            })
            .unwrap();
    }
    assert_eq!(haus.execute(&provider, &insert).await.unwrap(), 2);

    let mut select = haus.deferred();
    select
        .select(vec![
            Shipper::prop("company_name").unwrap(),
            Shipper::prop("details").unwrap(),
        ])
        .unwrap()
        .from::<Shipper>()
        .unwrap()
        .filter(Shipper::prop("phone").unwrap().is_null())
        .unwrap();
    let rows = provider
        .fetch_rows(&haus.compile(&select).unwrap())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["company_name"], "United Package");
    assert_eq!(rows[0]["details"]["regions"][1], "west");

    let mut delete = haus.deferred();
    delete
        .delete::<Shipper>()
        .unwrap()
        .filter(Shipper::prop("company_name").unwrap().starts_with("Speedy"))
        .unwrap();
    assert_eq!(haus.execute(&provider, &delete).await.unwrap(), 1);
}

#[tokio::test]
#[ignore]
async fn test_mysql_command_rejected() {
    let provider = PostgresProvider::new(setup_pool().await);

    let mut mysql = QueryHaus::new(DialectKind::MySql);
    mysql.register::<Shipper>().unwrap();
    let mut query = mysql.deferred();
    query
        .select_all()
        .unwrap()
        .from::<Shipper>()
        .unwrap()
        .filter(Shipper::prop("ID").unwrap().equal(1))
        .unwrap();
    let command = mysql.compile(&query).unwrap();

    assert!(matches!(
        provider.fetch_rows(&command).await,
        Err(QueryHausError::DialectMismatch { .. })
    ));
}
