//! End-to-end compilation scenarios

#[cfg(test)]
mod integration_tests {
    use crate::dialect::DialectKind;
    use crate::errors::QueryError;
    use crate::expression::{Operand, PropertyExpression};
    use crate::fixtures::{builder, registry, Category, Product};
    use crate::metadata::{Entity, MetadataResolver};
    use crate::query_builder::{DmlBuilder, JoinType, Pagination, StorageCommand, SubQuery};
    use crate::replay::{DeferredQuery, MethodKey};
    use std::collections::HashSet;
    use std::thread;
    use std::time::Instant;
    use type_mapping::{DbType, SqlValue};

    const ALL_DIALECTS: [DialectKind; 4] = [
        DialectKind::Standard,
        DialectKind::SqlServer,
        DialectKind::MySql,
        DialectKind::Postgres,
    ];

    fn product(property: &str) -> PropertyExpression {
        Product::prop(property).unwrap()
    }

    fn category(property: &str) -> PropertyExpression {
        Category::prop(property).unwrap()
    }

    fn assert_balanced(sql: &str) {
        let mut depth = 0i64;
        for c in sql.chars() {
            match c {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            assert!(depth >= 0, "closing parenthesis without opener in {}", sql);
        }
        assert_eq!(depth, 0, "unbalanced parentheses in {}", sql);
    }

    /// Parameter names are unique, numbered from 1 and appear in the text
    fn assert_parameters_sequential(command: &StorageCommand, prefix: &str) {
        let mut seen = HashSet::new();
        for (index, parameter) in command.parameters().iter().enumerate() {
            assert_eq!(parameter.name, format!("{}{}", prefix, index + 1));
            assert!(seen.insert(parameter.name.clone()));
            assert!(command.sql().contains(&parameter.name));
        }
    }

    fn beverages_subquery() -> StorageCommand {
        let mut b = builder(DialectKind::Standard);
        b.select(vec![category("CategoryID")])
            .unwrap()
            .from::<Category>()
            .unwrap()
            .filter(category("CategoryName").equal("Beverages"))
            .unwrap();
        b.into_command().unwrap()
    }

    // ========================================
    // Sub-queries
    // ========================================

    #[test]
    fn test_subquery_parameters_are_renumbered() {
        let mut b = builder(DialectKind::Standard);
        b.select(vec![product("ProductName")])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .filter(
                product("UnitPrice")
                    .greater_than(10)
                    .and(product("CategoryID").in_subquery(beverages_subquery().into())),
            )
            .unwrap();

        let command = b.to_command().unwrap();
        assert_eq!(
            command.sql(),
            "SELECT Product.ProductName FROM Product WHERE (Product.UnitPrice > @p1 AND \
             Product.CategoryID IN (SELECT Category.CategoryID FROM Category WHERE (Category.CategoryName = @p2)))"
        );
        assert_eq!(
            command.parameters()[1].value,
            SqlValue::Text("Beverages".to_string())
        );
        assert_eq!(command.parameters()[1].db_type, Some(DbType::VarChar));
        assert_eq!(command.parameters()[1].size, Some(15));
        assert_balanced(command.sql());
        assert_parameters_sequential(command, "@p");
    }

    #[test]
    fn test_multiple_subqueries_are_wrapped() {
        let node = product("CategoryID")
            .in_operands(vec![
                Operand::from(SubQuery::from(beverages_subquery())),
                Operand::from(SubQuery::from(beverages_subquery())),
                Operand::value(8),
            ])
            .unwrap();

        let mut b = builder(DialectKind::Standard);
        b.select(vec![product("ID")])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .filter(node)
            .unwrap();
        let command = b.to_command().unwrap();
        assert!(command.sql().contains(
            "IN ((SELECT Category.CategoryID FROM Category WHERE (Category.CategoryName = @p1)), \
             (SELECT Category.CategoryID FROM Category WHERE (Category.CategoryName = @p2)), @p3)"
        ));
        assert_balanced(command.sql());
        assert_parameters_sequential(command, "@p");
    }

    #[test]
    fn test_deferred_subquery_takes_parent_dialect() {
        let mut sub = DeferredQuery::new();
        sub.select(vec![category("CategoryID")])
            .unwrap()
            .from::<Category>()
            .unwrap()
            .filter(category("CategoryName").starts_with("Con"))
            .unwrap();

        let mut b = builder(DialectKind::Postgres);
        b.select(vec![product("ID")])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .filter(product("UnitsInStock").equal(0))
            .unwrap()
            .filter(product("CategoryID").not_in_subquery(sub.into()))
            .unwrap();

        let command = b.to_command().unwrap();
        assert!(command.sql().ends_with(
            "WHERE (Product.UnitsInStock = $1) AND (Product.CategoryID NOT IN \
             (SELECT Category.CategoryID FROM Category WHERE (Category.CategoryName LIKE $2)))"
        ));
        assert_parameters_sequential(command, "$");
    }

    #[test]
    fn test_non_select_subquery_rejected() {
        let mut delete = builder(DialectKind::Standard);
        delete.delete::<Category>().unwrap();
        let delete = delete.into_command().unwrap();

        let mut b = builder(DialectKind::Standard);
        b.select_all().unwrap().from::<Product>().unwrap();
        let err = b
            .filter(product("CategoryID").in_subquery(delete.into()))
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_many_parameters_rename_without_collision() {
        let ids: Vec<i32> = (1..=12).collect();
        let mut sub = builder(DialectKind::SqlServer);
        sub.select(vec![category("CategoryID")])
            .unwrap()
            .from::<Category>()
            .unwrap()
            .filter(category("CategoryID").in_values(ids.clone()).unwrap())
            .unwrap();
        let sub = sub.into_command().unwrap();

        let mut b = builder(DialectKind::SqlServer);
        b.select(vec![product("ID")])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .filter(
                product("ID")
                    .in_values(vec![100, 200])
                    .unwrap()
                    .or(product("CategoryID").in_subquery(sub.into())),
            )
            .unwrap();

        let command = b.to_command().unwrap();
        assert_eq!(command.parameters().len(), 14);
        assert!(command.sql().contains("@p3, @p4"));
        assert!(command.sql().contains("@p13, @p14)"));
        for (offset, id) in ids.iter().enumerate() {
            assert_eq!(command.parameters()[offset + 2].value, SqlValue::Integer(*id));
        }
        assert_parameters_sequential(command, "@p");
    }

    // ========================================
    // Replay
    // ========================================

    fn recorded_report() -> DeferredQuery {
        let mut query = DeferredQuery::new();
        query
            .select(vec![
                product("ProductName").trim().alias("Name"),
                category("CategoryName"),
            ])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .join::<Category>(
                JoinType::Left,
                product("CategoryID").equal_property(category("CategoryID")),
            )
            .unwrap()
            .filter(
                product("UnitPrice")
                    .between(5, 50)
                    .and(product("ProductName").length().greater_than(3)),
            )
            .unwrap()
            .order_by(vec![product("ProductName").asc()])
            .unwrap();
        query
    }

    #[test]
    fn test_replay_across_dialects() {
        let query = recorded_report();
        let expected = [
            (DialectKind::Standard, "TRIM(", "LENGTH(", "@p3"),
            (DialectKind::SqlServer, "LTRIM(RTRIM(", "LEN(", "@p3"),
            (DialectKind::MySql, "TRIM(", "LENGTH(", "?3"),
            (DialectKind::Postgres, "TRIM(", "LENGTH(", "$3"),
        ];

        for (kind, trim, length, last) in expected {
            let command = query.compile(builder(kind)).unwrap();
            let sql = command.sql();
            assert!(sql.starts_with(&format!("SELECT {}Product.ProductName", trim)), "{}", sql);
            assert!(sql.contains(" LEFT OUTER JOIN Category ON Product.CategoryID = Category.CategoryID"));
            assert!(sql.contains(&format!("{}Product.ProductName) > {}", length, last)), "{}", sql);
            assert!(sql.ends_with(" ORDER BY Product.ProductName ASC"));
            assert_eq!(command.parameters().len(), 3);
            assert_balanced(sql);
        }
    }

    #[test]
    fn test_replay_matches_direct_build() {
        let query = recorded_report();
        let replayed = query.compile(builder(DialectKind::Standard)).unwrap();

        let mut direct = builder(DialectKind::Standard);
        direct
            .select(vec![
                product("ProductName").trim().alias("Name"),
                category("CategoryName"),
            ])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .join::<Category>(
                JoinType::Left,
                product("CategoryID").equal_property(category("CategoryID")),
            )
            .unwrap()
            .filter(
                product("UnitPrice")
                    .between(5, 50)
                    .and(product("ProductName").length().greater_than(3)),
            )
            .unwrap()
            .order_by(vec![product("ProductName").asc()])
            .unwrap();
        let direct = direct.into_command().unwrap();

        assert_eq!(replayed.sql(), direct.sql());
        assert_eq!(replayed.parameters(), direct.parameters());
    }

    #[test]
    fn test_replayed_row_limit_needs_dialect_support() {
        let mut query = DeferredQuery::new();
        query.select_limit(3).unwrap().from::<Product>().unwrap();

        let command = query.compile(builder(DialectKind::MySql)).unwrap();
        assert!(command.sql().ends_with(" LIMIT 3"));

        let err = query.compile(builder(DialectKind::SqlServer)).unwrap_err();
        assert!(matches!(
            err,
            QueryError::MethodResolution { method, .. } if method == MethodKey::SelectLimit.signature()
        ));
    }

    #[test]
    fn test_replay_surfaces_grammar_errors() {
        let mut query = DeferredQuery::new();
        // Recording accepts the call; the builder rejects it
        query.from::<Product>().unwrap();
        let err = query.compile(builder(DialectKind::Standard)).unwrap_err();
        assert_eq!(
            err,
            QueryError::Ordering("From() cannot follow an empty command".to_string())
        );
    }

    #[test]
    fn test_deferred_json_round_trip_with_subquery() {
        let mut sub = DeferredQuery::new();
        sub.select(vec![category("CategoryID")])
            .unwrap()
            .from::<Category>()
            .unwrap();

        let mut query = DeferredQuery::new();
        query
            .update::<Product>()
            .unwrap()
            .set(product("_discontinued"), true)
            .unwrap()
            .filter(product("CategoryID").in_subquery(sub.into()))
            .unwrap();

        let restored = DeferredQuery::from_json(&query.to_json().unwrap()).unwrap();
        let command = restored.compile(builder(DialectKind::Postgres)).unwrap();
        assert_eq!(
            command.sql(),
            "UPDATE Product SET Discontinued = $1 WHERE (Product.CategoryID IN \
             (SELECT Category.CategoryID FROM Category))"
        );
        assert_eq!(command.parameters()[0].value, SqlValue::Boolean(true));
    }

    #[test]
    fn test_predicate_resolved_by_name() {
        let registry = registry();
        let resolver: &dyn MetadataResolver = registry.as_ref();
        let node = PropertyExpression::resolve(resolver, "Product", "UnitPrice")
            .unwrap()
            .less_than_or_equal(9);
        assert_eq!(node, product("UnitPrice").less_than_or_equal(9));

        assert_eq!(
            PropertyExpression::resolve(resolver, "Order", "ID").unwrap_err(),
            QueryError::UnknownEntity("Order".to_string())
        );
    }

    // ========================================
    // Invariants under load
    // ========================================

    #[test]
    fn test_performance_many_conditions() {
        let start = Instant::now();

        let mut predicate = product("ID").equal(0);
        for i in 1..1000 {
            predicate = if i % 2 == 0 {
                predicate.and(product("ID").not_equal(i))
            } else {
                predicate.or(product("UnitPrice").less_than(i))
            };
        }

        let mut b = builder(DialectKind::Postgres);
        b.select(vec![product("ID")])
            .unwrap()
            .from::<Product>()
            .unwrap()
            .filter(predicate)
            .unwrap();
        let command = b.to_command().unwrap();
        let duration = start.elapsed();

        assert!(duration.as_millis() < 1000);
        assert_eq!(command.parameters().len(), 1000);
        assert_balanced(command.sql());
        assert_parameters_sequential(command, "$");
    }

    #[test]
    fn test_deep_nesting_stays_balanced() {
        let mut predicate = product("ID").equal(0);
        for i in 1..50 {
            predicate = product("ID").equal(i).or(predicate).not();
        }

        let mut b = builder(DialectKind::Standard);
        b.select_all()
            .unwrap()
            .from::<Product>()
            .unwrap()
            .filter(predicate)
            .unwrap();
        let command = b.to_command().unwrap();
        assert_eq!(command.parameters().len(), 50);
        assert_balanced(command.sql());
    }

    #[test]
    fn test_builders_compile_concurrently() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                thread::spawn(move || {
                    let kind = ALL_DIALECTS[i % ALL_DIALECTS.len()];
                    let mut b = builder(kind);
                    b.select_all()
                        .unwrap()
                        .from::<Product>()
                        .unwrap()
                        .filter(product("ID").equal(i as i64))
                        .unwrap()
                        .paginate(Pagination::page(i as u64, 10))
                        .unwrap();
                    b.into_command().unwrap()
                })
            })
            .collect();

        for handle in handles {
            let command = handle.join().unwrap();
            assert!(command.sql().starts_with("SELECT Product.ProductID, Product.ProductName"));
            assert_eq!(command.parameters().len(), 1);
            assert_balanced(command.sql());
        }
    }
}
