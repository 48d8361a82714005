//! Predicate nodes
//!
//! Every fluent call consumes the node and hands it back, so a node is owned by
//! exactly one tree at a time.

use crate::errors::QueryError;
use crate::expression::function::{Function, FunctionKind};
use crate::expression::operator::{LogicalOperator, Operator};
use crate::metadata::{ColumnMeta, ColumnRef, Entity, EntityMeta, MetadataResolver};
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::subquery::SubQuery;
use serde::{Deserialize, Serialize};
use type_mapping::SqlValue;

pub const WILDCARD: &str = "*";

/// Argument data attached to an operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Value(SqlValue),
    Range(SqlValue, SqlValue),
    List(Vec<Operand>),
    /// Another node; makes this a join predicate
    Property(Box<PropertyExpression>),
}

/// One entry of an IN list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Value(SqlValue),
    SubQuery(SubQuery),
}

impl Operand {
    pub fn value<V: Into<SqlValue>>(value: V) -> Self {
        Operand::Value(value.into())
    }
}

impl From<SubQuery> for Operand {
    fn from(subquery: SubQuery) -> Self {
        Operand::SubQuery(subquery)
    }
}

/// Rendering path chosen for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionType {
    Join,
    Function,
    Operator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyExpression {
    entity: String,
    property: String,
    column: Option<ColumnRef>,
    operator: Option<Operator>,
    argument: Option<Argument>,
    functions: Vec<Function>,
    alias: Option<String>,
    logical: Option<LogicalOperator>,
    negated: bool,
    sort: Option<SortOrder>,
    children: Vec<PropertyExpression>,
}

impl PropertyExpression {
    fn bare(entity: &str, property: &str, column: Option<ColumnRef>) -> Self {
        Self {
            entity: entity.to_string(),
            property: property.to_string(),
            column,
            operator: None,
            argument: None,
            functions: Vec::new(),
            alias: None,
            logical: None,
            negated: false,
            sort: None,
            children: Vec::new(),
        }
    }

    /// Node for a property of a typed entity
    pub fn of<T: Entity>(property: &str) -> Result<Self, QueryError> {
        Self::from_meta(T::metadata(), property)
    }

    /// Node for a property of an entity known only by name
    pub fn resolve(
        resolver: &dyn MetadataResolver,
        entity: &str,
        property: &str,
    ) -> Result<Self, QueryError> {
        Self::from_meta(resolver.entity(entity)?, property)
    }

    pub fn from_meta(meta: &EntityMeta, property: &str) -> Result<Self, QueryError> {
        let column = meta.column(property).ok_or_else(|| QueryError::MetadataResolution {
            entity: meta.name.to_string(),
            property: property.to_string(),
        })?;
        Ok(Self::bare(
            meta.name,
            column.property,
            Some(ColumnRef::new(meta, column)),
        ))
    }

    pub(crate) fn for_column(meta: &EntityMeta, column: &ColumnMeta) -> Self {
        Self::bare(meta.name, column.property, Some(ColumnRef::new(meta, column)))
    }

    /// `*`
    pub fn wildcard() -> Self {
        Self::bare("", WILDCARD, None)
    }

    /// A node with no column of its own, used only to hold children
    pub fn group() -> Self {
        Self::bare("", "", None)
    }

    // Accessors

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn column(&self) -> Option<&ColumnRef> {
        self.column.as_ref()
    }

    pub fn operator(&self) -> Option<Operator> {
        self.operator
    }

    pub fn argument(&self) -> Option<&Argument> {
        self.argument.as_ref()
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn logical(&self) -> Option<LogicalOperator> {
        self.logical
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn children(&self) -> &[PropertyExpression] {
        &self.children
    }

    pub fn is_wildcard(&self) -> bool {
        self.property == WILDCARD
    }

    /// Empty nodes contribute nothing of their own to the SQL
    pub fn is_empty(&self) -> bool {
        self.column.is_none() && !self.is_wildcard()
    }

    pub fn expression_type(&self) -> ExpressionType {
        if matches!(self.argument, Some(Argument::Property(_))) {
            ExpressionType::Join
        } else if !self.functions.is_empty() {
            ExpressionType::Function
        } else {
            ExpressionType::Operator
        }
    }

    // Comparisons

    fn compare(mut self, operator: Operator, argument: Argument) -> Self {
        self.operator = Some(operator);
        self.argument = Some(argument);
        self
    }

    pub fn equal<V: Into<SqlValue>>(self, value: V) -> Self {
        self.compare(Operator::Equal, Argument::Value(value.into()))
    }

    pub fn not_equal<V: Into<SqlValue>>(self, value: V) -> Self {
        self.compare(Operator::NotEqual, Argument::Value(value.into()))
    }

    pub fn greater_than<V: Into<SqlValue>>(self, value: V) -> Self {
        self.compare(Operator::GreaterThan, Argument::Value(value.into()))
    }

    pub fn greater_than_or_equal<V: Into<SqlValue>>(self, value: V) -> Self {
        self.compare(Operator::GreaterThanOrEqual, Argument::Value(value.into()))
    }

    pub fn less_than<V: Into<SqlValue>>(self, value: V) -> Self {
        self.compare(Operator::LessThan, Argument::Value(value.into()))
    }

    pub fn less_than_or_equal<V: Into<SqlValue>>(self, value: V) -> Self {
        self.compare(Operator::LessThanOrEqual, Argument::Value(value.into()))
    }

    pub fn between<A: Into<SqlValue>, B: Into<SqlValue>>(self, low: A, high: B) -> Self {
        self.compare(Operator::Between, Argument::Range(low.into(), high.into()))
    }

    pub fn not_between<A: Into<SqlValue>, B: Into<SqlValue>>(self, low: A, high: B) -> Self {
        self.compare(
            Operator::NotBetween,
            Argument::Range(low.into(), high.into()),
        )
    }

    fn membership(self, operator: Operator, operands: Vec<Operand>) -> Result<Self, QueryError> {
        if operands.is_empty() {
            return Err(QueryError::EmptyArgument {
                property: self.property,
                operator: operator.to_string(),
            });
        }
        Ok(self.compare(operator, Argument::List(operands)))
    }

    pub fn in_values<I, V>(self, values: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let operands = values.into_iter().map(|v| Operand::Value(v.into())).collect();
        self.membership(Operator::In, operands)
    }

    pub fn not_in_values<I, V>(self, values: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = V>,
        V: Into<SqlValue>,
    {
        let operands = values.into_iter().map(|v| Operand::Value(v.into())).collect();
        self.membership(Operator::NotIn, operands)
    }

    /// IN over a mix of values and sub-queries
    pub fn in_operands(self, operands: Vec<Operand>) -> Result<Self, QueryError> {
        self.membership(Operator::In, operands)
    }

    pub fn not_in_operands(self, operands: Vec<Operand>) -> Result<Self, QueryError> {
        self.membership(Operator::NotIn, operands)
    }

    pub fn in_subquery(self, subquery: SubQuery) -> Self {
        self.compare(Operator::In, Argument::List(vec![Operand::SubQuery(subquery)]))
    }

    pub fn not_in_subquery(self, subquery: SubQuery) -> Self {
        self.compare(
            Operator::NotIn,
            Argument::List(vec![Operand::SubQuery(subquery)]),
        )
    }

    pub fn like(self, pattern: impl Into<String>) -> Self {
        self.compare(Operator::Like, Argument::Value(SqlValue::Text(pattern.into())))
    }

    pub fn not_like(self, pattern: impl Into<String>) -> Self {
        self.compare(
            Operator::NotLike,
            Argument::Value(SqlValue::Text(pattern.into())),
        )
    }

    pub fn contains(self, text: &str) -> Self {
        self.like(format!("%{}%", text))
    }

    pub fn starts_with(self, text: &str) -> Self {
        self.like(format!("{}%", text))
    }

    pub fn ends_with(self, text: &str) -> Self {
        self.like(format!("%{}", text))
    }

    pub fn is_null(mut self) -> Self {
        self.operator = Some(Operator::IsNull);
        self.argument = None;
        self
    }

    pub fn is_not_null(mut self) -> Self {
        self.operator = Some(Operator::IsNotNull);
        self.argument = None;
        self
    }

    /// Join predicate: `this = other`
    pub fn equal_property(self, other: PropertyExpression) -> Self {
        self.compare_property(Operator::Equal, other)
    }

    pub fn compare_property(self, operator: Operator, other: PropertyExpression) -> Self {
        self.compare(operator, Argument::Property(Box::new(other)))
    }

    // Functions, applied innermost first

    fn apply(mut self, function: Function) -> Self {
        self.functions.push(function);
        self
    }

    pub fn count(self) -> Self {
        self.apply(Function::new(FunctionKind::Count))
    }

    pub fn count_distinct(self) -> Self {
        self.apply(Function::new(FunctionKind::CountDistinct))
    }

    pub fn avg(self) -> Self {
        self.apply(Function::new(FunctionKind::Avg))
    }

    pub fn min(self) -> Self {
        self.apply(Function::new(FunctionKind::Min))
    }

    pub fn max(self) -> Self {
        self.apply(Function::new(FunctionKind::Max))
    }

    pub fn sum(self) -> Self {
        self.apply(Function::new(FunctionKind::Sum))
    }

    pub fn length(self) -> Self {
        self.apply(Function::new(FunctionKind::Length))
    }

    pub fn to_upper(self) -> Self {
        self.apply(Function::new(FunctionKind::Upper))
    }

    pub fn to_lower(self) -> Self {
        self.apply(Function::new(FunctionKind::Lower))
    }

    pub fn trim(self) -> Self {
        self.apply(Function::new(FunctionKind::Trim))
    }

    pub fn trim_start(self) -> Self {
        self.apply(Function::new(FunctionKind::TrimStart))
    }

    pub fn trim_end(self) -> Self {
        self.apply(Function::new(FunctionKind::TrimEnd))
    }

    /// 1-based start, as in SQL
    pub fn substring(self, start: i64, length: Option<i64>) -> Self {
        let mut params = vec![SqlValue::BigInt(start)];
        if let Some(length) = length {
            params.push(SqlValue::BigInt(length));
        }
        self.apply(Function::with_params(FunctionKind::Substring, params))
    }

    pub fn add(self, value: f64) -> Self {
        self.apply(Function::with_params(
            FunctionKind::Add,
            vec![SqlValue::Float(value)],
        ))
    }

    pub fn subtract(self, value: f64) -> Self {
        self.apply(Function::with_params(
            FunctionKind::Subtract,
            vec![SqlValue::Float(value)],
        ))
    }

    pub fn multiply(self, value: f64) -> Self {
        self.apply(Function::with_params(
            FunctionKind::Multiply,
            vec![SqlValue::Float(value)],
        ))
    }

    pub fn divide(self, value: f64) -> Self {
        self.apply(Function::with_params(
            FunctionKind::Divide,
            vec![SqlValue::Float(value)],
        ))
    }

    // Projection and sorting

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn asc(mut self) -> Self {
        self.sort = Some(SortOrder::Asc);
        self
    }

    pub fn desc(mut self) -> Self {
        self.sort = Some(SortOrder::Desc);
        self
    }

    // Composition

    pub fn and(mut self, mut other: PropertyExpression) -> Self {
        other.logical = Some(LogicalOperator::And);
        self.children.push(other);
        self
    }

    pub fn or(mut self, mut other: PropertyExpression) -> Self {
        other.logical = Some(LogicalOperator::Or);
        self.children.push(other);
        self
    }

    /// Relate this node to whatever precedes it; a second `filter` or
    /// `having` joined by OR opens ` OR (` instead of ` AND (`
    pub fn joined_by(mut self, logical: LogicalOperator) -> Self {
        self.logical = Some(logical);
        self
    }

    /// Negate this node together with its children
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Category, Product};

    #[test]
    fn test_typed_construction() {
        let node = Product::prop("ID").unwrap();
        assert_eq!(node.entity(), "Product");
        assert_eq!(node.property(), "ID");
        assert_eq!(node.column().unwrap().column, "ProductID");
        assert!(!node.is_empty());
    }

    #[test]
    fn test_empty_and_wildcard() {
        assert!(PropertyExpression::group().is_empty());
        let star = PropertyExpression::wildcard();
        assert!(star.is_wildcard());
        assert!(!star.is_empty());
    }

    #[test]
    fn test_fluent_chain_keeps_one_node() {
        let node = Product::prop("UnitPrice")
            .unwrap()
            .greater_than(10)
            .alias("Price")
            .desc();
        assert_eq!(node.operator(), Some(Operator::GreaterThan));
        assert_eq!(node.argument(), Some(&Argument::Value(SqlValue::Integer(10))));
        assert_eq!(node.alias_name(), Some("Price"));
        assert_eq!(node.sort(), Some(SortOrder::Desc));
    }

    #[test]
    fn test_in_values_rejects_empty_set() {
        let err = Product::prop("ID")
            .unwrap()
            .in_values(Vec::<i32>::new())
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::EmptyArgument {
                property: "ID".to_string(),
                operator: "IN".to_string(),
            }
        );

        let err = Product::prop("ID")
            .unwrap()
            .not_in_values(Vec::<i32>::new())
            .unwrap_err();
        assert!(matches!(err, QueryError::EmptyArgument { operator, .. } if operator == "NOT IN"));

        assert!(Product::prop("ID").unwrap().in_operands(vec![]).is_err());
    }

    #[test]
    fn test_like_helpers_wrap_wildcards() {
        let contains = Product::prop("ProductName").unwrap().contains("tea");
        assert_eq!(
            contains.argument(),
            Some(&Argument::Value(SqlValue::Text("%tea%".to_string())))
        );
        let starts = Product::prop("ProductName").unwrap().starts_with("Ch");
        assert_eq!(
            starts.argument(),
            Some(&Argument::Value(SqlValue::Text("Ch%".to_string())))
        );
        let ends = Product::prop("ProductName").unwrap().ends_with("ai");
        assert_eq!(ends.operator(), Some(Operator::Like));
        assert_eq!(
            ends.argument(),
            Some(&Argument::Value(SqlValue::Text("%ai".to_string())))
        );
    }

    #[test]
    fn test_expression_type() {
        let join = Product::prop("CategoryID")
            .unwrap()
            .equal_property(Category::prop("CategoryID").unwrap());
        assert_eq!(join.expression_type(), ExpressionType::Join);

        let function = Product::prop("UnitPrice").unwrap().sum();
        assert_eq!(function.expression_type(), ExpressionType::Function);

        let operator = Product::prop("UnitPrice").unwrap().is_null();
        assert_eq!(operator.expression_type(), ExpressionType::Operator);
    }

    #[test]
    fn test_composition_preserves_call_order() {
        let node = Product::prop("ID")
            .unwrap()
            .equal(1)
            .and(Product::prop("UnitPrice").unwrap().less_than(5))
            .or(Product::prop("UnitsInStock").unwrap().is_null());

        let children = node.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].property(), "UnitPrice");
        assert_eq!(children[0].logical(), Some(LogicalOperator::And));
        assert_eq!(children[1].property(), "UnitsInStock");
        assert_eq!(children[1].logical(), Some(LogicalOperator::Or));
    }

    #[test]
    fn test_functions_apply_in_call_order() {
        let node = Product::prop("ProductName")
            .unwrap()
            .trim()
            .to_upper()
            .substring(1, Some(3));
        let kinds: Vec<_> = node.functions().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FunctionKind::Trim, FunctionKind::Upper, FunctionKind::Substring]
        );
        assert_eq!(node.functions()[2].params.len(), 2);
    }

    #[test]
    fn test_not_toggles() {
        let node = Product::prop("ID").unwrap().equal(1).not();
        assert!(node.is_negated());
        assert!(!node.not().is_negated());
    }

    #[test]
    fn test_serde_round_trip() {
        let node = Product::prop("ID")
            .unwrap()
            .between(1, 10)
            .or(Product::prop("ProductName").unwrap().contains("tea"));
        let json = serde_json::to_string(&node).unwrap();
        let back: PropertyExpression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
