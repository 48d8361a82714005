//! Predicate expression model
//!
//! A `PropertyExpression` is one column test (or projection, or sort key) plus
//! the child predicates composed onto it with `and`/`or`.

pub mod function;
pub mod operator;
pub mod property;

pub use function::{Function, FunctionKind};
pub use operator::{LogicalOperator, Operator};
pub use property::{Argument, ExpressionType, Operand, PropertyExpression};
