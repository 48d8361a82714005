//! Scalar and aggregate functions applied to a column reference

use serde::{Deserialize, Serialize};
use type_mapping::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Count,
    CountDistinct,
    Avg,
    Min,
    Max,
    Sum,
    Length,
    Upper,
    Lower,
    Trim,
    TrimStart,
    TrimEnd,
    Substring,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl FunctionKind {
    /// Opening text in standard SQL. Dialects may substitute their own; the
    /// number of closing parentheses always follows the `(` in the opening text.
    pub fn standard_open(&self) -> &'static str {
        match self {
            FunctionKind::Count => "COUNT(",
            FunctionKind::CountDistinct => "COUNT(DISTINCT ",
            FunctionKind::Avg => "AVG(",
            FunctionKind::Min => "MIN(",
            FunctionKind::Max => "MAX(",
            FunctionKind::Sum => "SUM(",
            FunctionKind::Length => "LENGTH(",
            FunctionKind::Upper => "UPPER(",
            FunctionKind::Lower => "LOWER(",
            FunctionKind::Trim => "TRIM(",
            FunctionKind::TrimStart => "LTRIM(",
            FunctionKind::TrimEnd => "RTRIM(",
            FunctionKind::Substring => "SUBSTR(",
            FunctionKind::Add
            | FunctionKind::Subtract
            | FunctionKind::Multiply
            | FunctionKind::Divide => "(",
        }
    }

    pub fn arithmetic_symbol(&self) -> Option<&'static str> {
        match self {
            FunctionKind::Add => Some("+"),
            FunctionKind::Subtract => Some("-"),
            FunctionKind::Multiply => Some("*"),
            FunctionKind::Divide => Some("/"),
            _ => None,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            FunctionKind::Count
                | FunctionKind::CountDistinct
                | FunctionKind::Avg
                | FunctionKind::Min
                | FunctionKind::Max
                | FunctionKind::Sum
        )
    }
}

/// Closing parentheses owed by an opening text
pub fn closing_parens(open: &str) -> usize {
    open.matches('(').count()
}

/// A function applied to a node, with its extra arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub kind: FunctionKind,
    pub params: Vec<SqlValue>,
}

impl Function {
    pub fn new(kind: FunctionKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    pub fn with_params(kind: FunctionKind, params: Vec<SqlValue>) -> Self {
        Self { kind, params }
    }
}
