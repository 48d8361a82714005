use serde::{Deserialize, Serialize};
use type_mapping::SqlValue;

/// Type of update operation to perform on a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UpdateOperation {
    /// column = @p
    Set(SqlValue),

    /// column = column + @p
    Increment(SqlValue),

    /// column = column - @p
    Decrement(SqlValue),

    /// column = column * @p
    Multiply(SqlValue),

    /// column = column / @p
    Divide(SqlValue),
}

impl UpdateOperation {
    /// Render the assignment for `column` with the placeholder already named
    pub fn to_sql(&self, column: &str, placeholder: &str) -> String {
        match self.symbol() {
            None => format!("{} = {}", column, placeholder),
            Some(symbol) => format!("{} = {} {} {}", column, column, symbol, placeholder),
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        match self {
            UpdateOperation::Set(_) => None,
            UpdateOperation::Increment(_) => Some("+"),
            UpdateOperation::Decrement(_) => Some("-"),
            UpdateOperation::Multiply(_) => Some("*"),
            UpdateOperation::Divide(_) => Some("/"),
        }
    }

    /// Get the value to bind as a parameter
    pub fn value(&self) -> &SqlValue {
        match self {
            UpdateOperation::Set(v)
            | UpdateOperation::Increment(v)
            | UpdateOperation::Decrement(v)
            | UpdateOperation::Multiply(v)
            | UpdateOperation::Divide(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignments() {
        let set = UpdateOperation::Set(SqlValue::from("Chai"));
        assert_eq!(set.to_sql("ProductName", "@p1"), "ProductName = @p1");

        let inc = UpdateOperation::Increment(SqlValue::from(5));
        assert_eq!(inc.to_sql("UnitsInStock", "$2"), "UnitsInStock = UnitsInStock + $2");

        let div = UpdateOperation::Divide(SqlValue::from(2.0));
        assert_eq!(div.to_sql("UnitPrice", "?3"), "UnitPrice = UnitPrice / ?3");
        assert_eq!(div.value(), &SqlValue::Float(2.0));
    }
}
