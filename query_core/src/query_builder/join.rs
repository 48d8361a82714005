use serde::{Deserialize, Serialize};

/// Represents the type of SQL JOIN operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    /// Rows with a match on both sides
    Inner,
    /// Every row of the left side, matched rows of the right
    Left,
    /// Every row of the right side, matched rows of the left
    Right,
    /// Every row of both sides
    Full,
    /// Cartesian product; takes no ON clause
    Cross,
}

impl JoinType {
    pub fn to_sql(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT OUTER JOIN",
            JoinType::Right => "RIGHT OUTER JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }

    pub fn takes_predicate(&self) -> bool {
        !matches!(self, JoinType::Cross)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_type_to_sql() {
        assert_eq!(JoinType::Inner.to_sql(), "INNER JOIN");
        assert_eq!(JoinType::Left.to_sql(), "LEFT OUTER JOIN");
        assert_eq!(JoinType::Right.to_sql(), "RIGHT OUTER JOIN");
        assert_eq!(JoinType::Full.to_sql(), "FULL OUTER JOIN");
        assert_eq!(JoinType::Cross.to_sql(), "CROSS JOIN");
    }

    #[test]
    fn test_only_cross_join_skips_predicate() {
        assert!(JoinType::Inner.takes_predicate());
        assert!(!JoinType::Cross.takes_predicate());
    }
}
