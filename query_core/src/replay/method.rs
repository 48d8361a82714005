use crate::expression::PropertyExpression;
use crate::query_builder::join::JoinType;
use crate::query_builder::update::UpdateOperation;
use serde::{Deserialize, Serialize};
use type_mapping::SqlValue;

/// Identity of a builder method, independent of its type arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKey {
    Select,
    SelectDistinct,
    SelectLimit,
    SelectPropertiesLimit,
    From,
    Join,
    Filter,
    GroupBy,
    Having,
    OrderBy,
    Insert,
    Values,
    ValuesRecord,
    Update,
    Set,
    Delete,
    Truncate,
    Union,
    UnionAll,
}

impl MethodKey {
    pub const ALL: [MethodKey; 19] = [
        MethodKey::Select,
        MethodKey::SelectDistinct,
        MethodKey::SelectLimit,
        MethodKey::SelectPropertiesLimit,
        MethodKey::From,
        MethodKey::Join,
        MethodKey::Filter,
        MethodKey::GroupBy,
        MethodKey::Having,
        MethodKey::OrderBy,
        MethodKey::Insert,
        MethodKey::Values,
        MethodKey::ValuesRecord,
        MethodKey::Update,
        MethodKey::Set,
        MethodKey::Delete,
        MethodKey::Truncate,
        MethodKey::Union,
        MethodKey::UnionAll,
    ];

    /// Readable signature with the type parameter left generic
    pub fn signature(&self) -> &'static str {
        match self {
            MethodKey::Select => "Select(properties)",
            MethodKey::SelectDistinct => "SelectDistinct(properties)",
            MethodKey::SelectLimit => "Select(limit)",
            MethodKey::SelectPropertiesLimit => "Select(properties, limit)",
            MethodKey::From => "From<T>()",
            MethodKey::Join => "Join<T>(join_type, on)",
            MethodKey::Filter => "Filter(predicate)",
            MethodKey::GroupBy => "GroupBy(properties)",
            MethodKey::Having => "Having(predicate)",
            MethodKey::OrderBy => "OrderBy(properties)",
            MethodKey::Insert => "Insert<T>(properties)",
            MethodKey::Values => "Values(values)",
            MethodKey::ValuesRecord => "Values(record)",
            MethodKey::Update => "Update<T>()",
            MethodKey::Set => "Set(property, operation)",
            MethodKey::Delete => "Delete<T>()",
            MethodKey::Truncate => "Truncate<T>()",
            MethodKey::Union => "Union()",
            MethodKey::UnionAll => "UnionAll()",
        }
    }

    /// Number of entity type arguments the method takes
    pub fn type_arity(&self) -> usize {
        match self {
            MethodKey::From
            | MethodKey::Join
            | MethodKey::Insert
            | MethodKey::Update
            | MethodKey::Delete
            | MethodKey::Truncate => 1,
            _ => 0,
        }
    }
}

/// A recorded argument value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MethodArgument {
    Properties(Vec<PropertyExpression>),
    Predicate(PropertyExpression),
    Values(Vec<SqlValue>),
    Record(Vec<(String, SqlValue)>),
    Limit(u64),
    JoinType(JoinType),
    Assignment {
        property: PropertyExpression,
        operation: UpdateOperation,
    },
}

impl MethodArgument {
    pub fn kind(&self) -> &'static str {
        match self {
            MethodArgument::Properties(_) => "properties",
            MethodArgument::Predicate(_) => "predicate",
            MethodArgument::Values(_) => "values",
            MethodArgument::Record(_) => "record",
            MethodArgument::Limit(_) => "limit",
            MethodArgument::JoinType(_) => "join type",
            MethodArgument::Assignment { .. } => "assignment",
        }
    }
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeMethod {
    pub method: MethodKey,
    /// Entity names bound to the method's type parameters
    pub type_arguments: Vec<String>,
    pub arguments: Vec<MethodArgument>,
}

impl RuntimeMethod {
    pub fn new(method: MethodKey, type_arguments: Vec<String>, arguments: Vec<MethodArgument>) -> Self {
        Self {
            method,
            type_arguments,
            arguments,
        }
    }
}

/// Calls in the order they were made
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodQueue {
    methods: Vec<RuntimeMethod>,
}

impl MethodQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, method: RuntimeMethod) {
        self.methods.push(method);
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuntimeMethod> {
        self.methods.iter()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_arity() {
        assert_eq!(MethodKey::From.type_arity(), 1);
        assert_eq!(MethodKey::Filter.type_arity(), 0);
        assert_eq!(MethodKey::From.signature(), "From<T>()");
    }

    #[test]
    fn test_queue_keeps_order() {
        let mut queue = MethodQueue::new();
        queue.push(RuntimeMethod::new(MethodKey::Select, vec![], vec![]));
        queue.push(RuntimeMethod::new(
            MethodKey::From,
            vec!["Product".to_string()],
            vec![],
        ));
        let keys: Vec<_> = queue.iter().map(|m| m.method).collect();
        assert_eq!(keys, vec![MethodKey::Select, MethodKey::From]);
        assert_eq!(queue.len(), 2);
    }
}
