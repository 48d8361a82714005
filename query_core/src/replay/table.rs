use crate::dialect::{Dialect, DialectKind};
use crate::errors::QueryError;
use crate::expression::PropertyExpression;
use crate::metadata::{EntityMeta, MetadataResolver};
use crate::query_builder::builder::{CommandBuilder, DmlBuilder};
use crate::query_builder::join::JoinType;
use crate::query_builder::update::UpdateOperation;
use crate::replay::method::{MethodArgument, MethodKey, RuntimeMethod};
use std::collections::HashMap;
use std::fmt;
use type_mapping::SqlValue;

/// A recorded call with its type arguments bound to entity metadata
pub struct Invocation<'a> {
    key: MethodKey,
    entities: Vec<&'static EntityMeta>,
    arguments: &'a [MethodArgument],
}

impl Invocation<'_> {
    fn mismatch(&self, reason: String) -> QueryError {
        QueryError::MethodResolution {
            method: self.key.signature().to_string(),
            reason,
        }
    }

    fn argument(&self, index: usize, expected: &str) -> Result<&MethodArgument, QueryError> {
        self.arguments.get(index).ok_or_else(|| {
            self.mismatch(format!("missing {} argument at position {}", expected, index))
        })
    }

    fn wrong_kind(&self, index: usize, expected: &str, found: &MethodArgument) -> QueryError {
        self.mismatch(format!(
            "argument {} should be {}, found {}",
            index,
            expected,
            found.kind()
        ))
    }

    pub fn entity(&self, index: usize) -> Result<&'static EntityMeta, QueryError> {
        self.entities
            .get(index)
            .copied()
            .ok_or_else(|| self.mismatch(format!("missing type argument {}", index)))
    }

    pub fn properties(&self, index: usize) -> Result<Vec<PropertyExpression>, QueryError> {
        match self.argument(index, "properties")? {
            MethodArgument::Properties(properties) => Ok(properties.clone()),
            other => Err(self.wrong_kind(index, "properties", other)),
        }
    }

    pub fn predicate(&self, index: usize) -> Result<PropertyExpression, QueryError> {
        match self.argument(index, "predicate")? {
            MethodArgument::Predicate(predicate) => Ok(predicate.clone()),
            other => Err(self.wrong_kind(index, "predicate", other)),
        }
    }

    pub fn optional_predicate(&self, index: usize) -> Result<Option<PropertyExpression>, QueryError> {
        if index < self.arguments.len() {
            self.predicate(index).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn values(&self, index: usize) -> Result<Vec<SqlValue>, QueryError> {
        match self.argument(index, "values")? {
            MethodArgument::Values(values) => Ok(values.clone()),
            other => Err(self.wrong_kind(index, "values", other)),
        }
    }

    pub fn record(&self, index: usize) -> Result<Vec<(String, SqlValue)>, QueryError> {
        match self.argument(index, "record")? {
            MethodArgument::Record(record) => Ok(record.clone()),
            other => Err(self.wrong_kind(index, "record", other)),
        }
    }

    pub fn limit(&self, index: usize) -> Result<u64, QueryError> {
        match self.argument(index, "limit")? {
            MethodArgument::Limit(limit) => Ok(*limit),
            other => Err(self.wrong_kind(index, "limit", other)),
        }
    }

    pub fn join_type(&self, index: usize) -> Result<JoinType, QueryError> {
        match self.argument(index, "join type")? {
            MethodArgument::JoinType(join_type) => Ok(*join_type),
            other => Err(self.wrong_kind(index, "join type", other)),
        }
    }

    pub fn assignment(
        &self,
        index: usize,
    ) -> Result<(PropertyExpression, UpdateOperation), QueryError> {
        match self.argument(index, "assignment")? {
            MethodArgument::Assignment {
                property,
                operation,
            } => Ok((property.clone(), operation.clone())),
            other => Err(self.wrong_kind(index, "assignment", other)),
        }
    }
}

pub type Handler = fn(&mut CommandBuilder, &Invocation<'_>) -> Result<(), QueryError>;

/// Handlers available for one dialect
#[derive(Clone)]
pub struct MethodTable {
    dialect: DialectKind,
    handlers: HashMap<MethodKey, Handler>,
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.handlers.keys().map(MethodKey::signature).collect();
        keys.sort_unstable();
        f.debug_struct("MethodTable")
            .field("dialect", &self.dialect)
            .field("methods", &keys)
            .finish()
    }
}

impl MethodTable {
    pub fn for_dialect(dialect: &dyn Dialect) -> Self {
        let mut handlers: HashMap<MethodKey, Handler> = HashMap::new();

        handlers.insert(MethodKey::Select, |b, call| {
            b.select(call.properties(0)?).map(drop)
        });
        handlers.insert(MethodKey::SelectDistinct, |b, call| {
            b.select_distinct(call.properties(0)?).map(drop)
        });
        if dialect.supports_row_limit() {
            handlers.insert(MethodKey::SelectLimit, |b, call| {
                b.select_limit(call.limit(0)?).map(drop)
            });
            handlers.insert(MethodKey::SelectPropertiesLimit, |b, call| {
                b.select_properties_limit(call.properties(0)?, call.limit(1)?)
                    .map(drop)
            });
        }
        handlers.insert(MethodKey::From, |b, call| {
            b.from_entity(call.entity(0)?).map(drop)
        });
        handlers.insert(MethodKey::Join, |b, call| {
            b.join_entity(call.join_type(0)?, call.entity(0)?, call.optional_predicate(1)?)
                .map(drop)
        });
        handlers.insert(MethodKey::Filter, |b, call| {
            b.filter(call.predicate(0)?).map(drop)
        });
        handlers.insert(MethodKey::GroupBy, |b, call| {
            b.group_by(call.properties(0)?).map(drop)
        });
        handlers.insert(MethodKey::Having, |b, call| {
            b.having(call.predicate(0)?).map(drop)
        });
        handlers.insert(MethodKey::OrderBy, |b, call| {
            b.order_by(call.properties(0)?).map(drop)
        });
        handlers.insert(MethodKey::Insert, |b, call| {
            b.insert_entity(call.entity(0)?, call.properties(0)?).map(drop)
        });
        handlers.insert(MethodKey::Values, |b, call| {
            b.values(call.values(0)?).map(drop)
        });
        handlers.insert(MethodKey::ValuesRecord, |b, call| {
            b.values_record(call.record(0)?).map(drop)
        });
        handlers.insert(MethodKey::Update, |b, call| {
            b.update_entity(call.entity(0)?).map(drop)
        });
        handlers.insert(MethodKey::Set, |b, call| {
            let (property, operation) = call.assignment(0)?;
            b.set_operation(property, operation).map(drop)
        });
        handlers.insert(MethodKey::Delete, |b, call| {
            b.delete_entity(call.entity(0)?).map(drop)
        });
        handlers.insert(MethodKey::Truncate, |b, call| {
            b.truncate_entity(call.entity(0)?).map(drop)
        });
        handlers.insert(MethodKey::Union, |b, _| b.union().map(drop));
        handlers.insert(MethodKey::UnionAll, |b, _| b.union_all().map(drop));

        Self {
            dialect: dialect.kind(),
            handlers,
        }
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect
    }

    pub fn contains(&self, key: MethodKey) -> bool {
        self.handlers.contains_key(&key)
    }

    /// Bind type arguments through `resolver` and invoke the handler
    pub fn invoke(
        &self,
        builder: &mut CommandBuilder,
        resolver: &dyn MetadataResolver,
        method: &RuntimeMethod,
    ) -> Result<(), QueryError> {
        let key = method.method;
        let resolution = |reason: String| QueryError::MethodResolution {
            method: key.signature().to_string(),
            reason,
        };

        let handler = self.handlers.get(&key).ok_or_else(|| {
            resolution(format!("not available for the {} dialect", self.dialect))
        })?;

        if method.type_arguments.len() != key.type_arity() {
            return Err(resolution(format!(
                "expected {} type arguments, found {}",
                key.type_arity(),
                method.type_arguments.len()
            )));
        }
        let entities = method
            .type_arguments
            .iter()
            .map(|name| {
                resolver
                    .entity(name)
                    .map_err(|_| resolution(format!("'{}' is not a registered entity", name)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let call = Invocation {
            key,
            entities,
            arguments: &method.arguments,
        };
        handler(builder, &call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySqlDialect, StandardDialect};
    use crate::fixtures::{builder, registry};

    #[test]
    fn test_row_limit_handlers_follow_dialect() {
        let standard = MethodTable::for_dialect(&StandardDialect);
        assert!(!standard.contains(MethodKey::SelectLimit));
        assert!(standard.contains(MethodKey::From));

        let mysql = MethodTable::for_dialect(&MySqlDialect);
        assert!(mysql.contains(MethodKey::SelectLimit));
        for key in MethodKey::ALL {
            assert!(mysql.contains(key), "missing {:?}", key);
        }
    }

    #[test]
    fn test_unknown_type_argument() {
        let table = MethodTable::for_dialect(&StandardDialect);
        let mut b = builder(DialectKind::Standard);
        let registry = registry();
        b.select_all().unwrap();

        let method = RuntimeMethod::new(MethodKey::From, vec!["Order".to_string()], vec![]);
        let err = table.invoke(&mut b, registry.as_ref(), &method).unwrap_err();
        assert!(matches!(
            err,
            QueryError::MethodResolution { method, reason }
                if method == "From<T>()" && reason.contains("Order")
        ));
    }

    #[test]
    fn test_argument_shape_mismatch() {
        let table = MethodTable::for_dialect(&StandardDialect);
        let mut b = builder(DialectKind::Standard);
        let registry = registry();

        let method = RuntimeMethod::new(MethodKey::Select, vec![], vec![MethodArgument::Limit(3)]);
        let err = table.invoke(&mut b, registry.as_ref(), &method).unwrap_err();
        assert!(matches!(
            err,
            QueryError::MethodResolution { reason, .. } if reason.contains("found limit")
        ));

        let method = RuntimeMethod::new(MethodKey::From, vec![], vec![]);
        assert!(table.invoke(&mut b, registry.as_ref(), &method).is_err());
    }
}
