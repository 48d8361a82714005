use crate::errors::QueryError;
use crate::expression::PropertyExpression;
use crate::metadata::EntityMeta;
use crate::query_builder::builder::{CommandBuilder, DmlBuilder};
use crate::query_builder::command::StorageCommand;
use crate::query_builder::join::JoinType;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::update::UpdateOperation;
use crate::replay::method::{MethodArgument, MethodKey, MethodQueue, RuntimeMethod};
use crate::replay::table::MethodTable;
use serde::{Deserialize, Serialize};
use type_mapping::SqlValue;

/// A query recorded now and compiled later, against any dialect.
///
/// Recording never fails; grammar and metadata errors surface on replay,
/// exactly as the same calls would fail on a `CommandBuilder`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeferredQuery {
    queue: MethodQueue,
    pagination: Option<Pagination>,
}

impl DeferredQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &MethodQueue {
        &self.queue
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    fn record(
        &mut self,
        method: MethodKey,
        type_arguments: Vec<String>,
        arguments: Vec<MethodArgument>,
    ) -> Result<&mut Self, QueryError> {
        self.queue
            .push(RuntimeMethod::new(method, type_arguments, arguments));
        Ok(self)
    }

    /// Replay every recorded call on `builder`, in order
    pub fn replay_on(&self, builder: &mut CommandBuilder) -> Result<(), QueryError> {
        let table = MethodTable::for_dialect(builder.dialect());
        let resolver = builder.resolver_handle();

        if let Some(pagination) = self.pagination {
            builder.paginate(pagination)?;
        }
        for method in self.queue.iter() {
            crate::debug_log!(
                "[REPLAY] {} on {}",
                method.method.signature(),
                table.dialect()
            );
            table.invoke(builder, resolver.as_ref(), method)?;
        }
        Ok(())
    }

    /// Replay on `builder` and take the finished command
    pub fn compile(&self, mut builder: CommandBuilder) -> Result<StorageCommand, QueryError> {
        self.replay_on(&mut builder)?;
        builder.into_command()
    }

    pub fn to_json(&self) -> Result<String, QueryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, QueryError> {
        Ok(serde_json::from_str(json)?)
    }
}

fn entity_argument(entity: &EntityMeta) -> Vec<String> {
    vec![entity.name.to_string()]
}

impl DmlBuilder for DeferredQuery {
    fn select(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::Select,
            Vec::new(),
            vec![MethodArgument::Properties(properties)],
        )
    }

    fn select_distinct(
        &mut self,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::SelectDistinct,
            Vec::new(),
            vec![MethodArgument::Properties(properties)],
        )
    }

    fn select_limit(&mut self, limit: u64) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::SelectLimit,
            Vec::new(),
            vec![MethodArgument::Limit(limit)],
        )
    }

    fn select_properties_limit(
        &mut self,
        properties: Vec<PropertyExpression>,
        limit: u64,
    ) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::SelectPropertiesLimit,
            Vec::new(),
            vec![
                MethodArgument::Properties(properties),
                MethodArgument::Limit(limit),
            ],
        )
    }

    fn from_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.record(MethodKey::From, entity_argument(entity), Vec::new())
    }

    fn join_entity(
        &mut self,
        join_type: JoinType,
        entity: &'static EntityMeta,
        on: Option<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        let mut arguments = vec![MethodArgument::JoinType(join_type)];
        if let Some(on) = on {
            arguments.push(MethodArgument::Predicate(on));
        }
        self.record(MethodKey::Join, entity_argument(entity), arguments)
    }

    fn filter(&mut self, predicate: PropertyExpression) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::Filter,
            Vec::new(),
            vec![MethodArgument::Predicate(predicate)],
        )
    }

    fn group_by(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::GroupBy,
            Vec::new(),
            vec![MethodArgument::Properties(properties)],
        )
    }

    fn having(&mut self, predicate: PropertyExpression) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::Having,
            Vec::new(),
            vec![MethodArgument::Predicate(predicate)],
        )
    }

    fn order_by(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::OrderBy,
            Vec::new(),
            vec![MethodArgument::Properties(properties)],
        )
    }

    fn insert_entity(
        &mut self,
        entity: &'static EntityMeta,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::Insert,
            entity_argument(entity),
            vec![MethodArgument::Properties(properties)],
        )
    }

    fn values(&mut self, values: Vec<SqlValue>) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::Values,
            Vec::new(),
            vec![MethodArgument::Values(values)],
        )
    }

    fn values_record(&mut self, record: Vec<(String, SqlValue)>) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::ValuesRecord,
            Vec::new(),
            vec![MethodArgument::Record(record)],
        )
    }

    fn update_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.record(MethodKey::Update, entity_argument(entity), Vec::new())
    }

    fn set_operation(
        &mut self,
        property: PropertyExpression,
        operation: UpdateOperation,
    ) -> Result<&mut Self, QueryError> {
        self.record(
            MethodKey::Set,
            Vec::new(),
            vec![MethodArgument::Assignment {
                property,
                operation,
            }],
        )
    }

    fn delete_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.record(MethodKey::Delete, entity_argument(entity), Vec::new())
    }

    fn truncate_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.record(MethodKey::Truncate, entity_argument(entity), Vec::new())
    }

    fn union(&mut self) -> Result<&mut Self, QueryError> {
        self.record(MethodKey::Union, Vec::new(), Vec::new())
    }

    fn union_all(&mut self) -> Result<&mut Self, QueryError> {
        self.record(MethodKey::UnionAll, Vec::new(), Vec::new())
    }

    fn paginate(&mut self, pagination: Pagination) -> Result<&mut Self, QueryError> {
        self.pagination = Some(pagination);
        Ok(self)
    }
}
