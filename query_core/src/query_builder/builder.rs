//! Command builder
//!
//! `CommandBuilder` accumulates SQL text and parameters as fluent calls arrive
//! in DML order, and `to_command()` finalizes the result.

use crate::dialect::{Dialect, DialectKind};
use crate::errors::QueryError;
use crate::expression::{LogicalOperator, PropertyExpression};
use crate::metadata::{mangled_field_name, Entity, EntityMeta, MetadataResolver};
use crate::options::CompilerOptions;
use crate::query_builder::command::{StorageCommand, TransactionType};
use crate::query_builder::join::JoinType;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::select_cache;
use crate::query_builder::update::UpdateOperation;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use type_mapping::{serialize_to_sql_record, SqlValue, ToSqlRecord};

/// Position of the builder in the DML grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Clause {
    Start,
    Select,
    From,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Union,
    Insert,
    Values,
    Update,
    Set,
    Delete,
    Truncate,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::Start => "an empty command",
            Clause::Select => "Select()",
            Clause::From => "From()",
            Clause::Join => "Join()",
            Clause::Where => "Filter()",
            Clause::GroupBy => "GroupBy()",
            Clause::Having => "Having()",
            Clause::OrderBy => "OrderBy()",
            Clause::Union => "Union()",
            Clause::Insert => "Insert()",
            Clause::Values => "Values()",
            Clause::Update => "Update()",
            Clause::Set => "Set()",
            Clause::Delete => "Delete()",
            Clause::Truncate => "Truncate()",
        };
        f.write_str(name)
    }
}

/// The fluent DML grammar shared by `CommandBuilder` and `DeferredQuery`
pub trait DmlBuilder {
    /// `SELECT` of the given properties; none selects the entity's columns
    fn select(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError>;

    fn select_all(&mut self) -> Result<&mut Self, QueryError> {
        self.select(Vec::new())
    }

    fn select_distinct(
        &mut self,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError>;

    /// `SELECT` with a dialect row limit
    fn select_limit(&mut self, limit: u64) -> Result<&mut Self, QueryError>;

    fn select_properties_limit(
        &mut self,
        properties: Vec<PropertyExpression>,
        limit: u64,
    ) -> Result<&mut Self, QueryError>;

    fn from_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError>;

    fn from<T: Entity>(&mut self) -> Result<&mut Self, QueryError> {
        self.from_entity(T::metadata())
    }

    fn join_entity(
        &mut self,
        join_type: JoinType,
        entity: &'static EntityMeta,
        on: Option<PropertyExpression>,
    ) -> Result<&mut Self, QueryError>;

    fn join<T: Entity>(
        &mut self,
        join_type: JoinType,
        on: PropertyExpression,
    ) -> Result<&mut Self, QueryError> {
        self.join_entity(join_type, T::metadata(), Some(on))
    }

    fn cross_join<T: Entity>(&mut self) -> Result<&mut Self, QueryError> {
        self.join_entity(JoinType::Cross, T::metadata(), None)
    }

    /// `WHERE`; repeated calls are combined with AND, or OR when the
    /// predicate is joined by OR
    fn filter(&mut self, predicate: PropertyExpression) -> Result<&mut Self, QueryError>;

    fn group_by(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError>;

    fn having(&mut self, predicate: PropertyExpression) -> Result<&mut Self, QueryError>;

    fn order_by(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError>;

    /// `INSERT INTO`; no properties means every insertable column
    fn insert_entity(
        &mut self,
        entity: &'static EntityMeta,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError>;

    fn insert<T: Entity>(
        &mut self,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        self.insert_entity(T::metadata(), properties)
    }

    /// One row of values, in insert column order
    fn values(&mut self, values: Vec<SqlValue>) -> Result<&mut Self, QueryError>;

    /// One row of values, matched to insert columns by property name
    fn values_record(&mut self, record: Vec<(String, SqlValue)>) -> Result<&mut Self, QueryError>;

    fn values_from<R: ToSqlRecord>(&mut self, record: &R) -> Result<&mut Self, QueryError> {
        let record = record
            .to_sql_record()
            .into_iter()
            .map(|(property, value)| (property.to_string(), value))
            .collect();
        self.values_record(record)
    }

    fn values_serialized<S: Serialize>(&mut self, data: &S) -> Result<&mut Self, QueryError> {
        self.values_record(serialize_to_sql_record(data))
    }

    fn update_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError>;

    fn update<T: Entity>(&mut self) -> Result<&mut Self, QueryError> {
        self.update_entity(T::metadata())
    }

    fn set<V: Into<SqlValue>>(
        &mut self,
        property: PropertyExpression,
        value: V,
    ) -> Result<&mut Self, QueryError> {
        self.set_operation(property, UpdateOperation::Set(value.into()))
    }

    fn set_operation(
        &mut self,
        property: PropertyExpression,
        operation: UpdateOperation,
    ) -> Result<&mut Self, QueryError>;

    fn delete_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError>;

    fn delete<T: Entity>(&mut self) -> Result<&mut Self, QueryError> {
        self.delete_entity(T::metadata())
    }

    fn truncate_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError>;

    fn truncate<T: Entity>(&mut self) -> Result<&mut Self, QueryError> {
        self.truncate_entity(T::metadata())
    }

    fn union(&mut self) -> Result<&mut Self, QueryError>;

    fn union_all(&mut self) -> Result<&mut Self, QueryError>;

    fn paginate(&mut self, pagination: Pagination) -> Result<&mut Self, QueryError>;
}

/// Builds one `StorageCommand` for one dialect
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    dialect: Arc<dyn Dialect>,
    resolver: Arc<dyn MetadataResolver>,
    options: CompilerOptions,
    /// Statement text without the trailing row limit or page
    pub(crate) sql: String,
    pub(crate) command: StorageCommand,
    selected: Vec<PropertyExpression>,
    clause: Clause,
    default_columns_pending: bool,
    target: Option<&'static EntityMeta>,
    insert_columns: Vec<PropertyExpression>,
    row_limit: Option<u64>,
    pagination: Option<Pagination>,
    where_open: bool,
    having_open: bool,
    poisoned: Option<QueryError>,
}

impl CommandBuilder {
    pub fn new(dialect: Arc<dyn Dialect>, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self::with_options(dialect, resolver, CompilerOptions::default())
    }

    pub fn with_options(
        dialect: Arc<dyn Dialect>,
        resolver: Arc<dyn MetadataResolver>,
        options: CompilerOptions,
    ) -> Self {
        Self {
            dialect,
            resolver,
            options,
            sql: String::new(),
            command: StorageCommand::new(),
            selected: Vec::new(),
            clause: Clause::Start,
            default_columns_pending: false,
            target: None,
            insert_columns: Vec::new(),
            row_limit: None,
            pagination: None,
            where_open: false,
            having_open: false,
            poisoned: None,
        }
    }

    pub fn for_kind(kind: DialectKind, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self::new(kind.dialect(), resolver)
    }

    /// A fresh builder sharing this one's dialect, resolver and options
    pub fn child(&self) -> Self {
        Self::with_options(
            Arc::clone(&self.dialect),
            Arc::clone(&self.resolver),
            self.options.clone(),
        )
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn resolver(&self) -> &dyn MetadataResolver {
        self.resolver.as_ref()
    }

    pub(crate) fn resolver_handle(&self) -> Arc<dyn MetadataResolver> {
        Arc::clone(&self.resolver)
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Properties rendered by `select` calls so far
    pub fn selected_properties(&self) -> &[PropertyExpression] {
        &self.selected
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Finalize and return the command. Calling it again without further
    /// mutation yields the same SQL and parameters.
    pub fn to_command(&mut self) -> Result<&StorageCommand, QueryError> {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }
        if let Err(err) = self.finalize() {
            return Err(self.poison(err));
        }
        Ok(&self.command)
    }

    /// Finalize and take the command
    pub fn into_command(mut self) -> Result<StorageCommand, QueryError> {
        self.to_command()?;
        Ok(self.command)
    }

    fn finalize(&mut self) -> Result<(), QueryError> {
        match self.clause {
            Clause::Start => {
                return Err(QueryError::Ordering(
                    "ToCommand() called on an empty command".to_string(),
                ))
            }
            Clause::Select => {
                return Err(QueryError::Ordering(
                    "Select() must be followed by From()".to_string(),
                ))
            }
            Clause::Union => {
                return Err(QueryError::Ordering(
                    "Union() must be followed by Select()".to_string(),
                ))
            }
            Clause::Insert => {
                return Err(QueryError::Ordering(
                    "Insert() must be followed by Values()".to_string(),
                ))
            }
            Clause::Update => {
                return Err(QueryError::Ordering(
                    "Update() must be followed by Set()".to_string(),
                ))
            }
            _ => {}
        }

        if self.row_limit.is_some() && self.pagination.is_some() {
            return Err(QueryError::UnsupportedOperation(
                "a row limit cannot be combined with Pagination".to_string(),
            ));
        }
        if self.pagination.is_some() && self.command.transaction_type() != TransactionType::Select
        {
            return Err(QueryError::UnsupportedOperation(format!(
                "Pagination does not apply to {} commands",
                self.command.transaction_type()
            )));
        }

        let mut sql = self.sql.clone();
        if let Some(limit) = self.row_limit {
            sql.push_str(&self.dialect.row_limit_clause(limit)?);
        }
        if let Some(pagination) = &self.pagination {
            if !pagination.is_empty()
                && self.clause != Clause::OrderBy
                && self.dialect.pagination_requires_order()
            {
                sql.push_str(" ORDER BY (SELECT NULL)");
            }
            sql.push_str(&self.dialect.pagination_clause(pagination));
        }

        crate::debug_log!(
            "[TO_COMMAND] {} ({} parameters)",
            sql,
            self.command.parameters().len()
        );
        self.command.set_sql(sql);
        self.command.set_pagination(self.pagination);
        Ok(())
    }

    fn poison(&mut self, err: QueryError) -> QueryError {
        tracing::warn!("[BUILDER] Command {} failed: {}", self.command.name(), err);
        self.poisoned = Some(err.clone());
        err
    }

    /// Run one builder step; a failure poisons the builder
    fn step<F>(&mut self, f: F) -> Result<&mut Self, QueryError>
    where
        F: FnOnce(&mut Self) -> Result<(), QueryError>,
    {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }
        match f(self) {
            Ok(()) => Ok(self),
            Err(err) => Err(self.poison(err)),
        }
    }

    fn expect_clause(&self, method: &str, allowed: &[Clause]) -> Result<(), QueryError> {
        if allowed.contains(&self.clause) {
            Ok(())
        } else {
            Err(QueryError::Ordering(format!(
                "{} cannot follow {}",
                method, self.clause
            )))
        }
    }

    fn check_permission(
        entity: &EntityMeta,
        transaction: TransactionType,
    ) -> Result<(), QueryError> {
        if entity.permissions.allows(transaction) {
            Ok(())
        } else {
            Err(QueryError::PermissionDenied {
                entity: entity.name.to_string(),
                operation: transaction.to_string(),
            })
        }
    }

    /// Modifying statements need a real entity that permits them
    fn check_dml_target(
        entity: &EntityMeta,
        transaction: TransactionType,
    ) -> Result<(), QueryError> {
        if entity.is_query_result() {
            return Err(QueryError::UnsupportedOperation(format!(
                "{} is not supported on {}",
                transaction, entity.name
            )));
        }
        Self::check_permission(entity, transaction)
    }

    pub(crate) fn check_column_permission(
        property: &PropertyExpression,
        transaction: TransactionType,
    ) -> Result<(), QueryError> {
        match property.column() {
            Some(column) if !column.permissions.allows(transaction) => {
                Err(QueryError::PermissionDenied {
                    entity: format!("{}.{}", property.entity(), property.property()),
                    operation: transaction.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// The property must be a column of the statement's target entity
    fn check_target_column(&self, property: &PropertyExpression) -> Result<(), QueryError> {
        let target = self.target.map(|t| t.name).unwrap_or_default();
        if property.is_empty() || property.entity() != target {
            return Err(QueryError::MetadataResolution {
                entity: target.to_string(),
                property: property.property().to_string(),
            });
        }
        Ok(())
    }

    fn default_columns(&self, entity: &'static EntityMeta) -> Arc<str> {
        if self.options.cache_select_statements {
            select_cache::default_select(entity)
        } else {
            Arc::from(select_cache::build_select_list(entity))
        }
    }

    fn begin_select(
        &mut self,
        properties: Vec<PropertyExpression>,
        distinct: bool,
        limit: Option<u64>,
    ) -> Result<(), QueryError> {
        self.expect_clause("Select()", &[Clause::Start, Clause::Union])?;
        if let Some(limit) = limit {
            self.dialect.row_limit_clause(limit)?;
            self.row_limit = Some(limit);
        }

        self.command.set_transaction_type(TransactionType::Select);
        self.sql.push_str("SELECT ");
        if distinct {
            self.sql.push_str("DISTINCT ");
        }

        let mut rendered = Vec::new();
        for property in properties {
            if property.is_empty() {
                continue;
            }
            rendered.push(self.render_projection(&property)?);
            self.selected.push(property);
        }

        if rendered.is_empty() {
            self.default_columns_pending = true;
        } else {
            self.sql.push_str(&rendered.join(", "));
        }
        self.clause = Clause::Select;
        Ok(())
    }

    fn append_condition(
        &mut self,
        predicate: &PropertyExpression,
        having: bool,
    ) -> Result<(), QueryError> {
        let fragment = self.render_predicate(predicate)?;
        if fragment.is_empty() {
            return Ok(());
        }

        let already_open = if having {
            self.having_open
        } else {
            self.where_open
        };
        let opener = match (already_open, predicate.logical(), having) {
            (false, _, false) => " WHERE (",
            (false, _, true) => " HAVING (",
            (true, Some(LogicalOperator::Or), _) => " OR (",
            (true, _, _) => " AND (",
        };
        if having {
            self.having_open = true;
        } else {
            self.where_open = true;
        }

        self.sql.push_str(opener);
        self.sql.push_str(&fragment);
        self.sql.push(')');
        Ok(())
    }

    fn append_values(&mut self, values: Vec<SqlValue>) -> Result<(), QueryError> {
        if values.len() != self.insert_columns.len() {
            return Err(QueryError::Ordering(format!(
                "Values() received {} values for {} columns",
                values.len(),
                self.insert_columns.len()
            )));
        }

        let mut placeholders = Vec::with_capacity(values.len());
        for (index, value) in values.into_iter().enumerate() {
            let column = self.insert_columns[index].column().cloned();
            placeholders.push(self.bind(value, column.as_ref())?);
        }

        self.sql.push_str(if self.clause == Clause::Values {
            ", ("
        } else {
            " VALUES ("
        });
        self.sql.push_str(&placeholders.join(", "));
        self.sql.push(')');
        self.clause = Clause::Values;
        Ok(())
    }

    fn expect_values(&self) -> Result<(), QueryError> {
        if matches!(self.clause, Clause::Insert | Clause::Values) {
            Ok(())
        } else {
            Err(QueryError::Ordering(
                "Values() called before Insert()".to_string(),
            ))
        }
    }
}

impl DmlBuilder for CommandBuilder {
    fn select(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError> {
        self.step(|b| b.begin_select(properties, false, None))
    }

    fn select_distinct(
        &mut self,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        self.step(|b| b.begin_select(properties, true, None))
    }

    fn select_limit(&mut self, limit: u64) -> Result<&mut Self, QueryError> {
        self.step(|b| b.begin_select(Vec::new(), false, Some(limit)))
    }

    fn select_properties_limit(
        &mut self,
        properties: Vec<PropertyExpression>,
        limit: u64,
    ) -> Result<&mut Self, QueryError> {
        self.step(|b| b.begin_select(properties, false, Some(limit)))
    }

    fn from_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("From()", &[Clause::Select])?;
            Self::check_permission(entity, TransactionType::Select)?;

            if b.default_columns_pending {
                let columns = b.default_columns(entity);
                b.sql.push_str(&columns);
                b.default_columns_pending = false;
            }
            b.sql.push_str(" FROM ");
            b.sql.push_str(entity.table);
            b.target = Some(entity);
            b.clause = Clause::From;
            Ok(())
        })
    }

    fn join_entity(
        &mut self,
        join_type: JoinType,
        entity: &'static EntityMeta,
        on: Option<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("Join()", &[Clause::From, Clause::Join])?;
            Self::check_permission(entity, TransactionType::Select)?;

            let mut clause = format!(" {} {}", join_type.to_sql(), entity.table);
            if join_type.takes_predicate() {
                let fragment = match &on {
                    Some(predicate) => b.render_predicate(predicate)?,
                    None => String::new(),
                };
                if fragment.is_empty() {
                    return Err(QueryError::UnsupportedOperation(format!(
                        "{} {} requires an ON predicate",
                        join_type.to_sql(),
                        entity.table
                    )));
                }
                clause.push_str(" ON ");
                clause.push_str(&fragment);
            }

            b.sql.push_str(&clause);
            b.clause = Clause::Join;
            Ok(())
        })
    }

    fn filter(&mut self, predicate: PropertyExpression) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause(
                "Filter()",
                &[
                    Clause::From,
                    Clause::Join,
                    Clause::Where,
                    Clause::Set,
                    Clause::Delete,
                ],
            )?;
            b.append_condition(&predicate, false)?;
            b.clause = Clause::Where;
            Ok(())
        })
    }

    fn group_by(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("GroupBy()", &[Clause::From, Clause::Join, Clause::Where])?;
            let mut rendered = Vec::new();
            for property in properties.iter().filter(|p| !p.is_empty()) {
                rendered.push(b.render_reference(property)?);
            }
            if rendered.is_empty() {
                return Err(QueryError::UnsupportedOperation(
                    "GroupBy() needs at least one property".to_string(),
                ));
            }
            b.sql.push_str(" GROUP BY ");
            b.sql.push_str(&rendered.join(", "));
            b.clause = Clause::GroupBy;
            Ok(())
        })
    }

    fn having(&mut self, predicate: PropertyExpression) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("Having()", &[Clause::GroupBy, Clause::Having])?;
            b.append_condition(&predicate, true)?;
            b.clause = Clause::Having;
            Ok(())
        })
    }

    fn order_by(&mut self, properties: Vec<PropertyExpression>) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause(
                "OrderBy()",
                &[
                    Clause::From,
                    Clause::Join,
                    Clause::Where,
                    Clause::GroupBy,
                    Clause::Having,
                    Clause::OrderBy,
                ],
            )?;
            let mut rendered = Vec::new();
            for property in properties.iter().filter(|p| !p.is_empty()) {
                let mut fragment = b.render_reference(property)?;
                if let Some(sort) = property.sort() {
                    fragment.push(' ');
                    fragment.push_str(sort.to_sql());
                }
                rendered.push(fragment);
            }
            if rendered.is_empty() {
                return Err(QueryError::UnsupportedOperation(
                    "OrderBy() needs at least one property".to_string(),
                ));
            }
            b.sql.push_str(if b.clause == Clause::OrderBy {
                ", "
            } else {
                " ORDER BY "
            });
            b.sql.push_str(&rendered.join(", "));
            b.clause = Clause::OrderBy;
            Ok(())
        })
    }

    fn insert_entity(
        &mut self,
        entity: &'static EntityMeta,
        properties: Vec<PropertyExpression>,
    ) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("Insert()", &[Clause::Start])?;
            Self::check_dml_target(entity, TransactionType::Insert)?;
            b.target = Some(entity);

            let columns: Vec<PropertyExpression> = if properties.is_empty() {
                entity
                    .insertable_columns()
                    .map(|column| PropertyExpression::for_column(entity, column))
                    .collect()
            } else {
                properties
            };
            for column in &columns {
                b.check_target_column(column)?;
                Self::check_column_permission(column, TransactionType::Insert)?;
            }
            if columns.is_empty() {
                return Err(QueryError::UnsupportedOperation(format!(
                    "{} has no insertable columns",
                    entity.name
                )));
            }

            let names: Vec<&str> = columns
                .iter()
                .filter_map(|c| c.column().map(|col| col.column.as_str()))
                .collect();
            b.sql = format!("INSERT INTO {} ({})", entity.table, names.join(", "));
            b.command.set_transaction_type(TransactionType::Insert);
            b.insert_columns = columns;
            b.clause = Clause::Insert;
            Ok(())
        })
    }

    fn values(&mut self, values: Vec<SqlValue>) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_values()?;
            b.append_values(values)
        })
    }

    fn values_record(&mut self, record: Vec<(String, SqlValue)>) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_values()?;
            let mut values = Vec::with_capacity(b.insert_columns.len());
            for column in &b.insert_columns {
                let property = column.property();
                let column_name = column.column().map(|c| c.column.as_str());
                let mangled = mangled_field_name(property);
                let value = record
                    .iter()
                    .find(|(key, _)| {
                        key == property || Some(key.as_str()) == column_name || *key == mangled
                    })
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| {
                        QueryError::Ordering(format!(
                            "Values() record has no value for '{}'",
                            property
                        ))
                    })?;
                values.push(value);
            }
            b.append_values(values)
        })
    }

    fn update_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("Update()", &[Clause::Start])?;
            Self::check_dml_target(entity, TransactionType::Update)?;
            b.sql = format!("UPDATE {}", entity.table);
            b.command.set_transaction_type(TransactionType::Update);
            b.target = Some(entity);
            b.clause = Clause::Update;
            Ok(())
        })
    }

    fn set_operation(
        &mut self,
        property: PropertyExpression,
        operation: UpdateOperation,
    ) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            if !matches!(b.clause, Clause::Update | Clause::Set) {
                return Err(QueryError::Ordering(
                    "Set() called before Update()".to_string(),
                ));
            }
            b.check_target_column(&property)?;
            Self::check_column_permission(&property, TransactionType::Update)?;

            let column = property.column().cloned().ok_or_else(|| {
                QueryError::MetadataResolution {
                    entity: property.entity().to_string(),
                    property: property.property().to_string(),
                }
            })?;
            let placeholder = b.bind(operation.value().clone(), Some(&column))?;

            b.sql.push_str(if b.clause == Clause::Set { ", " } else { " SET " });
            b.sql.push_str(&operation.to_sql(&column.column, &placeholder));
            b.clause = Clause::Set;
            Ok(())
        })
    }

    fn delete_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("Delete()", &[Clause::Start])?;
            Self::check_dml_target(entity, TransactionType::Delete)?;
            b.sql = format!("DELETE FROM {}", entity.table);
            b.command.set_transaction_type(TransactionType::Delete);
            b.target = Some(entity);
            b.clause = Clause::Delete;
            Ok(())
        })
    }

    fn truncate_entity(&mut self, entity: &'static EntityMeta) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.expect_clause("Truncate()", &[Clause::Start])?;
            Self::check_dml_target(entity, TransactionType::Truncate)?;
            b.sql = format!("TRUNCATE TABLE {}", entity.table);
            b.command.set_transaction_type(TransactionType::Truncate);
            b.target = Some(entity);
            b.clause = Clause::Truncate;
            Ok(())
        })
    }

    fn union(&mut self) -> Result<&mut Self, QueryError> {
        self.step(|b| b.begin_union(" UNION "))
    }

    fn union_all(&mut self) -> Result<&mut Self, QueryError> {
        self.step(|b| b.begin_union(" UNION ALL "))
    }

    fn paginate(&mut self, pagination: Pagination) -> Result<&mut Self, QueryError> {
        self.step(|b| {
            b.pagination = Some(pagination);
            Ok(())
        })
    }
}

impl CommandBuilder {
    fn begin_union(&mut self, keyword: &str) -> Result<(), QueryError> {
        self.expect_clause(
            "Union()",
            &[
                Clause::From,
                Clause::Join,
                Clause::Where,
                Clause::GroupBy,
                Clause::Having,
            ],
        )?;
        self.sql.push_str(keyword);
        self.where_open = false;
        self.having_open = false;
        self.target = None;
        self.clause = Clause::Union;
        Ok(())
    }
}
