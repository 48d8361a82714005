//! SQL fragment rendering
//!
//! Predicate trees are rendered recursively. Every group that is opened is
//! closed by the same call, so the emitted parentheses always balance.

use crate::errors::QueryError;
use crate::expression::function::closing_parens;
use crate::expression::{
    Argument, Function, FunctionKind, LogicalOperator, Operand, Operator, PropertyExpression,
};
use crate::metadata::ColumnRef;
use crate::query_builder::builder::CommandBuilder;
use crate::query_builder::command::TransactionType;
use crate::query_builder::parameter::{parameter_name, Parameter};
use crate::validation::validate_alias;
use type_mapping::{DbType, SqlValue};

impl CommandBuilder {
    /// Add a parameter and return its name
    pub(crate) fn push_parameter(
        &mut self,
        value: SqlValue,
        db_type: Option<DbType>,
        size: Option<u32>,
    ) -> Result<String, QueryError> {
        let index = self.command.parameters().len() + 1;
        let max = self.options().max_parameters;
        if max > 0 && index > max {
            return Err(QueryError::UnsupportedOperation(format!(
                "command exceeds the configured limit of {} parameters",
                max
            )));
        }

        let name = parameter_name(self.dialect().parameter_prefix(), index);
        crate::trace_log!("[PARAMETER] {} = {:?}", name, value);
        self.command
            .push_parameter(Parameter::new(name.clone(), value, db_type, size));
        Ok(name)
    }

    /// Bind a value typed after `column`, or untyped without one
    pub(crate) fn bind(
        &mut self,
        value: SqlValue,
        column: Option<&ColumnRef>,
    ) -> Result<String, QueryError> {
        self.push_parameter(
            value,
            column.map(|c| c.db_type),
            column.and_then(|c| c.size),
        )
    }

    /// Column reference wrapped in the node's functions, or `*`
    pub(crate) fn render_reference(
        &mut self,
        node: &PropertyExpression,
    ) -> Result<String, QueryError> {
        let mut expression = if node.is_wildcard() {
            "*".to_string()
        } else {
            node.column()
                .map(ColumnRef::reference)
                .ok_or_else(|| QueryError::MetadataResolution {
                    entity: node.entity().to_string(),
                    property: node.property().to_string(),
                })?
        };

        for function in node.functions() {
            expression = self.wrap_function(function, expression)?;
        }
        Ok(expression)
    }

    fn wrap_function(&mut self, function: &Function, inner: String) -> Result<String, QueryError> {
        let open = self.dialect().function_open(function.kind);
        let mut expression = format!("{}{}", open, inner);

        let separator = match function.kind.arithmetic_symbol() {
            Some(symbol) => format!(" {} ", symbol),
            None => ", ".to_string(),
        };
        // Function arguments have no column type to borrow
        for param in &function.params {
            expression.push_str(&separator);
            expression.push_str(&self.push_parameter(param.clone(), None, None)?);
        }
        if function.kind == FunctionKind::Substring && function.params.len() == 1 {
            if let Some(length) = self.dialect().substring_length(&inner) {
                expression.push_str(&separator);
                expression.push_str(&length);
            }
        }

        expression.push_str(&")".repeat(closing_parens(open)));
        Ok(expression)
    }

    /// The node's own clause, without its children
    pub(crate) fn render_condition(
        &mut self,
        node: &PropertyExpression,
    ) -> Result<String, QueryError> {
        if node.is_empty() {
            return Ok(String::new());
        }

        let lhs = self.render_reference(node)?;
        match node.operator() {
            Some(operator) => self.render_operator(node, lhs, operator),
            None => Ok(lhs),
        }
    }

    fn render_operator(
        &mut self,
        node: &PropertyExpression,
        lhs: String,
        operator: Operator,
    ) -> Result<String, QueryError> {
        if operator.is_null_check() {
            return Ok(format!("{} {}", lhs, operator));
        }

        // Function results have no declared column type
        let typed = if node.functions().is_empty() {
            node.column().cloned()
        } else {
            None
        };
        let missing = || QueryError::EmptyArgument {
            property: node.property().to_string(),
            operator: operator.to_string(),
        };

        match node.argument() {
            Some(Argument::Property(other)) => {
                let rhs = self.render_reference(other)?;
                Ok(format!("{} {} {}", lhs, operator, rhs))
            }
            Some(Argument::Range(low, high)) if operator.is_range() => {
                let low = self.bind(low.clone(), typed.as_ref())?;
                let high = self.bind(high.clone(), typed.as_ref())?;
                Ok(format!("{} {} {} AND {}", lhs, operator, low, high))
            }
            Some(Argument::List(operands)) if operator.is_membership() => {
                if operands.is_empty() {
                    return Err(missing());
                }
                let single = operands.len() == 1;
                let mut items = Vec::with_capacity(operands.len());
                for operand in operands {
                    let item = match operand {
                        Operand::Value(value) => self.bind(value.clone(), typed.as_ref())?,
                        Operand::SubQuery(subquery) => {
                            let sql = self.inline_subquery(subquery)?;
                            if single {
                                sql
                            } else {
                                format!("({})", sql)
                            }
                        }
                    };
                    items.push(item);
                }
                Ok(format!("{} {} ({})", lhs, operator, items.join(", ")))
            }
            Some(Argument::Value(value)) if !operator.is_range() && !operator.is_membership() => {
                let placeholder = self.bind(value.clone(), typed.as_ref())?;
                Ok(format!("{} {} {}", lhs, operator, placeholder))
            }
            _ => Err(missing()),
        }
    }

    /// The node's clause followed by each child, prefixed by the child's
    /// logical token. Negation wraps the whole subtree.
    pub(crate) fn render_predicate(
        &mut self,
        node: &PropertyExpression,
    ) -> Result<String, QueryError> {
        let mut out = self.render_condition(node)?;

        for child in node.children() {
            let fragment = self.render_group(child)?;
            if fragment.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
                out.push_str(child.logical().unwrap_or(LogicalOperator::And).to_sql());
                out.push(' ');
            }
            out.push_str(&fragment);
        }

        if node.is_negated() && !out.is_empty() {
            out = format!("NOT ({})", out);
        }
        Ok(out)
    }

    /// A child that carries its own children is parenthesized
    fn render_group(&mut self, child: &PropertyExpression) -> Result<String, QueryError> {
        let fragment = self.render_predicate(child)?;
        if child.children().is_empty() || child.is_negated() || fragment.is_empty() {
            Ok(fragment)
        } else {
            Ok(format!("({})", fragment))
        }
    }

    /// One entry of a select list
    pub(crate) fn render_projection(
        &mut self,
        node: &PropertyExpression,
    ) -> Result<String, QueryError> {
        Self::check_column_permission(node, TransactionType::Select)?;
        let mut fragment = self.render_condition(node)?;
        if let Some(alias) = node.alias_name() {
            validate_alias(alias)?;
            fragment.push_str(" AS ");
            fragment.push_str(alias);
        }
        Ok(fragment)
    }
}
