//! Sub-queries inside IN lists
//!
//! A sub-query is either a finished command or a deferred query that is
//! replayed with the parent's dialect. Its parameters are renumbered into the
//! parent's sequence before its SQL is inlined.

use crate::errors::QueryError;
use crate::query_builder::builder::CommandBuilder;
use crate::query_builder::command::{StorageCommand, TransactionType};
use crate::query_builder::parameter::rename_parameters;
use crate::replay::DeferredQuery;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubQuery {
    Command(StorageCommand),
    Deferred(DeferredQuery),
}

impl From<StorageCommand> for SubQuery {
    fn from(command: StorageCommand) -> Self {
        SubQuery::Command(command)
    }
}

impl From<DeferredQuery> for SubQuery {
    fn from(query: DeferredQuery) -> Self {
        SubQuery::Deferred(query)
    }
}

impl CommandBuilder {
    pub(crate) fn inline_subquery(&mut self, subquery: &SubQuery) -> Result<String, QueryError> {
        let replayed;
        let command = match subquery {
            SubQuery::Command(command) => command,
            SubQuery::Deferred(query) => {
                replayed = query.compile(self.child())?;
                &replayed
            }
        };

        if command.transaction_type() != TransactionType::Select {
            return Err(QueryError::UnsupportedOperation(format!(
                "a {} command cannot be used as a sub-query",
                command.transaction_type()
            )));
        }

        let mut renames = Vec::with_capacity(command.parameters().len());
        for parameter in command.parameters() {
            let name = self.push_parameter(
                parameter.value.clone(),
                parameter.db_type,
                parameter.size,
            )?;
            renames.push((parameter.name.clone(), name));
        }
        Ok(rename_parameters(command.sql(), &renames))
    }
}
