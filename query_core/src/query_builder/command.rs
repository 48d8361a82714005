//! The compiled output of a builder

use crate::query_builder::pagination::Pagination;
use crate::query_builder::parameter::Parameter;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionType {
    Select,
    Insert,
    Update,
    Delete,
    Truncate,
    #[default]
    Unknown,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionType::Select => "Select",
            TransactionType::Insert => "Insert",
            TransactionType::Update => "Update",
            TransactionType::Delete => "Delete",
            TransactionType::Truncate => "Truncate",
            TransactionType::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// SQL text plus its bound parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageCommand {
    name: String,
    sql: String,
    parameters: Vec<Parameter>,
    transaction_type: TransactionType,
    pagination: Option<Pagination>,
}

impl StorageCommand {
    pub fn new() -> Self {
        Self {
            name: Uuid::new_v4().to_string(),
            sql: String::new(),
            parameters: Vec::new(),
            transaction_type: TransactionType::Unknown,
            pagination: None,
        }
    }

    /// Unique token identifying this command
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub(crate) fn set_sql(&mut self, sql: String) {
        self.sql = sql;
    }

    pub(crate) fn set_transaction_type(&mut self, transaction_type: TransactionType) {
        self.transaction_type = transaction_type;
    }

    pub(crate) fn set_pagination(&mut self, pagination: Option<Pagination>) {
        self.pagination = pagination;
    }

    pub(crate) fn push_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }
}

impl Default for StorageCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StorageCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
