//! Core QueryHaus functionality
//!
//! This module contains the `QueryHaus` coordinator, which owns the compiler
//! settings and the entity registry and hands out builders bound to them.

use query_core::options::dialect_from_config;
use query_core::{
    CommandBuilder, CompilerOptions, DeferredQuery, Dialect, DialectKind, Entity, EntityRegistry,
    StorageCommand,
};
use std::sync::Arc;

use crate::errors::QueryHausError;
use crate::provider::{PostgresProvider, StorageProvider};
use config::{CompilerConfig, DatabaseConfig};

/// Main QueryHaus coordinator that manages the dialect and registered entities
#[derive(Debug, Clone)]
pub struct QueryHaus {
    dialect: Arc<dyn Dialect>,
    options: CompilerOptions,
    registry: Arc<EntityRegistry>,
}

impl QueryHaus {
    /// Create a coordinator for a dialect with default options
    pub fn new(kind: DialectKind) -> Self {
        Self::with_options(kind, CompilerOptions::default())
    }

    pub fn with_options(kind: DialectKind, options: CompilerOptions) -> Self {
        let registry = EntityRegistry::new(options.validate_identifiers);
        Self {
            dialect: kind.dialect(),
            options,
            registry: Arc::new(registry),
        }
    }

    /// Create a coordinator from the `[compiler]` section
    pub fn from_config(config: &CompilerConfig) -> Result<Self, QueryHausError> {
        config.validate()?;
        let options = CompilerOptions::from(config);
        let registry = EntityRegistry::new(options.validate_identifiers);

        Ok(Self {
            dialect: dialect_from_config(config)?,
            options,
            registry: Arc::new(registry),
        })
    }

    pub fn dialect(&self) -> DialectKind {
        self.dialect.kind()
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Register an entity so replayed and deserialized queries can resolve it
    ///
    /// Builders handed out earlier keep the registry they were created with.
    pub fn register<T: Entity>(&mut self) -> Result<(), QueryHausError> {
        Arc::make_mut(&mut self.registry).register::<T>()?;
        Ok(())
    }

    /// Fresh builder for the configured dialect
    pub fn builder(&self) -> CommandBuilder {
        CommandBuilder::with_options(
            Arc::clone(&self.dialect),
            self.registry.clone(),
            self.options.clone(),
        )
    }

    /// Empty method queue, compiled later with `compile`
    pub fn deferred(&self) -> DeferredQuery {
        DeferredQuery::new()
    }

    /// Replay a recorded query against the configured dialect
    pub fn compile(&self, query: &DeferredQuery) -> Result<StorageCommand, QueryHausError> {
        Ok(query.compile(self.builder())?)
    }

    /// Open a provider for the configured dialect
    pub async fn connect(
        &self,
        database: &DatabaseConfig,
    ) -> Result<PostgresProvider, QueryHausError> {
        if self.dialect() != DialectKind::Postgres {
            return Err(QueryHausError::UnsupportedProvider(
                self.dialect().to_string(),
            ));
        }

        database.validate()?;
        PostgresProvider::connect(database).await
    }

    /// Compile and run a recorded query on a provider
    pub async fn execute(
        &self,
        provider: &dyn StorageProvider,
        query: &DeferredQuery,
    ) -> Result<u64, QueryHausError> {
        if provider.dialect() != self.dialect() {
            return Err(QueryHausError::UnsupportedProvider(
                provider.dialect().to_string(),
            ));
        }

        let command = self.compile(query)?;
        provider.execute(&command).await
    }
}
