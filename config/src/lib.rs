//! # Configuration Management for QueryHaus
//!
//! This crate provides centralized configuration structures for all QueryHaus components:
//! the database connection used by storage providers and the settings of the query compiler.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CompilerConfig, DatabaseConfig};
//!
//! // Database configuration
//! let db_config = DatabaseConfig::new(
//!     "localhost".to_string(), 5432, "myapp".to_string(),
//!     "postgres".to_string(), "password".to_string(),
//!     1, 10, 30, 600, 3600,
//! );
//!
//! // Compiler configuration
//! let compiler_config = CompilerConfig::new("postgres".to_string(), true, 0, true);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [database]
//! host = "localhost"
//! port = 5432
//! database = "myapp"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [compiler]
//! dialect = "postgres"
//! cache_select_statements = true
//! max_parameters = 0
//! validate_identifiers = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from queryhaus.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./queryhaus.toml";
const CONFIG_PATH_VAR: &str = "QUERYHAUS_CONFIG";

/// Dialect names accepted by `CompilerConfig::dialect`
pub const KNOWN_DIALECTS: &[&str] = &["standard", "sqlserver", "mysql", "postgres"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Query compiler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// One of `KNOWN_DIALECTS`
    pub dialect: String,
    /// Cache the default column list per entity
    pub cache_select_statements: bool,
    /// Upper bound on parameters per command; 0 disables the check
    pub max_parameters: usize,
    /// Validate table and column identifiers when entities are registered
    pub validate_identifiers: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            dialect: "standard".to_string(),
            cache_select_statements: true,
            max_parameters: 0,
            validate_identifiers: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env / the environment, or the default path
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        // Try the path from QUERYHAUS_CONFIG first
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::from_file(&config_path)
        }
        // Then the default location
        else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::from_file(DEFAULT_CONFIG_PATH)
        } else {
            Err(ConfigError::Invalid(format!(
                "Config path must be specified in .env file as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )))
        }
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        self.database.validate()?;
        self.compiler.validate()
    }
}

impl DatabaseConfig {
    /// Create a new database configuration
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
        min_connections: u32,
        max_connections: u32,
        connection_timeout_seconds: u64,
        idle_timeout_seconds: u64,
        max_lifetime_seconds: u64,
    ) -> Self {
        Self {
            host,
            port,
            database,
            username,
            password,
            min_connections,
            max_connections,
            connection_timeout_seconds,
            idle_timeout_seconds,
            max_lifetime_seconds,
        }
    }

    /// Build connection string
    pub fn connection_string(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::Invalid(
                "Database host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid(
                "Database port cannot be zero".to_string(),
            ));
        }
        if self.database.is_empty() {
            return Err(ConfigError::Invalid(
                "Database name cannot be empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(ConfigError::Invalid(
                "Database username cannot be empty".to_string(),
            ));
        }
        if self.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl CompilerConfig {
    /// Create a new compiler configuration
    pub fn new(
        dialect: String,
        cache_select_statements: bool,
        max_parameters: usize,
        validate_identifiers: bool,
    ) -> Self {
        Self {
            dialect,
            cache_select_statements,
            max_parameters,
            validate_identifiers,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dialect = self.dialect.to_ascii_lowercase();
        if !KNOWN_DIALECTS.contains(&dialect.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Unknown compiler dialect '{}': expected one of {}",
                self.dialect,
                KNOWN_DIALECTS.join(", ")
            )));
        }
        Ok(())
    }
}
