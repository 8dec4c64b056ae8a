//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! variables override individual values. Every field has a default, so an
//! empty document is a valid configuration.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 5000
//! cors_origin: http://localhost:3000
//! environment: development
//! range_policy: lenient
//! pagination:
//!   default_limit: 10
//!   max_limit: 100
//! storage:
//!   backend: mongodb
//!   uri: mongodb://localhost:27017
//!   database: retail
//!   collection: sales
//! ```

use crate::core::error::ConfigError;
use crate::core::filter::RangePolicy;
use crate::core::query::{DEFAULT_LIMIT, MAX_LIMIT};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Listening address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Deployment environment
///
/// Internal error details are only sent to clients outside production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn expose_error_details(self) -> bool {
        self != Environment::Production
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }
}

/// Page size bounds for the listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

/// Which record store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Mongodb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Connection string (MongoDB only)
    pub uri: Option<String>,

    /// Database name (MongoDB only)
    pub database: Option<String>,

    pub collection: String,

    /// JSON array of records loaded into the in-memory store
    pub seed_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            uri: None,
            database: None,
            collection: "sales".to_string(),
            seed_file: None,
        }
    }
}

/// Complete configuration of the dashboard API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerConfig,

    /// Frontend origin allowed by CORS
    pub cors_origin: String,

    pub environment: Environment,

    /// How malformed `ageRange`/`dateRange` values are handled
    pub range_policy: RangePolicy,

    pub pagination: PaginationConfig,

    pub storage: StorageConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            cors_origin: "http://localhost:3000".to_string(),
            environment: Environment::default(),
            range_policy: RangePolicy::default(),
            pagination: PaginationConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::parse(&content, Some(path.display().to_string()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<String>) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, which means "all defaults"
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
                file,
                message: e.to_string(),
            })?
        };
        config.validate()?;
        Ok(config)
    }

    /// Override values from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Override values from `lookup`
    ///
    /// Reads `PORT`, `CORS_ORIGIN`, `APP_ENV` and `MONGODB_URI`. Setting
    /// `MONGODB_URI` also selects the MongoDB backend.
    pub fn apply_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                value: port.clone(),
                message: "expected a port number".to_string(),
            })?;
        }

        if let Some(origin) = lookup("CORS_ORIGIN").filter(|o| !o.trim().is_empty()) {
            self.cors_origin = origin.trim().to_string();
        }

        if let Some(env) = lookup("APP_ENV") {
            self.environment =
                Environment::parse(&env).ok_or_else(|| ConfigError::InvalidValue {
                    field: "APP_ENV".to_string(),
                    value: env.clone(),
                    message: "expected 'development' or 'production'".to_string(),
                })?;
        }

        if let Some(uri) = lookup("MONGODB_URI").map(|u| clean_mongo_uri(&u))
            && !uri.is_empty()
        {
            self.storage.uri = Some(uri);
            self.storage.backend = StorageBackend::Mongodb;
        }

        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.max_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.max_limit".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.pagination.default_limit == 0
            || self.pagination.default_limit > self.pagination.max_limit
        {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_limit".to_string(),
                value: self.pagination.default_limit.to_string(),
                message: format!("must be between 1 and {}", self.pagination.max_limit),
            });
        }
        if self.storage.backend == StorageBackend::Mongodb && self.storage.uri.is_none() {
            return Err(ConfigError::InvalidValue {
                field: "storage.uri".to_string(),
                value: String::new(),
                message: "required for the mongodb backend".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address to bind
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            field: "server.host".to_string(),
            value: self.server.host.clone(),
            message: "not a valid IP address".to_string(),
        })
    }

    /// Database name, falling back to the one named in the URI path
    pub fn database_name(&self) -> Option<String> {
        self.storage.database.clone().or_else(|| {
            let uri = self.storage.uri.as_deref()?;
            let rest = uri.split_once("://").map_or(uri, |(_, rest)| rest);
            let (_, path) = rest.split_once('/')?;
            let name = path.split('?').next().unwrap_or_default();
            (!name.is_empty()).then(|| name.to_string())
        })
    }
}

/// Trim a connection string and drop a pasted `MONGODB_URI=` prefix
pub fn clean_mongo_uri(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("MONGODB_URI=")
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}
