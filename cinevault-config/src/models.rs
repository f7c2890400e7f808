use serde::{Deserialize, Serialize};
use thiserror::Error;

use cinevault_core::database::PoolSettings;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("no database configuration found: set DATABASE_URL or DATABASE_HOST/NAME/USER")]
    MissingDatabaseConfig,

    #[error("invalid database URL")]
    InvalidDatabaseUrl {
        #[source]
        source: url::ParseError,
    },

    #[error("invalid database username: {username}")]
    InvalidDatabaseUsername { username: String },

    #[error("invalid database password")]
    InvalidDatabasePassword,

    #[error("invalid value for {var}")]
    InvalidNumber {
        var: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Raw configuration as read from the process environment.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct EnvConfig {
    pub database_url: Option<String>,
    pub database_host: Option<String>,
    pub database_port: Option<u16>,
    pub database_name: Option<String>,
    pub database_user: Option<String>,
    pub database_password: Option<String>,
    pub redis_url: Option<String>,
    pub database_max_connections: Option<u32>,
    pub database_acquire_timeout_secs: Option<u64>,
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let database_port = read_var("DATABASE_PORT")
            .map(|raw| {
                raw.parse().map_err(|source| ConfigLoadError::InvalidNumber {
                    var: "DATABASE_PORT",
                    source,
                })
            })
            .transpose()?;
        let database_max_connections = read_var("DATABASE_MAX_CONNECTIONS")
            .map(|raw| {
                raw.parse().map_err(|source| ConfigLoadError::InvalidNumber {
                    var: "DATABASE_MAX_CONNECTIONS",
                    source,
                })
            })
            .transpose()?;
        let database_acquire_timeout_secs = read_var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse().map_err(|source| ConfigLoadError::InvalidNumber {
                    var: "DATABASE_ACQUIRE_TIMEOUT_SECS",
                    source,
                })
            })
            .transpose()?;

        Ok(Self {
            database_url: read_var("DATABASE_URL"),
            database_host: read_var("DATABASE_HOST"),
            database_port,
            database_name: read_var("DATABASE_NAME"),
            database_user: read_var("DATABASE_USER"),
            database_password: read_var("DATABASE_PASSWORD"),
            redis_url: read_var("REDIS_URL"),
            database_max_connections,
            database_acquire_timeout_secs,
        })
    }
}

/// Effective settings handed to composition.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: PoolSettings,
    pub redis_url: Option<String>,
}
