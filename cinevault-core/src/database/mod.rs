//! Storage abstraction layer and its implementations.
//!
//! Ports are object-safe traits; the PostgreSQL and in-memory adapters are
//! interchangeable implementations selected at composition time.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::error::{CatalogError, Result};

pub mod memory;
pub mod ports;
pub mod postgres;

/// Connection-pool settings for the PostgreSQL backend.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Build the connection pool every store operation acquires its session from.
///
/// Acquisition is scoped per call inside the stores; the pool releases the
/// connection on every exit path.
pub async fn connect(settings: &PoolSettings) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&settings.url)
        .await
        .map_err(|e| CatalogError::Transient(format!("Failed to connect to Postgres: {e}")))?;

    info!(
        max_connections = settings.max_connections,
        "Connected to Postgres"
    );

    Ok(pool)
}
