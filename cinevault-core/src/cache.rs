//! Tag-based cache invalidation.
//!
//! Cached movie reads are tagged with [`MOVIES_TAG`]; every successful
//! create/update/delete evicts the whole tag so no caller sees a stale
//! listing. The caching itself lives with the presentation layer; the core
//! only owns the eviction contract and its implementations.

use std::fmt;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

/// Tag under which all cached movie reads are tracked.
pub const MOVIES_TAG: &str = "movies";

/// Evicts every cached entry associated with a logical tag.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn evict_tag(&self, tag: &str) -> Result<()>;
}

/// Invalidator for compositions that run without a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCacheInvalidator;

#[async_trait]
impl CacheInvalidator for NoopCacheInvalidator {
    async fn evict_tag(&self, _tag: &str) -> Result<()> {
        Ok(())
    }
}

/// Redis-backed tag invalidation.
///
/// A tag is a Redis set holding the cache keys written under it. Eviction
/// reads the members, deletes them, then deletes the tag set itself.
#[derive(Clone)]
pub struct RedisCacheInvalidator {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisCacheInvalidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCacheInvalidator")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisCacheInvalidator {
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("Connecting to Redis cache at {}", redis_url);

        let client = redis::Client::open(redis_url)
            .map_err(|e| CatalogError::Transient(format!("Failed to create Redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CatalogError::Transient(format!("Failed to connect to Redis: {e}")))?;

        Ok(Self { conn })
    }

    /// Record that `key` was cached under `tag`, so a later eviction of the
    /// tag removes it.
    pub async fn track(&self, tag: &str, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .sadd(tag, key)
            .await
            .map_err(|e| CatalogError::Transient(format!("Redis SADD failed: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl CacheInvalidator for RedisCacheInvalidator {
    async fn evict_tag(&self, tag: &str) -> Result<()> {
        let mut conn = self.conn.clone();

        let keys: Vec<String> = conn
            .smembers(tag)
            .await
            .map_err(|e| CatalogError::Transient(format!("Redis SMEMBERS failed: {e}")))?;

        if !keys.is_empty() {
            let _: () = conn
                .del(&keys)
                .await
                .map_err(|e| CatalogError::Transient(format!("Redis DEL failed: {e}")))?;
        }

        let _: () = conn
            .del(tag)
            .await
            .map_err(|e| CatalogError::Transient(format!("Redis DEL failed: {e}")))?;

        debug!("Evicted cache tag '{}' ({} keys)", tag, keys.len());
        Ok(())
    }
}
