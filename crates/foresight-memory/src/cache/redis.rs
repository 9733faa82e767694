//! Redis cache backend with tokio-based connection pooling.

use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config as PoolConfig, Pool, Runtime};
use foresight_core::CacheError;
use std::time::Duration;

use super::CacheStore;

/// Redis-backed cache using a deadpool connection pool.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Connect to the given Redis URL (e.g. `redis://127.0.0.1/`).
    pub fn new(redis_url: &str) -> Result<Self, CacheError> {
        let pool = PoolConfig::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool.get().await.map_err(|e| CacheError::Unavailable {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| CacheError::OperationFailed {
                operation: "get",
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::OperationFailed {
                operation: "set",
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::OperationFailed {
                operation: "del",
                key: key.to_string(),
                reason: e.to_string(),
            })
    }
}
