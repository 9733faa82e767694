//! Read-through/write-through result cache.

mod in_memory;
mod redis;

pub use in_memory::InMemoryCache;
pub use redis::RedisCache;

use async_trait::async_trait;
use foresight_core::{CacheError, CacheKey, ScoredResult};
use std::sync::Arc;
use std::time::Duration;

/// Minimal key-value interface: point get, set with expiry, delete.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Best-effort cache for serialized [`ScoredResult`]s.
///
/// Every failure mode — backend outage, poisoned entry, undecodable
/// payload — is logged and treated as a miss. A miss only costs a
/// recompute; it can never make a request fail.
#[derive(Clone)]
pub struct CacheGateway {
    store: Arc<dyn CacheStore>,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Look up a cached result. Any failure is a miss.
    pub async fn lookup(&self, key: &CacheKey) -> Option<ScoredResult> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(result) => Some(result),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "cached payload undecodable; discarding");
                let _ = self.store.delete(key.as_str()).await;
                None
            }
        }
    }

    /// Store a result. Failures are logged and swallowed.
    pub async fn record(&self, key: &CacheKey, result: &ScoredResult, ttl: Duration) {
        let payload = match serde_json::to_string(result) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "result not serializable for cache");
                return;
            }
        };
        if let Err(err) = self.store.set_with_ttl(key.as_str(), &payload, ttl).await {
            tracing::warn!(key = %key, error = %err, "cache write failed; continuing without");
        }
    }
}
