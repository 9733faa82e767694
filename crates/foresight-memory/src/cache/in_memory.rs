//! Transient cache backend for development and tests.

use async_trait::async_trait;
use foresight_core::CacheError;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::CacheStore;

/// HashMap-backed cache with lazy TTL expiry.
///
/// Entries are dropped on the first read past their deadline; no
/// background sweeper runs. All data is lost on process exit.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let expired = {
            let entries = self.entries.read().map_err(|e| CacheError::Unavailable {
                reason: format!("lock poisoned: {e}"),
            })?;
            match entries.get(key) {
                None => return Ok(None),
                Some((value, deadline)) => {
                    if Instant::now() < *deadline {
                        return Ok(Some(value.clone()));
                    }
                    true
                }
            }
        };
        if expired {
            let mut entries = self.entries.write().map_err(|e| CacheError::Unavailable {
                reason: format!("lock poisoned: {e}"),
            })?;
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| CacheError::Unavailable {
            reason: format!("lock poisoned: {e}"),
        })?;
        entries.insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(|e| CacheError::Unavailable {
            reason: format!("lock poisoned: {e}"),
        })?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_within_ttl() {
        let cache = InMemoryCache::new();
        cache
            .set_with_ttl("k", "v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache
            .set_with_ttl("k", "v", Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = InMemoryCache::new();
        cache
            .set_with_ttl("k", "v", Duration::from_secs(60))
            .await
            .unwrap();
        cache.delete("k").await.unwrap();
        assert_eq!(cache.get("k").await.unwrap(), None);
    }
}
