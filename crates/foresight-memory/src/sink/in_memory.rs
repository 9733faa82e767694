//! Transient persistence sink for development and tests.

use async_trait::async_trait;
use foresight_core::{EntityId, PipelineKind, ScoredResult, StoreError, TenantId};
use std::sync::{Arc, RwLock};

use super::PersistenceSink;

/// Vec-backed sink. Rows arrive in insertion order, so history is served
/// by walking the list backwards.
#[derive(Default, Clone)]
pub struct InMemorySink {
    rows: Arc<RwLock<Vec<ScoredResult>>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of persisted events, across all tenants.
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PersistenceSink for InMemorySink {
    async fn insert(&self, result: &ScoredResult) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|e| StoreError::Unavailable {
            reason: format!("lock poisoned: {e}"),
        })?;
        rows.push(result.clone());
        Ok(())
    }

    async fn history(
        &self,
        pipeline: PipelineKind,
        tenant: &TenantId,
        entity: &EntityId,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, StoreError> {
        let rows = self.rows.read().map_err(|e| StoreError::Unavailable {
            reason: format!("lock poisoned: {e}"),
        })?;
        Ok(rows
            .iter()
            .rev()
            .filter(|r| {
                r.pipeline == pipeline && &r.tenant_id == tenant && &r.entity_id == entity
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
