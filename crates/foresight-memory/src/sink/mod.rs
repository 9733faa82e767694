//! Append-only persistence of scoring events.

mod in_memory;
mod sqlite;

pub use in_memory::InMemorySink;
pub use sqlite::SqliteSink;

use async_trait::async_trait;
use foresight_core::{EntityId, PipelineKind, ScoredResult, StoreError, TenantId};

/// Durable store recording every scoring event for audit and history.
///
/// Inserts are append-only: recomputation adds a new row and never mutates
/// an existing one. History returns the most recent rows for one
/// tenant+entity, newest first.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    async fn insert(&self, result: &ScoredResult) -> Result<(), StoreError>;

    async fn history(
        &self,
        pipeline: PipelineKind,
        tenant: &TenantId,
        entity: &EntityId,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, StoreError>;
}
