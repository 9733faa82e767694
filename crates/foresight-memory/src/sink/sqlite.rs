//! SQLite persistence sink.
//!
//! rusqlite is synchronous; every operation hops onto the blocking thread
//! pool and takes the connection mutex there, so pipeline tasks never
//! block the async runtime on disk I/O.

use async_trait::async_trait;
use foresight_core::{EntityId, PipelineKind, ScoredResult, StoreError, TenantId};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::PersistenceSink;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS scoring_events (
    id          TEXT PRIMARY KEY,
    pipeline    TEXT NOT NULL,
    tenant_id   TEXT NOT NULL,
    entity_id   TEXT NOT NULL,
    computed_at TEXT NOT NULL,
    payload     TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_scoring_events_lookup
    ON scoring_events (pipeline, tenant_id, entity_id, computed_at DESC);
";

/// SQLite-backed persistence sink.
#[derive(Clone)]
pub struct SqliteSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSink {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError::Unavailable {
            reason: e.to_string(),
        })?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Unavailable {
                reason: e.to_string(),
            })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|e| StoreError::Unavailable {
                reason: format!("lock poisoned: {e}"),
            })?;
            op(&conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable {
            reason: format!("persistence worker failed: {e}"),
        })?
    }
}

#[async_trait]
impl PersistenceSink for SqliteSink {
    async fn insert(&self, result: &ScoredResult) -> Result<(), StoreError> {
        let id = result.id;
        let payload = serde_json::to_string(result).map_err(|e| StoreError::InsertFailed {
            id,
            reason: format!("payload not serializable: {e}"),
        })?;
        let pipeline = result.pipeline.as_str();
        let tenant = result.tenant_id.as_str().to_string();
        let entity = result.entity_id.as_str().to_string();
        let computed_at = result.computed_at.to_rfc3339();

        self.run_blocking(move |conn| {
            conn.execute(
                "INSERT INTO scoring_events (id, pipeline, tenant_id, entity_id, computed_at, payload)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id.to_string(), pipeline, tenant, entity, computed_at, payload],
            )
            .map_err(|e| StoreError::InsertFailed {
                id,
                reason: e.to_string(),
            })?;
            Ok(())
        })
        .await
    }

    async fn history(
        &self,
        pipeline: PipelineKind,
        tenant: &TenantId,
        entity: &EntityId,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, StoreError> {
        let tenant = tenant.as_str().to_string();
        let entity = entity.as_str().to_string();

        self.run_blocking(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT payload FROM scoring_events
                     WHERE pipeline = ?1 AND tenant_id = ?2 AND entity_id = ?3
                     ORDER BY computed_at DESC, rowid DESC
                     LIMIT ?4",
                )
                .map_err(|e| StoreError::QueryFailed {
                    reason: e.to_string(),
                })?;
            let payloads = stmt
                .query_map(
                    params![pipeline.as_str(), tenant, entity, limit as i64],
                    |row| row.get::<_, String>(0),
                )
                .map_err(|e| StoreError::QueryFailed {
                    reason: e.to_string(),
                })?
                .collect::<Result<Vec<String>, _>>()
                .map_err(|e| StoreError::QueryFailed {
                    reason: e.to_string(),
                })?;

            payloads
                .iter()
                .map(|payload| {
                    serde_json::from_str(payload).map_err(|e| StoreError::Corrupt {
                        reason: e.to_string(),
                    })
                })
                .collect()
        })
        .await
    }
}
