//! Generic handler bodies shared by every domain.

use crate::error::ApiError;
use axum::response::Json;
use foresight_core::{BatchResult, EntityId, ScoredResult, ScoringPolicy, TenantId};
use foresight_pipeline::{DEFAULT_BATCH_CONCURRENCY, ScoringPipeline};
use serde::Deserialize;

/// Ceiling on client-requested batch concurrency.
pub const MAX_BATCH_CONCURRENCY: usize = 32;

const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 100;

/// Body of a batch scoring request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest<R> {
    pub entities: Vec<R>,
    /// Optional concurrency override, clamped server-side.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

/// Query parameters of a history request.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub(crate) async fn score<P: ScoringPolicy>(
    pipeline: &ScoringPipeline<P>,
    tenant: &TenantId,
    record: P::Record,
) -> Result<Json<ScoredResult>, ApiError> {
    let run = pipeline.score(tenant, record).await?;
    Ok(Json(run.result))
}

pub(crate) async fn score_batch<P: ScoringPolicy>(
    pipeline: &ScoringPipeline<P>,
    tenant: &TenantId,
    request: BatchRequest<P::Record>,
) -> Result<Json<BatchResult>, ApiError> {
    let concurrency = request
        .concurrency
        .unwrap_or(DEFAULT_BATCH_CONCURRENCY)
        .clamp(1, MAX_BATCH_CONCURRENCY);
    let batch = pipeline
        .score_batch(tenant, request.entities, concurrency)
        .await?;
    Ok(Json(batch))
}

pub(crate) async fn history<P: ScoringPolicy>(
    pipeline: &ScoringPipeline<P>,
    tenant: &TenantId,
    raw_entity: &str,
    query: HistoryQuery,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    let entity = EntityId::new(raw_entity).map_err(|e| ApiError::InvalidEntity {
        reason: e.to_string(),
    })?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    let results = pipeline.history(tenant, &entity, limit).await?;
    Ok(Json(results))
}
