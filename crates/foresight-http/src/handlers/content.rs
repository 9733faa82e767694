//! Content / SEO scoring endpoints.

use crate::error::ApiError;
use crate::extract::Tenant;
use crate::handlers::shared::{self, BatchRequest, HistoryQuery};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Json;
use foresight_core::{BatchResult, ScoredResult};
use foresight_policy::ContentBrief;

/// POST /v1/content/score
pub async fn score(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(record): Json<ContentBrief>,
) -> Result<Json<ScoredResult>, ApiError> {
    shared::score(&state.content, &tenant, record).await
}

/// POST /v1/content/score/batch
pub async fn score_batch(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Json(request): Json<BatchRequest<ContentBrief>>,
) -> Result<Json<BatchResult>, ApiError> {
    shared::score_batch(&state.content, &tenant, request).await
}

/// GET /v1/content/{entity_id}/history
pub async fn history(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(entity_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    shared::history(&state.content, &tenant, &entity_id, query).await
}
