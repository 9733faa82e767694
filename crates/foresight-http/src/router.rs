//! Route table.

use crate::handlers::{campaigns, churn, content, expansion, health, leads};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/v1/leads/score", post(leads::score))
        .route("/v1/leads/score/batch", post(leads::score_batch))
        .route("/v1/leads/{entity_id}/history", get(leads::history))
        .route("/v1/churn/score", post(churn::score))
        .route("/v1/churn/score/batch", post(churn::score_batch))
        .route("/v1/churn/{entity_id}/history", get(churn::history))
        .route("/v1/expansion/score", post(expansion::score))
        .route("/v1/expansion/score/batch", post(expansion::score_batch))
        .route("/v1/expansion/{entity_id}/history", get(expansion::history))
        .route("/v1/campaigns/score", post(campaigns::score))
        .route("/v1/campaigns/score/batch", post(campaigns::score_batch))
        .route("/v1/campaigns/{entity_id}/history", get(campaigns::history))
        .route("/v1/content/score", post(content::score))
        .route("/v1/content/score/batch", post(content::score_batch))
        .route("/v1/content/{entity_id}/history", get(content::history))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
