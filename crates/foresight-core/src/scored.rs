//! The persisted, cacheable unit of work: one scored result.

use crate::action::Action;
use crate::identifiers::{EntityId, TenantId};
use crate::pipeline_kind::PipelineKind;
use crate::prediction::Prediction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Outcome of one pipeline run for one entity.
///
/// Created once per run and immutable after creation. Recomputation
/// supersedes a result by inserting a new row; history is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    /// Opaque identifier of this scoring event.
    pub id: Uuid,
    /// Which pipeline produced the result.
    pub pipeline: PipelineKind,
    pub tenant_id: TenantId,
    pub entity_id: EntityId,
    pub prediction: Prediction,
    /// Domain category rendered from the policy's enum (e.g. `hot`,
    /// `critical`, `strong`).
    pub category: String,
    /// Policy-derived metrics such as `revenue_at_risk`.
    pub derived_metrics: BTreeMap<String, f64>,
    /// Ranked, truncated action list.
    pub recommended_actions: Vec<Action>,
    /// Semantic version of the domain model that produced the result.
    pub model_version: String,
    pub computed_at: DateTime<Utc>,
}
