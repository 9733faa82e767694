//! Aggregated output of a batch scoring call.
//!
//! A `BatchResult` is owned by the batch call only; it is never persisted
//! as a unit. Each constituent [`ScoredResult`] is persisted individually.

use crate::scored::ScoredResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Results for a list request, in the same order as the input entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub results: Vec<ScoredResult>,
    pub summary: BatchSummary,
    pub processing_time_ms: u64,
}

/// Aggregate statistics over one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    /// Entities answered from cache without touching remote providers.
    pub cache_hits: usize,
    /// Entities scored by the deterministic fallback estimator.
    pub fallback_predictions: usize,
    /// Entities whose augmentation or persistence failed; their action
    /// lists degraded to the rule-based subset.
    pub degraded: usize,
    /// Mean prediction value across the batch, 0.0 when empty.
    pub mean_value: f64,
    pub category_counts: BTreeMap<String, usize>,
}

impl BatchSummary {
    /// Aggregate from scored results plus per-entity bookkeeping flags.
    pub fn collect(results: &[ScoredResult], cache_hits: usize, degraded: usize) -> Self {
        let total = results.len();
        let fallback_predictions = results
            .iter()
            .filter(|r| r.prediction.is_fallback())
            .count();
        let mean_value = if total == 0 {
            0.0
        } else {
            results.iter().map(|r| r.prediction.value).sum::<f64>() / total as f64
        };
        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        for result in results {
            *category_counts.entry(result.category.clone()).or_default() += 1;
        }
        Self {
            total,
            cache_hits,
            fallback_predictions,
            degraded,
            mean_value,
            category_counts,
        }
    }
}
