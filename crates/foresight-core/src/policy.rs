//! The `ScoringPolicy` trait: pure, per-domain scoring logic.

use crate::action::{ACTION_SCHEMA_HINT, Action, rank_actions};
use crate::pipeline_kind::PipelineKind;
use crate::prediction::Prediction;
use crate::record::FeatureRecord;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Pure, side-effect-free scoring logic for one domain.
///
/// Implementations hold their thresholds and weights as constants fixed at
/// construction; nothing here reads ambient state, performs I/O, or
/// mutates anything, which keeps every method unit-testable in isolation.
///
/// The pipeline composes these methods around a [`Prediction`] produced by
/// the inference gateway; `estimate` is the deterministic fallback the
/// gateway runs when the remote predictor fails.
pub trait ScoringPolicy: Send + Sync + 'static {
    /// The domain's input shape.
    type Record: FeatureRecord;
    /// The domain's category enum (rendered to a string on the result).
    type Category: fmt::Display + Send;

    fn kind(&self) -> PipelineKind;

    /// Fixed semantic version reported on every result of this domain.
    fn model_version(&self) -> &'static str;

    /// Valid range for `Prediction::value` in this domain.
    fn value_range(&self) -> RangeInclusive<f64>;

    /// How long cached results of this domain stay fresh.
    fn cache_ttl(&self) -> Duration;

    /// Map a prediction value onto the domain's category scale.
    fn categorize(&self, value: f64) -> Self::Category;

    /// Domain-specific derived metrics (e.g. revenue at risk).
    fn derive_metrics(
        &self,
        record: &Self::Record,
        prediction: &Prediction,
    ) -> BTreeMap<String, f64>;

    /// Narrative factors read directly off the feature record.
    fn identify_factors(&self, record: &Self::Record) -> Vec<String>;

    /// Rule-based candidate actions for this record and prediction.
    fn rule_actions(&self, record: &Self::Record, prediction: &Prediction) -> Vec<Action>;

    /// The documented static action list substituted when the generative
    /// augmenter fails or returns malformed output.
    fn fallback_actions(&self) -> Vec<Action>;

    /// Deterministic weighted-rule estimate built from the same record the
    /// remote predictor would have seen.
    fn estimate(&self, record: &Self::Record) -> Prediction;

    /// Prompt sent to the text provider to request action suggestions.
    fn augment_prompt(&self, record: &Self::Record, prediction: &Prediction) -> String;

    /// Shape description accompanying the augment prompt.
    fn augment_schema_hint(&self) -> &'static str {
        ACTION_SCHEMA_HINT
    }

    /// Token budget for the augment call.
    fn augment_max_tokens(&self) -> u32 {
        512
    }

    /// Rank candidate actions: ascending priority, rule-sourced before
    /// generative at equal priority, truncated to the domain maximum.
    fn rank_actions(&self, candidates: Vec<Action>) -> Vec<Action> {
        rank_actions(candidates)
    }
}
