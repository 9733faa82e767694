//! Deterministic weighted-rule fallback scoring.
//!
//! Each domain declares a fixed table of threshold rules; matching rules
//! add their delta onto a base score and contribute a factor label. The
//! result is clamped to the domain range, so fallback predictions satisfy
//! the same invariants as remote ones.

use foresight_core::{Prediction, PredictorSource};
use std::ops::RangeInclusive;

/// One row of a fallback table: a threshold condition, the score delta it
/// contributes, and the narrative factor label recorded when it fires.
pub struct WeightedRule<R> {
    pub label: &'static str,
    pub delta: f64,
    pub applies: fn(&R) -> bool,
}

/// A domain's complete fallback estimator.
pub struct RuleScorer<R: 'static> {
    pub base: f64,
    /// Fixed confidence reported for fallback predictions.
    pub confidence: f64,
    pub range: RangeInclusive<f64>,
    pub rules: &'static [WeightedRule<R>],
}

impl<R> RuleScorer<R> {
    /// Evaluate the table against one record.
    pub fn score(&self, record: &R) -> Prediction {
        let mut value = self.base;
        let mut factors = Vec::with_capacity(self.rules.len());
        for rule in self.rules {
            if (rule.applies)(record) {
                value += rule.delta;
                factors.push(rule.label.to_string());
            }
        }
        Prediction::new(
            value,
            self.confidence,
            factors,
            PredictorSource::Fallback,
            &self.range,
        )
    }
}
