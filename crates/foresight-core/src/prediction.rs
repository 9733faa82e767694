//! The provider-agnostic prediction model.
//!
//! `Prediction` is the single output shape of the inference step. Whether
//! the remote predictor answered or the deterministic fallback ran, the
//! struct is identical; only [`PredictorSource`] records which path
//! produced it, so downstream scoring code never branches on the provider.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which inference path produced a [`Prediction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorSource {
    /// The managed remote ML endpoint answered in time with a sane payload.
    Remote,
    /// The deterministic weighted-rule estimator ran instead.
    Fallback,
}

/// Output of the inference step for one entity.
///
/// Invariants, enforced at construction: `confidence` lies in `[0, 1]` and
/// `value` lies within the owning domain's declared range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// Point estimate, clamped to the domain range.
    pub value: f64,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Ordered narrative factors contributing to the estimate.
    pub factors: Vec<String>,
    /// Which inference path produced this prediction.
    pub source: PredictorSource,
}

impl Prediction {
    /// Build a prediction, clamping `value` into `range` and `confidence`
    /// into `[0, 1]`. Non-finite inputs collapse to the range floor and
    /// zero confidence rather than propagating NaN downstream.
    pub fn new(
        value: f64,
        confidence: f64,
        factors: Vec<String>,
        source: PredictorSource,
        range: &RangeInclusive<f64>,
    ) -> Self {
        let value = if value.is_finite() {
            value.clamp(*range.start(), *range.end())
        } else {
            *range.start()
        };
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            value,
            confidence,
            factors,
            source,
        }
    }

    /// Whether the fallback estimator produced this prediction.
    pub fn is_fallback(&self) -> bool {
        self.source == PredictorSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_value_into_domain_range() {
        let p = Prediction::new(140.0, 0.9, vec![], PredictorSource::Remote, &(0.0..=100.0));
        assert_eq!(p.value, 100.0);
        let p = Prediction::new(-3.0, 0.9, vec![], PredictorSource::Remote, &(0.0..=100.0));
        assert_eq!(p.value, 0.0);
    }

    #[test]
    fn clamps_confidence_into_unit_interval() {
        let p = Prediction::new(0.5, 1.7, vec![], PredictorSource::Fallback, &(0.0..=1.0));
        assert_eq!(p.confidence, 1.0);
        let p = Prediction::new(0.5, -0.2, vec![], PredictorSource::Fallback, &(0.0..=1.0));
        assert_eq!(p.confidence, 0.0);
    }

    #[test]
    fn non_finite_inputs_collapse_safely() {
        let p = Prediction::new(
            f64::NAN,
            f64::INFINITY,
            vec![],
            PredictorSource::Remote,
            &(0.0..=1.0),
        );
        assert_eq!(p.value, 0.0);
        assert_eq!(p.confidence, 0.0);
    }
}
