//! Property tests for the prediction invariants.

use foresight_core::{Prediction, PredictorSource};
use foresight_inference::{RuleScorer, WeightedRule};
use proptest::prelude::*;

proptest! {
    /// Predictions satisfy their invariants for arbitrary raw inputs,
    /// including NaN and infinities.
    #[test]
    fn prediction_invariants_hold_for_any_input(
        value in proptest::num::f64::ANY,
        confidence in proptest::num::f64::ANY,
    ) {
        let p = Prediction::new(value, confidence, vec![], PredictorSource::Remote, &(0.0..=1.0));
        prop_assert!((0.0..=1.0).contains(&p.value));
        prop_assert!((0.0..=1.0).contains(&p.confidence));
    }

    /// The fallback scorer stays in range no matter how the record drives
    /// the rule table.
    #[test]
    fn rule_scorer_stays_in_domain_range(signal in 0u32..1000) {
        const RULES: &[WeightedRule<u32>] = &[
            WeightedRule { label: "mid", delta: 40.0, applies: |s| *s > 100 },
            WeightedRule { label: "high", delta: 60.0, applies: |s| *s > 500 },
            WeightedRule { label: "extreme", delta: 90.0, applies: |s| *s > 900 },
        ];
        let scorer = RuleScorer {
            base: 20.0,
            confidence: 0.7,
            range: 0.0..=100.0,
            rules: RULES,
        };
        let p = scorer.score(&signal);
        prop_assert!((0.0..=100.0).contains(&p.value));
        prop_assert_eq!(p.source, PredictorSource::Fallback);
    }
}
