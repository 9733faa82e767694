//! Expansion / upsell likelihood policy for existing accounts.

use foresight_core::{
    Action, Effort, EntityId, FeatureRecord, Impact, PipelineKind, Prediction, ScoringPolicy,
    ValidationError,
    record::{require_finite, require_in_range},
};
use foresight_inference::{RuleScorer, WeightedRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

const MODEL_VERSION: &str = "1.0.0";
const VALUE_RANGE: RangeInclusive<f64> = 0.0..=1.0;
const CACHE_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Share of annual contract value a typical expansion adds; used for the
/// expected-value estimate.
const EXPANSION_VALUE_SHARE: f64 = 0.3;

/// Input features for one expansion likelihood request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionFeatures {
    pub entity_id: EntityId,
    pub current_seats: u32,
    pub active_seats: u32,
    /// Usage slope over the trailing quarter, -1 to 1.
    pub usage_growth: f64,
    pub feature_requests: u32,
    /// Plan limit utilization, 0-100.
    pub plan_utilization: f64,
    /// Monthly recurring contract value.
    pub contract_value: f64,
    pub tenure_months: u32,
}

impl ExpansionFeatures {
    fn seat_ratio(&self) -> f64 {
        if self.current_seats == 0 {
            0.0
        } else {
            self.active_seats as f64 / self.current_seats as f64
        }
    }
}

impl FeatureRecord for ExpansionFeatures {
    fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.current_seats == 0 {
            return Err(ValidationError::invalid(
                "current_seats",
                "must be at least 1",
            ));
        }
        if self.active_seats > self.current_seats {
            return Err(ValidationError::invalid(
                "active_seats",
                "cannot exceed current_seats",
            ));
        }
        require_in_range("usage_growth", self.usage_growth, -1.0, 1.0)?;
        require_in_range("plan_utilization", self.plan_utilization, 0.0, 100.0)?;
        require_finite("contract_value", self.contract_value)?;
        if self.contract_value < 0.0 {
            return Err(ValidationError::invalid(
                "contract_value",
                "must not be negative",
            ));
        }
        Ok(())
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.current_seats as f64,
            self.active_seats as f64,
            self.usage_growth,
            self.feature_requests as f64,
            self.plan_utilization,
            self.contract_value,
            self.tenure_months as f64,
        ]
    }
}

/// Expansion likelihood bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    High,
    Moderate,
    Low,
}

impl Likelihood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Likelihood::High => "high",
            Likelihood::Moderate => "moderate",
            Likelihood::Low => "low",
        }
    }
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const EXPANSION_RULES: &[WeightedRule<ExpansionFeatures>] = &[
    WeightedRule {
        label: "seat capacity nearly exhausted",
        delta: 0.25,
        applies: |r| r.seat_ratio() > 0.8,
    },
    WeightedRule {
        label: "sustained usage growth",
        delta: 0.20,
        applies: |r| r.usage_growth > 0.1,
    },
    WeightedRule {
        label: "requesting expanded capabilities",
        delta: 0.15,
        applies: |r| r.feature_requests > 2,
    },
    WeightedRule {
        label: "plan limits under pressure",
        delta: 0.15,
        applies: |r| r.plan_utilization > 75.0,
    },
    WeightedRule {
        label: "established relationship",
        delta: 0.10,
        applies: |r| r.tenure_months >= 12,
    },
];

/// Expansion likelihood scoring policy.
pub struct ExpansionPolicy {
    scorer: RuleScorer<ExpansionFeatures>,
}

impl ExpansionPolicy {
    pub fn new() -> Self {
        Self {
            scorer: RuleScorer {
                base: 0.15,
                confidence: 0.68,
                range: VALUE_RANGE,
                rules: EXPANSION_RULES,
            },
        }
    }
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for ExpansionPolicy {
    type Record = ExpansionFeatures;
    type Category = Likelihood;

    fn kind(&self) -> PipelineKind {
        PipelineKind::Expansion
    }

    fn model_version(&self) -> &'static str {
        MODEL_VERSION
    }

    fn value_range(&self) -> RangeInclusive<f64> {
        VALUE_RANGE
    }

    fn cache_ttl(&self) -> Duration {
        CACHE_TTL
    }

    fn categorize(&self, value: f64) -> Likelihood {
        if value >= 0.7 {
            Likelihood::High
        } else if value >= 0.4 {
            Likelihood::Moderate
        } else {
            Likelihood::Low
        }
    }

    fn derive_metrics(
        &self,
        record: &ExpansionFeatures,
        prediction: &Prediction,
    ) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (
                "expected_expansion_value".to_string(),
                (record.contract_value * 12.0 * EXPANSION_VALUE_SHARE * prediction.value).round(),
            ),
            (
                "seat_headroom".to_string(),
                (record.current_seats - record.active_seats) as f64,
            ),
        ])
    }

    fn identify_factors(&self, record: &ExpansionFeatures) -> Vec<String> {
        let mut factors = Vec::new();
        if record.active_seats == record.current_seats {
            factors.push("every licensed seat in use".to_string());
        }
        if record.usage_growth < 0.0 {
            factors.push("usage shrinking quarter over quarter".to_string());
        }
        factors
    }

    fn rule_actions(&self, record: &ExpansionFeatures, prediction: &Prediction) -> Vec<Action> {
        let mut actions = Vec::new();
        if prediction.value >= 0.7 {
            actions.push(Action::rule(
                "upsell_proposal",
                "Prepare a seat-expansion proposal",
                1,
                Impact::High,
                Effort::Medium,
            ));
        }
        if prediction.value >= 0.4 {
            actions.push(Action::rule(
                "business_review",
                "Raise expansion during the next business review",
                2,
                Impact::Medium,
                Effort::Low,
            ));
        }
        if record.feature_requests > 2 {
            actions.push(Action::rule(
                "plan_review",
                "Walk through plan tiers covering the requested capabilities",
                2,
                Impact::Medium,
                Effort::Low,
            ));
        }
        actions.push(Action::rule(
            "monitor_usage",
            "Track seat and plan utilization monthly",
            4,
            Impact::Low,
            Effort::Minimal,
        ));
        actions
    }

    fn fallback_actions(&self) -> Vec<Action> {
        vec![
            Action::rule(
                "business_review",
                "Discuss growth plans at the next business review",
                2,
                Impact::Medium,
                Effort::Low,
            ),
            Action::rule(
                "usage_report",
                "Share a usage-trend report with the account",
                3,
                Impact::Low,
                Effort::Minimal,
            ),
        ]
    }

    fn estimate(&self, record: &ExpansionFeatures) -> Prediction {
        self.scorer.score(record)
    }

    fn augment_prompt(&self, record: &ExpansionFeatures, prediction: &Prediction) -> String {
        format!(
            "An account shows expansion likelihood {:.2} ({}). Seats: {} of {} active. \
             Usage growth: {:.2}. Feature requests: {}. Plan utilization: {:.0}%. \
             Suggest up to 3 concrete upsell actions.",
            prediction.value,
            self.categorize(prediction.value),
            record.active_seats,
            record.current_seats,
            record.usage_growth,
            record.feature_requests,
            record.plan_utilization,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn features() -> ExpansionFeatures {
        ExpansionFeatures {
            entity_id: EntityId::new("acct-9").unwrap(),
            current_seats: 50,
            active_seats: 48,
            usage_growth: 0.25,
            feature_requests: 4,
            plan_utilization: 85.0,
            contract_value: 2000.0,
            tenure_months: 18,
        }
    }

    #[rstest]
    #[case(0.70, Likelihood::High)]
    #[case(0.69, Likelihood::Moderate)]
    #[case(0.40, Likelihood::Moderate)]
    #[case(0.39, Likelihood::Low)]
    fn categorization_boundaries(#[case] value: f64, #[case] expected: Likelihood) {
        assert_eq!(ExpansionPolicy::new().categorize(value), expected);
    }

    #[test]
    fn saturated_account_estimates_high() {
        let policy = ExpansionPolicy::new();
        let prediction = policy.estimate(&features());
        // Base 0.15 plus all five rules, clamped to 1.0.
        assert_eq!(prediction.value, 1.0);
        assert_eq!(policy.categorize(prediction.value), Likelihood::High);
    }

    #[test]
    fn expected_expansion_value_scales_with_probability() {
        let policy = ExpansionPolicy::new();
        let prediction = Prediction::new(
            0.5,
            0.8,
            vec![],
            foresight_core::PredictorSource::Remote,
            &VALUE_RANGE,
        );
        let metrics = policy.derive_metrics(&features(), &prediction);
        // 2000 * 12 * 0.3 * 0.5 = 3600
        assert_eq!(metrics["expected_expansion_value"], 3600.0);
        assert_eq!(metrics["seat_headroom"], 2.0);
    }

    #[test]
    fn validation_rejects_more_active_than_licensed_seats() {
        let record = ExpansionFeatures {
            active_seats: 60,
            ..features()
        };
        assert!(record.validate().is_err());
    }
}
