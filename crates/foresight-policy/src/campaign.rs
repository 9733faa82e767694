//! Campaign outcome forecasting policy.

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
const VALUE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
const CACHE_TTL: Duration = Duration::from_secs(30 * 60);

// Forecast band offsets. These are policy constants, not statistically
// fitted, and downstream consumers depend on the exact values.
const REACH_BAND: f64 = 0.2;
const CONVERSIONS_LOW_OFFSET: f64 = 0.3;
const CONVERSIONS_HIGH_OFFSET: f64 = 0.4;

/// Delivery channel of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Social,
    Search,
    Display,
}

/// Input features for one campaign forecast request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFeatures {
    pub entity_id: EntityId,
    pub budget: f64,
    pub audience_size: u32,
    pub channel: Channel,
    /// Historical click-through rate, 0-1.
    pub historical_ctr: f64,
    /// Historical click-to-conversion rate, 0-1.
    pub historical_conversion_rate: f64,
    pub duration_days: u32,
}

impl FeatureRecord for CampaignFeatures {
    fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_finite("budget", self.budget)?;
        if self.budget <= 0.0 {
            return Err(ValidationError::invalid("budget", "must be positive"));
        }
        if self.audience_size == 0 {
            return Err(ValidationError::invalid(
                "audience_size",
                "must be at least 1",
            ));
        }
        require_in_range("historical_ctr", self.historical_ctr, 0.0, 1.0)?;
        require_in_range(
            "historical_conversion_rate",
            self.historical_conversion_rate,
            0.0,
            1.0,
        )?;
        if self.duration_days == 0 || self.duration_days > 365 {
            return Err(ValidationError::invalid(
                "duration_days",
                "must be between 1 and 365",
            ));
        }
        Ok(())
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.budget,
            self.audience_size as f64,
            match self.channel {
                Channel::Email => 0.0,
                Channel::Social => 1.0,
                Channel::Search => 2.0,
                Channel::Display => 3.0,
            },
            self.historical_ctr,
            self.historical_conversion_rate,
            self.duration_days as f64,
        ]
    }
}

/// Forecast outlook bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Strong,
    Promising,
    Modest,
    Weak,
}

impl Outlook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outlook::Strong => "strong",
            Outlook::Promising => "promising",
            Outlook::Modest => "modest",
            Outlook::Weak => "weak",
        }
    }
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const CAMPAIGN_RULES: &[WeightedRule<CampaignFeatures>] = &[
    WeightedRule {
        label: "healthy budget per contact",
        delta: 15.0,
        applies: |r| r.budget / r.audience_size.max(1) as f64 >= 0.5,
    },
    WeightedRule {
        label: "above-benchmark click-through history",
        delta: 15.0,
        applies: |r| r.historical_ctr > 0.02,
    },
    WeightedRule {
        label: "strong historical conversion",
        delta: 15.0,
        applies: |r| r.historical_conversion_rate > 0.02,
    },
    WeightedRule {
        label: "effective flight length",
        delta: 10.0,
        applies: |r| (7..=45).contains(&r.duration_days),
    },
    WeightedRule {
        label: "high-intent channel",
        delta: 10.0,
        applies: |r| matches!(r.channel, Channel::Email | Channel::Search),
    },
];

/// Campaign forecasting policy.
pub struct CampaignPolicy {
    scorer: RuleScorer<CampaignFeatures>,
}

impl CampaignPolicy {
    pub fn new() -> Self {
        Self {
            scorer: RuleScorer {
                base: 30.0,
                confidence: 0.65,
                range: VALUE_RANGE,
                rules: CAMPAIGN_RULES,
            },
        }
    }
}

impl Default for CampaignPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for CampaignPolicy {
    type Record = CampaignFeatures;
    type Category = Outlook;

    fn kind(&self) -> PipelineKind {
        PipelineKind::Campaigns
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

    fn categorize(&self, value: f64) -> Outlook {
        if value >= 70.0 {
            Outlook::Strong
        } else if value >= 45.0 {
            Outlook::Promising
        } else if value >= 25.0 {
            Outlook::Modest
        } else {
            Outlook::Weak
        }
    }

    /// Point forecasts plus fixed confidence bands: reach ±20 %,
    /// conversions −30 %/+40 %.
    fn derive_metrics(
        &self,
        record: &CampaignFeatures,
        prediction: &Prediction,
    ) -> BTreeMap<String, f64> {
        let projected_reach = record.audience_size as f64 * (prediction.value / 100.0);
        let projected_conversions =
            projected_reach * record.historical_ctr * record.historical_conversion_rate;
        let mut metrics = BTreeMap::from([
            ("projected_reach".to_string(), projected_reach),
            (
                "reach_low".to_string(),
                projected_reach * (1.0 - REACH_BAND),
            ),
            (
                "reach_high".to_string(),
                projected_reach * (1.0 + REACH_BAND),
            ),
            ("projected_conversions".to_string(), projected_conversions),
            (
                "conversions_low".to_string(),
                projected_conversions * (1.0 - CONVERSIONS_LOW_OFFSET),
            ),
            (
                "conversions_high".to_string(),
                projected_conversions * (1.0 + CONVERSIONS_HIGH_OFFSET),
            ),
        ]);
        if projected_conversions > 0.0 {
            metrics.insert(
                "cost_per_conversion".to_string(),
                record.budget / projected_conversions,
            );
        }
        metrics
    }

    fn identify_factors(&self, record: &CampaignFeatures) -> Vec<String> {
        let mut factors = Vec::new();
        if record.historical_ctr < 0.005 {
            factors.push("weak historical click-through".to_string());
        }
        if record.duration_days > 60 {
            factors.push("long flight risks audience fatigue".to_string());
        }
        factors
    }

    fn rule_actions(&self, record: &CampaignFeatures, prediction: &Prediction) -> Vec<Action> {
        let mut actions = Vec::new();
        if prediction.value < 45.0 {
            actions.push(Action::rule(
                "narrow_audience",
                "Narrow targeting to the highest-intent segment",
                1,
                Impact::High,
                Effort::Medium,
            ));
        }
        if record.historical_ctr < 0.01 {
            actions.push(Action::rule(
                "refresh_creative",
                "Refresh ad creative before launch",
                2,
                Impact::Medium,
                Effort::Medium,
            ));
        }
        if prediction.value >= 70.0 {
            actions.push(Action::rule(
                "scale_budget",
                "Scale budget while performance holds",
                2,
                Impact::High,
                Effort::Low,
            ));
        }
        actions.push(Action::rule(
            "ab_test",
            "A/B test subject lines or headlines",
            3,
            Impact::Medium,
            Effort::Low,
        ));
        actions
    }

    fn fallback_actions(&self) -> Vec<Action> {
        vec![
            Action::rule(
                "review_targeting",
                "Review audience targeting against past winners",
                2,
                Impact::Medium,
                Effort::Low,
            ),
            Action::rule(
                "ab_test",
                "A/B test subject lines or headlines",
                3,
                Impact::Medium,
                Effort::Low,
            ),
        ]
    }

    fn estimate(&self, record: &CampaignFeatures) -> Prediction {
        self.scorer.score(record)
    }

    fn augment_prompt(&self, record: &CampaignFeatures, prediction: &Prediction) -> String {
        format!(
            "A planned campaign scored {:.0}/100 ({}). Budget: {:.0}. Audience: {}. \
             Channel: {:?}. Historical CTR: {:.3}. Historical conversion rate: {:.3}. \
             Flight length: {} days. Suggest up to 3 concrete optimization actions.",
            prediction.value,
            self.categorize(prediction.value),
            record.budget,
            record.audience_size,
            record.channel,
            record.historical_ctr,
            record.historical_conversion_rate,
            record.duration_days,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_core::PredictorSource;
    use rstest::rstest;

    fn features() -> CampaignFeatures {
        CampaignFeatures {
            entity_id: EntityId::new("camp-1").unwrap(),
            budget: 10_000.0,
            audience_size: 10_000,
            channel: Channel::Email,
            historical_ctr: 0.05,
            historical_conversion_rate: 0.1,
            duration_days: 14,
        }
    }

    #[rstest]
    #[case(70.0, Outlook::Strong)]
    #[case(69.9, Outlook::Promising)]
    #[case(45.0, Outlook::Promising)]
    #[case(44.9, Outlook::Modest)]
    #[case(25.0, Outlook::Modest)]
    #[case(24.9, Outlook::Weak)]
    fn categorization_boundaries(#[case] value: f64, #[case] expected: Outlook) {
        assert_eq!(CampaignPolicy::new().categorize(value), expected);
    }

    #[test]
    fn forecast_bands_use_fixed_offsets() {
        let policy = CampaignPolicy::new();
        let prediction = Prediction::new(80.0, 0.9, vec![], PredictorSource::Remote, &VALUE_RANGE);
        let metrics = policy.derive_metrics(&features(), &prediction);

        let close = |key: &str, expected: f64| {
            let actual = metrics[key];
            assert!(
                (actual - expected).abs() < 1e-6,
                "{key}: {actual} != {expected}"
            );
        };
        close("projected_reach", 8000.0);
        close("reach_low", 6400.0);
        close("reach_high", 9600.0);
        // 8000 * 0.05 * 0.1 = 40 conversions
        close("projected_conversions", 40.0);
        close("conversions_low", 28.0);
        close("conversions_high", 56.0);
        close("cost_per_conversion", 250.0);
    }

    #[test]
    fn strong_history_estimates_strong_outlook() {
        let policy = CampaignPolicy::new();
        let prediction = policy.estimate(&features());
        // Base 30 + budget 15 + ctr 15 + conversion 15 + flight 10 + channel 10 = 95.
        assert_eq!(prediction.value, 95.0);
        assert_eq!(policy.categorize(prediction.value), Outlook::Strong);
    }

    #[test]
    fn validation_rejects_zero_audience() {
        let record = CampaignFeatures {
            audience_size: 0,
            ..features()
        };
        assert!(record.validate().is_err());
    }
}
