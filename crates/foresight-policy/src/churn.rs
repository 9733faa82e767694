//! Churn risk policy for existing accounts.

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
const CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Input features for one account churn assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnFeatures {
    pub entity_id: EntityId,
    /// Monthly recurring contract value.
    pub contract_value: f64,
    pub last_login_days: u32,
    pub support_tickets: u32,
    /// Share of available features in active use, 0-100.
    pub feature_adoption: f64,
    /// Latest NPS response, 0-10.
    pub nps_score: f64,
    /// Engagement slope over the trailing quarter, -1 to 1.
    pub engagement_trend: f64,
    pub payment_issues: u32,
    pub tenure_months: u32,
}

impl FeatureRecord for ChurnFeatures {
    fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_finite("contract_value", self.contract_value)?;
        if self.contract_value < 0.0 {
            return Err(ValidationError::invalid(
                "contract_value",
                "must not be negative",
            ));
        }
        require_in_range("feature_adoption", self.feature_adoption, 0.0, 100.0)?;
        require_in_range("nps_score", self.nps_score, 0.0, 10.0)?;
        require_in_range("engagement_trend", self.engagement_trend, -1.0, 1.0)?;
        Ok(())
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.contract_value,
            self.last_login_days as f64,
            self.support_tickets as f64,
            self.feature_adoption,
            self.nps_score,
            self.engagement_trend,
            self.payment_issues as f64,
            self.tenure_months as f64,
        ]
    }
}

/// Churn risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fallback table: deltas sum onto the base probability when the remote
/// predictor is unavailable.
const CHURN_RULES: &[WeightedRule<ChurnFeatures>] = &[
    WeightedRule {
        label: "no recent logins",
        delta: 0.20,
        applies: |r| r.last_login_days > 14,
    },
    WeightedRule {
        label: "elevated support volume",
        delta: 0.15,
        applies: |r| r.support_tickets > 5,
    },
    WeightedRule {
        label: "low feature adoption",
        delta: 0.15,
        applies: |r| r.feature_adoption < 30.0,
    },
    WeightedRule {
        label: "detractor NPS",
        delta: 0.10,
        applies: |r| r.nps_score < 6.0,
    },
    WeightedRule {
        label: "declining engagement",
        delta: 0.15,
        applies: |r| r.engagement_trend < 0.0,
    },
    WeightedRule {
        label: "recent payment issues",
        delta: 0.15,
        applies: |r| r.payment_issues > 0,
    },
];

/// Churn risk scoring policy.
pub struct ChurnPolicy {
    scorer: RuleScorer<ChurnFeatures>,
}

impl ChurnPolicy {
    pub fn new() -> Self {
        Self {
            scorer: RuleScorer {
                base: 0.1,
                confidence: 0.7,
                range: VALUE_RANGE,
                rules: CHURN_RULES,
            },
        }
    }
}

impl Default for ChurnPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for ChurnPolicy {
    type Record = ChurnFeatures;
    type Category = RiskLevel;

    fn kind(&self) -> PipelineKind {
        PipelineKind::Churn
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

    fn categorize(&self, value: f64) -> RiskLevel {
        if value < 0.3 {
            RiskLevel::Low
        } else if value < 0.5 {
            RiskLevel::Medium
        } else if value < 0.7 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    fn derive_metrics(
        &self,
        record: &ChurnFeatures,
        prediction: &Prediction,
    ) -> BTreeMap<String, f64> {
        let annual = record.contract_value * 12.0;
        BTreeMap::from([
            ("annual_contract_value".to_string(), annual),
            (
                "revenue_at_risk".to_string(),
                (annual * prediction.value).round(),
            ),
        ])
    }

    fn identify_factors(&self, record: &ChurnFeatures) -> Vec<String> {
        let mut factors = Vec::new();
        if record.last_login_days > 30 {
            factors.push("dormant for over a month".to_string());
        }
        if record.tenure_months < 6 {
            factors.push("early-tenure account".to_string());
        }
        if record.engagement_trend < -0.2 {
            factors.push("steep engagement decline".to_string());
        }
        factors
    }

    fn rule_actions(&self, record: &ChurnFeatures, prediction: &Prediction) -> Vec<Action> {
        let mut actions = Vec::new();
        if prediction.value >= 0.7 {
            actions.push(Action::rule(
                "executive_outreach",
                "Schedule an executive business review within the week",
                1,
                Impact::High,
                Effort::Medium,
            ));
        }
        if prediction.value >= 0.5 {
            actions.push(Action::rule(
                "success_call",
                "Book a customer success call to surface blockers",
                2,
                Impact::High,
                Effort::Low,
            ));
        }
        if record.payment_issues > 0 {
            actions.push(Action::rule(
                "billing_review",
                "Resolve open billing issues with the account",
                1,
                Impact::Medium,
                Effort::Minimal,
            ));
        }
        if record.feature_adoption < 30.0 {
            actions.push(Action::rule(
                "enablement_session",
                "Run a feature enablement session for unused capabilities",
                3,
                Impact::Medium,
                Effort::Low,
            ));
        }
        actions.push(Action::rule(
            "health_monitor",
            "Keep the account on the weekly health watchlist",
            4,
            Impact::Low,
            Effort::Minimal,
        ));
        actions
    }

    fn fallback_actions(&self) -> Vec<Action> {
        vec![
            Action::rule(
                "success_call",
                "Schedule a customer success check-in",
                2,
                Impact::Medium,
                Effort::Low,
            ),
            Action::rule(
                "usage_review",
                "Review product usage with the account team",
                3,
                Impact::Medium,
                Effort::Low,
            ),
        ]
    }

    fn estimate(&self, record: &ChurnFeatures) -> Prediction {
        self.scorer.score(record)
    }

    fn augment_prompt(&self, record: &ChurnFeatures, prediction: &Prediction) -> String {
        format!(
            "An account shows churn probability {:.2} ({}). Monthly contract value: {:.0}. \
             Days since last login: {}. Open support tickets: {}. Feature adoption: {:.0}%. \
             NPS: {:.0}. Suggest up to 3 concrete retention actions.",
            prediction.value,
            self.categorize(prediction.value),
            record.contract_value,
            record.last_login_days,
            record.support_tickets,
            record.feature_adoption,
            record.nps_score,
        )
    }
}
