//! Lead qualification policy.

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
const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Input features for one lead scoring request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadFeatures {
    pub entity_id: EntityId,
    pub company_size: u32,
    pub annual_revenue: f64,
    /// Composite engagement score, 0-100.
    pub engagement_score: f64,
    pub website_visits: u32,
    pub content_downloads: u32,
    pub demo_requested: bool,
    pub budget_confirmed: bool,
    pub decision_timeframe_days: u32,
}

impl FeatureRecord for LeadFeatures {
    fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_finite("annual_revenue", self.annual_revenue)?;
        if self.annual_revenue < 0.0 {
            return Err(ValidationError::invalid(
                "annual_revenue",
                "must not be negative",
            ));
        }
        require_in_range("engagement_score", self.engagement_score, 0.0, 100.0)?;
        Ok(())
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.company_size as f64,
            self.annual_revenue,
            self.engagement_score,
            self.website_visits as f64,
            self.content_downloads as f64,
            if self.demo_requested { 1.0 } else { 0.0 },
            if self.budget_confirmed { 1.0 } else { 0.0 },
            self.decision_timeframe_days as f64,
        ]
    }
}

/// Lead qualification bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadBand {
    Qualified,
    Hot,
    Warm,
    Cold,
}

impl LeadBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadBand::Qualified => "qualified",
            LeadBand::Hot => "hot",
            LeadBand::Warm => "warm",
            LeadBand::Cold => "cold",
        }
    }
}

impl fmt::Display for LeadBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const LEAD_RULES: &[WeightedRule<LeadFeatures>] = &[
    WeightedRule {
        label: "high engagement",
        delta: 20.0,
        applies: |r| r.engagement_score > 70.0,
    },
    WeightedRule {
        label: "demo requested",
        delta: 15.0,
        applies: |r| r.demo_requested,
    },
    WeightedRule {
        label: "budget confirmed",
        delta: 15.0,
        applies: |r| r.budget_confirmed,
    },
    WeightedRule {
        label: "mid-market or larger",
        delta: 10.0,
        applies: |r| r.company_size >= 100,
    },
    WeightedRule {
        label: "near-term decision window",
        delta: 10.0,
        applies: |r| r.decision_timeframe_days <= 30,
    },
    WeightedRule {
        label: "frequent site visits",
        delta: 5.0,
        applies: |r| r.website_visits > 10,
    },
    WeightedRule {
        label: "active content consumption",
        delta: 5.0,
        applies: |r| r.content_downloads > 3,
    },
];

/// Lead scoring policy.
pub struct LeadPolicy {
    scorer: RuleScorer<LeadFeatures>,
}

impl LeadPolicy {
    pub fn new() -> Self {
        Self {
            scorer: RuleScorer {
                base: 25.0,
                confidence: 0.72,
                range: VALUE_RANGE,
                rules: LEAD_RULES,
            },
        }
    }
}

impl Default for LeadPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for LeadPolicy {
    type Record = LeadFeatures;
    type Category = LeadBand;

    fn kind(&self) -> PipelineKind {
        PipelineKind::Leads
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

    fn categorize(&self, value: f64) -> LeadBand {
        if value >= 80.0 {
            LeadBand::Qualified
        } else if value >= 60.0 {
            LeadBand::Hot
        } else if value >= 40.0 {
            LeadBand::Warm
        } else {
            LeadBand::Cold
        }
    }

    fn derive_metrics(
        &self,
        record: &LeadFeatures,
        prediction: &Prediction,
    ) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (
                "conversion_probability".to_string(),
                (prediction.value / 100.0) * prediction.confidence,
            ),
            (
                "days_to_decision".to_string(),
                record.decision_timeframe_days as f64,
            ),
        ])
    }

    fn identify_factors(&self, record: &LeadFeatures) -> Vec<String> {
        let mut factors = Vec::new();
        if record.budget_confirmed {
            factors.push("budget authority confirmed".to_string());
        }
        if record.demo_requested {
            factors.push("requested a product demo".to_string());
        }
        if record.engagement_score < 20.0 {
            factors.push("minimal engagement so far".to_string());
        }
        factors
    }

    fn rule_actions(&self, record: &LeadFeatures, prediction: &Prediction) -> Vec<Action> {
        let mut actions = Vec::new();
        if prediction.value >= 80.0 {
            actions.push(Action::rule(
                "fast_track",
                "Route to senior sales for same-day follow-up",
                1,
                Impact::High,
                Effort::Low,
            ));
        }
        if prediction.value >= 60.0 && !record.demo_requested {
            actions.push(Action::rule(
                "schedule_demo",
                "Offer a tailored product demo",
                2,
                Impact::High,
                Effort::Medium,
            ));
        }
        if prediction.value >= 40.0 && prediction.value < 60.0 {
            actions.push(Action::rule(
                "nurture_sequence",
                "Enroll in the mid-funnel nurture sequence",
                3,
                Impact::Medium,
                Effort::Minimal,
            ));
        }
        if prediction.value < 40.0 {
            actions.push(Action::rule(
                "keep_warm",
                "Keep warm via the monthly newsletter",
                5,
                Impact::Low,
                Effort::Minimal,
            ));
        }
        actions
    }

    fn fallback_actions(&self) -> Vec<Action> {
        vec![
            Action::rule(
                "follow_up",
                "Send a personalized follow-up email",
                2,
                Impact::Medium,
                Effort::Minimal,
            ),
            Action::rule(
                "case_study",
                "Share a relevant customer case study",
                3,
                Impact::Medium,
                Effort::Minimal,
            ),
        ]
    }

    fn estimate(&self, record: &LeadFeatures) -> Prediction {
        self.scorer.score(record)
    }

    fn augment_prompt(&self, record: &LeadFeatures, prediction: &Prediction) -> String {
        format!(
            "A lead scored {:.0}/100 ({}). Company size: {} employees. Engagement score: {:.0}. \
             Demo requested: {}. Budget confirmed: {}. Decision window: {} days. \
             Suggest up to 3 concrete next-step actions for the sales team.",
            prediction.value,
            self.categorize(prediction.value),
            record.company_size,
            record.engagement_score,
            record.demo_requested,
            record.budget_confirmed,
            record.decision_timeframe_days,
        )
    }
}
