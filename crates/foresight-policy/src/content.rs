//! SEO / content generation policy.
//!
//! Content is scored like every other domain; the generative augmenter
//! carries more of the weight here, producing keyword and copy suggestions
//! as the action list, while the rule actions cover the structural SEO
//! basics that hold regardless of provider availability.

use foresight_core::{
    Action, Effort, EntityId, FeatureRecord, Impact, PipelineKind, Prediction, ScoringPolicy,
    ValidationError,
};
use foresight_inference::{RuleScorer, WeightedRule};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

const MODEL_VERSION: &str = "1.0.0";
const VALUE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const MAX_SEED_KEYWORDS: usize = 20;

/// A brief describing one piece of content to score and enrich.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBrief {
    pub entity_id: EntityId,
    pub topic: String,
    pub target_audience: String,
    #[serde(default)]
    pub primary_keywords: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    pub word_count_target: u32,
}

fn default_tone() -> String {
    "informative".to_string()
}

impl FeatureRecord for ContentBrief {
    fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.topic.trim().is_empty() {
            return Err(ValidationError::Empty { field: "topic" });
        }
        if self.target_audience.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "target_audience",
            });
        }
        if self.primary_keywords.len() > MAX_SEED_KEYWORDS {
            return Err(ValidationError::invalid(
                "primary_keywords",
                format!("at most {MAX_SEED_KEYWORDS} seed keywords"),
            ));
        }
        if self.word_count_target < 100 || self.word_count_target > 20_000 {
            return Err(ValidationError::invalid(
                "word_count_target",
                "must be between 100 and 20000",
            ));
        }
        Ok(())
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.primary_keywords.len() as f64,
            self.word_count_target as f64,
            self.topic.split_whitespace().count() as f64,
            self.target_audience.split_whitespace().count() as f64,
        ]
    }
}

/// Content opportunity grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentGrade {
    Excellent,
    Strong,
    Moderate,
    Thin,
}

impl ContentGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentGrade::Excellent => "excellent",
            ContentGrade::Strong => "strong",
            ContentGrade::Moderate => "moderate",
            ContentGrade::Thin => "thin",
        }
    }
}

impl fmt::Display for ContentGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const CONTENT_RULES: &[WeightedRule<ContentBrief>] = &[
    WeightedRule {
        label: "keyword set provided",
        delta: 15.0,
        applies: |r| r.primary_keywords.len() >= 3,
    },
    WeightedRule {
        label: "focused keyword set",
        delta: 10.0,
        applies: |r| (3..=8).contains(&r.primary_keywords.len()),
    },
    WeightedRule {
        label: "long-form depth",
        delta: 15.0,
        applies: |r| r.word_count_target >= 1000,
    },
    WeightedRule {
        label: "specific topic",
        delta: 10.0,
        applies: |r| r.topic.split_whitespace().count() >= 3,
    },
    WeightedRule {
        label: "well-defined audience",
        delta: 5.0,
        applies: |r| r.target_audience.split_whitespace().count() >= 2,
    },
];

/// Content/SEO scoring policy.
pub struct ContentPolicy {
    scorer: RuleScorer<ContentBrief>,
}

impl ContentPolicy {
    pub fn new() -> Self {
        Self {
            scorer: RuleScorer {
                base: 35.0,
                confidence: 0.6,
                range: VALUE_RANGE,
                rules: CONTENT_RULES,
            },
        }
    }
}

impl Default for ContentPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringPolicy for ContentPolicy {
    type Record = ContentBrief;
    type Category = ContentGrade;

    fn kind(&self) -> PipelineKind {
        PipelineKind::Content
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

    fn categorize(&self, value: f64) -> ContentGrade {
        if value >= 80.0 {
            ContentGrade::Excellent
        } else if value >= 60.0 {
            ContentGrade::Strong
        } else if value >= 40.0 {
            ContentGrade::Moderate
        } else {
            ContentGrade::Thin
        }
    }

    fn derive_metrics(
        &self,
        record: &ContentBrief,
        _prediction: &Prediction,
    ) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (
                "keyword_count".to_string(),
                record.primary_keywords.len() as f64,
            ),
            (
                "target_word_count".to_string(),
                record.word_count_target as f64,
            ),
            (
                "estimated_read_minutes".to_string(),
                (record.word_count_target as f64 / 200.0).round(),
            ),
        ])
    }

    fn identify_factors(&self, record: &ContentBrief) -> Vec<String> {
        let mut factors = Vec::new();
        if record.primary_keywords.is_empty() {
            factors.push("no seed keywords supplied".to_string());
        }
        if record.word_count_target < 600 {
            factors.push("short-form target".to_string());
        }
        factors
    }

    fn rule_actions(&self, record: &ContentBrief, _prediction: &Prediction) -> Vec<Action> {
        let mut actions = vec![
            Action::rule(
                "meta_description",
                "Write a meta description under 160 characters",
                2,
                Impact::Medium,
                Effort::Minimal,
            ),
            Action::rule(
                "internal_links",
                "Add internal links to related pillar pages",
                3,
                Impact::Medium,
                Effort::Low,
            ),
        ];
        if record.primary_keywords.len() < 3 {
            actions.push(Action::rule(
                "expand_keywords",
                "Expand the seed keyword set before drafting",
                1,
                Impact::High,
                Effort::Low,
            ));
        }
        actions
    }

    fn fallback_actions(&self) -> Vec<Action> {
        vec![
            Action::rule(
                "outline_first",
                "Draft an H2/H3 outline before writing",
                2,
                Impact::Medium,
                Effort::Minimal,
            ),
            Action::rule(
                "meta_description",
                "Write a meta description under 160 characters",
                2,
                Impact::Medium,
                Effort::Minimal,
            ),
        ]
    }

    fn estimate(&self, record: &ContentBrief) -> Prediction {
        self.scorer.score(record)
    }

    fn augment_prompt(&self, record: &ContentBrief, prediction: &Prediction) -> String {
        format!(
            "A content brief scored {:.0}/100 ({}) for SEO opportunity. Topic: \"{}\". \
             Audience: \"{}\". Seed keywords: {:?}. Tone: {}. Target length: {} words. \
             Suggest up to 5 SEO and copy improvements (keywords to add, title angles, \
             structural changes) as actions.",
            prediction.value,
            self.categorize(prediction.value),
            record.topic,
            record.target_audience,
            record.primary_keywords,
            record.tone,
            record.word_count_target,
        )
    }

    // Content suggestions run longer than the other domains' action lists.
    fn augment_max_tokens(&self) -> u32 {
        1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn brief() -> ContentBrief {
        ContentBrief {
            entity_id: EntityId::new("post-42").unwrap(),
            topic: "Reducing churn with usage analytics".to_string(),
            target_audience: "B2B SaaS customer success leaders".to_string(),
            primary_keywords: vec![
                "churn reduction".to_string(),
                "usage analytics".to_string(),
                "customer health score".to_string(),
            ],
            tone: "educational".to_string(),
            word_count_target: 1800,
        }
    }

    #[rstest]
    #[case(80.0, ContentGrade::Excellent)]
    #[case(79.9, ContentGrade::Strong)]
    #[case(60.0, ContentGrade::Strong)]
    #[case(40.0, ContentGrade::Moderate)]
    #[case(39.9, ContentGrade::Thin)]
    fn categorization_boundaries(#[case] value: f64, #[case] expected: ContentGrade) {
        assert_eq!(ContentPolicy::new().categorize(value), expected);
    }

    #[test]
    fn complete_brief_estimates_excellent() {
        let policy = ContentPolicy::new();
        let prediction = policy.estimate(&brief());
        // Base 35 + 15 + 10 + 15 + 10 + 5 = 90.
        assert_eq!(prediction.value, 90.0);
        assert_eq!(policy.categorize(prediction.value), ContentGrade::Excellent);
    }

    #[test]
    fn sparse_brief_gains_keyword_expansion_action() {
        let policy = ContentPolicy::new();
        let record = ContentBrief {
            primary_keywords: vec![],
            ..brief()
        };
        let prediction = policy.estimate(&record);
        let actions = policy.rule_actions(&record, &prediction);
        assert!(actions.iter().any(|a| a.kind == "expand_keywords"));
    }

    #[test]
    fn validation_rejects_blank_topic() {
        let record = ContentBrief {
            topic: "   ".to_string(),
            ..brief()
        };
        assert!(matches!(
            record.validate(),
            Err(ValidationError::Empty { field: "topic" })
        ));
    }

    #[test]
    fn tone_defaults_when_omitted() {
        let json = r#"{
            "entityId": "post-1",
            "topic": "A topic with enough words",
            "targetAudience": "growth marketers",
            "wordCountTarget": 1200
        }"#;
        let record: ContentBrief = serde_json::from_str(json).unwrap();
        assert_eq!(record.tone, "informative");
        assert!(record.validate().is_ok());
    }
}
