//! Recommended actions attached to a scored result.
//!
//! Actions come from two sources: the domain policy's rule tables, and the
//! generative augmenter. Ranking is shared across domains: ascending
//! priority, rule-sourced before generative at equal priority, truncated
//! to [`MAX_RECOMMENDED_ACTIONS`].

use serde::{Deserialize, Serialize};

/// Upper bound on recommended actions per scored result.
pub const MAX_RECOMMENDED_ACTIONS: usize = 5;

/// Shape description sent to the text provider when requesting action
/// suggestions. Kept as a plain string: the provider boundary is
/// schema-less and the real contract is enforced by parsing.
pub const ACTION_SCHEMA_HINT: &str = r#"[{"kind": "string", "description": "string", "priority": 1-5, "expectedImpact": "low|medium|high", "effort": "minimal|low|medium|high"}]"#;

/// Expected impact of carrying out an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// Estimated effort of carrying out an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Minimal,
    Low,
    Medium,
    High,
}

/// Where an action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSource {
    /// Produced by a domain policy rule table.
    Rule,
    /// Produced by the generative augmenter.
    Generative,
}

impl ActionSource {
    /// Rule-sourced actions sort before generative ones at equal priority.
    fn rank(&self) -> u8 {
        match self {
            ActionSource::Rule => 0,
            ActionSource::Generative => 1,
        }
    }
}

/// One recommended action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Machine-readable action kind, e.g. `schedule_demo`.
    pub kind: String,
    /// Human-readable description.
    pub description: String,
    /// Priority from 1 (highest) to 5 (lowest).
    pub priority: u8,
    pub expected_impact: Impact,
    pub effort: Effort,
    pub source: ActionSource,
}

impl Action {
    /// Build a rule-sourced action.
    pub fn rule(
        kind: impl Into<String>,
        description: impl Into<String>,
        priority: u8,
        expected_impact: Impact,
        effort: Effort,
    ) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            priority: priority.clamp(1, 5),
            expected_impact,
            effort,
            source: ActionSource::Rule,
        }
    }
}

/// Rank actions by ascending priority, rule-sourced before generative at
/// equal priority, and truncate to [`MAX_RECOMMENDED_ACTIONS`].
///
/// The sort is stable, so the caller's ordering is preserved among actions
/// with identical priority and source.
pub fn rank_actions(mut actions: Vec<Action>) -> Vec<Action> {
    actions.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.source.rank().cmp(&b.source.rank()))
    });
    actions.truncate(MAX_RECOMMENDED_ACTIONS);
    actions
}

/// Untrusted action shape as the generative provider emits it.
///
/// All fields except `description` are optional and lenient; conversion
/// into [`Action`] clamps and defaults rather than rejecting, since the
/// schema contract was already enforced by the JSON parse that produced
/// this value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSuggestion {
    #[serde(default)]
    pub kind: Option<String>,
    pub description: String,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub expected_impact: Option<String>,
    #[serde(default)]
    pub effort: Option<String>,
}

impl ActionSuggestion {
    /// Convert into a generative-sourced [`Action`].
    pub fn into_action(self) -> Action {
        let expected_impact = match self.expected_impact.as_deref() {
            Some("low") => Impact::Low,
            Some("high") => Impact::High,
            _ => Impact::Medium,
        };
        let effort = match self.effort.as_deref() {
            Some("minimal") => Effort::Minimal,
            Some("low") => Effort::Low,
            Some("high") => Effort::High,
            _ => Effort::Medium,
        };
        Action {
            kind: self.kind.unwrap_or_else(|| "suggestion".to_string()),
            description: self.description,
            priority: self.priority.unwrap_or(3).clamp(1, 5),
            expected_impact,
            effort,
            source: ActionSource::Generative,
        }
    }
}
