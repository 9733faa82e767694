//! Strongly-typed names for the scoring pipelines.

use serde::{Deserialize, Serialize};

/// The five predictive pipelines Foresight exposes.
///
/// Each variant corresponds to one domain policy, one set of HTTP routes,
/// and one cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// Lead qualification scoring.
    Leads,
    /// Churn risk assessment for existing accounts.
    Churn,
    /// Expansion / upsell likelihood for existing accounts.
    Expansion,
    /// Campaign outcome forecasting.
    Campaigns,
    /// SEO and content generation scoring.
    Content,
}

impl PipelineKind {
    /// Get the pipeline name as used in cache keys, storage rows, and routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Leads => "leads",
            PipelineKind::Churn => "churn",
            PipelineKind::Expansion => "expansion",
            PipelineKind::Campaigns => "campaigns",
            PipelineKind::Content => "content",
        }
    }

    /// All pipelines, in route-registration order.
    pub fn all() -> &'static [PipelineKind] {
        &[
            PipelineKind::Leads,
            PipelineKind::Churn,
            PipelineKind::Expansion,
            PipelineKind::Campaigns,
            PipelineKind::Content,
        ]
    }
}

impl std::fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        for kind in PipelineKind::all() {
            let encoded = serde_json::to_string(kind).unwrap();
            assert_eq!(encoded, format!("\"{}\"", kind.as_str()));
        }
    }
}
