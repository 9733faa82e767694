//! Shared application state: one pipeline per domain.

use foresight_pipeline::ScoringPipeline;
use foresight_policy::{CampaignPolicy, ChurnPolicy, ContentPolicy, ExpansionPolicy, LeadPolicy};
use std::sync::Arc;
use std::time::Instant;

/// Handler state. Pipelines are stateless between calls, so cloning the
/// state per request is a handful of `Arc` bumps.
#[derive(Clone)]
pub struct AppState {
    pub leads: Arc<ScoringPipeline<LeadPolicy>>,
    pub churn: Arc<ScoringPipeline<ChurnPolicy>>,
    pub expansion: Arc<ScoringPipeline<ExpansionPolicy>>,
    pub campaigns: Arc<ScoringPipeline<CampaignPolicy>>,
    pub content: Arc<ScoringPipeline<ContentPolicy>>,
    pub started_at: Instant,
}
