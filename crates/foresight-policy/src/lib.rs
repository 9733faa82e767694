//! # Foresight Policy
//!
//! One pure [`ScoringPolicy`](foresight_core::ScoringPolicy) per domain.
//! Policies own their thresholds, weights, fallback rule tables, prompts,
//! and static fallback actions as constants; they perform no I/O and read
//! no ambient state, which is what keeps the pipeline deterministic enough
//! to test without any provider in the loop.

pub mod campaign;
pub mod churn;
pub mod content;
pub mod expansion;
pub mod lead;

pub use campaign::{CampaignFeatures, CampaignPolicy, Channel, Outlook};
pub use churn::{ChurnFeatures, ChurnPolicy, RiskLevel};
pub use content::{ContentBrief, ContentGrade, ContentPolicy};
pub use expansion::{ExpansionFeatures, ExpansionPolicy, Likelihood};
pub use lead::{LeadBand, LeadFeatures, LeadPolicy};
