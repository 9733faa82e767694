//! # Foresight Core
//!
//! Core types and traits shared by every Foresight crate: validated
//! identifiers, the provider-agnostic prediction model, scored results and
//! recommended actions, cache keys, the `ScoringPolicy` trait, and the
//! error taxonomy.

pub mod action;
pub mod batch;
pub mod cache_key;
pub mod error;
pub mod identifiers;
pub mod pipeline_kind;
pub mod policy;
pub mod prediction;
pub mod record;
pub mod scored;

pub use action::{
    ACTION_SCHEMA_HINT, Action, ActionSource, ActionSuggestion, Effort, Impact,
    MAX_RECOMMENDED_ACTIONS, rank_actions,
};
pub use batch::{BatchResult, BatchSummary};
pub use cache_key::CacheKey;
pub use error::{
    AugmentError, CacheError, PipelineError, PredictorError, StoreError, ValidationError,
};
pub use identifiers::{EntityId, InvalidIdentifier, TenantId};
pub use pipeline_kind::PipelineKind;
pub use policy::ScoringPolicy;
pub use prediction::{Prediction, PredictorSource};
pub use record::{FeatureRecord, fingerprint_of};
pub use scored::ScoredResult;
