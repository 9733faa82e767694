//! # Foresight Inference
//!
//! The two remote provider boundaries and everything that keeps them from
//! becoming availability liabilities:
//!
//! - [`InferenceGateway`] wraps the remote ML predictor with a timeout and
//!   a deterministic weighted-rule fallback, so `predict` never fails.
//! - [`GenerativeAugmenter`] wraps the text-completion provider with an
//!   enforced JSON contract; malformed output is a typed error every call
//!   site must handle, never a panic and never silently-accepted prose.

pub mod fallback;
pub mod gateway;
pub mod generative;
pub mod predictor;

pub use fallback::{RuleScorer, WeightedRule};
pub use gateway::InferenceGateway;
pub use generative::{
    CompletionRequest, GenerativeAugmenter, HttpTextProvider, ProviderError, TextProvider,
};
pub use predictor::{HttpPredictor, Predictor, RawPrediction};
