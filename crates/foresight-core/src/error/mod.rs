//! Error taxonomy for the scoring pipelines.
//!
//! Four recovery disciplines, all request-scoped:
//! - [`PredictorError`] is always recovered inside the inference gateway
//!   by the deterministic fallback and never surfaces to callers.
//! - [`AugmentError`] is recovered at every augmenter call site by
//!   substituting the policy's static fallback content.
//! - [`CacheError`] is best-effort: logged, never surfaced; an outage
//!   only forces the cache-miss path.
//! - [`StoreError`] and [`ValidationError`] surface to the caller through
//!   [`PipelineError`].

mod inference;
mod pipeline;
mod storage;
mod validation;

pub use inference::{AugmentError, PredictorError};
pub use pipeline::PipelineError;
pub use storage::{CacheError, StoreError};
pub use validation::ValidationError;
