//! # Foresight Pipeline
//!
//! The per-request scoring flow — cache check, inference, policy scoring,
//! best-effort augmentation, persistence, cache write — and the chunked
//! batch runner that fans entity lists out to it under a fixed
//! concurrency ceiling.

pub mod batch;
pub mod pipeline;

pub use batch::DEFAULT_BATCH_CONCURRENCY;
pub use pipeline::{PipelineRun, ScoringPipeline};
