//! Errors surfaced from a pipeline run to the API layer.

use super::storage::StoreError;
use super::validation::ValidationError;

/// Failure of a single-entity or batch pipeline call.
///
/// Predictor and augmenter failures never appear here; both are recovered
/// internally. What remains is invalid input and a non-durable audit
/// trail, the two conditions the caller must know about.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// One record in a batch failed validation; the index identifies it.
    #[error("entity at index {index} failed validation: {source}")]
    BatchItem {
        index: usize,
        source: ValidationError,
    },

    /// The computed result could not be durably recorded.
    #[error("scoring event could not be persisted: {source}")]
    Persistence {
        #[from]
        source: StoreError,
    },
}
