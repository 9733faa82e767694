//! Errors at the two remote provider boundaries.

/// The remote ML predictor could not produce a usable prediction.
///
/// Never escapes the inference gateway: every variant is recovered by
/// running the deterministic fallback estimator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PredictorError {
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("predictor returned status {status}")]
    Status { status: u16 },

    #[error("predictor payload was malformed: {reason}")]
    Malformed { reason: String },
}

/// The generative augmentation step failed.
///
/// Callers must handle both arms explicitly and substitute their
/// documented fallback content; the augmenter never supplies defaults.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AugmentError {
    /// The text provider was unreachable, timed out, or errored.
    #[error("text provider unavailable: {reason}")]
    Unavailable { reason: String },

    /// The provider answered, but the text did not parse as JSON matching
    /// the requested shape.
    #[error("generated output violated the JSON contract: {reason}")]
    SchemaViolation { reason: String },
}

impl AugmentError {
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, AugmentError::SchemaViolation { .. })
    }
}
