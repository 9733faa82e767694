//! API error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foresight_core::PipelineError;
use serde::Serialize;

/// Structured error body returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors surfaced by the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("the X-Tenant-Id header is required")]
    MissingTenant,

    #[error("invalid tenant id: {reason}")]
    InvalidTenant { reason: String },

    #[error("invalid entity id: {reason}")]
    InvalidEntity { reason: String },

    #[error("validation failed on field '{field}': {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("entity at index {index} failed validation on field '{field}': {message}")]
    BatchValidation {
        index: usize,
        field: &'static str,
        message: String,
    },

    /// The result was computed but could not be durably recorded; the
    /// client must treat the scoring event as not persisted.
    #[error("scoring event could not be persisted")]
    Persistence { message: String },
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingTenant
            | ApiError::InvalidTenant { .. }
            | ApiError::InvalidEntity { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } | ApiError::BatchValidation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingTenant => "missing_tenant",
            ApiError::InvalidTenant { .. } => "invalid_tenant",
            ApiError::InvalidEntity { .. } => "invalid_entity",
            ApiError::Validation { .. } => "validation_failed",
            ApiError::BatchValidation { .. } => "batch_validation_failed",
            ApiError::Persistence { .. } => "persistence_failure",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Validation { field, .. } => {
                Some(serde_json::json!({ "field": field }))
            }
            ApiError::BatchValidation { index, field, .. } => {
                Some(serde_json::json!({ "index": index, "field": field }))
            }
            _ => None,
        }
    }

    fn message(&self) -> String {
        match self {
            // The computed result is not silently dropped; the client is
            // told the record may not be durable and may retry.
            ApiError::Persistence { .. } => {
                "The scoring result could not be durably recorded. Retry the request.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(source) => ApiError::Validation {
                field: source.field(),
                message: source.to_string(),
            },
            PipelineError::BatchItem { index, source } => ApiError::BatchValidation {
                index,
                field: source.field(),
                message: source.to_string(),
            },
            PipelineError::Persistence { source } => ApiError::Persistence {
                message: source.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error_code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(error_code = self.error_code(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.message(),
            details: self.details(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foresight_core::{StoreError, ValidationError};

    #[test]
    fn validation_maps_to_unprocessable_entity() {
        let err: ApiError =
            PipelineError::Validation(ValidationError::NonFinite { field: "budget" }).into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "validation_failed");
    }

    #[test]
    fn persistence_maps_to_server_error_with_retry_hint() {
        let err: ApiError = PipelineError::Persistence {
            source: StoreError::Unavailable {
                reason: "disk full".into(),
            },
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("Retry"));
        // Backend detail stays out of the client-facing message.
        assert!(!err.message().contains("disk full"));
    }
}
