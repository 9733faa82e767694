//! Cache and persistence backend errors.

use uuid::Uuid;

/// A cache store operation failed.
///
/// Cache errors never propagate out of the cache gateway; they are logged
/// and degrade the call to the cache-miss path.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("cache {operation} failed for key '{key}': {reason}")]
    OperationFailed {
        operation: &'static str,
        key: String,
        reason: String,
    },
}

/// A persistence sink operation failed.
///
/// Unlike cache errors these are surfaced: the audit trail is part of the
/// contract, and the caller must learn the record may not be durable.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("persistence backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("failed to insert scoring event {id}: {reason}")]
    InsertFailed { id: Uuid, reason: String },

    #[error("history query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("stored payload could not be decoded: {reason}")]
    Corrupt { reason: String },
}
