//! Tenant extraction from the out-of-band header.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use foresight_core::TenantId;

/// Header every request must carry to scope it to a tenant.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Extractor for the validated tenant id.
///
/// Rejects with 400 when the header is absent, unreadable, or fails
/// identifier validation; no pipeline work happens for such requests.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantId);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or(ApiError::MissingTenant)?
            .to_str()
            .map_err(|_| ApiError::InvalidTenant {
                reason: "header is not valid UTF-8".to_string(),
            })?;
        TenantId::new(raw)
            .map(Tenant)
            .map_err(|e| ApiError::InvalidTenant {
                reason: e.to_string(),
            })
    }
}
