//! Tenant-scoped cache key construction.

use crate::identifiers::{EntityId, TenantId};
use crate::pipeline_kind::PipelineKind;
use std::fmt;

/// A fully-qualified cache key: pipeline, tenant, entity, and the request
/// fingerprint. Keys are only buildable from validated parts, so tenant
/// isolation cannot be bypassed by string assembly at call sites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(
        pipeline: PipelineKind,
        tenant: &TenantId,
        entity: &EntityId,
        fingerprint: u64,
    ) -> Self {
        CacheKey(format!(
            "foresight:{}:{}:{}:{:016x}",
            pipeline.as_str(),
            tenant.as_str(),
            entity.as_str(),
            fingerprint
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_contains_every_scope_component() {
        let tenant = TenantId::new("acme").unwrap();
        let entity = EntityId::new("lead-7").unwrap();
        let key = CacheKey::new(PipelineKind::Leads, &tenant, &entity, 0xabcd);
        assert_eq!(key.as_str(), "foresight:leads:acme:lead-7:000000000000abcd");
    }

    #[test]
    fn different_fingerprints_yield_different_keys() {
        let tenant = TenantId::new("acme").unwrap();
        let entity = EntityId::new("lead-7").unwrap();
        let a = CacheKey::new(PipelineKind::Leads, &tenant, &entity, 1);
        let b = CacheKey::new(PipelineKind::Leads, &tenant, &entity, 2);
        assert_ne!(a, b);
    }
}
