//! Validated tenant and entity identifiers.
//!
//! Every scoring request is scoped to a tenant and targets one entity
//! (a lead, an account, a campaign, a content brief). Both identifiers are
//! newtypes over `String` that can only be constructed through validation,
//! so cache keys and storage rows can never be built from malformed input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length in characters.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Errors that can occur when constructing a validated identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidIdentifier {
    /// Identifier is empty or contains only whitespace.
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    /// Identifier exceeds the maximum allowed length.
    #[error("{what} too long: {length} characters (max {MAX_IDENTIFIER_LENGTH})")]
    TooLong { what: &'static str, length: usize },
    /// Identifier contains characters outside `[A-Za-z0-9._-]`.
    #[error("{what} contains invalid characters: '{value}'")]
    InvalidChars { what: &'static str, value: String },
}

fn validate(raw: &str, what: &'static str) -> Result<String, InvalidIdentifier> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidIdentifier::Empty(what));
    }
    if trimmed.len() > MAX_IDENTIFIER_LENGTH {
        return Err(InvalidIdentifier::TooLong {
            what,
            length: trimmed.len(),
        });
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(InvalidIdentifier::InvalidChars {
            what,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident, $what:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated identifier.
            ///
            /// Identifiers must be non-empty, at most 64 characters, and
            /// contain only alphanumerics, underscores, hyphens, and dots.
            pub fn new(raw: &str) -> Result<Self, InvalidIdentifier> {
                validate(raw, $what).map(Self)
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidIdentifier;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::new(&raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

identifier!(
    /// Identifier of the tenant a request is scoped to.
    ///
    /// Passed out-of-band on every API call and woven into cache keys and
    /// persisted rows; no cross-tenant data path exists without it.
    TenantId,
    "tenant id"
);

identifier!(
    /// Identifier of the entity being scored within a tenant.
    EntityId,
    "entity id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_reasonable_identifiers() {
        assert!(TenantId::new("acme-corp").is_ok());
        assert!(TenantId::new("tenant_42").is_ok());
        assert!(EntityId::new("lead.2024.001").is_ok());
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let id = TenantId::new("  acme  ").unwrap();
        assert_eq!(id.as_str(), "acme");
    }

    #[test]
    fn rejects_empty_and_whitespace() {
        assert_eq!(
            TenantId::new(""),
            Err(InvalidIdentifier::Empty("tenant id"))
        );
        assert_eq!(
            TenantId::new("   "),
            Err(InvalidIdentifier::Empty("tenant id"))
        );
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(TenantId::new("acme corp").is_err());
        assert!(TenantId::new("acme/../etc").is_err());
        assert!(EntityId::new("lead:7").is_err());
    }

    #[test]
    fn rejects_overlong_identifiers() {
        let long = "a".repeat(65);
        assert!(matches!(
            EntityId::new(&long),
            Err(InvalidIdentifier::TooLong { length: 65, .. })
        ));
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let ok: Result<TenantId, _> = serde_json::from_str("\"acme\"");
        assert!(ok.is_ok());
        let bad: Result<TenantId, _> = serde_json::from_str("\"not a tenant\"");
        assert!(bad.is_err());
    }
}
