//! The `FeatureRecord` trait implemented by each domain's input shape.

use crate::error::ValidationError;
use crate::identifiers::EntityId;
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Stable fingerprint of a serializable value, used in cache keys so two
/// requests with different inputs for the same entity never share an entry.
pub fn fingerprint_of<T: Serialize + ?Sized>(value: &T) -> u64 {
    let encoded = serde_json::to_vec(value).unwrap_or_default();
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    encoded.hash(&mut hasher);
    hasher.finish()
}

/// A normalized bag of input attributes for one scoring request.
///
/// Records are immutable once constructed and owned exclusively by the
/// request that created them. `validate` runs before any pipeline work;
/// a record that fails validation never reaches inference.
pub trait FeatureRecord: Serialize + Send + Sync {
    /// The entity this record describes, unique within the tenant.
    fn entity_id(&self) -> &EntityId;

    /// Check domain invariants (ranges, finiteness, required fields).
    fn validate(&self) -> Result<(), ValidationError>;

    /// Encode the record as the numeric vector the remote predictor expects.
    ///
    /// The encoding order is a fixed per-domain contract with the deployed
    /// model and must not change without a model version bump.
    fn feature_vector(&self) -> Vec<f64>;

    /// Stable fingerprint over the validated inputs, part of the cache key.
    fn fingerprint(&self) -> u64 {
        fingerprint_of(self)
    }
}

/// Reject a non-finite float during validation.
pub fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

/// Reject a float outside an inclusive range during validation.
pub fn require_in_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_for_equal_inputs() {
        #[derive(Serialize)]
        struct Probe {
            a: u32,
            b: &'static str,
        }
        let x = Probe { a: 1, b: "x" };
        let y = Probe { a: 1, b: "x" };
        assert_eq!(fingerprint_of(&x), fingerprint_of(&y));
        let z = Probe { a: 2, b: "x" };
        assert_ne!(fingerprint_of(&x), fingerprint_of(&z));
    }

    #[test]
    fn range_check_reports_bounds() {
        assert!(require_in_range("nps", 7.0, 0.0, 10.0).is_ok());
        let err = require_in_range("nps", 11.0, 0.0, 10.0).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "nps", .. }));
        assert!(require_in_range("nps", f64::NAN, 0.0, 10.0).is_err());
    }
}
