//! The inference gateway: remote predictor with deterministic fallback.

use crate::predictor::{Predictor, RawPrediction};
use foresight_core::{FeatureRecord, Prediction, PredictorSource, ScoringPolicy};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_PREDICTOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Converts a typed feature record into the numeric vector the remote
/// predictor expects, invokes it once under a timeout, and falls back to
/// the policy's deterministic estimator on any failure.
///
/// `predict` never fails: the two paths produce the identical
/// [`Prediction`] shape, distinguished only by [`PredictorSource`]. A
/// half-usable remote payload is thrown away whole rather than patched up;
/// callers only ever see a clean remote answer or a clean fallback.
#[derive(Clone)]
pub struct InferenceGateway {
    predictor: Option<Arc<dyn Predictor>>,
    timeout: Duration,
}

impl InferenceGateway {
    pub fn new(predictor: Arc<dyn Predictor>, timeout: Duration) -> Self {
        Self {
            predictor: Some(predictor),
            timeout,
        }
    }

    /// A gateway with no remote predictor configured; every call runs the
    /// fallback estimator. Used for deployments without a model endpoint
    /// and for deterministic tests.
    pub fn fallback_only() -> Self {
        Self {
            predictor: None,
            timeout: DEFAULT_PREDICTOR_TIMEOUT,
        }
    }

    /// Produce a prediction for `record`, remote if possible, fallback
    /// otherwise. Exactly one remote attempt is made per call.
    pub async fn predict<P: ScoringPolicy>(&self, policy: &P, record: &P::Record) -> Prediction {
        if let Some(predictor) = &self.predictor {
            let features = record.feature_vector();
            match tokio::time::timeout(self.timeout, predictor.predict(&features)).await {
                Ok(Ok(raw)) => {
                    if let Some(prediction) = admit(raw, policy) {
                        return prediction;
                    }
                    tracing::warn!(
                        pipeline = %policy.kind(),
                        entity = %record.entity_id(),
                        "remote prediction was garbled; using fallback estimator"
                    );
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        pipeline = %policy.kind(),
                        entity = %record.entity_id(),
                        error = %err,
                        "remote predictor failed; using fallback estimator"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        pipeline = %policy.kind(),
                        entity = %record.entity_id(),
                        timeout_ms = self.timeout.as_millis() as u64,
                        "remote predictor timed out; using fallback estimator"
                    );
                }
            }
        }
        policy.estimate(record)
    }
}

/// Admit a raw remote payload if its numbers are usable.
///
/// Out-of-range values are clamped (the invariant downstream code relies
/// on); non-finite values mean the payload is garbage and the whole
/// response is discarded.
fn admit<P: ScoringPolicy>(raw: RawPrediction, policy: &P) -> Option<Prediction> {
    if !raw.score.is_finite() || !raw.confidence.is_finite() {
        return None;
    }
    Some(Prediction::new(
        raw.score,
        raw.confidence,
        raw.factors,
        PredictorSource::Remote,
        &policy.value_range(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use foresight_core::{
        Action, EntityId, PipelineKind, PredictorError, ValidationError,
    };
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(serde::Serialize)]
    struct ProbeRecord {
        entity_id: EntityId,
        signal: f64,
    }

    impl FeatureRecord for ProbeRecord {
        fn entity_id(&self) -> &EntityId {
            &self.entity_id
        }

        fn validate(&self) -> Result<(), ValidationError> {
            Ok(())
        }

        fn feature_vector(&self) -> Vec<f64> {
            vec![self.signal]
        }
    }

    struct ProbePolicy;

    impl ScoringPolicy for ProbePolicy {
        type Record = ProbeRecord;
        type Category = &'static str;

        fn kind(&self) -> PipelineKind {
            PipelineKind::Leads
        }

        fn model_version(&self) -> &'static str {
            "0.0.1"
        }

        fn value_range(&self) -> std::ops::RangeInclusive<f64> {
            0.0..=100.0
        }

        fn cache_ttl(&self) -> Duration {
            Duration::from_secs(60)
        }

        fn categorize(&self, _value: f64) -> &'static str {
            "probe"
        }

        fn derive_metrics(
            &self,
            _record: &ProbeRecord,
            _prediction: &Prediction,
        ) -> BTreeMap<String, f64> {
            BTreeMap::new()
        }

        fn identify_factors(&self, _record: &ProbeRecord) -> Vec<String> {
            Vec::new()
        }

        fn rule_actions(&self, _record: &ProbeRecord, _prediction: &Prediction) -> Vec<Action> {
            Vec::new()
        }

        fn fallback_actions(&self) -> Vec<Action> {
            Vec::new()
        }

        fn estimate(&self, record: &ProbeRecord) -> Prediction {
            Prediction::new(
                record.signal,
                0.6,
                vec!["probe fallback".into()],
                PredictorSource::Fallback,
                &self.value_range(),
            )
        }

        fn augment_prompt(&self, _record: &ProbeRecord, _prediction: &Prediction) -> String {
            String::new()
        }
    }

    struct ScriptedPredictor {
        response: Result<RawPrediction, PredictorError>,
        delay: Option<Duration>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Predictor for ScriptedPredictor {
        async fn predict(&self, _features: &[f64]) -> Result<RawPrediction, PredictorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone()
        }
    }

    fn record(signal: f64) -> ProbeRecord {
        ProbeRecord {
            entity_id: EntityId::new("probe-1").unwrap(),
            signal,
        }
    }

    #[tokio::test]
    async fn remote_success_is_tagged_remote_and_clamped() {
        let predictor = Arc::new(ScriptedPredictor {
            response: Ok(RawPrediction {
                score: 250.0,
                confidence: 1.4,
                factors: vec!["remote factor".into()],
            }),
            delay: None,
            calls: AtomicUsize::new(0),
        });
        let gateway = InferenceGateway::new(predictor, Duration::from_secs(1));
        let prediction = gateway.predict(&ProbePolicy, &record(10.0)).await;

        assert_eq!(prediction.source, PredictorSource::Remote);
        assert_eq!(prediction.value, 100.0);
        assert_eq!(prediction.confidence, 1.0);
    }

    #[tokio::test]
    async fn remote_failure_falls_back() {
        let predictor = Arc::new(ScriptedPredictor {
            response: Err(PredictorError::Status { status: 503 }),
            delay: None,
            calls: AtomicUsize::new(0),
        });
        let gateway = InferenceGateway::new(predictor, Duration::from_secs(1));
        let prediction = gateway.predict(&ProbePolicy, &record(42.0)).await;

        assert_eq!(prediction.source, PredictorSource::Fallback);
        assert_eq!(prediction.value, 42.0);
        assert_eq!(prediction.factors, vec!["probe fallback".to_string()]);
    }

    #[tokio::test]
    async fn garbled_remote_payload_is_discarded() {
        let predictor = Arc::new(ScriptedPredictor {
            response: Ok(RawPrediction {
                score: f64::INFINITY,
                confidence: 0.9,
                factors: vec!["half-written".into()],
            }),
            delay: None,
            calls: AtomicUsize::new(0),
        });
        let gateway = InferenceGateway::new(predictor, Duration::from_secs(1));
        let prediction = gateway.predict(&ProbePolicy, &record(7.0)).await;

        // The garbled payload must leave no trace in the fallback result.
        assert_eq!(prediction.source, PredictorSource::Fallback);
        assert!(!prediction.factors.contains(&"half-written".to_string()));
    }

    #[tokio::test]
    async fn timeout_takes_the_fallback_path() {
        let predictor = Arc::new(ScriptedPredictor {
            response: Ok(RawPrediction {
                score: 90.0,
                confidence: 0.9,
                factors: vec![],
            }),
            delay: Some(Duration::from_millis(200)),
            calls: AtomicUsize::new(0),
        });
        let gateway = InferenceGateway::new(predictor, Duration::from_millis(10));
        let prediction = gateway.predict(&ProbePolicy, &record(5.0)).await;

        assert_eq!(prediction.source, PredictorSource::Fallback);
    }

    #[tokio::test]
    async fn fallback_only_gateway_never_calls_remote() {
        let gateway = InferenceGateway::fallback_only();
        let prediction = gateway.predict(&ProbePolicy, &record(33.0)).await;
        assert_eq!(prediction.source, PredictorSource::Fallback);
        assert_eq!(prediction.value, 33.0);
    }

    #[tokio::test]
    async fn exactly_one_remote_attempt_per_call() {
        let predictor = Arc::new(ScriptedPredictor {
            response: Err(PredictorError::Transport {
                reason: "connection refused".into(),
            }),
            delay: None,
            calls: AtomicUsize::new(0),
        });
        let gateway = InferenceGateway::new(predictor.clone(), Duration::from_secs(1));
        gateway.predict(&ProbePolicy, &record(1.0)).await;
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
    }
}
