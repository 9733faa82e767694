//! # Foresight Testing
//!
//! Mock implementations of the provider and storage boundaries, with call
//! counting and in-flight instrumentation, for controlled pipeline tests.

use async_trait::async_trait;
use foresight_core::{
    CacheError, EntityId, PipelineKind, PredictorError, ScoredResult, StoreError, TenantId,
};
use foresight_inference::{CompletionRequest, Predictor, ProviderError, RawPrediction, TextProvider};
use foresight_memory::{CacheStore, PersistenceSink};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A predictor that returns a scripted response and records how it was
/// driven: total calls, and the maximum number of concurrently in-flight
/// calls (for concurrency-ceiling assertions).
pub struct MockPredictor {
    response: Result<RawPrediction, PredictorError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockPredictor {
    /// Always answer with the given score and confidence.
    pub fn returning(score: f64, confidence: f64) -> Self {
        Self {
            response: Ok(RawPrediction {
                score,
                confidence,
                factors: vec!["model signal".to_string()],
            }),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Always fail, forcing the fallback estimator.
    pub fn failing() -> Self {
        Self {
            response: Err(PredictorError::Transport {
                reason: "mock predictor disabled".to_string(),
            }),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Hold each call open for `delay`, making concurrency observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in flight simultaneously.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn predict(&self, _features: &[f64]) -> Result<RawPrediction, PredictorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// A text provider that pops scripted responses, then falls back to a
/// default. Counts calls so tests can assert the augmenter was (not)
/// invoked.
pub struct MockTextProvider {
    scripted: Mutex<VecDeque<Result<String, ProviderError>>>,
    default: Result<String, ProviderError>,
    calls: AtomicUsize,
}

impl MockTextProvider {
    /// Always answer with the given text.
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default: Ok(text.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail at the transport level.
    pub fn failing() -> Self {
        Self {
            scripted: Mutex::new(VecDeque::new()),
            default: Err(ProviderError::Transport {
                reason: "mock provider disabled".to_string(),
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a response consumed before the default kicks in.
    pub fn push_response(&self, response: Result<String, ProviderError>) {
        self.scripted
            .lock()
            .expect("mock provider lock")
            .push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.scripted.lock().expect("mock provider lock").pop_front();
        scripted.unwrap_or_else(|| self.default.clone())
    }
}

/// A persistence sink that rejects every operation, for fail-loud tests.
pub struct FailingSink;

#[async_trait]
impl PersistenceSink for FailingSink {
    async fn insert(&self, _result: &ScoredResult) -> Result<(), StoreError> {
        Err(StoreError::Unavailable {
            reason: "mock sink offline".to_string(),
        })
    }

    async fn history(
        &self,
        _pipeline: PipelineKind,
        _tenant: &TenantId,
        _entity: &EntityId,
        _limit: usize,
    ) -> Result<Vec<ScoredResult>, StoreError> {
        Err(StoreError::Unavailable {
            reason: "mock sink offline".to_string(),
        })
    }
}

/// A cache store that fails every read and write, simulating an outage.
pub struct BrokenCache;

#[async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable {
            reason: "mock cache offline".to_string(),
        })
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable {
            reason: "mock cache offline".to_string(),
        })
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable {
            reason: "mock cache offline".to_string(),
        })
    }
}
