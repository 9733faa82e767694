//! End-to-end pipeline behavior against mock providers and stores.

use foresight_core::{ActionSource, EntityId, PipelineError, PredictorSource, TenantId};
use foresight_inference::{GenerativeAugmenter, InferenceGateway};
use foresight_memory::{CacheGateway, InMemoryCache, InMemorySink};
use foresight_pipeline::ScoringPipeline;
use foresight_policy::{ChurnFeatures, ChurnPolicy};
use foresight_testing::{BrokenCache, FailingSink, MockPredictor, MockTextProvider};
use std::sync::Arc;
use std::time::Duration;

const SUGGESTIONS: &str = r#"[
    {"kind": "offer_discount", "description": "Offer a loyalty discount", "priority": 2,
     "expectedImpact": "high", "effort": "low"}
]"#;

fn tenant() -> TenantId {
    TenantId::new("acme").unwrap()
}

fn churn_features(entity: &str) -> ChurnFeatures {
    ChurnFeatures {
        entity_id: EntityId::new(entity).unwrap(),
        contract_value: 1000.0,
        last_login_days: 20,
        support_tickets: 6,
        feature_adoption: 25.0,
        nps_score: 3.0,
        engagement_trend: -0.3,
        payment_issues: 1,
        tenure_months: 24,
    }
}

struct Harness {
    predictor: Arc<MockPredictor>,
    provider: Arc<MockTextProvider>,
    sink: InMemorySink,
    pipeline: ScoringPipeline<ChurnPolicy>,
}

fn harness(predictor: MockPredictor, provider: MockTextProvider) -> Harness {
    let predictor = Arc::new(predictor);
    let provider = Arc::new(provider);
    let sink = InMemorySink::new();
    let pipeline = ScoringPipeline::new(
        ChurnPolicy::new(),
        InferenceGateway::new(predictor.clone(), Duration::from_secs(1)),
        Some(GenerativeAugmenter::new(provider.clone())),
        CacheGateway::new(Arc::new(InMemoryCache::new())),
        Arc::new(sink.clone()),
    );
    Harness {
        predictor,
        provider,
        sink,
        pipeline,
    }
}

#[tokio::test]
async fn cached_result_is_byte_identical_and_skips_providers() {
    let h = harness(
        MockPredictor::returning(0.42, 0.9),
        MockTextProvider::returning(SUGGESTIONS),
    );

    let first = h
        .pipeline
        .score(&tenant(), churn_features("acct-1"))
        .await
        .unwrap();
    let second = h
        .pipeline
        .score(&tenant(), churn_features("acct-1"))
        .await
        .unwrap();

    assert!(!first.cache_hit);
    assert!(second.cache_hit);
    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
    // Zero additional provider calls and no second audit row.
    assert_eq!(h.predictor.call_count(), 1);
    assert_eq!(h.provider.call_count(), 1);
    assert_eq!(h.sink.len(), 1);
}

#[tokio::test]
async fn different_inputs_do_not_share_cache_entries() {
    let h = harness(
        MockPredictor::returning(0.42, 0.9),
        MockTextProvider::returning(SUGGESTIONS),
    );

    h.pipeline
        .score(&tenant(), churn_features("acct-1"))
        .await
        .unwrap();
    let mut changed = churn_features("acct-1");
    changed.support_tickets = 9;
    let second = h.pipeline.score(&tenant(), changed).await.unwrap();

    assert!(!second.cache_hit);
    assert_eq!(h.predictor.call_count(), 2);
}

#[tokio::test]
async fn fallback_parity_produces_complete_result() {
    let sink = InMemorySink::new();
    let pipeline = ScoringPipeline::new(
        ChurnPolicy::new(),
        InferenceGateway::fallback_only(),
        None,
        CacheGateway::new(Arc::new(InMemoryCache::new())),
        Arc::new(sink.clone()),
    );

    let run = pipeline
        .score(&tenant(), churn_features("acct-2"))
        .await
        .unwrap();
    let result = &run.result;

    assert_eq!(result.prediction.source, PredictorSource::Fallback);
    assert!(matches!(result.category.as_str(), "high" | "critical"));
    assert!(result.prediction.confidence >= 0.0 && result.prediction.confidence <= 1.0);
    assert!(!result.recommended_actions.is_empty());
    assert!(result.derived_metrics.contains_key("revenue_at_risk"));
    assert_eq!(result.model_version, "1.0.0");
    assert_eq!(sink.len(), 1);
}

#[tokio::test]
async fn schema_violation_substitutes_static_fallback_actions() {
    let h = harness(
        MockPredictor::returning(0.42, 0.9),
        MockTextProvider::returning("not json"),
    );

    let run = h
        .pipeline
        .score(&tenant(), churn_features("acct-3"))
        .await
        .unwrap();

    assert!(run.degraded);
    assert!(
        run.result
            .recommended_actions
            .iter()
            .all(|a| a.source == ActionSource::Rule),
        "no generative action may survive a schema violation"
    );
    assert!(
        run.result
            .recommended_actions
            .iter()
            .any(|a| a.kind == "success_call" || a.kind == "usage_review"),
        "the documented static fallback list must appear"
    );
}

#[tokio::test]
async fn generative_suggestions_are_merged_and_ranked() {
    let h = harness(
        MockPredictor::returning(0.42, 0.9),
        MockTextProvider::returning(SUGGESTIONS),
    );

    let run = h
        .pipeline
        .score(&tenant(), churn_features("acct-4"))
        .await
        .unwrap();
    let actions = &run.result.recommended_actions;

    assert!(!run.degraded);
    assert!(actions.len() <= 5);
    assert!(actions.iter().any(|a| a.kind == "offer_discount"
        && a.source == ActionSource::Generative));
    // Ranking invariant: priorities never decrease.
    assert!(actions.windows(2).all(|w| w[0].priority <= w[1].priority));
}

#[tokio::test]
async fn persistence_failure_fails_the_single_entity_call() {
    let pipeline = ScoringPipeline::new(
        ChurnPolicy::new(),
        InferenceGateway::fallback_only(),
        None,
        CacheGateway::new(Arc::new(InMemoryCache::new())),
        Arc::new(FailingSink),
    );

    let err = pipeline
        .score(&tenant(), churn_features("acct-5"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Persistence { .. }));
}

#[tokio::test]
async fn unpersisted_results_are_not_served_from_cache() {
    let cache = Arc::new(InMemoryCache::new());
    let pipeline = ScoringPipeline::new(
        ChurnPolicy::new(),
        InferenceGateway::fallback_only(),
        None,
        CacheGateway::new(cache),
        Arc::new(FailingSink),
    );

    let _ = pipeline.score(&tenant(), churn_features("acct-6")).await;
    // A retry must not cache-hit a result that never reached the sink.
    let err = pipeline
        .score(&tenant(), churn_features("acct-6"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Persistence { .. }));
}

#[tokio::test]
async fn cache_outage_never_fails_the_pipeline() {
    let predictor = Arc::new(MockPredictor::returning(0.42, 0.9));
    let sink = InMemorySink::new();
    let pipeline = ScoringPipeline::new(
        ChurnPolicy::new(),
        InferenceGateway::new(predictor.clone(), Duration::from_secs(1)),
        None,
        CacheGateway::new(Arc::new(BrokenCache)),
        Arc::new(sink.clone()),
    );

    for _ in 0..2 {
        let run = pipeline
            .score(&tenant(), churn_features("acct-7"))
            .await
            .unwrap();
        assert!(!run.cache_hit);
    }
    // Every call recomputed: the outage only costs latency.
    assert_eq!(predictor.call_count(), 2);
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn history_returns_persisted_results_newest_first() {
    let h = harness(
        MockPredictor::returning(0.42, 0.9),
        MockTextProvider::returning(SUGGESTIONS),
    );

    h.pipeline
        .score(&tenant(), churn_features("acct-8"))
        .await
        .unwrap();
    let mut changed = churn_features("acct-8");
    changed.last_login_days = 40;
    let newest = h.pipeline.score(&tenant(), changed).await.unwrap();

    let entity = EntityId::new("acct-8").unwrap();
    let history = h.pipeline.history(&tenant(), &entity, 10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, newest.result.id);
}
