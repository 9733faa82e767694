//! The single-entity scoring pipeline.

use chrono::Utc;
use foresight_core::{
    ActionSuggestion, CacheKey, EntityId, FeatureRecord, PipelineError, ScoredResult,
    ScoringPolicy, TenantId,
};
use foresight_inference::{GenerativeAugmenter, InferenceGateway};
use foresight_memory::{CacheGateway, PersistenceSink};
use std::sync::Arc;
use uuid::Uuid;

/// How a persistence failure is handled.
///
/// Single-entity calls fail loud: the audit trail is part of the contract,
/// so a result that cannot be recorded is an error, not a silent success.
/// Batch calls isolate the failure to the affected entity instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PersistMode {
    Strict,
    Lenient,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub result: ScoredResult,
    /// The result came straight from cache; no provider was touched.
    pub cache_hit: bool,
    /// Augmentation or (in batch mode) persistence failed; the action list
    /// degraded to the rule-based subset.
    pub degraded: bool,
}

/// Composes one domain's scoring flow: cache lookup, inference with
/// fallback, pure policy scoring, best-effort augmentation, append-only
/// persistence, best-effort cache write.
///
/// No state is shared between calls except the cache and the sink, both
/// externally synchronized. No stage re-enters an earlier one and nothing
/// retries; retry is the caller's decision.
pub struct ScoringPipeline<P: ScoringPolicy> {
    policy: P,
    inference: InferenceGateway,
    augmenter: Option<GenerativeAugmenter>,
    cache: CacheGateway,
    sink: Arc<dyn PersistenceSink>,
}

impl<P: ScoringPolicy> ScoringPipeline<P> {
    pub fn new(
        policy: P,
        inference: InferenceGateway,
        augmenter: Option<GenerativeAugmenter>,
        cache: CacheGateway,
        sink: Arc<dyn PersistenceSink>,
    ) -> Self {
        Self {
            policy,
            inference,
            augmenter,
            cache,
            sink,
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Score one entity. Validation happens before any pipeline work; a
    /// persistence failure fails the call.
    pub async fn score(
        &self,
        tenant: &TenantId,
        record: P::Record,
    ) -> Result<PipelineRun, PipelineError> {
        record.validate()?;
        self.execute(tenant, &record, PersistMode::Strict).await
    }

    /// Most recent persisted results for one tenant+entity, newest first.
    pub async fn history(
        &self,
        tenant: &TenantId,
        entity: &EntityId,
        limit: usize,
    ) -> Result<Vec<ScoredResult>, PipelineError> {
        Ok(self
            .sink
            .history(self.policy.kind(), tenant, entity, limit)
            .await?)
    }

    pub(crate) async fn execute(
        &self,
        tenant: &TenantId,
        record: &P::Record,
        mode: PersistMode,
    ) -> Result<PipelineRun, PipelineError> {
        let key = CacheKey::new(
            self.policy.kind(),
            tenant,
            record.entity_id(),
            record.fingerprint(),
        );

        if let Some(result) = self.cache.lookup(&key).await {
            tracing::debug!(pipeline = %self.policy.kind(), key = %key, "cache hit");
            return Ok(PipelineRun {
                result,
                cache_hit: true,
                degraded: false,
            });
        }

        let mut prediction = self.inference.predict(&self.policy, record).await;
        for factor in self.policy.identify_factors(record) {
            if !prediction.factors.contains(&factor) {
                prediction.factors.push(factor);
            }
        }

        let category = self.policy.categorize(prediction.value).to_string();
        let derived_metrics = self.policy.derive_metrics(record, &prediction);
        let mut candidates = self.policy.rule_actions(record, &prediction);

        let mut degraded = false;
        if let Some(augmenter) = &self.augmenter {
            let prompt = self.policy.augment_prompt(record, &prediction);
            match augmenter
                .generate_structured::<Vec<ActionSuggestion>>(
                    &prompt,
                    self.policy.augment_schema_hint(),
                    self.policy.augment_max_tokens(),
                )
                .await
            {
                Ok(suggestions) => {
                    candidates.extend(suggestions.into_iter().map(ActionSuggestion::into_action));
                }
                Err(err) => {
                    degraded = true;
                    tracing::warn!(
                        pipeline = %self.policy.kind(),
                        entity = %record.entity_id(),
                        error = %err,
                        "augmentation failed; substituting static fallback actions"
                    );
                    candidates.extend(self.policy.fallback_actions());
                }
            }
        }

        let result = ScoredResult {
            id: Uuid::new_v4(),
            pipeline: self.policy.kind(),
            tenant_id: tenant.clone(),
            entity_id: record.entity_id().clone(),
            prediction,
            category,
            derived_metrics,
            recommended_actions: self.policy.rank_actions(candidates),
            model_version: self.policy.model_version().to_string(),
            computed_at: Utc::now(),
        };

        let mut persisted = true;
        if let Err(err) = self.sink.insert(&result).await {
            match mode {
                PersistMode::Strict => return Err(PipelineError::Persistence { source: err }),
                PersistMode::Lenient => {
                    persisted = false;
                    degraded = true;
                    tracing::warn!(
                        pipeline = %self.policy.kind(),
                        entity = %record.entity_id(),
                        error = %err,
                        "persistence failed for batch entity; continuing"
                    );
                }
            }
        }

        // A result absent from the audit trail must not be served from
        // cache either.
        if persisted {
            self.cache
                .record(&key, &result, self.policy.cache_ttl())
                .await;
        }

        Ok(PipelineRun {
            result,
            cache_hit: false,
            degraded,
        })
    }
}
