//! Chunked batch fan-out over the single-entity pipeline.

use crate::pipeline::{PersistMode, PipelineRun, ScoringPipeline};
use foresight_core::{
    BatchResult, BatchSummary, FeatureRecord, PipelineError, ScoredResult, ScoringPolicy, TenantId,
};
use std::time::Instant;

/// Default concurrency ceiling for batch requests.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 10;

impl<P: ScoringPolicy> ScoringPipeline<P> {
    /// Score a list of entities with bounded intra-request parallelism.
    ///
    /// The input is processed in fixed-size chunks of `concurrency`
    /// entities, and a chunk must finish entirely before the next one
    /// starts. Chunks never overlap, so the number of in-flight
    /// single-entity pipelines can never exceed `concurrency`.
    ///
    /// Result order equals input order regardless of completion order
    /// within a chunk. All records are validated up front; the first
    /// invalid one rejects the whole batch with its index. Per-entity
    /// augmentation or persistence failures degrade that entity and are
    /// counted in the summary rather than aborting the batch.
    pub async fn score_batch(
        &self,
        tenant: &TenantId,
        records: Vec<P::Record>,
        concurrency: usize,
    ) -> Result<BatchResult, PipelineError> {
        let started = Instant::now();

        for (index, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|source| PipelineError::BatchItem { index, source })?;
        }

        let concurrency = concurrency.max(1);
        let mut runs: Vec<PipelineRun> = Vec::with_capacity(records.len());
        for chunk in records.chunks(concurrency) {
            let outcomes = futures::future::join_all(
                chunk
                    .iter()
                    .map(|record| self.execute(tenant, record, PersistMode::Lenient)),
            )
            .await;
            for outcome in outcomes {
                runs.push(outcome?);
            }
        }

        let cache_hits = runs.iter().filter(|r| r.cache_hit).count();
        let degraded = runs.iter().filter(|r| r.degraded).count();
        let results: Vec<ScoredResult> = runs.into_iter().map(|r| r.result).collect();
        let summary = BatchSummary::collect(&results, cache_hits, degraded);

        Ok(BatchResult {
            results,
            summary,
            processing_time_ms: started.elapsed().as_millis() as u64,
        })
    }
}
