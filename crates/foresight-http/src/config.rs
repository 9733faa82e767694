//! Server configuration and state bootstrap.
//!
//! Every backend degrades gracefully when unconfigured: no Redis URL means
//! an in-process cache, no database path means an in-memory sink, no
//! predictor URL means fallback-only inference, and no generative URL
//! disables augmentation. A bare `foresight-server` therefore runs fully
//! self-contained, which is also how the test suites drive it.

use crate::state::AppState;
use foresight_core::{CacheError, StoreError};
use foresight_inference::{
    GenerativeAugmenter, HttpPredictor, HttpTextProvider, InferenceGateway,
};
use foresight_memory::{
    CacheGateway, CacheStore, InMemoryCache, InMemorySink, PersistenceSink, RedisCache, SqliteSink,
};
use foresight_pipeline::ScoringPipeline;
use foresight_policy::{CampaignPolicy, ChurnPolicy, ContentPolicy, ExpansionPolicy, LeadPolicy};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runtime configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Redis URL for the result cache; in-process cache when absent.
    pub redis_url: Option<String>,
    /// SQLite database path for the audit trail; in-memory when absent.
    pub database_path: Option<PathBuf>,
    /// Base URL of the remote ML predictor; fallback-only when absent.
    pub predictor_url: Option<String>,
    /// Base URL of the text-completion provider; augmentation is skipped
    /// when absent.
    pub generative_url: Option<String>,
    pub predictor_timeout: Duration,
    pub generative_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            redis_url: None,
            database_path: None,
            predictor_url: None,
            generative_url: None,
            predictor_timeout: Duration::from_secs(5),
            generative_timeout: Duration::from_secs(10),
        }
    }
}

/// Startup failed before the server could bind.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("cache backend setup failed: {0}")]
    Cache(#[from] CacheError),

    #[error("persistence backend setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("outbound HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Construct the five domain pipelines over shared backends.
pub fn build_state(config: &ServerConfig) -> Result<AppState, BootstrapError> {
    let cache_store: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisCache::new(url)?),
        None => Arc::new(InMemoryCache::new()),
    };
    let cache = CacheGateway::new(cache_store);

    let sink: Arc<dyn PersistenceSink> = match &config.database_path {
        Some(path) => Arc::new(SqliteSink::open(path)?),
        None => Arc::new(InMemorySink::new()),
    };

    let client = reqwest::Client::builder().build()?;

    let inference = match &config.predictor_url {
        Some(url) => InferenceGateway::new(
            Arc::new(HttpPredictor::new(client.clone(), url.clone())),
            config.predictor_timeout,
        ),
        None => InferenceGateway::fallback_only(),
    };

    let augmenter = config.generative_url.as_ref().map(|url| {
        GenerativeAugmenter::new(Arc::new(HttpTextProvider::new(client.clone(), url.clone())))
            .with_timeout(config.generative_timeout)
    });

    Ok(AppState {
        leads: Arc::new(ScoringPipeline::new(
            LeadPolicy::new(),
            inference.clone(),
            augmenter.clone(),
            cache.clone(),
            sink.clone(),
        )),
        churn: Arc::new(ScoringPipeline::new(
            ChurnPolicy::new(),
            inference.clone(),
            augmenter.clone(),
            cache.clone(),
            sink.clone(),
        )),
        expansion: Arc::new(ScoringPipeline::new(
            ExpansionPolicy::new(),
            inference.clone(),
            augmenter.clone(),
            cache.clone(),
            sink.clone(),
        )),
        campaigns: Arc::new(ScoringPipeline::new(
            CampaignPolicy::new(),
            inference.clone(),
            augmenter.clone(),
            cache.clone(),
            sink.clone(),
        )),
        content: Arc::new(ScoringPipeline::new(
            ContentPolicy::new(),
            inference,
            augmenter,
            cache,
            sink,
        )),
        started_at: Instant::now(),
    })
}
