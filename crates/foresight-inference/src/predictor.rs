//! The remote ML predictor boundary.

use async_trait::async_trait;
use foresight_core::PredictorError;
use serde::{Deserialize, Serialize};

/// Structured prediction as the remote endpoint returns it, before any
/// clamping or admission checks.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPrediction {
    pub score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub factors: Vec<String>,
}

/// A synchronous request/response ML endpoint accepting a numeric feature
/// vector.
///
/// Implementations make exactly one attempt per call; retries and
/// timeouts are the gateway's concern.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, features: &[f64]) -> Result<RawPrediction, PredictorError>;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: &'a [f64],
}

/// HTTP client for the managed prediction endpoint.
///
/// Speaks `POST {base}/predict` with a JSON feature vector.
#[derive(Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPredictor {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, features: &[f64]) -> Result<RawPrediction, PredictorError> {
        let url = format!("{}/predict", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&PredictRequest { features })
            .send()
            .await
            .map_err(|e| PredictorError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictorError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<RawPrediction>()
            .await
            .map_err(|e| PredictorError::Malformed {
                reason: e.to_string(),
            })
    }
}
