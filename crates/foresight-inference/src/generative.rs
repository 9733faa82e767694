//! Generative augmentation with an enforced JSON contract.
//!
//! The text provider is an untrusted, schema-less boundary. Every call
//! demands "JSON only" up front and runs at low temperature to bias
//! toward well-formed output, but neither measure removes the need to
//! parse defensively: malformed output stays an expected, typed outcome.

use async_trait::async_trait;
use foresight_core::AugmentError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Sampling temperature biasing the provider toward deterministic,
/// well-formed output.
const AUGMENT_TEMPERATURE: f64 = 0.2;

const DEFAULT_AUGMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// System instruction prepended to every augmentation prompt.
const JSON_ONLY_PREAMBLE: &str = "You are a structured generation engine. \
Respond with JSON only: no prose, no Markdown fences, no commentary.";

/// One stateless completion request. No conversation memory is kept
/// between calls.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// The text-completion provider could not return text.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    #[error("provider returned status {status}")]
    Status { status: u16 },

    #[error("provider payload was malformed: {reason}")]
    Malformed { reason: String },
}

/// A remote text-completion endpoint.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    text: String,
}

/// HTTP client for the text-completion endpoint.
///
/// Speaks `POST {base}/complete` with prompt and sampling parameters.
#[derive(Clone)]
pub struct HttpTextProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTextProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TextProvider for HttpTextProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError> {
        let url = format!("{}/complete", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<CompletionResponse>()
            .await
            .map(|body| body.text)
            .map_err(|e| ProviderError::Malformed {
                reason: e.to_string(),
            })
    }
}

/// Invokes the text provider with a JSON-schema contract and parses the
/// result into a typed value.
///
/// Fails with [`AugmentError::SchemaViolation`] when the raw text does not
/// parse as JSON matching the requested shape. Callers must catch this and
/// substitute their fallback value; the augmenter itself never supplies
/// defaults.
#[derive(Clone)]
pub struct GenerativeAugmenter {
    provider: Arc<dyn TextProvider>,
    timeout: Duration,
}

impl GenerativeAugmenter {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_AUGMENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Generate a value of type `T` from the provider.
    ///
    /// Exactly one attempt is made. On cancellation or timeout the
    /// in-flight call is abandoned and reported as unavailable.
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema_hint: &str,
        max_tokens: u32,
    ) -> Result<T, AugmentError> {
        let request = CompletionRequest {
            prompt: format!(
                "{JSON_ONLY_PREAMBLE}\nThe JSON must match this shape: {schema_hint}\n\n{prompt}"
            ),
            max_tokens,
            temperature: AUGMENT_TEMPERATURE,
        };

        let raw = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| AugmentError::Unavailable {
                reason: format!("text provider timed out after {:?}", self.timeout),
            })?
            .map_err(|e| AugmentError::Unavailable {
                reason: e.to_string(),
            })?;

        let cleaned = strip_code_fences(&raw);
        serde_json::from_str(cleaned).map_err(|e| AugmentError::SchemaViolation {
            reason: e.to_string(),
        })
    }
}

/// Providers occasionally wrap JSON in Markdown fences despite the
/// instruction not to; stripping them is cheap and loses nothing.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedProvider {
        responses: Mutex<Vec<Result<String, ProviderError>>>,
    }

    impl ScriptedProvider {
        fn returning(text: &str) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(vec![Ok(text.to_string())]),
            })
        }
    }

    #[async_trait]
    impl TextProvider for ScriptedProvider {
        async fn complete(&self, _request: CompletionRequest) -> Result<String, ProviderError> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok("[]".to_string()))
        }
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Keyword {
        term: String,
    }

    #[tokio::test]
    async fn parses_well_formed_json() {
        let augmenter =
            GenerativeAugmenter::new(ScriptedProvider::returning(r#"[{"term": "crm"}]"#));
        let keywords: Vec<Keyword> = augmenter
            .generate_structured("keywords", "[{\"term\": \"string\"}]", 128)
            .await
            .unwrap();
        assert_eq!(keywords, vec![Keyword { term: "crm".into() }]);
    }

    #[tokio::test]
    async fn tolerates_markdown_fences() {
        let augmenter = GenerativeAugmenter::new(ScriptedProvider::returning(
            "```json\n[{\"term\": \"crm\"}]\n```",
        ));
        let keywords: Vec<Keyword> = augmenter
            .generate_structured("keywords", "[{\"term\": \"string\"}]", 128)
            .await
            .unwrap();
        assert_eq!(keywords.len(), 1);
    }

    #[tokio::test]
    async fn prose_is_a_schema_violation() {
        let augmenter = GenerativeAugmenter::new(ScriptedProvider::returning("not json"));
        let result: Result<Vec<Keyword>, _> = augmenter
            .generate_structured("keywords", "[{\"term\": \"string\"}]", 128)
            .await;
        assert!(matches!(
            result,
            Err(AugmentError::SchemaViolation { .. })
        ));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_schema_violation() {
        let augmenter =
            GenerativeAugmenter::new(ScriptedProvider::returning(r#"{"term": "crm"}"#));
        let result: Result<Vec<Keyword>, _> = augmenter
            .generate_structured("keywords", "[{\"term\": \"string\"}]", 128)
            .await;
        assert!(matches!(
            result,
            Err(AugmentError::SchemaViolation { .. })
        ));
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable_not_schema() {
        let provider = Arc::new(ScriptedProvider {
            responses: Mutex::new(vec![Err(ProviderError::Status { status: 502 })]),
        });
        let augmenter = GenerativeAugmenter::new(provider);
        let result: Result<Vec<Keyword>, _> = augmenter
            .generate_structured("keywords", "[]", 128)
            .await;
        assert!(matches!(result, Err(AugmentError::Unavailable { .. })));
    }

    #[test]
    fn fence_stripping_handles_plain_text() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
        assert_eq!(strip_code_fences("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
    }
}
