//! Wire-level tests for the HTTP predictor and text provider clients.

use foresight_inference::{
    CompletionRequest, HttpPredictor, HttpTextProvider, Predictor, TextProvider,
};
use foresight_core::PredictorError;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn predictor_posts_feature_vector_and_parses_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_partial_json(serde_json::json!({
            "features": [1.0, 2.5]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "score": 0.42,
            "confidence": 0.88,
            "factors": ["declining engagement"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predictor = HttpPredictor::new(reqwest::Client::new(), server.uri());
    let raw = predictor.predict(&[1.0, 2.5]).await.unwrap();

    assert_eq!(raw.score, 0.42);
    assert_eq!(raw.confidence, 0.88);
    assert_eq!(raw.factors, vec!["declining engagement".to_string()]);
}

#[tokio::test]
async fn predictor_maps_server_errors_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let predictor = HttpPredictor::new(reqwest::Client::new(), server.uri());
    let err = predictor.predict(&[0.0]).await.unwrap_err();
    assert!(matches!(err, PredictorError::Status { status: 503 }));
}

#[tokio::test]
async fn predictor_rejects_non_json_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let predictor = HttpPredictor::new(reqwest::Client::new(), server.uri());
    let err = predictor.predict(&[0.0]).await.unwrap_err();
    assert!(matches!(err, PredictorError::Malformed { .. }));
}

#[tokio::test]
async fn text_provider_sends_sampling_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/complete"))
        .and(body_partial_json(serde_json::json!({
            "max_tokens": 256,
            "temperature": 0.2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "text": "[]"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpTextProvider::new(reqwest::Client::new(), server.uri());
    let text = provider
        .complete(CompletionRequest {
            prompt: "suggest actions".into(),
            max_tokens: 256,
            temperature: 0.2,
        })
        .await
        .unwrap();
    assert_eq!(text, "[]");
}
