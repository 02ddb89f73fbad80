//! Gemini client tests against a mock `generateContent` endpoint.

use std::time::Duration;

use canvas_core::{DataUrl, ImageFormat, VariableContext};
use canvas_server::reasoning::{
    GeminiClient, GeminiConfig, InterpretError, Interpreter, ReasoningError, ReasoningService,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn image() -> DataUrl {
    DataUrl {
        format: ImageFormat::Png,
        bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13],
    }
}

fn client_for(server: &MockServer) -> GeminiClient {
    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    GeminiClient::new(config).expect("client")
}

fn candidate(parts: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": parts},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_request_shape_and_reply_text() {
    let server = MockServer::start().await;
    let img = image();
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    {"text": "read this"},
                    {"inline_data": {"mime_type": "image/png", "data": img.base64()}}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(json!([
            {"text": "[{\"expr\": \"2+2\","},
            {"text": " \"result\": 4}]"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete("read this", &img)
        .await
        .expect("complete");

    assert_eq!(reply, r#"[{"expr": "2+2", "result": 4}]"#);
}

#[tokio::test]
async fn test_interpreter_over_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate(json!([
            {"text": "```json\n[{\"expr\": \"x\", \"result\": 5, \"assign\": true}]\n```"}
        ]))))
        .mount(&server)
        .await;

    let interpreter = Interpreter::new(Arc::new(client_for(&server)));
    let results = interpreter
        .interpret(&image(), &VariableContext::new())
        .await
        .expect("interpret");

    assert_eq!(results.len(), 1);
    assert!(results[0].assign);
    assert_eq!(results[0].overlay_text(), "x=5");
}

#[tokio::test]
async fn test_upstream_error_message_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("p", &image())
        .await
        .expect_err("should fail");

    assert!(
        matches!(err, ReasoningError::Upstream { status: 400, ref message } if message == "API key not valid."),
        "{err:?}"
    );
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_no_candidates_is_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let interpreter = Interpreter::new(Arc::new(client_for(&server)));
    let err = interpreter
        .interpret(&image(), &VariableContext::new())
        .await
        .expect_err("should fail");

    assert!(matches!(
        err,
        InterpretError::Service(ReasoningError::EmptyReply)
    ));
}

#[tokio::test]
async fn test_timeout_is_retryable_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(candidate(json!([{"text": "[]"}])))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = GeminiConfig::new("test-key");
    config.base_url = server.uri();
    config.timeout = Some(Duration::from_millis(100));
    let client = GeminiClient::new(config).expect("client");

    let err = client.complete("p", &image()).await.expect_err("should time out");
    assert!(matches!(err, ReasoningError::Http(ref e) if e.is_timeout()));
    assert!(err.is_retryable());
}
