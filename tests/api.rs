use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use qwikgen_proxy::config::{AppConfig, DEFAULT_CODE_MODEL, DEFAULT_TEXT_MODEL};
use qwikgen_proxy::prompt::{CHAT_INSTRUCTION, GENERAL_INSTRUCTION, STARTUP_INSTRUCTION};
use qwikgen_proxy::{router, ProxyState, TogetherClient};

struct TestHarness {
    mock_server: MockServer,
}

impl TestHarness {
    async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
        }
    }

    fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.backend.url = self.mock_server.uri();
        config.backend.api_key = Some("test-api-key".to_string());
        config.stats.enabled = true;
        config
    }

    fn app_with(&self, config: AppConfig) -> Router {
        let backend = TogetherClient::from_config(&config.backend).unwrap();
        router(ProxyState::new(config, Arc::new(backend)))
    }

    fn app(&self) -> Router {
        self.app_with(self.config())
    }

    async fn mount_completion(&self, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-test",
                "object": "chat.completion",
                "model": "test-model",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            })))
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    async fn mount_error(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(json!({"error": {"message": "upstream exploded"}})),
            )
            .expect(1)
            .mount(&self.mock_server)
            .await;
    }

    /// Body of the single request the upstream received
    async fn upstream_request(&self) -> Value {
        let requests = self.mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1, "expected exactly one upstream call");
        requests[0].body_json().unwrap()
    }
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn history(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| json!({"user": format!("user {}", i), "assistant": format!("assistant {}", i)}))
            .collect(),
    )
}

#[tokio::test]
async fn test_generate_text_success() {
    let harness = TestHarness::new().await;
    harness.mount_completion("  Here is your idea.\n").await;

    let (status, body) = send(
        harness.app(),
        post("/api/generate-text", json!({"prompt": "food delivery", "type": "startup"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "content": "Here is your idea.", "type": "startup"})
    );

    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["model"], DEFAULT_TEXT_MODEL);
    assert_eq!(upstream["max_tokens"], 1000);
    assert_eq!(upstream["messages"][0]["role"], "system");
    assert_eq!(upstream["messages"][0]["content"], STARTUP_INSTRUCTION);
    assert_eq!(upstream["messages"][1]["role"], "user");
    assert_eq!(upstream["messages"][1]["content"], "food delivery");
}

#[tokio::test]
async fn test_generate_text_defaults_to_general() {
    let harness = TestHarness::new().await;
    harness.mount_completion("ok").await;

    let (status, body) = send(harness.app(), post("/api/generate-text", json!({"prompt": "hi"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "general");
    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["messages"][0]["content"], GENERAL_INSTRUCTION);
}

#[tokio::test]
async fn test_chat_truncates_history_to_last_ten() {
    let harness = TestHarness::new().await;
    harness.mount_completion("Sure!").await;

    let (status, body) = send(
        harness.app(),
        post("/api/chat", json!({"message": "and now?", "history": history(15)})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "response": "Sure!"}));

    let upstream = harness.upstream_request().await;
    let messages = upstream["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1 + 2 * 10 + 1);
    assert_eq!(messages[0]["content"], CHAT_INSTRUCTION);
    assert_eq!(messages[1]["content"], "user 5");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(messages[2]["content"], "assistant 5");
    assert_eq!(messages[20]["content"], "assistant 14");
    assert_eq!(messages[21]["content"], "and now?");
    assert_eq!(upstream["top_p"].as_f64().unwrap() as f32, 0.9);
}

#[tokio::test]
async fn test_generate_code_with_language() {
    let harness = TestHarness::new().await;
    harness.mount_completion("fn main() {}").await;

    let (status, body) = send(
        harness.app(),
        post(
            "/api/generate-code",
            json!({"prompt": "hello world", "language": "rust", "history": history(2)}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"success": true, "content": "fn main() {}", "language": "rust"})
    );

    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["model"], DEFAULT_CODE_MODEL);
    assert_eq!(upstream["max_tokens"], 1500);
    assert_eq!(upstream["messages"].as_array().unwrap().len(), 6);
    assert!(upstream["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("expert rust developer"));
}

#[tokio::test]
async fn test_summarize() {
    let harness = TestHarness::new().await;
    harness.mount_completion("Short version.").await;

    let (status, body) = send(
        harness.app(),
        post("/api/summarize", json!({"text": "A very long article."})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "summary": "Short version."}));

    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["max_tokens"], 500);
    assert_eq!(
        upstream["messages"],
        json!([{
            "role": "user",
            "content": "Please summarize the following text:\n\nA very long article.\n\nSummary:"
        }])
    );
}

#[tokio::test]
async fn test_translate_defaults() {
    let harness = TestHarness::new().await;
    harness.mount_completion("नमस्ते").await;

    let (status, body) = send(harness.app(), post("/api/translate", json!({"text": "hello"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "translation": "नमस्ते",
            "source_language": "English",
            "target_language": "Hindi"
        })
    );

    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["max_tokens"], 800);
    assert_eq!(
        upstream["messages"][0]["content"],
        "Translate from English to Hindi:\n\nhello\n\nTranslation:"
    );
}

#[tokio::test]
async fn test_upstream_error_returns_envelope() {
    let harness = TestHarness::new().await;
    harness.mount_error(502).await;

    let (status, body) = send(harness.app(), post("/api/chat", json!({"message": "hi"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Chat failed: upstream returned HTTP 502");
    assert!(!body["error"].as_str().unwrap().contains("exploded"));
}

#[tokio::test]
async fn test_unreachable_upstream_returns_envelope() {
    let harness = TestHarness::new().await;
    let mut config = harness.config();
    config.backend.url = "http://127.0.0.1:1".to_string();

    let (status, body) = send(
        harness.app_with(config),
        post("/api/generate-code", json!({"prompt": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Code generation failed: "));
    assert!(error.len() > "Code generation failed: ".len());
}

#[tokio::test]
async fn test_invalid_json_body_returns_envelope() {
    let harness = TestHarness::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/summarize")
        .header("Content-Type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(harness.app(), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Summarization failed: invalid request body"));
    assert!(harness.mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_body_uses_defaults() {
    let harness = TestHarness::new().await;
    harness.mount_completion("done").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/translate")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(harness.app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_language"], "English");
    assert_eq!(body["target_language"], "Hindi");
}

#[tokio::test]
async fn test_non_string_type_still_calls_upstream() {
    let harness = TestHarness::new().await;
    harness.mount_completion("ok").await;

    let (status, body) = send(
        harness.app(),
        post("/api/generate-text", json!({"prompt": "x", "type": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["type"], "5");

    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["messages"][0]["content"], GENERAL_INSTRUCTION);
}

#[tokio::test]
async fn test_malformed_history_still_calls_upstream() {
    let harness = TestHarness::new().await;
    harness.mount_completion("ok").await;

    let (status, body) = send(
        harness.app(),
        post(
            "/api/chat",
            json!({"message": 42, "history": [{"user": 1}, "junk"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "response": "ok"}));

    let upstream = harness.upstream_request().await;
    let messages = upstream["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[1]["content"], "1");
    assert_eq!(messages[2]["content"], "");
    assert_eq!(messages[3]["content"], "42");
}

#[tokio::test]
async fn test_health_makes_no_upstream_call() {
    let harness = TestHarness::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&harness.mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(harness.app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "healthy", "service": "QwikGen API", "version": "1.0.0"})
    );
}

#[tokio::test]
async fn test_tool_override_reaches_upstream() {
    let harness = TestHarness::new().await;
    harness.mount_completion("ok").await;

    let mut config = harness.config();
    config.tools.insert(
        qwikgen_proxy::prompt::ToolKind::Summarize,
        qwikgen_proxy::config::ToolOverride {
            model: Some("custom/summarizer".to_string()),
            max_tokens: Some(64),
            ..Default::default()
        },
    );

    let (status, _) = send(harness.app_with(config), post("/api/summarize", json!({"text": "t"}))).await;
    assert_eq!(status, StatusCode::OK);

    let upstream = harness.upstream_request().await;
    assert_eq!(upstream["model"], "custom/summarizer");
    assert_eq!(upstream["max_tokens"], 64);
}

#[tokio::test]
async fn test_static_frontend_served() {
    let harness = TestHarness::new().await;
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>QwikGen</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();

    let mut config = harness.config();
    config.server.static_dir = dir.path().to_path_buf();
    let app = harness.app_with(config);

    let index = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(index.status(), StatusCode::OK);
    let html = to_bytes(index.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&html[..], b"<h1>QwikGen</h1>");

    let asset = app
        .clone()
        .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(asset.status(), StatusCode::OK);

    let missing = app
        .oneshot(Request::builder().uri("/nope.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let harness = TestHarness::new().await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/health")
        .header("Origin", "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = harness.app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
