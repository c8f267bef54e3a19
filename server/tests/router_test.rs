//! Router tests: every route driven through `oneshot` against an in-memory
//! session and a scripted intent provider.

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chatlens_analysis::ai::{IntentProvider, ProviderError};
use chatlens_analysis::{AnalysisConfig, AnalysisSession, IntentClassifier};
use chatlens_server::config::cors_layer;
use chatlens_server::{AppState, build_router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

// ============================================================================
// Helper Functions
// ============================================================================

const BOUNDARY: &str = "chatlens-test-boundary";

const CONVERSATIONS_CSV: &str = "role,text,lang\n\
prompter,Translate this to French,en\n\
assistant,Voici,fr\n\
prompter,Summarize this article,en\n";

struct ScriptedProvider;

#[async_trait]
impl IntentProvider for ScriptedProvider {
    async fn request_intent(&self, text: &str) -> Result<String, ProviderError> {
        if text.starts_with("Translate") {
            Ok("Translation".to_string())
        } else if text.starts_with("Summarize") {
            Ok("Summarization".to_string())
        } else {
            Err(ProviderError::Timeout)
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn app_with_config(config: AnalysisConfig) -> Router {
    let state = AppState::new(
        AnalysisSession::new(config),
        IntentClassifier::new(std::sync::Arc::new(ScriptedProvider)),
    );
    let cors = cors_layer(&["http://localhost:4200".to_string()]).unwrap();
    build_router(state, cors, 1024 * 1024)
}

fn app() -> Router {
    app_with_config(AnalysisConfig::default())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn upload_request(filename: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/upload-dataset/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn loaded_app() -> Router {
    let app = app();
    let (status, _) = send(&app, upload_request("chats.csv", CONVERSATIONS_CSV)).await;
    assert_eq!(status, StatusCode::OK);
    app
}

/// Collect the JSON payloads of every `data:` line in an SSE body.
fn sse_payloads(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim()).unwrap())
        .collect()
}

// ============================================================================
// Loading
// ============================================================================

#[tokio::test]
async fn test_root_welcome() {
    let (status, body) = send(&app(), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Welcome to the Chat Dataset Analysis App!" })
    );
}

#[tokio::test]
async fn test_upload_csv() {
    let (status, body) = send(&app(), upload_request("chats.csv", CONVERSATIONS_CSV)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Dataset uploaded successfully", "filename": "chats.csv" })
    );
}

#[tokio::test]
async fn test_upload_unsupported_extension() {
    let (status, body) = send(&app(), upload_request("chats.txt", "hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNSUPPORTED_FORMAT");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Error uploading dataset")
    );
}

#[tokio::test]
async fn test_upload_malformed_json() {
    let (status, body) = send(&app(), upload_request("chats.json", "{\"role\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let request = Request::builder()
        .method("POST")
        .uri("/upload-dataset/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(format!("--{BOUNDARY}--\r\n")))
        .unwrap();

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_UPLOAD");
}

#[tokio::test]
async fn test_default_dataset_failure_is_server_error() {
    let config = AnalysisConfig::builder()
        .default_dataset_url("http://127.0.0.1:9/train/0.parquet")
        .build()
        .unwrap();
    let (status, body) = send(&app_with_config(config), get("/use-default-dataset/")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DATASET_FETCH_FAILED");
}

// ============================================================================
// Statistics
// ============================================================================

#[tokio::test]
async fn test_queries_without_dataset_are_bad_requests() {
    let app = app();
    for uri in [
        "/dataset-info/",
        "/language-distribution/",
        "/lang-null-count/",
        "/toxicity-null-count/",
        "/toxicity-distribution/",
        "/classify-intents/",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "NO_DATA_LOADED", "{uri}");
    }
}

#[tokio::test]
async fn test_queries_on_empty_dataset_are_bad_requests() {
    let app = app();
    send(&app, upload_request("empty.csv", "role,text,lang\n")).await;

    let (status, body) = send(&app, get("/lang-null-count/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_DATASET");
}

#[tokio::test]
async fn test_dataset_info() {
    let (status, body) = send(&loaded_app().await, get("/dataset-info/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "name": "chats.csv", "num_instances": 3, "num_attributes": 3, "lang_count": 2 })
    );
}

#[tokio::test]
async fn test_language_distribution() {
    let (status, body) = send(&loaded_app().await, get("/language-distribution/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "language_distribution": { "en": 2, "fr": 1 } }));
}

#[tokio::test]
async fn test_lang_null_count() {
    let (status, body) = send(&loaded_app().await, get("/lang-null-count/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "null_count": 0, "percentage": 0.0 }));
}

#[tokio::test]
async fn test_toxicity_routes_on_jsonl_upload() {
    let app = app();
    let jsonl = "{\"role\":\"prompter\",\"text\":\"a\",\"detoxify\":{\"toxicity\":0.5}}\n\
                 {\"role\":\"prompter\",\"text\":\"b\",\"detoxify\":{\"toxicity\":0.0}}\n\
                 {\"role\":\"prompter\",\"text\":\"c\",\"detoxify\":null}\n\
                 {\"role\":\"prompter\",\"text\":\"d\",\"detoxify\":null}";
    let (status, _) = send(&app, upload_request("scores.jsonl", jsonl)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/toxicity-null-count/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "null_count": 2, "percentage": 0.5 }));

    let (status, body) = send(&app, get("/toxicity-distribution/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["toxicity_distribution"]["toxicity"], 0.25);
    assert_eq!(body["toxicity_distribution"]["insult"], 0.0);
}

#[tokio::test]
async fn test_toxicity_distribution_on_csv_upload() {
    let app = app();
    let csv = "role,text,detoxify\n\
               prompter,a,\"{\"\"toxicity\"\": 0.5, \"\"insult\"\": 0.2}\"\n\
               prompter,b,\"{\"\"toxicity\"\": 0.0}\"\n\
               assistant,c,\n";
    let (status, _) = send(&app, upload_request("scores.csv", csv)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/toxicity-distribution/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["toxicity_distribution"]["toxicity"], 0.25);
    assert_eq!(body["toxicity_distribution"]["insult"], 0.1);
    assert_eq!(body["toxicity_distribution"]["threat"], 0.0);
}

#[tokio::test]
async fn test_toxicity_distribution_malformed_csv_cell() {
    let app = app();
    let csv = "role,text,detoxify\n\
               prompter,a,\"{\"\"toxicity\"\": 0.5}\"\n\
               prompter,b,not a score object\n";
    let (status, _) = send(&app, upload_request("scores.csv", csv)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/toxicity-distribution/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "JSON_ERROR");
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Malformed 'detoxify' value in row 1")
    );
}

#[tokio::test]
async fn test_missing_toxicity_column() {
    let (status, body) = send(&loaded_app().await, get("/toxicity-distribution/")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "COLUMN_NOT_FOUND");
}

// ============================================================================
// Intent Stream
// ============================================================================

#[tokio::test]
async fn test_classify_intents_stream() {
    let app = loaded_app().await;
    let response = app.clone().oneshot(get("/classify-intents/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let events = sse_payloads(std::str::from_utf8(&bytes).unwrap());

    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["text"], "Translate this to French");
    assert_eq!(events[0]["intent"], "Translation");
    assert_eq!(events[0]["processed_count"], 1);
    assert_eq!(events[0]["total"], 2);
    assert_eq!(events[1]["intent"], "Summarization");
    assert_eq!(events[1]["processed_count"], 2);
    assert_eq!(
        events[1]["intent_distribution"],
        json!({
            "Summarization": 1,
            "Translation": 1,
            "Paraphrasing": 0,
            "Role-play": 0,
            "Miscellaneous": 0
        })
    );
    assert!(events[1]["elapsed_time"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_stop_stream_then_new_stream_runs() {
    let app = loaded_app().await;

    let (status, body) = send(&app, post("/stop-stream/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Stream stopped" }));

    let response = app.clone().oneshot(get("/classify-intents/")).await.unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(sse_payloads(std::str::from_utf8(&bytes).unwrap()).len(), 2);
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://localhost:4200")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:4200"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}

#[tokio::test]
async fn test_cors_ignores_other_origins() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://evil.test")
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
