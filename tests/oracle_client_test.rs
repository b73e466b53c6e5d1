// Oracle client behavior against local stub servers.
// Each test spins up a throwaway axum listener on an ephemeral port so
// no real upstream is touched.

use axum::{routing::post, Json, Router};
use phishscan_backend::services::{MlClient, SafeBrowsingClient, SignalError};
use serde_json::{json, Value};

async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_ml_client_parses_score() {
    let app = Router::new().route(
        "/score",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["url"], "http://phish.example/login");
            Json(json!({ "mlScore": 0.95 }))
        }),
    );
    let base = spawn_stub(app).await;

    let client = MlClient::new(Some(format!("{}/score", base)));
    let score = client.score("http://phish.example/login").await.unwrap();
    assert_eq!(score, 0.95);
}

#[tokio::test]
async fn test_ml_client_rejects_out_of_range_score() {
    let app = Router::new().route(
        "/score",
        post(|| async { Json(json!({ "mlScore": 1.7 })) }),
    );
    let base = spawn_stub(app).await;

    let client = MlClient::new(Some(format!("{}/score", base)));
    let result = client.score("http://example.com").await;
    assert!(matches!(result, Err(SignalError::Malformed(_))));
}

#[tokio::test]
async fn test_ml_client_rejects_malformed_body() {
    let app = Router::new().route(
        "/score",
        post(|| async { Json(json!({ "confidence": "high" })) }),
    );
    let base = spawn_stub(app).await;

    let client = MlClient::new(Some(format!("{}/score", base)));
    let result = client.score("http://example.com").await;
    assert!(matches!(result, Err(SignalError::Malformed(_))));
}

#[tokio::test]
async fn test_ml_client_surfaces_upstream_status() {
    let app = Router::new().route(
        "/score",
        post(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_stub(app).await;

    let client = MlClient::new(Some(format!("{}/score", base)));
    let result = client.score("http://example.com").await;
    assert!(matches!(result, Err(SignalError::Status(500))));
}

#[tokio::test]
async fn test_safe_browsing_flags_on_match() {
    let app = Router::new().route(
        "/v4/threatMatches:find",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["threatInfo"]["threatEntryTypes"][0], "URL");
            Json(json!({
                "matches": [{
                    "threatType": "SOCIAL_ENGINEERING",
                    "platformType": "ANY_PLATFORM",
                    "threat": { "url": "http://phish.example/login" }
                }]
            }))
        }),
    );
    let base = spawn_stub(app).await;

    let client = SafeBrowsingClient::with_endpoint(
        Some("test-key".to_string()),
        format!("{}/v4/threatMatches:find", base),
    );
    let signal = client.check("http://phish.example/login").await.unwrap();
    assert!(signal.flagged);
}

#[tokio::test]
async fn test_safe_browsing_clean_on_empty_body() {
    // The live API returns an empty object when nothing matches
    let app = Router::new().route(
        "/v4/threatMatches:find",
        post(|| async { Json(json!({})) }),
    );
    let base = spawn_stub(app).await;

    let client = SafeBrowsingClient::with_endpoint(
        Some("test-key".to_string()),
        format!("{}/v4/threatMatches:find", base),
    );
    let signal = client.check("http://example.com").await.unwrap();
    assert!(!signal.flagged);
}
