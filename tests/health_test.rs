//! Integration tests for health endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn test_health_endpoints() {
    let mut app = TestApp::new();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());

    let (status, body) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["storage"]["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["backend"], "memory");

    let (status, _) = app.get("/health/live").await;
    assert_eq!(status, StatusCode::OK);
}
