//! Integration tests for registration, login, logout, and guest assignment

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn test_register_login_logout_cycle() {
    let mut app = TestApp::new();

    let user = app.register("alice", "secret1").await;
    assert_eq!(user["username"], "alice");
    assert!(user["password"].is_null(), "password must never be serialized");
    assert!(user["id"].is_string());

    // The registration response established a session
    let (status, me) = app.get("/api/auth/user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);

    let (status, body) = app.post("/api/auth/logout", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    // Logging out again is harmless
    let (status, _) = app.post("/api/auth/logout", &json!({})).await;
    assert_eq!(status, StatusCode::OK);

    app.clear_cookie();
    let (status, logged_in) = app
        .post(
            "/api/auth/login",
            &json!({ "username": "alice", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["id"], user["id"]);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let mut app = TestApp::new();
    app.register("alice", "secret1").await;
    app.clear_cookie();

    let (status, wrong_password) = app
        .post(
            "/api/auth/login",
            &json!({ "username": "alice", "password": "wrong1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app
        .post(
            "/api/auth/login",
            &json!({ "username": "mallory", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password["message"], unknown_user["message"]);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let mut app = TestApp::new();
    app.register("alice", "secret1").await;
    app.clear_cookie();

    let (status, body) = app
        .post(
            "/api/auth/register",
            &json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "secret1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_guest_identity_is_assigned_and_reused() {
    let mut app = TestApp::new();

    // Unauthenticated access to a protected route creates a guest
    let (status, me) = app.get("/api/auth/user").await;
    assert_eq!(status, StatusCode::OK);
    let username = me["username"].as_str().unwrap();
    assert!(username.starts_with("guest_"), "got {}", username);

    // Same cookie resolves to the same guest, not a new one
    let (status, again) = app.get("/api/auth/user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["id"], me["id"]);
}

#[tokio::test]
async fn test_protected_routes_reject_without_guest_access() {
    let mut app = TestApp::without_guest_access();

    let (status, body) = app.get("/api/auth/user").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");

    let (status, _) = app.get("/api/workouts").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_update_is_partial() {
    let mut app = TestApp::new();
    app.register("alice", "secret1").await;

    let (status, updated) = app
        .patch(
            "/api/profile",
            &json!({ "fullName": "Alice Example", "targetWeight": 150.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["fullName"], "Alice Example");
    assert_eq!(updated["targetWeight"], 150.0);

    // Untouched fields survive a later partial update
    let (status, updated) = app.patch("/api/profile", &json!({ "age": 30 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["age"], 30);
    assert_eq!(updated["fullName"], "Alice Example");

    let (status, _) = app.patch("/api/profile", &json!({ "age": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
