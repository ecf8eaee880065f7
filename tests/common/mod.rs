//! Common test utilities for integration tests
//!
//! Tests drive the full router (middleware included) against the in-memory
//! storage backend, so no external database is needed. The client carries the
//! session cookie between requests like a browser would.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use fitplan_backend::{config::AppConfig, routes, state::AppState, storage::MemStorage};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Test application wrapper with cookie persistence
pub struct TestApp {
    pub app: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Create a test application backed by in-memory storage
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with guest assignment disabled
    pub fn without_guest_access() -> Self {
        let mut config = AppConfig::default();
        config.session.guest_access = false;
        Self::with_config(config)
    }

    fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(Arc::new(MemStorage::new()), config);
        let app = routes::create_router(state);
        Self { app, cookie: None }
    }

    /// Drop the stored session cookie, simulating a fresh browser
    pub fn clear_cookie(&mut self) {
        self.cookie = None;
    }

    pub async fn get(&mut self, path: &str) -> (StatusCode, Value) {
        self.request("GET", path, None).await
    }

    pub async fn post(&mut self, path: &str, body: &Value) -> (StatusCode, Value) {
        self.request("POST", path, Some(body)).await
    }

    pub async fn patch(&mut self, path: &str, body: &Value) -> (StatusCode, Value) {
        self.request("PATCH", path, Some(body)).await
    }

    pub async fn delete(&mut self, path: &str) -> (StatusCode, Value) {
        self.request("DELETE", path, None).await
    }

    async fn request(
        &mut self,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);

        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        // Persist the session cookie like a browser
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie.to_str().unwrap();
            let pair = value.split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, json)
    }

    /// Register a user and leave the client logged in as them
    pub async fn register(&mut self, username: &str, password: &str) -> Value {
        let (status, body) = self
            .post(
                "/api/auth/register",
                &serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body
    }
}
