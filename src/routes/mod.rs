//! Route definitions for the FitPlan API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::session_layer;
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod food_logs;
mod health;
mod profile;
mod weight_entries;
mod workouts;

pub use auth::auth_routes;
pub use food_logs::food_log_routes;
pub use profile::profile_routes;
pub use weight_entries::weight_entry_routes;
pub use workouts::workout_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let sessions = session_layer(&state.config.session);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api", api_routes())
        // Apply middleware layers
        .layer(sessions)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/profile", profile::profile_routes())
        .nest("/workouts", workouts::workout_routes())
        .nest("/food-logs", food_logs::food_log_routes())
        .nest("/weight-entries", weight_entries::weight_entry_routes())
}
