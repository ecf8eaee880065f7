//! Authentication routes
//!
//! Registration and login bind the session to the user id after a successful
//! credential check; logout flushes the server-side record and always reports
//! success.

use crate::auth::{destroy_session, establish_session, AuthUser, OptionalAuthUser};
use crate::error::ApiResult;
use crate::services::{RegisterRequest, UserService};
use crate::state::AppState;
use crate::storage::User;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_sessions::Session;
use tracing::info;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/user", get(current_user))
}

/// Login credentials
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Register a new user
///
/// POST /api/auth/register
///
/// # Performance
/// Password hashing is offloaded to the blocking thread pool.
async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = UserService::register(state.storage.as_ref(), req).await?;
    establish_session(&session, &user.id).await?;

    info!(username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Login with username and password
///
/// POST /api/auth/login
///
/// # Performance
/// Password verification is offloaded to the blocking thread pool.
async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    let user = UserService::authenticate(state.storage.as_ref(), &req.username, &req.password)
        .await?;
    establish_session(&session, &user.id).await?;

    info!(username = %user.username, "user logged in");
    Ok(Json(user))
}

/// Destroy the current session
///
/// POST /api/auth/logout
///
/// Succeeds whether or not a session existed, so repeated logouts are safe.
async fn logout(auth: OptionalAuthUser, session: Session) -> ApiResult<Json<Value>> {
    destroy_session(&session).await?;

    if let OptionalAuthUser(Some(user_id)) = auth {
        info!(%user_id, "user logged out");
    }
    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// Get the current user, assigning a guest identity when none exists and
/// guest access is enabled
///
/// GET /api/auth/user
async fn current_user(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<User>> {
    let user = UserService::get(state.storage.as_ref(), &auth.user_id).await?;
    Ok(Json(user))
}
