//! Profile routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{UpdateProfileRequest, UserService};
use crate::state::AppState;
use crate::storage::User;
use axum::{extract::State, routing::patch, Json, Router};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", patch(update_profile))
}

/// Apply a partial profile update to the authenticated user
///
/// PATCH /api/profile
///
/// Fields absent from the body are left unchanged.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = UserService::update_profile(state.storage.as_ref(), &auth.user_id, req).await?;
    Ok(Json(user))
}
