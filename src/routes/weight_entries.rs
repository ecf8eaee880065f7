//! Weight entry routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::storage::{InsertWeightEntry, WeightEntry};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

/// Create weight entry routes
pub fn weight_entry_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_weight_entries).post(create_weight_entry))
        .route("/:id", delete(delete_weight_entry))
}

/// Weight entry creation payload; unknown fields are ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWeightEntryRequest {
    pub weight: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/weight-entries - List the user's weight entries, newest first
async fn list_weight_entries(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<WeightEntry>>> {
    let entries = state.storage.weight_entries_for_user(&auth.user_id).await?;
    Ok(Json(entries))
}

/// POST /api/weight-entries - Record a weight measurement
///
/// Weight is stored rounded to two decimal places.
async fn create_weight_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateWeightEntryRequest>,
) -> ApiResult<(StatusCode, Json<WeightEntry>)> {
    if !req.weight.is_finite() || req.weight <= 0.0 {
        return Err(ApiError::Validation("Weight must be positive".to_string()));
    }

    let entry = state
        .storage
        .create_weight_entry(InsertWeightEntry {
            user_id: auth.user_id,
            weight: req.weight,
            notes: req.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/weight-entries/:id
async fn delete_weight_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let entry = state
        .storage
        .get_weight_entry(&id)
        .await?
        .filter(|e| e.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Weight entry not found".to_string()))?;

    state.storage.delete_weight_entry(&entry.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
