//! Workout routes
//!
//! All operations are scoped to the authenticated user. Any ownership field a
//! client sends in the body is ignored; the session identity is substituted.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::storage::{InsertWorkout, Workout};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

/// Create workout routes
pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/:id", delete(delete_workout))
}

/// Workout creation payload; unknown fields are ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub workout_type: String,
    /// Duration in minutes
    pub duration: i32,
    #[serde(default)]
    pub calories_burned: Option<i32>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub exercise_details: Option<String>,
    #[serde(default)]
    pub feeling: Option<String>,
}

/// GET /api/workouts - List the user's workouts, newest first
async fn list_workouts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<Workout>>> {
    let workouts = state.storage.workouts_for_user(&auth.user_id).await?;
    Ok(Json(workouts))
}

/// POST /api/workouts - Record a workout
async fn create_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateWorkoutRequest>,
) -> ApiResult<(StatusCode, Json<Workout>)> {
    if req.workout_type.trim().is_empty() {
        return Err(ApiError::Validation("Workout type is required".to_string()));
    }
    if req.duration < 1 {
        return Err(ApiError::Validation(
            "Duration must be at least 1 minute".to_string(),
        ));
    }
    if matches!(req.calories_burned, Some(c) if c < 0) {
        return Err(ApiError::Validation(
            "Calories burned cannot be negative".to_string(),
        ));
    }

    let workout = state
        .storage
        .create_workout(InsertWorkout {
            user_id: auth.user_id,
            workout_type: req.workout_type,
            duration: req.duration,
            calories_burned: req.calories_burned,
            intensity: req.intensity,
            exercise_details: req.exercise_details,
            feeling: req.feeling,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(workout)))
}

/// DELETE /api/workouts/:id
///
/// A workout owned by someone else reports not-found, the same as a workout
/// that does not exist.
async fn delete_workout(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let workout = state
        .storage
        .get_workout(&id)
        .await?
        .filter(|w| w.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Workout not found".to_string()))?;

    state.storage.delete_workout(&workout.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
