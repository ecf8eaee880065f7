//! Food log routes
//!
//! Listing supports an optional `date=YYYY-MM-DD` query that restricts
//! results to the UTC calendar day.

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::storage::{day_range, FoodLog, InsertFoodLog, MealType};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

/// Create food log routes
pub fn food_log_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_food_logs).post(create_food_log))
        .route("/:id", delete(delete_food_log))
}

/// Optional calendar-day filter
#[derive(Debug, Deserialize)]
pub struct FoodLogQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Food log creation payload; unknown fields are ignored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodLogRequest {
    pub food_name: String,
    #[serde(default)]
    pub serving_size: Option<String>,
    pub calories: i32,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fats: Option<f64>,
    pub meal_type: String,
}

/// GET /api/food-logs - List the user's food logs, newest first
///
/// With `?date=YYYY-MM-DD`, returns entries whose creation timestamp falls
/// within `[D 00:00, D+1 00:00)` UTC.
async fn list_food_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FoodLogQuery>,
) -> ApiResult<Json<Vec<FoodLog>>> {
    let logs = match query.date {
        Some(date) => {
            let (start, end) = day_range(date);
            state
                .storage
                .food_logs_in_range(&auth.user_id, start, end)
                .await?
        }
        None => state.storage.food_logs_for_user(&auth.user_id).await?,
    };
    Ok(Json(logs))
}

/// POST /api/food-logs - Record a food log entry
async fn create_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFoodLogRequest>,
) -> ApiResult<(StatusCode, Json<FoodLog>)> {
    if req.food_name.trim().is_empty() {
        return Err(ApiError::Validation("Food name is required".to_string()));
    }
    if req.calories < 0 {
        return Err(ApiError::Validation(
            "Calories cannot be negative".to_string(),
        ));
    }
    for (name, value) in [
        ("Protein", req.protein),
        ("Carbs", req.carbs),
        ("Fats", req.fats),
    ] {
        if matches!(value, Some(v) if v < 0.0) {
            return Err(ApiError::Validation(format!("{} cannot be negative", name)));
        }
    }
    let meal_type: MealType = req
        .meal_type
        .parse()
        .map_err(|_| ApiError::Validation("Invalid meal type".to_string()))?;

    let log = state
        .storage
        .create_food_log(InsertFoodLog {
            user_id: auth.user_id,
            food_name: req.food_name,
            serving_size: req.serving_size,
            calories: req.calories,
            protein: req.protein,
            carbs: req.carbs,
            fats: req.fats,
            meal_type: meal_type.to_string(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(log)))
}

/// DELETE /api/food-logs/:id
async fn delete_food_log(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let log = state
        .storage
        .get_food_log(&id)
        .await?
        .filter(|l| l.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound("Food log not found".to_string()))?;

    state.storage.delete_food_log(&log.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
