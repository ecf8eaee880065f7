//! Entity records and insert/update shapes for the persistence layer
//!
//! Records are what the storage backends return; insert types are what they
//! accept. Identifiers and creation timestamps never appear in insert types
//! because the layer generates them itself, which keeps the shape identical
//! whether the embedded or the client/server backend is active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User record
///
/// The password hash is skipped during serialization so it can never reach a
/// client, regardless of which handler returns the record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub primary_goal: Option<String>,
    pub activity_level: Option<String>,
    pub weekly_workout_goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Workout record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub workout_type: String,
    /// Duration in minutes
    pub duration: i32,
    pub calories_burned: Option<i32>,
    pub intensity: Option<String>,
    pub exercise_details: Option<String>,
    pub feeling: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Food log record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FoodLog {
    pub id: String,
    pub user_id: String,
    pub food_name: String,
    pub serving_size: Option<String>,
    pub calories: i32,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub meal_type: String,
    pub created_at: DateTime<Utc>,
}

/// Weight entry record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: String,
    pub user_id: String,
    pub weight: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone, Default)]
pub struct InsertUser {
    pub username: String,
    pub email: String,
    /// Already hashed by the credential service.
    pub password: String,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub primary_goal: Option<String>,
    pub activity_level: Option<String>,
    pub weekly_workout_goal: Option<String>,
}

/// Partial user update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub primary_goal: Option<String>,
    pub activity_level: Option<String>,
    pub weekly_workout_goal: Option<String>,
}

/// Input for creating a workout
#[derive(Debug, Clone)]
pub struct InsertWorkout {
    pub user_id: String,
    pub workout_type: String,
    pub duration: i32,
    pub calories_burned: Option<i32>,
    pub intensity: Option<String>,
    pub exercise_details: Option<String>,
    pub feeling: Option<String>,
}

/// Input for creating a food log
#[derive(Debug, Clone)]
pub struct InsertFoodLog {
    pub user_id: String,
    pub food_name: String,
    pub serving_size: Option<String>,
    pub calories: i32,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub meal_type: String,
}

/// Input for creating a weight entry
#[derive(Debug, Clone)]
pub struct InsertWeightEntry {
    pub user_id: String,
    pub weight: f64,
    pub notes: Option<String>,
}

/// Meal type for food logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl FromStr for MealType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Breakfast" => Ok(MealType::Breakfast),
            "Lunch" => Ok(MealType::Lunch),
            "Dinner" => Ok(MealType::Dinner),
            "Snack" => Ok(MealType::Snack),
            _ => Err(()),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Breakfast", MealType::Breakfast)]
    #[case("Lunch", MealType::Lunch)]
    #[case("Dinner", MealType::Dinner)]
    #[case("Snack", MealType::Snack)]
    fn test_meal_type_round_trip(#[case] input: &str, #[case] expected: MealType) {
        let parsed: MealType = input.parse().unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.to_string(), input);
    }

    #[rstest]
    #[case("breakfast")]
    #[case("Brunch")]
    #[case("")]
    fn test_meal_type_rejects_unknown(#[case] input: &str) {
        assert!(input.parse::<MealType>().is_err());
    }

    #[test]
    fn test_user_serialization_strips_password() {
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "$2b$10$secret".to_string(),
            full_name: None,
            age: None,
            gender: None,
            current_weight: None,
            target_weight: None,
            primary_goal: None,
            activity_level: None,
            weekly_workout_goal: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
        // Wire format is camelCase
        assert!(json.get("fullName").is_some());
    }
}
