//! User service for authentication and account management
//!
//! # Performance
//!
//! Password hashing/verification runs on the blocking thread pool.

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::storage::{InsertUser, Storage, UpdateUser, User};
use serde::Deserialize;
use validator::ValidateEmail;

/// Registration payload
///
/// Unknown fields (including any caller-supplied ownership or id field) are
/// ignored during deserialization, matching the original wire contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub current_weight: Option<f64>,
    #[serde(default)]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub primary_goal: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub weekly_workout_goal: Option<String>,
}

/// Partial profile update payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub current_weight: Option<f64>,
    #[serde(default)]
    pub target_weight: Option<f64>,
    #[serde(default)]
    pub primary_goal: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub weekly_workout_goal: Option<String>,
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user
    pub async fn register(storage: &dyn Storage, req: RegisterRequest) -> Result<User, ApiError> {
        if req.username.trim().is_empty() {
            return Err(ApiError::Validation("Username is required".to_string()));
        }
        if !req.email.validate_email() {
            return Err(ApiError::Validation("Invalid email format".to_string()));
        }
        if req.password.len() < 6 {
            return Err(ApiError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        validate_profile_numbers(req.age, req.current_weight, req.target_weight)?;

        if storage.get_user_by_username(&req.username).await?.is_some() {
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }
        if storage.get_user_by_email(&req.email).await?.is_some() {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password = PasswordService::hash_async(req.password).await?;

        let user = storage
            .create_user(InsertUser {
                username: req.username,
                email: req.email,
                password,
                full_name: req.full_name,
                age: req.age,
                gender: req.gender,
                current_weight: req.current_weight,
                target_weight: req.target_weight,
                primary_goal: req.primary_goal,
                activity_level: req.activity_level,
                weekly_workout_goal: req.weekly_workout_goal,
            })
            .await?;

        Ok(user)
    }

    /// Authenticate a username/password pair
    ///
    /// Unknown username and wrong password produce the same error so the
    /// response does not reveal which usernames exist.
    pub async fn authenticate(
        storage: &dyn Storage,
        username: &str,
        password: &str,
    ) -> Result<User, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

        let user = storage
            .get_user_by_username(username)
            .await?
            .ok_or_else(invalid)?;

        let valid =
            PasswordService::verify_async(password.to_string(), user.password.clone()).await?;
        if !valid {
            return Err(invalid());
        }

        Ok(user)
    }

    /// Create a uniquely named guest user with a random, hashed placeholder
    /// password.
    pub async fn create_guest(storage: &dyn Storage) -> Result<User, ApiError> {
        let suffix: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect();
        let username = format!("guest_{}", suffix);
        let email = format!("{}@guest.fitplan.local", username);
        let password = PasswordService::hash_async(uuid::Uuid::new_v4().to_string()).await?;

        let user = storage
            .create_user(InsertUser {
                username,
                email,
                password,
                ..Default::default()
            })
            .await?;

        Ok(user)
    }

    /// Load a user by id
    pub async fn get(storage: &dyn Storage, user_id: &str) -> Result<User, ApiError> {
        storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Apply a partial profile update to the authenticated user
    pub async fn update_profile(
        storage: &dyn Storage,
        user_id: &str,
        req: UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        validate_profile_numbers(req.age, req.current_weight, req.target_weight)?;

        storage
            .update_user(
                user_id,
                UpdateUser {
                    full_name: req.full_name,
                    age: req.age,
                    gender: req.gender,
                    current_weight: req.current_weight,
                    target_weight: req.target_weight,
                    primary_goal: req.primary_goal,
                    activity_level: req.activity_level,
                    weekly_workout_goal: req.weekly_workout_goal,
                },
            )
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }
}

fn validate_profile_numbers(
    age: Option<i32>,
    current_weight: Option<f64>,
    target_weight: Option<f64>,
) -> Result<(), ApiError> {
    if matches!(age, Some(age) if age <= 0) {
        return Err(ApiError::Validation("Age must be positive".to_string()));
    }
    if matches!(current_weight, Some(w) if w <= 0.0) {
        return Err(ApiError::Validation(
            "Current weight must be positive".to_string(),
        ));
    }
    if matches!(target_weight, Some(w) if w <= 0.0) {
        return Err(ApiError::Validation(
            "Target weight must be positive".to_string(),
        ));
    }
    Ok(())
}
