//! Persistence layer
//!
//! All entity access goes through the [`Storage`] trait, selected once at
//! process start: Postgres for client/server deployments, SQLite as the
//! embedded single-file store, and an in-memory implementation for tests.
//! The layer normalizes the behavioral differences between backends:
//!
//! - identifiers are generated here (random UUIDv4 strings), not by the store
//! - creation timestamps are assigned here, in UTC
//! - update/delete results are exposed as booleans, not row counts
//! - weight and macro-nutrient values are stored with 2-decimal precision
//!
//! If the configured Postgres backend fails to initialize, the layer logs a
//! warning and falls back to the embedded store rather than crashing. The
//! fallback is disjoint storage, so it masks misconfiguration but loses no
//! data.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{DatabaseConfig, DEFAULT_SQLITE_URL};

pub mod memory;
pub mod models;
pub mod schema;
pub mod sql;

pub use memory::MemStorage;
pub use models::{
    FoodLog, InsertFoodLog, InsertUser, InsertWeightEntry, InsertWorkout, MealType, UpdateUser,
    User, WeightEntry, Workout,
};
pub use sql::{PgStorage, SqliteStorage};

/// Which backend ended up active after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    Sqlite,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Postgres => "postgres",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Memory => "memory",
        }
    }
}

/// Ownership-scoped entity storage
///
/// Update operations are owner-unchecked at this layer; request handlers
/// verify ownership before mutating rows they did not just create.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Which backend this is; surfaced by the readiness endpoint.
    fn backend_kind(&self) -> BackendKind;

    /// Idempotent table/index creation; runs before any other operation.
    async fn ensure_schema(&self) -> Result<()>;

    // User operations
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: InsertUser) -> Result<User>;
    async fn update_user(&self, id: &str, updates: UpdateUser) -> Result<Option<User>>;

    // Workout operations
    async fn get_workout(&self, id: &str) -> Result<Option<Workout>>;
    async fn workouts_for_user(&self, user_id: &str) -> Result<Vec<Workout>>;
    async fn workouts_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Workout>>;
    async fn create_workout(&self, workout: InsertWorkout) -> Result<Workout>;
    async fn delete_workout(&self, id: &str) -> Result<bool>;

    // Food log operations
    async fn get_food_log(&self, id: &str) -> Result<Option<FoodLog>>;
    async fn food_logs_for_user(&self, user_id: &str) -> Result<Vec<FoodLog>>;
    async fn food_logs_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FoodLog>>;
    async fn create_food_log(&self, food_log: InsertFoodLog) -> Result<FoodLog>;
    async fn delete_food_log(&self, id: &str) -> Result<bool>;

    // Weight entry operations
    async fn get_weight_entry(&self, id: &str) -> Result<Option<WeightEntry>>;
    async fn weight_entries_for_user(&self, user_id: &str) -> Result<Vec<WeightEntry>>;
    async fn weight_entries_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeightEntry>>;
    async fn create_weight_entry(&self, entry: InsertWeightEntry) -> Result<WeightEntry>;
    async fn delete_weight_entry(&self, id: &str) -> Result<bool>;
}

/// Initialize the configured backend, falling back to the embedded store when
/// the client/server backend is unavailable.
pub async fn init(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    if !config.is_sqlite() {
        match connect_postgres(config).await {
            Ok(storage) => return Ok(storage),
            Err(e) => {
                warn!(
                    error = %e,
                    "primary database initialization failed, falling back to embedded store"
                );
            }
        }
    }

    let url = if config.is_sqlite() {
        config.url.as_str()
    } else {
        DEFAULT_SQLITE_URL
    };

    let storage = SqliteStorage::connect(url, config.max_connections).await?;
    storage.ensure_schema().await?;
    info!(url = %url, "Using SQLite database");
    Ok(Arc::new(storage))
}

async fn connect_postgres(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = PgStorage::connect(&config.url, config.max_connections).await?;
    storage.ensure_schema().await?;
    info!("Using PostgreSQL database");
    Ok(Arc::new(storage))
}

/// UTC time range covering one calendar day: `[D 00:00:00, D+1 00:00:00)`.
pub fn day_range(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    let end = start + chrono::Duration::days(1);
    (start.and_utc(), end.and_utc())
}

/// Generate an opaque identifier; the same format on every backend.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Normalize a numeric field to 2-decimal precision before storage, so
/// floating-point and fixed-point column types round-trip identically.
pub(crate) fn round2(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(2).to_f64().unwrap_or(value))
        .unwrap_or(value)
}

/// Optional variant of [`round2`] for nullable macro fields.
pub(crate) fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}
