//! In-memory storage
//!
//! Maps keyed by identifier, mirroring the SQL backends' behavior: layer-side
//! id and timestamp generation, uniqueness of username/email, 2-decimal
//! normalization of numeric fields, and boolean delete results. Used by the
//! test suite so the full HTTP stack can run without an external database.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::models::{
    FoodLog, InsertFoodLog, InsertUser, InsertWeightEntry, InsertWorkout, UpdateUser, User,
    WeightEntry, Workout,
};
use super::{new_id, round2, round2_opt, BackendKind, Storage};

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    workouts: HashMap<String, Workout>,
    food_logs: HashMap<String, FoodLog>,
    weight_entries: HashMap<String, WeightEntry>,
}

/// In-memory storage backend
#[derive(Default)]
pub struct MemStorage {
    inner: RwLock<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: backdate an existing food log, for date-range coverage.
    #[cfg(test)]
    pub(crate) async fn set_food_log_created_at(&self, id: &str, created_at: DateTime<Utc>) {
        let mut inner = self.inner.write().await;
        if let Some(log) = inner.food_logs.get_mut(id) {
            log.created_at = created_at;
        }
    }
}

fn newest_first<T, F: Fn(&T) -> DateTime<Utc>>(mut items: Vec<T>, created_at: F) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl Storage for MemStorage {
    fn backend_kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: InsertUser) -> Result<User> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == user.username) {
            bail!("UNIQUE constraint violated: users.username");
        }
        if inner.users.values().any(|u| u.email == user.email) {
            bail!("UNIQUE constraint violated: users.email");
        }

        let record = User {
            id: new_id(),
            username: user.username,
            email: user.email,
            password: user.password,
            full_name: user.full_name,
            age: user.age,
            gender: user.gender,
            current_weight: round2_opt(user.current_weight),
            target_weight: round2_opt(user.target_weight),
            primary_goal: user.primary_goal,
            activity_level: user.activity_level,
            weekly_workout_goal: user.weekly_workout_goal,
            created_at: Utc::now(),
        };
        inner.users.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: &str, updates: UpdateUser) -> Result<Option<User>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(id) else {
            return Ok(None);
        };

        if let Some(full_name) = updates.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(age) = updates.age {
            user.age = Some(age);
        }
        if let Some(gender) = updates.gender {
            user.gender = Some(gender);
        }
        if let Some(current_weight) = updates.current_weight {
            user.current_weight = Some(round2(current_weight));
        }
        if let Some(target_weight) = updates.target_weight {
            user.target_weight = Some(round2(target_weight));
        }
        if let Some(primary_goal) = updates.primary_goal {
            user.primary_goal = Some(primary_goal);
        }
        if let Some(activity_level) = updates.activity_level {
            user.activity_level = Some(activity_level);
        }
        if let Some(weekly_workout_goal) = updates.weekly_workout_goal {
            user.weekly_workout_goal = Some(weekly_workout_goal);
        }

        Ok(Some(user.clone()))
    }

    async fn get_workout(&self, id: &str) -> Result<Option<Workout>> {
        Ok(self.inner.read().await.workouts.get(id).cloned())
    }

    async fn workouts_for_user(&self, user_id: &str) -> Result<Vec<Workout>> {
        let inner = self.inner.read().await;
        let workouts: Vec<_> = inner
            .workouts
            .values()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(workouts, |w| w.created_at))
    }

    async fn workouts_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Workout>> {
        let inner = self.inner.read().await;
        let workouts: Vec<_> = inner
            .workouts
            .values()
            .filter(|w| w.user_id == user_id && w.created_at >= start && w.created_at < end)
            .cloned()
            .collect();
        Ok(newest_first(workouts, |w| w.created_at))
    }

    async fn create_workout(&self, workout: InsertWorkout) -> Result<Workout> {
        let record = Workout {
            id: new_id(),
            user_id: workout.user_id,
            workout_type: workout.workout_type,
            duration: workout.duration,
            calories_burned: workout.calories_burned,
            intensity: workout.intensity,
            exercise_details: workout.exercise_details,
            feeling: workout.feeling,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner.workouts.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_workout(&self, id: &str) -> Result<bool> {
        Ok(self.inner.write().await.workouts.remove(id).is_some())
    }

    async fn get_food_log(&self, id: &str) -> Result<Option<FoodLog>> {
        Ok(self.inner.read().await.food_logs.get(id).cloned())
    }

    async fn food_logs_for_user(&self, user_id: &str) -> Result<Vec<FoodLog>> {
        let inner = self.inner.read().await;
        let logs: Vec<_> = inner
            .food_logs
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(logs, |l| l.created_at))
    }

    async fn food_logs_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<FoodLog>> {
        let inner = self.inner.read().await;
        let logs: Vec<_> = inner
            .food_logs
            .values()
            .filter(|l| l.user_id == user_id && l.created_at >= start && l.created_at < end)
            .cloned()
            .collect();
        Ok(newest_first(logs, |l| l.created_at))
    }

    async fn create_food_log(&self, food_log: InsertFoodLog) -> Result<FoodLog> {
        let record = FoodLog {
            id: new_id(),
            user_id: food_log.user_id,
            food_name: food_log.food_name,
            serving_size: food_log.serving_size,
            calories: food_log.calories,
            protein: round2_opt(food_log.protein),
            carbs: round2_opt(food_log.carbs),
            fats: round2_opt(food_log.fats),
            meal_type: food_log.meal_type,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner.food_logs.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_food_log(&self, id: &str) -> Result<bool> {
        Ok(self.inner.write().await.food_logs.remove(id).is_some())
    }

    async fn get_weight_entry(&self, id: &str) -> Result<Option<WeightEntry>> {
        Ok(self.inner.read().await.weight_entries.get(id).cloned())
    }

    async fn weight_entries_for_user(&self, user_id: &str) -> Result<Vec<WeightEntry>> {
        let inner = self.inner.read().await;
        let entries: Vec<_> = inner
            .weight_entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(entries, |e| e.created_at))
    }

    async fn weight_entries_in_range(
        &self,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<WeightEntry>> {
        let inner = self.inner.read().await;
        let entries: Vec<_> = inner
            .weight_entries
            .values()
            .filter(|e| e.user_id == user_id && e.created_at >= start && e.created_at < end)
            .cloned()
            .collect();
        Ok(newest_first(entries, |e| e.created_at))
    }

    async fn create_weight_entry(&self, entry: InsertWeightEntry) -> Result<WeightEntry> {
        let record = WeightEntry {
            id: new_id(),
            user_id: entry.user_id,
            weight: round2(entry.weight),
            notes: entry.notes,
            created_at: Utc::now(),
        };
        let mut inner = self.inner.write().await;
        inner.weight_entries.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_weight_entry(&self, id: &str) -> Result<bool> {
        Ok(self.inner.write().await.weight_entries.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::day_range;
    use chrono::Duration;

    fn insert_user(username: &str) -> InsertUser {
        InsertUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: "hashed".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_username_and_email_are_unique() {
        let storage = MemStorage::new();
        storage.create_user(insert_user("alice")).await.unwrap();

        let mut same_username = insert_user("alice");
        same_username.email = "other@example.com".to_string();
        assert!(storage.create_user(same_username).await.is_err());

        let mut same_email = insert_user("bob");
        same_email.email = "alice@example.com".to_string();
        assert!(storage.create_user(same_email).await.is_err());
    }

    #[tokio::test]
    async fn test_lists_are_scoped_to_owner() {
        let storage = MemStorage::new();
        let alice = storage.create_user(insert_user("alice")).await.unwrap();
        let bob = storage.create_user(insert_user("bob")).await.unwrap();

        storage
            .create_weight_entry(InsertWeightEntry {
                user_id: alice.id.clone(),
                weight: 150.0,
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(storage.weight_entries_for_user(&alice.id).await.unwrap().len(), 1);
        assert!(storage.weight_entries_for_user(&bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_date_range_boundaries_are_half_open() {
        let storage = MemStorage::new();
        let user = storage.create_user(insert_user("alice")).await.unwrap();

        let day = Utc::now().date_naive();
        let (start, end) = day_range(day);

        let log = storage
            .create_food_log(InsertFoodLog {
                user_id: user.id.clone(),
                food_name: "Toast".to_string(),
                serving_size: None,
                calories: 120,
                protein: None,
                carbs: None,
                fats: None,
                meal_type: "Breakfast".to_string(),
            })
            .await
            .unwrap();

        // Exactly at the inclusive start boundary
        storage.set_food_log_created_at(&log.id, start).await;
        let logs = storage.food_logs_in_range(&user.id, start, end).await.unwrap();
        assert_eq!(logs.len(), 1);

        // Exactly at the exclusive end boundary
        storage.set_food_log_created_at(&log.id, end).await;
        let logs = storage.food_logs_in_range(&user.id, start, end).await.unwrap();
        assert!(logs.is_empty());

        // One second before the end boundary
        storage
            .set_food_log_created_at(&log.id, end - Duration::seconds(1))
            .await;
        let logs = storage.food_logs_in_range(&user.id, start, end).await.unwrap();
        assert_eq!(logs.len(), 1);
    }

    #[tokio::test]
    async fn test_update_user_ignores_unset_fields() {
        let storage = MemStorage::new();
        let mut input = insert_user("alice");
        input.full_name = Some("Alice".to_string());
        input.age = Some(28);
        let user = storage.create_user(input).await.unwrap();

        let updated = storage
            .update_user(
                &user.id,
                UpdateUser {
                    target_weight: Some(140.005),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.full_name.as_deref(), Some("Alice"));
        assert_eq!(updated.age, Some(28));
        assert_eq!(updated.target_weight, Some(140.0));
    }

    #[tokio::test]
    async fn test_delete_is_normalized_to_bool() {
        let storage = MemStorage::new();
        let user = storage.create_user(insert_user("alice")).await.unwrap();
        let entry = storage
            .create_weight_entry(InsertWeightEntry {
                user_id: user.id.clone(),
                weight: 180.5,
                notes: None,
            })
            .await
            .unwrap();

        assert!(storage.delete_weight_entry(&entry.id).await.unwrap());
        assert!(!storage.delete_weight_entry(&entry.id).await.unwrap());
    }
}
