//! Logged food entries
//!
//! `food_data` is stored as JSONB in the shape of [`FoodData`].

use anyhow::{anyhow, Result};
use calorie_tracker_shared::{EntryType, FoodData, FoodEntry, MealType};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub food_data: Json<FoodData>,
    pub entry_type: String,
    pub meal_type: String,
    pub consumed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<FoodEntryRecord> for FoodEntry {
    type Error = anyhow::Error;

    fn try_from(r: FoodEntryRecord) -> Result<Self> {
        Ok(FoodEntry {
            id: r.id,
            user_id: r.user_id,
            food_name: r.food_name,
            food_data: r.food_data.0,
            entry_type: r.entry_type.parse::<EntryType>().map_err(|e| anyhow!(e))?,
            meal_type: r.meal_type.parse::<MealType>().map_err(|e| anyhow!(e))?,
            consumed_at: r.consumed_at,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CreateFoodEntry {
    pub user_id: Uuid,
    pub food_name: String,
    pub food_data: FoodData,
    pub entry_type: EntryType,
    pub meal_type: MealType,
    pub consumed_at: DateTime<Utc>,
}

/// Half-open `[start, end)` time window
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// UTC days `first..=last`
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let start = first.and_time(NaiveTime::MIN).and_utc();
        let end = last.and_time(NaiveTime::MIN).and_utc() + Duration::days(1);
        Self { start, end }
    }

    /// A single UTC day
    pub fn day(date: NaiveDate) -> Self {
        Self::days(date, date)
    }
}

pub struct FoodEntryRepository;

impl FoodEntryRepository {
    pub async fn create(pool: &PgPool, input: CreateFoodEntry) -> Result<FoodEntryRecord> {
        let record = sqlx::query_as::<_, FoodEntryRecord>(
            r#"
            INSERT INTO food_entries (user_id, food_name, food_data, entry_type, meal_type, consumed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, food_name, food_data, entry_type, meal_type, consumed_at, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.food_name)
        .bind(Json(&input.food_data))
        .bind(input.entry_type.as_str())
        .bind(input.meal_type.as_str())
        .bind(input.consumed_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Newest first, optionally limited to a time window
    pub async fn list(
        pool: &PgPool,
        user_id: Uuid,
        window: Option<TimeWindow>,
        limit: i64,
    ) -> Result<Vec<FoodEntryRecord>> {
        let records = sqlx::query_as::<_, FoodEntryRecord>(
            r#"
            SELECT id, user_id, food_name, food_data, entry_type, meal_type, consumed_at, created_at
            FROM food_entries
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR consumed_at >= $2)
              AND ($3::timestamptz IS NULL OR consumed_at < $3)
            ORDER BY consumed_at DESC, created_at DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(window.map(|w| w.start))
        .bind(window.map(|w| w.end))
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Every entry in the window, oldest first
    pub async fn in_window(pool: &PgPool, user_id: Uuid, window: TimeWindow) -> Result<Vec<FoodEntryRecord>> {
        let records = sqlx::query_as::<_, FoodEntryRecord>(
            r#"
            SELECT id, user_id, food_name, food_data, entry_type, meal_type, consumed_at, created_at
            FROM food_entries
            WHERE user_id = $1 AND consumed_at >= $2 AND consumed_at < $3
            ORDER BY consumed_at ASC
            "#,
        )
        .bind(user_id)
        .bind(window.start)
        .bind(window.end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Every entry the user has logged, oldest first
    pub async fn all_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<FoodEntryRecord>> {
        let records = sqlx::query_as::<_, FoodEntryRecord>(
            r#"
            SELECT id, user_id, food_name, food_data, entry_type, meal_type, consumed_at, created_at
            FROM food_entries
            WHERE user_id = $1
            ORDER BY consumed_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Delete an entry owned by `user_id`; false when no such entry
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM food_entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
