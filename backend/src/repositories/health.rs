//! Per-user health settings

use anyhow::{anyhow, Context, Result};
use calorie_tracker_shared::{UserHealth, MEASUREMENT_DECIMALS};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct HealthRecord {
    pub user_id: Uuid,
    pub age: i32,
    pub weight_kg: Decimal,
    pub height_cm: Decimal,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HealthRecord {
    /// Parse the stored columns back into calculator input
    pub fn to_user_health(&self) -> Result<UserHealth> {
        Ok(UserHealth {
            age: self.age,
            weight: self.weight_kg.to_f64().context("weight out of range")?,
            height: self.height_cm.to_f64().context("height out of range")?,
            gender: self.gender.parse().map_err(|e| anyhow!("stored gender: {}", e))?,
            activity_level: self
                .activity_level
                .parse()
                .map_err(|e| anyhow!("stored activity level: {}", e))?,
            goal: self.goal.parse().map_err(|e| anyhow!("stored goal: {}", e))?,
        })
    }
}

fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(MEASUREMENT_DECIMALS))
        .ok_or_else(|| anyhow!("{} cannot be stored as a decimal", value))
}

pub struct HealthRepository;

impl HealthRepository {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<HealthRecord>> {
        let record = sqlx::query_as::<_, HealthRecord>(
            r#"
            SELECT user_id, age, weight_kg, height_cm, gender, activity_level, goal,
                   created_at, updated_at
            FROM user_health
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Replace the user's health record
    pub async fn upsert(pool: &PgPool, user_id: Uuid, health: &UserHealth) -> Result<HealthRecord> {
        let record = sqlx::query_as::<_, HealthRecord>(
            r#"
            INSERT INTO user_health (user_id, age, weight_kg, height_cm, gender, activity_level, goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                weight_kg = EXCLUDED.weight_kg,
                height_cm = EXCLUDED.height_cm,
                gender = EXCLUDED.gender,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                updated_at = NOW()
            RETURNING user_id, age, weight_kg, height_cm, gender, activity_level, goal,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(health.age)
        .bind(to_decimal(health.weight)?)
        .bind(to_decimal(health.height)?)
        .bind(health.gender.as_str())
        .bind(health.activity_level.as_str())
        .bind(health.goal.as_str())
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calorie_tracker_shared::{ActivityLevel, Gender, Goal};

    #[test]
    fn test_record_round_trip() {
        let record = HealthRecord {
            user_id: Uuid::new_v4(),
            age: 30,
            weight_kg: to_decimal(69.853168).unwrap(),
            height_cm: to_decimal(175.0).unwrap(),
            gender: "female".to_string(),
            activity_level: "very_active".to_string(),
            goal: "gain".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let health = record.to_user_health().unwrap();
        assert!((health.weight - 69.853).abs() < 1e-9);
        assert_eq!(health.gender, Gender::Female);
        assert_eq!(health.activity_level, ActivityLevel::VeryActive);
        assert_eq!(health.goal, Goal::Gain);
    }

    #[test]
    fn test_corrupt_enum_is_error() {
        let record = HealthRecord {
            user_id: Uuid::new_v4(),
            age: 30,
            weight_kg: Decimal::from(70),
            height_cm: Decimal::from(175),
            gender: "male".to_string(),
            activity_level: "couch".to_string(),
            goal: "maintain".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(record.to_user_health().is_err());
    }

    #[test]
    fn test_non_finite_is_rejected() {
        assert!(to_decimal(f64::NAN).is_err());
    }
}
