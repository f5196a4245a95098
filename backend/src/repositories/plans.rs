//! Generated weekly plans, one per user

use anyhow::Result;
use calorie_tracker_shared::WeeklyPlan;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan: Json<WeeklyPlan>,
    pub seed: i64,
    pub created_at: DateTime<Utc>,
}

pub struct PlanRepository;

impl PlanRepository {
    /// Store `plan` as the user's only plan
    pub async fn replace(pool: &PgPool, user_id: Uuid, plan: &WeeklyPlan) -> Result<PlanRecord> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM weekly_plans
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        // BIGINT is signed; the seed keeps its bit pattern
        let record = sqlx::query_as::<_, PlanRecord>(
            r#"
            INSERT INTO weekly_plans (user_id, plan, seed)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, plan, seed, created_at
            "#,
        )
        .bind(user_id)
        .bind(Json(plan))
        .bind(plan.seed as i64)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    pub async fn latest(pool: &PgPool, user_id: Uuid) -> Result<Option<PlanRecord>> {
        let record = sqlx::query_as::<_, PlanRecord>(
            r#"
            SELECT id, user_id, plan, seed, created_at
            FROM weekly_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
