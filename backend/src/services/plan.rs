//! Weekly plan generation and lookup
//!
//! A plan is derived from the stored health settings and replaces any
//! previous plan. Unless the caller asks to regenerate, the meal seed is a
//! function of the user and the reference date, so generating twice on the
//! same day returns the same meals.

use crate::error::ApiError;
use crate::repositories::{PlanRecord, PlanRepository};
use crate::services::HealthService;
use calorie_tracker_shared::types::{GeneratePlanRequest, PlanResponse, TodayPlanResponse};
use calorie_tracker_shared::{generate_seeded_plan, plan_seed, DayOfWeek, PlanOptions};
use chrono::NaiveDate;
use rand::Rng;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct PlanService;

/// Seed for a generation request
pub(crate) fn choose_seed(user_id: Uuid, date: NaiveDate, regenerate: bool) -> u64 {
    if regenerate {
        rand::thread_rng().gen()
    } else {
        plan_seed(user_id, date)
    }
}

fn to_response(record: PlanRecord) -> PlanResponse {
    PlanResponse {
        id: record.id,
        plan: record.plan.0,
        created_at: record.created_at,
    }
}

impl PlanService {
    #[instrument(skip(pool, defaults, req), fields(regenerate = req.regenerate))]
    pub async fn generate(
        pool: &PgPool,
        defaults: PlanOptions,
        user_id: Uuid,
        req: GeneratePlanRequest,
        today: NaiveDate,
    ) -> Result<PlanResponse, ApiError> {
        let health = HealthService::require(pool, user_id).await?;
        let options = PlanOptions {
            include_meals: req.include_meals.unwrap_or(defaults.include_meals),
            ..defaults
        };
        let seed = choose_seed(user_id, req.date.unwrap_or(today), req.regenerate);

        let plan = generate_seeded_plan(&health, options, seed)?;
        let record = PlanRepository::replace(pool, user_id, &plan)
            .await
            .map_err(ApiError::Internal)?;

        metrics::counter!("plans_generated_total").increment(1);
        info!(
            daily_calories = plan.nutrition.daily_calories,
            policy = %plan.goal_policy,
            "Weekly plan generated"
        );
        Ok(to_response(record))
    }

    pub async fn latest(pool: &PgPool, user_id: Uuid) -> Result<PlanResponse, ApiError> {
        PlanRepository::latest(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(to_response)
            .ok_or_else(|| ApiError::NotFound("No plan generated yet".to_string()))
    }

    /// The stored plan's entry for the weekday of `date`
    pub async fn for_date(pool: &PgPool, user_id: Uuid, date: NaiveDate) -> Result<TodayPlanResponse, ApiError> {
        let stored = Self::latest(pool, user_id).await?.plan;
        let day = DayOfWeek::from(date);
        let plan = stored
            .day(day)
            .cloned()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("Stored plan has no entry for {}", day)))?;

        Ok(TodayPlanResponse {
            date,
            day,
            nutrition: stored.nutrition,
            plan,
        })
    }
}
