//! Health settings: the calculator's stored input

use crate::error::ApiError;
use crate::repositories::{HealthRecord, HealthRepository};
use calorie_tracker_shared::types::{HealthResponse, UpdateHealthRequest};
use calorie_tracker_shared::UserHealth;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

pub struct HealthService;

fn to_response(record: HealthRecord) -> Result<HealthResponse, ApiError> {
    let health = record.to_user_health().map_err(ApiError::Internal)?;
    Ok(HealthResponse {
        bmr: health.bmr(),
        tdee: health.tdee(),
        health,
        updated_at: record.updated_at,
    })
}

impl HealthService {
    /// `None` until the user has saved their details
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<HealthResponse>, ApiError> {
        HealthRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(to_response)
            .transpose()
    }

    /// Stored health as calculator input
    pub async fn require(pool: &PgPool, user_id: Uuid) -> Result<UserHealth, ApiError> {
        HealthRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::validation("Health information is required before generating a plan"))?
            .to_user_health()
            .map_err(ApiError::Internal)
    }

    #[instrument(skip(pool, req))]
    pub async fn update(pool: &PgPool, user_id: Uuid, req: UpdateHealthRequest) -> Result<HealthResponse, ApiError> {
        let health = req.into_user_health()?;
        let record = HealthRepository::upsert(pool, user_id, &health)
            .await
            .map_err(ApiError::Internal)?;

        info!(goal = %health.goal, activity = %health.activity_level, "Health settings saved");
        to_response(record)
    }
}
