//! Daily goals and reminders
//!
//! Updates are partial: omitted fields keep their stored (or default) value.

use crate::error::ApiError;
use crate::repositories::PreferencesRepository;
use calorie_tracker_shared::types::UpdatePreferencesRequest;
use calorie_tracker_shared::validation::{validate_reminder_time, ValidationError};
use calorie_tracker_shared::UserPreferences;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

pub struct PreferencesService;

/// Overlay the request's fields on `current`
pub(crate) fn merge_preferences(
    current: UserPreferences,
    req: UpdatePreferencesRequest,
) -> Result<UserPreferences, ApiError> {
    req.validate()?;
    if let Some(time) = req.reminder_time.as_deref() {
        validate_reminder_time(time).map_err(|e| ValidationError::new("reminder_time", &e))?;
    }

    Ok(UserPreferences {
        daily_calorie_goal: req.daily_calorie_goal.unwrap_or(current.daily_calorie_goal),
        protein_goal: req.protein_goal.unwrap_or(current.protein_goal),
        carbs_goal: req.carbs_goal.unwrap_or(current.carbs_goal),
        fat_goal: req.fat_goal.unwrap_or(current.fat_goal),
        reminder_enabled: req.reminder_enabled.unwrap_or(current.reminder_enabled),
        reminder_time: req.reminder_time.unwrap_or(current.reminder_time),
    })
}

impl PreferencesService {
    /// Stored preferences, defaults when none were saved
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<UserPreferences, ApiError> {
        Ok(PreferencesRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(UserPreferences::from)
            .unwrap_or_default())
    }

    #[instrument(skip(pool, req))]
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdatePreferencesRequest,
    ) -> Result<UserPreferences, ApiError> {
        let current = Self::get(pool, user_id).await?;
        let merged = merge_preferences(current, req)?;
        let record = PreferencesRepository::upsert(pool, user_id, &merged)
            .await
            .map_err(ApiError::Internal)?;
        Ok(record.into())
    }
}
