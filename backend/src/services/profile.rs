//! Profile details

use crate::error::ApiError;
use crate::repositories::ProfileRepository;
use calorie_tracker_shared::types::UpdateProfileDetailsRequest;
use calorie_tracker_shared::validation::{validate_birthday, validate_phone_number, ValidationError};
use calorie_tracker_shared::ProfileDetails;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

pub struct ProfileService;

pub(crate) fn merge_profile(
    current: ProfileDetails,
    req: UpdateProfileDetailsRequest,
    today: NaiveDate,
) -> Result<ProfileDetails, ApiError> {
    req.validate()?;
    if let Some(phone) = req.phone_number.as_deref() {
        validate_phone_number(phone).map_err(|e| ValidationError::new("phone_number", &e))?;
    }
    if let Some(birthday) = req.birthday {
        validate_birthday(birthday, today).map_err(|e| ValidationError::new("birthday", &e))?;
    }

    Ok(ProfileDetails {
        display_name: req.display_name.or(current.display_name),
        email: req.email.or(current.email),
        birthday: req.birthday.or(current.birthday),
        phone_number: req.phone_number.or(current.phone_number),
    })
}

impl ProfileService {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<ProfileDetails, ApiError> {
        Ok(ProfileRepository::get(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(ProfileDetails::from)
            .unwrap_or_default())
    }

    #[instrument(skip(pool, req))]
    pub async fn update(
        pool: &PgPool,
        user_id: Uuid,
        req: UpdateProfileDetailsRequest,
        today: NaiveDate,
    ) -> Result<ProfileDetails, ApiError> {
        let current = Self::get(pool, user_id).await?;
        let merged = merge_profile(current, req, today)?;
        let record = ProfileRepository::upsert(pool, user_id, &merged)
            .await
            .map_err(ApiError::Internal)?;
        Ok(record.into())
    }
}
