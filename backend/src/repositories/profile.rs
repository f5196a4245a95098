//! Contact and display details

use anyhow::Result;
use calorie_tracker_shared::ProfileDetails;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

impl From<ProfileRecord> for ProfileDetails {
    fn from(r: ProfileRecord) -> Self {
        ProfileDetails {
            display_name: r.display_name,
            email: r.email,
            birthday: r.birthday,
            phone_number: r.phone_number,
        }
    }
}

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            SELECT display_name, email, birthday, phone_number
            FROM profile_details
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn upsert(pool: &PgPool, user_id: Uuid, details: &ProfileDetails) -> Result<ProfileRecord> {
        let record = sqlx::query_as::<_, ProfileRecord>(
            r#"
            INSERT INTO profile_details (user_id, display_name, email, birthday, phone_number)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                email = EXCLUDED.email,
                birthday = EXCLUDED.birthday,
                phone_number = EXCLUDED.phone_number,
                updated_at = NOW()
            RETURNING display_name, email, birthday, phone_number
            "#,
        )
        .bind(user_id)
        .bind(&details.display_name)
        .bind(&details.email)
        .bind(details.birthday)
        .bind(&details.phone_number)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
