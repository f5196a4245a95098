//! Daily goals and reminder settings

use anyhow::Result;
use calorie_tracker_shared::UserPreferences;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreferencesRecord {
    pub daily_calorie_goal: i32,
    pub protein_goal: i32,
    pub carbs_goal: i32,
    pub fat_goal: i32,
    pub reminder_enabled: bool,
    pub reminder_time: String,
}

impl From<PreferencesRecord> for UserPreferences {
    fn from(r: PreferencesRecord) -> Self {
        UserPreferences {
            daily_calorie_goal: r.daily_calorie_goal,
            protein_goal: r.protein_goal,
            carbs_goal: r.carbs_goal,
            fat_goal: r.fat_goal,
            reminder_enabled: r.reminder_enabled,
            reminder_time: r.reminder_time,
        }
    }
}

pub struct PreferencesRepository;

impl PreferencesRepository {
    pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<PreferencesRecord>> {
        let record = sqlx::query_as::<_, PreferencesRecord>(
            r#"
            SELECT daily_calorie_goal, protein_goal, carbs_goal, fat_goal,
                   reminder_enabled, reminder_time
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn upsert(pool: &PgPool, user_id: Uuid, prefs: &UserPreferences) -> Result<PreferencesRecord> {
        let record = sqlx::query_as::<_, PreferencesRecord>(
            r#"
            INSERT INTO user_preferences
                (user_id, daily_calorie_goal, protein_goal, carbs_goal, fat_goal,
                 reminder_enabled, reminder_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                daily_calorie_goal = EXCLUDED.daily_calorie_goal,
                protein_goal = EXCLUDED.protein_goal,
                carbs_goal = EXCLUDED.carbs_goal,
                fat_goal = EXCLUDED.fat_goal,
                reminder_enabled = EXCLUDED.reminder_enabled,
                reminder_time = EXCLUDED.reminder_time,
                updated_at = NOW()
            RETURNING daily_calorie_goal, protein_goal, carbs_goal, fat_goal,
                      reminder_enabled, reminder_time
            "#,
        )
        .bind(user_id)
        .bind(prefs.daily_calorie_goal)
        .bind(prefs.protein_goal)
        .bind(prefs.carbs_goal)
        .bind(prefs.fat_goal)
        .bind(prefs.reminder_enabled)
        .bind(&prefs.reminder_time)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }
}
