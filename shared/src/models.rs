//! Data models for the Calorie Tracker application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::food::{EntryType, FoodData, MealType, NutritionTotals};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daily goals and reminder settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub daily_calorie_goal: i32,
    pub protein_goal: i32,
    pub carbs_goal: i32,
    pub fat_goal: i32,
    pub reminder_enabled: bool,
    /// 24-hour HH:MM
    pub reminder_time: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            daily_calorie_goal: 2000,
            protein_goal: 50,
            carbs_goal: 250,
            fat_goal: 70,
            reminder_enabled: false,
            reminder_time: "19:00".to_string(),
        }
    }
}

impl UserPreferences {
    /// Goals as nutrition targets for progress tracking
    pub fn targets(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.daily_calorie_goal as f64,
            protein: self.protein_goal as f64,
            carbs: self.carbs_goal as f64,
            fat: self.fat_goal as f64,
        }
    }
}

/// Contact and display details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetails {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

/// Logged food entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub food_data: FoodData,
    pub entry_type: EntryType,
    pub meal_type: MealType,
    pub consumed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_defaults() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.daily_calorie_goal, 2000);
        assert_eq!(prefs.reminder_time, "19:00");
        assert_eq!(prefs.targets().fat, 70.0);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::nil(),
            email: "a@b.co".to_string(),
            name: None,
            password_hash: "secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
    }
}
