//! API request and response types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::food::{FoodData, FoodItem, MealType};
use crate::health_metrics::{ActivityLevel, Gender, Goal, UserHealth};
use crate::models::FoodEntry;
use crate::nutrition::NutritionPlan;
use crate::plan::{DayPlan, WeeklyPlan};
use crate::reports::DailyProgress;
use crate::units::{round_measurement, HeightUnit, WeightUnit};
use crate::validation::ValidationError;
use crate::workout::DayOfWeek;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: Option<String>,
}

/// Current user response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Health Types
// ============================================================================

/// Health settings submitted by the user
///
/// Enum fields arrive as text so that unknown values produce a field-level
/// validation message rather than a generic deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateHealthRequest {
    pub age: i32,
    pub weight: f64,
    pub height: f64,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
    /// Unit of `weight` (defaults to kg)
    #[serde(default)]
    pub weight_unit: Option<String>,
    /// Unit of `height` (defaults to cm)
    #[serde(default)]
    pub height_unit: Option<String>,
}

impl UpdateHealthRequest {
    /// Parse enums, convert units to kg/cm and range-check the result
    ///
    /// Weight and height are rounded to their stored precision before the
    /// range check, so a value that rounds onto a bound is rejected here.
    pub fn into_user_health(self) -> Result<UserHealth, ValidationError> {
        let weight_unit = match self.weight_unit.as_deref() {
            Some(unit) => unit
                .parse::<WeightUnit>()
                .map_err(|e| ValidationError::new("weight_unit", &e))?,
            None => WeightUnit::Kg,
        };
        let height_unit = match self.height_unit.as_deref() {
            Some(unit) => unit
                .parse::<HeightUnit>()
                .map_err(|e| ValidationError::new("height_unit", &e))?,
            None => HeightUnit::Cm,
        };
        let gender = self
            .gender
            .parse::<Gender>()
            .map_err(|e| ValidationError::new("gender", e.message()))?;
        let activity_level = self
            .activity_level
            .parse::<ActivityLevel>()
            .map_err(|e| ValidationError::new("activity_level", e.message()))?;
        let goal = self
            .goal
            .parse::<Goal>()
            .map_err(|e| ValidationError::new("goal", e.message()))?;

        let health = UserHealth {
            age: self.age,
            weight: round_measurement(weight_unit.to_kg(self.weight)),
            height: round_measurement(height_unit.to_cm(self.height)),
            gender,
            activity_level,
            goal,
        };
        health
            .validate()
            .map_err(|e| ValidationError::new(invalid_field(e.message()), e.message()))?;
        Ok(health)
    }
}

fn invalid_field(message: &str) -> &'static str {
    if message.starts_with("Age") {
        "age"
    } else if message.starts_with("Weight") {
        "weight"
    } else {
        "height"
    }
}

/// Stored health settings with derived energy figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(flatten)]
    pub health: UserHealth,
    pub bmr: f64,
    pub tdee: f64,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Preferences and Profile Types
// ============================================================================

/// Partial update of daily goals and reminders
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePreferencesRequest {
    #[validate(range(min = 500, max = 10000))]
    pub daily_calorie_goal: Option<i32>,
    #[validate(range(min = 0, max = 2000))]
    pub protein_goal: Option<i32>,
    #[validate(range(min = 0, max = 2000))]
    pub carbs_goal: Option<i32>,
    #[validate(range(min = 0, max = 2000))]
    pub fat_goal: Option<i32>,
    pub reminder_enabled: Option<bool>,
    pub reminder_time: Option<String>,
}

/// Partial update of profile details
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileDetailsRequest {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub phone_number: Option<String>,
}

// ============================================================================
// Plan Types
// ============================================================================

/// Plan generation options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    /// Draw a fresh random seed instead of the per-day seed
    #[serde(default)]
    pub regenerate: bool,
    /// Reference date for the per-day seed (defaults to today, UTC)
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub include_meals: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    pub id: Uuid,
    pub plan: WeeklyPlan,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayPlanResponse {
    pub date: NaiveDate,
    pub day: DayOfWeek,
    pub nutrition: NutritionPlan,
    pub plan: DayPlan,
}

// ============================================================================
// Food Types
// ============================================================================

/// Manually logged food
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFoodEntryRequest {
    #[validate(length(min = 1, max = 50, message = "At least one food item is required"))]
    pub items: Vec<FoodItem>,
    /// Defaults to the first item's name
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub food_name: Option<String>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub consumed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodEntriesQuery {
    /// Only entries consumed on this UTC date
    pub date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl FoodEntriesQuery {
    pub const DEFAULT_LIMIT: i64 = 10;
    pub const MAX_LIMIT: i64 = 100;

    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Barcode lookup that is saved as an entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeEntryRequest {
    pub barcode: String,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub consumed_at: Option<DateTime<Utc>>,
}

/// Where a food analysis came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Ai,
    Mock,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Ai => "ai",
            AnalysisSource::Mock => "mock",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysisResponse {
    pub entry: FoodEntry,
    pub analysis: FoodData,
    pub source: AnalysisSource,
}

// ============================================================================
// Report Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyReportQuery {
    pub date: Option<NaiveDate>,
    /// `plan` compares against the stored weekly plan when one exists
    #[serde(default)]
    pub targets: Option<TargetSource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// weekly or monthly (defaults to weekly)
    pub period: Option<String>,
    /// Days for weekly (7, 14, 30) or months for monthly (3, 6, 12)
    pub range: Option<u32>,
}

/// Where daily targets were taken from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSource {
    Plan,
    #[default]
    Preferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReportResponse {
    #[serde(flatten)]
    pub progress: DailyProgress,
    pub target_source: TargetSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn health_request() -> UpdateHealthRequest {
        UpdateHealthRequest {
            age: 30,
            weight: 154.0,
            height: 175.0,
            gender: "male".to_string(),
            activity_level: "moderately_active".to_string(),
            goal: "maintain".to_string(),
            weight_unit: Some("lbs".to_string()),
            height_unit: None,
        }
    }

    #[test]
    fn test_health_request_converts_pounds() {
        let health = health_request().into_user_health().unwrap();
        assert!((health.weight - 69.853).abs() < 1e-9);
        assert_eq!(health.activity_level, ActivityLevel::Moderate);
    }

    #[test]
    fn test_health_request_reports_field() {
        let req = UpdateHealthRequest { goal: "bulk".to_string(), ..health_request() };
        let err = req.into_user_health().unwrap_err();
        assert_eq!(err.field, "goal");

        let req = UpdateHealthRequest { height: 400.0, ..health_request() };
        let err = req.into_user_health().unwrap_err();
        assert_eq!(err.field, "height");

        let req = UpdateHealthRequest { age: 0, ..health_request() };
        assert_eq!(req.into_user_health().unwrap_err().field, "age");
    }

    #[test]
    fn test_health_request_rounds_before_range_check() {
        let kg = |weight: f64| UpdateHealthRequest { weight, weight_unit: None, ..health_request() };

        assert_eq!(kg(499.9996).into_user_health().unwrap_err().field, "weight");
        assert_eq!(kg(0.0004).into_user_health().unwrap_err().field, "weight");
        assert_eq!(kg(499.9994).into_user_health().unwrap().weight, 499.999);
        assert_eq!(kg(0.0006).into_user_health().unwrap().weight, 0.001);

        let req = UpdateHealthRequest { height: 299.9999, ..health_request() };
        assert_eq!(req.into_user_health().unwrap_err().field, "height");

        // 1102.312 lb is 499.9999 kg, stored as 500.000
        let req = UpdateHealthRequest { weight: 1102.312, ..health_request() };
        assert_eq!(req.into_user_health().unwrap_err().field, "weight");
    }

    #[test]
    fn test_entries_limit() {
        assert_eq!(FoodEntriesQuery::default().effective_limit(), 10);
        let q = FoodEntriesQuery { limit: Some(500), date: None };
        assert_eq!(q.effective_limit(), 100);
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
            name: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_preferences_validation() {
        let req = UpdatePreferencesRequest { daily_calorie_goal: Some(100), ..Default::default() };
        assert!(req.validate().is_err());
        assert!(UpdatePreferencesRequest::default().validate().is_ok());
    }
}
