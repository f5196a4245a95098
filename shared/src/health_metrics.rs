//! Body metrics and energy expenditure
//!
//! Holds the user's health inputs and the BMR/TDEE calculations the plan
//! generator builds on.
//!
//! All values are SI: weight in kilograms, height in centimeters. Conversion
//! from other units happens at the API boundary (see [`crate::units`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{PlanError, PlanResult};

/// Inclusive age bounds in years
pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 120;
/// Exclusive upper bound for weight in kg
pub const MAX_WEIGHT_KG: f64 = 500.0;
/// Exclusive upper bound for height in cm
pub const MAX_HEIGHT_CM: f64 = 300.0;

// ============================================================================
// Enumerations
// ============================================================================

/// Gender used for the Mifflin-St Jeor offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Uses the female offset
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    /// Constant term added to the Mifflin-St Jeor base
    pub fn bmr_offset(&self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female | Gender::Other => -161.0,
        }
    }
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[serde(alias = "lightly_active")]
    Light,
    /// Moderate exercise 3-5 days/week
    #[serde(alias = "moderately_active")]
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Very hard exercise or physical job
    #[serde(alias = "extra_active")]
    VeryActive,
}

impl ActivityLevel {
    /// Ordered from least to most active
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }

    /// Sedentary and light users get beginner-adjusted workouts
    pub fn is_beginner(&self) -> bool {
        matches!(self, ActivityLevel::Sedentary | ActivityLevel::Light)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::Light => "Light exercise 1-3 days/week",
            ActivityLevel::Moderate => "Moderate exercise 3-5 days/week",
            ActivityLevel::Active => "Hard exercise 6-7 days/week",
            ActivityLevel::VeryActive => "Very hard exercise or physical job",
        }
    }
}

/// Body-weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::Lose, Goal::Maintain, Goal::Gain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Lose => "lose",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }
}

macro_rules! impl_text_enum {
    ($ty:ident, $label:literal, { $($text:literal => $variant:expr),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = PlanError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($variant),)+
                    other => Err(PlanError::invalid(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        $label,
                        other,
                        Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
                    ))),
                }
            }
        }
    };
}

impl_text_enum!(Gender, "gender", {
    "male" => Gender::Male,
    "female" => Gender::Female,
    "other" => Gender::Other,
});

impl_text_enum!(ActivityLevel, "activity level", {
    "sedentary" => ActivityLevel::Sedentary,
    "light" => ActivityLevel::Light,
    "lightly_active" => ActivityLevel::Light,
    "moderate" => ActivityLevel::Moderate,
    "moderately_active" => ActivityLevel::Moderate,
    "active" => ActivityLevel::Active,
    "very_active" => ActivityLevel::VeryActive,
    "extra_active" => ActivityLevel::VeryActive,
});

impl_text_enum!(Goal, "goal", {
    "lose" => Goal::Lose,
    "maintain" => Goal::Maintain,
    "gain" => Goal::Gain,
});

// ============================================================================
// User Health Inputs
// ============================================================================

/// Body metrics and goal that drive plan generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHealth {
    /// Age in years
    pub age: i32,
    /// Weight in kilograms
    pub weight: f64,
    /// Height in centimeters
    pub height: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl UserHealth {
    /// Check numeric ranges. Enum fields are already valid by construction.
    pub fn validate(&self) -> PlanResult<()> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(PlanError::invalid(format!(
                "Age must be between {} and {} years, got {}",
                MIN_AGE, MAX_AGE, self.age
            )));
        }
        if !self.weight.is_finite() || self.weight <= 0.0 || self.weight >= MAX_WEIGHT_KG {
            return Err(PlanError::invalid(format!(
                "Weight must be greater than 0 and less than {} kg, got {}",
                MAX_WEIGHT_KG, self.weight
            )));
        }
        if !self.height.is_finite() || self.height <= 0.0 || self.height >= MAX_HEIGHT_CM {
            return Err(PlanError::invalid(format!(
                "Height must be greater than 0 and less than {} cm, got {}",
                MAX_HEIGHT_CM, self.height
            )));
        }
        Ok(())
    }

    /// Basal metabolic rate for these metrics
    pub fn bmr(&self) -> f64 {
        calculate_bmr_mifflin(self.weight, self.height, self.age, self.gender)
    }

    /// Unrounded total daily energy expenditure
    pub fn tdee(&self) -> f64 {
        calculate_tdee(self.bmr(), self.activity_level)
    }
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: i32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    base + gender.bmr_offset()
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}
