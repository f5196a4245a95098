//! Daily calorie and macro targets
//!
//! Turns [`UserHealth`] into a [`NutritionPlan`]: TDEE adjusted for the goal,
//! then split into protein, fat and carbohydrate grams.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{PlanError, PlanResult};
use crate::health_metrics::{Goal, UserHealth};

/// kcal per gram
pub const KCAL_PER_GRAM_PROTEIN: i32 = 4;
pub const KCAL_PER_GRAM_CARBS: i32 = 4;
pub const KCAL_PER_GRAM_FAT: i32 = 9;

/// Offset applied by [`GoalPolicy::Additive`]
pub const ADDITIVE_GOAL_OFFSET_KCAL: i32 = 500;

/// Lowest calorie target ever produced
pub const MIN_DAILY_CALORIES: i32 = 1;

/// Policy used everywhere a goal policy is not configured explicitly
pub const DEFAULT_GOAL_POLICY: GoalPolicy = GoalPolicy::Multiplicative;

// ============================================================================
// Types
// ============================================================================

/// Macronutrient amounts in grams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

impl Macros {
    pub fn new(protein: i32, carbs: i32, fat: i32) -> Self {
        Self { protein, carbs, fat }
    }

    /// Energy implied by the macro grams
    pub fn calories(&self) -> i32 {
        self.protein * KCAL_PER_GRAM_PROTEIN + self.carbs * KCAL_PER_GRAM_CARBS + self.fat * KCAL_PER_GRAM_FAT
    }

    /// Each amount multiplied by `factor` and rounded to the nearest gram
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            protein: round_i32(self.protein as f64 * factor),
            carbs: round_i32(self.carbs as f64 * factor),
            fat: round_i32(self.fat as f64 * factor),
        }
    }
}

impl std::ops::Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

/// Daily energy and macro targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionPlan {
    pub daily_calories: i32,
    pub macros: Macros,
}

/// How the goal adjusts maintenance calories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPolicy {
    /// lose ×0.8, maintain ×1.0, gain ×1.2
    #[default]
    Multiplicative,
    /// lose −500 kcal, maintain ±0, gain +500 kcal
    Additive,
}

impl GoalPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPolicy::Multiplicative => "multiplicative",
            GoalPolicy::Additive => "additive",
        }
    }

    /// Apply the goal to a maintenance calorie figure
    pub fn adjust(&self, maintenance: f64, goal: Goal) -> f64 {
        match self {
            GoalPolicy::Multiplicative => maintenance * goal_factor(goal),
            GoalPolicy::Additive => {
                let offset = ADDITIVE_GOAL_OFFSET_KCAL as f64;
                match goal {
                    Goal::Lose => maintenance - offset,
                    Goal::Maintain => maintenance,
                    Goal::Gain => maintenance + offset,
                }
            }
        }
    }
}

impl fmt::Display for GoalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalPolicy {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiplicative" => Ok(GoalPolicy::Multiplicative),
            "additive" => Ok(GoalPolicy::Additive),
            other => Err(PlanError::invalid(format!(
                "Unknown goal policy '{}'. Must be one of: multiplicative, additive",
                other
            ))),
        }
    }
}

// ============================================================================
// Calculations
// ============================================================================

/// Multiplier used by [`GoalPolicy::Multiplicative`]
pub fn goal_factor(goal: Goal) -> f64 {
    match goal {
        Goal::Lose => 0.8,
        Goal::Maintain => 1.0,
        Goal::Gain => 1.2,
    }
}

/// Protein grams per kg of body weight
pub fn protein_factor(goal: Goal) -> f64 {
    match goal {
        Goal::Gain => 2.2,
        Goal::Lose | Goal::Maintain => 2.0,
    }
}

/// Share of calories that come from fat
pub fn fat_fraction(goal: Goal) -> f64 {
    match goal {
        Goal::Lose => 0.30,
        Goal::Maintain | Goal::Gain => 0.25,
    }
}

/// Daily calorie target for validated inputs.
///
/// TDEE is rounded before the goal is applied; the result is rounded again
/// and never drops below [`MIN_DAILY_CALORIES`].
pub fn daily_calories(health: &UserHealth, policy: GoalPolicy) -> i32 {
    let maintenance = health.tdee().round();
    round_i32(policy.adjust(maintenance, health.goal)).max(MIN_DAILY_CALORIES)
}

/// Split a calorie target into macro grams
pub fn calculate_macros(daily_calories: i32, weight_kg: f64, goal: Goal) -> Macros {
    let protein = round_i32(weight_kg * protein_factor(goal));
    let fat = round_i32(daily_calories as f64 * fat_fraction(goal) / KCAL_PER_GRAM_FAT as f64);
    let remaining = daily_calories - (protein * KCAL_PER_GRAM_PROTEIN + fat * KCAL_PER_GRAM_FAT);
    let carbs = round_i32(remaining as f64 / KCAL_PER_GRAM_CARBS as f64).max(0);
    Macros { protein, carbs, fat }
}

/// Validate the inputs and compute the full nutrition target
pub fn calculate_nutrition(health: &UserHealth, policy: GoalPolicy) -> PlanResult<NutritionPlan> {
    health.validate()?;
    let daily_calories = daily_calories(health, policy);
    Ok(NutritionPlan {
        daily_calories,
        macros: calculate_macros(daily_calories, health.weight, health.goal),
    })
}

pub(crate) fn round_i32(value: f64) -> i32 {
    value.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_metrics::{ActivityLevel, Gender};
    use proptest::prelude::*;

    fn reference(goal: Goal) -> UserHealth {
        UserHealth {
            age: 30,
            weight: 70.0,
            height: 175.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
            goal,
        }
    }

    fn arb_health() -> impl Strategy<Value = UserHealth> {
        (
            1i32..=120,
            1.0f64..499.0,
            30.0f64..299.0,
            prop::sample::select(Gender::ALL.to_vec()),
            prop::sample::select(ActivityLevel::ALL.to_vec()),
            prop::sample::select(Goal::ALL.to_vec()),
        )
            .prop_map(|(age, weight, height, gender, activity_level, goal)| UserHealth {
                age,
                weight,
                height,
                gender,
                activity_level,
                goal,
            })
    }

    #[test]
    fn test_reference_maintain() {
        let plan = calculate_nutrition(&reference(Goal::Maintain), GoalPolicy::Multiplicative).unwrap();
        assert_eq!(plan.daily_calories, 2556);
        assert_eq!(plan.macros, Macros::new(140, 339, 71));
    }

    #[test]
    fn test_reference_lose_both_policies() {
        let health = reference(Goal::Lose);
        assert_eq!(daily_calories(&health, GoalPolicy::Multiplicative), 2045);
        assert_eq!(daily_calories(&health, GoalPolicy::Additive), 2056);
    }

    #[test]
    fn test_reference_gain() {
        let plan = calculate_nutrition(&reference(Goal::Gain), DEFAULT_GOAL_POLICY).unwrap();
        // round(2556 * 1.2) = 3067
        assert_eq!(plan.daily_calories, 3067);
        assert_eq!(plan.macros.protein, 154);
        assert_eq!(plan.macros.fat, 85);
    }

    #[test]
    fn test_lose_uses_higher_fat_fraction() {
        let macros = calculate_macros(2000, 70.0, Goal::Lose);
        assert_eq!(macros.fat, 67);
        assert_eq!(macros.protein, 140);
        assert_eq!(macros.carbs, 209);
    }

    #[test]
    fn test_carbs_clamped_at_zero() {
        // 150kg at 800 kcal leaves nothing for carbs
        let macros = calculate_macros(800, 150.0, Goal::Maintain);
        assert_eq!(macros.carbs, 0);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let health = UserHealth { age: 0, ..reference(Goal::Maintain) };
        assert!(calculate_nutrition(&health, DEFAULT_GOAL_POLICY).is_err());
    }

    #[test]
    fn test_goal_policy_parsing() {
        assert_eq!("Additive".parse::<GoalPolicy>().unwrap(), GoalPolicy::Additive);
        assert!("flat".parse::<GoalPolicy>().is_err());
        assert_eq!(GoalPolicy::default(), DEFAULT_GOAL_POLICY);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: maintain protein is 2.0 g/kg
        #[test]
        fn prop_maintain_protein(health in arb_health()) {
            let health = UserHealth { goal: Goal::Maintain, ..health };
            let plan = calculate_nutrition(&health, DEFAULT_GOAL_POLICY).unwrap();
            prop_assert_eq!(plan.macros.protein, (health.weight * 2.0).round() as i32);
        }

        /// Property: gain protein is 2.2 g/kg
        #[test]
        fn prop_gain_protein(health in arb_health()) {
            let health = UserHealth { goal: Goal::Gain, ..health };
            let plan = calculate_nutrition(&health, DEFAULT_GOAL_POLICY).unwrap();
            prop_assert_eq!(plan.macros.protein, (health.weight * 2.2).round() as i32);
        }

        /// Property: calories are positive and carbs never negative
        #[test]
        fn prop_calories_positive_carbs_non_negative(health in arb_health()) {
            for policy in [GoalPolicy::Multiplicative, GoalPolicy::Additive] {
                let plan = calculate_nutrition(&health, policy).unwrap();
                prop_assert!(plan.daily_calories > 0);
                prop_assert!(plan.macros.carbs >= 0);
            }
        }

        /// Property: lose < maintain < gain for realistic adults
        #[test]
        fn prop_goal_ordering(
            age in 18i32..80,
            weight in 40.0f64..200.0,
            height in 140.0f64..210.0,
            activity in prop::sample::select(ActivityLevel::ALL.to_vec()),
            gender in prop::sample::select(Gender::ALL.to_vec())
        ) {
            let base = UserHealth { age, weight, height, gender, activity_level: activity, goal: Goal::Maintain };
            for policy in [GoalPolicy::Multiplicative, GoalPolicy::Additive] {
                let lose = daily_calories(&UserHealth { goal: Goal::Lose, ..base.clone() }, policy);
                let maintain = daily_calories(&base, policy);
                let gain = daily_calories(&UserHealth { goal: Goal::Gain, ..base.clone() }, policy);
                prop_assert!(lose < maintain, "lose {} !< maintain {}", lose, maintain);
                prop_assert!(maintain < gain, "maintain {} !< gain {}", maintain, gain);
            }
        }
    }
}
