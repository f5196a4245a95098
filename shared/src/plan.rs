//! Weekly plan generation
//!
//! Single entry point for building a [`WeeklyPlan`] from [`UserHealth`].
//! Meal selection draws from an explicit random source, so the same input
//! and seed always yield the same plan. Regenerating a plan means picking a
//! new seed.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::errors::PlanResult;
use crate::health_metrics::UserHealth;
use crate::meals::{generate_daily_meals, DailyMeals};
use crate::nutrition::{calculate_nutrition, GoalPolicy, NutritionPlan};
use crate::recommendations::build_recommendations;
use crate::workout::{build_workout_week, DayOfWeek, Workout};

/// Options that shape a generated plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOptions {
    pub goal_policy: GoalPolicy,
    pub include_meals: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            goal_policy: GoalPolicy::default(),
            include_meals: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub workout: Workout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<DailyMeals>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub nutrition: NutritionPlan,
    pub days: BTreeMap<DayOfWeek, DayPlan>,
    pub recommendations: Vec<String>,
    pub goal_policy: GoalPolicy,
    pub seed: u64,
}

impl WeeklyPlan {
    pub fn day(&self, day: DayOfWeek) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    /// The entry for the weekday of `date`
    pub fn for_date(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.day(DayOfWeek::from(date))
    }
}

/// Generate a weekly plan using `rng` for meal selection
pub fn generate_weekly_plan<R: Rng + ?Sized>(
    health: &UserHealth,
    options: PlanOptions,
    seed: u64,
    rng: &mut R,
) -> PlanResult<WeeklyPlan> {
    let nutrition = calculate_nutrition(health, options.goal_policy)?;
    let workouts = build_workout_week(health.goal, health.activity_level);

    let days = workouts
        .into_iter()
        .map(|(day, workout)| {
            let meals = options
                .include_meals
                .then(|| generate_daily_meals(nutrition.daily_calories, rng));
            (day, DayPlan { workout, meals })
        })
        .collect();

    Ok(WeeklyPlan {
        nutrition,
        days,
        recommendations: build_recommendations(health),
        goal_policy: options.goal_policy,
        seed,
    })
}

/// Generate a weekly plan that is reproducible from `seed`
pub fn generate_seeded_plan(health: &UserHealth, options: PlanOptions, seed: u64) -> PlanResult<WeeklyPlan> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_weekly_plan(health, options, seed, &mut rng)
}

/// Stable seed for a user on a given date
pub fn plan_seed(user_id: Uuid, date: NaiveDate) -> u64 {
    let (hi, lo) = user_id.as_u64_pair();
    let days = date.num_days_from_ce() as u64;
    hi ^ lo.rotate_left(17) ^ days.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
