//! Calorie Tracker Shared Library
//!
//! Domain logic shared by the backend and the WASM bindings: the
//! nutrition and weekly plan calculator, food data, report aggregation,
//! validation and API types. Nothing in this crate performs I/O.

pub mod errors;
pub mod food;
pub mod health_metrics;
pub mod meals;
pub mod models;
pub mod nutrition;
pub mod plan;
pub mod recommendations;
pub mod reports;
pub mod types;
pub mod units;
pub mod validation;
pub mod workout;

// Re-export commonly used items
pub use errors::*;
pub use food::{EntryType, FoodData, FoodItem, MealType, NutritionTotals};
pub use health_metrics::{ActivityLevel, Gender, Goal, UserHealth};
pub use models::{FoodEntry, ProfileDetails, User, UserPreferences};
pub use nutrition::{calculate_nutrition, GoalPolicy, Macros, NutritionPlan, DEFAULT_GOAL_POLICY};
pub use plan::{generate_seeded_plan, generate_weekly_plan, plan_seed, DayPlan, PlanOptions, WeeklyPlan};
pub use units::*;
pub use workout::DayOfWeek;
