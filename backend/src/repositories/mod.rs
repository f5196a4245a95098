//! Database repositories
//!
//! Thin sqlx wrappers returning `anyhow::Result`; services map errors to
//! API errors.

pub mod food_entries;
pub mod health;
pub mod plans;
pub mod preferences;
pub mod profile;
pub mod user;

pub use food_entries::{CreateFoodEntry, FoodEntryRecord, FoodEntryRepository, TimeWindow};
pub use health::{HealthRecord, HealthRepository};
pub use plans::{PlanRecord, PlanRepository};
pub use preferences::PreferencesRepository;
pub use profile::ProfileRepository;
pub use user::{UserRecord, UserRepository};
