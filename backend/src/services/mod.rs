//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod export;
pub mod food;
pub mod health;
pub mod plan;
pub mod preferences;
pub mod profile;
pub mod reports;
pub mod user;

pub use export::ExportService;
pub use food::{BarcodeCache, FoodService, ImageUpload};
pub use health::HealthService;
pub use plan::PlanService;
pub use preferences::PreferencesService;
pub use profile::ProfileService;
pub use reports::ReportService;
pub use user::UserService;
