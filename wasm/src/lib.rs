//! Calorie Tracker WASM Module
//!
//! WebAssembly bindings so the browser can preview nutrition targets and
//! weekly plans without a round trip to the API. Inputs and outputs are
//! JSON strings in the same shape the API uses.

use calorie_tracker_shared::{
    calculate_nutrition, generate_seeded_plan, GoalPolicy, PlanOptions, UserHealth,
};
use wasm_bindgen::prelude::*;

fn parse_health(health_json: &str) -> Result<UserHealth, JsValue> {
    serde_json::from_str(health_json).map_err(|e| JsValue::from_str(&format!("Invalid health JSON: {}", e)))
}

fn parse_policy(policy: &str) -> Result<GoalPolicy, JsValue> {
    if policy.is_empty() {
        return Ok(GoalPolicy::default());
    }
    policy.parse().map_err(|e: calorie_tracker_shared::PlanError| JsValue::from_str(e.message()))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Daily calorie and macro targets as JSON
///
/// `policy` is "multiplicative", "additive", or empty for the default.
#[wasm_bindgen]
pub fn calculate_nutrition_json(health_json: &str, policy: &str) -> Result<String, JsValue> {
    let health = parse_health(health_json)?;
    let plan = calculate_nutrition(&health, parse_policy(policy)?)
        .map_err(|e| JsValue::from_str(e.message()))?;
    to_json(&plan)
}

/// Full weekly plan as JSON, reproducible from `seed`
#[wasm_bindgen]
pub fn generate_weekly_plan_json(health_json: &str, seed: u64, include_meals: bool) -> Result<String, JsValue> {
    let health = parse_health(health_json)?;
    let options = PlanOptions {
        include_meals,
        ..PlanOptions::default()
    };
    let plan = generate_seeded_plan(&health, options, seed).map_err(|e| JsValue::from_str(e.message()))?;
    to_json(&plan)
}
