//! Health settings, preferences and profile details

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{HealthService, PreferencesService, ProfileService};
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use calorie_tracker_shared::types::{
    HealthResponse, UpdateHealthRequest, UpdatePreferencesRequest, UpdateProfileDetailsRequest,
};
use calorie_tracker_shared::{ProfileDetails, UserPreferences};
use chrono::Utc;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(get_health).put(update_health))
        .route("/preferences", get(get_preferences).put(update_preferences))
        .route("/profile", get(get_profile).put(update_profile))
}

/// GET /api/v1/user/health - `null` until saved
async fn get_health(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Option<HealthResponse>>> {
    Ok(Json(HealthService::get(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/user/health
async fn update_health(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateHealthRequest>,
) -> ApiResult<Json<HealthResponse>> {
    Ok(Json(HealthService::update(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/user/preferences
async fn get_preferences(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserPreferences>> {
    Ok(Json(PreferencesService::get(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/user/preferences
async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<UserPreferences>> {
    Ok(Json(PreferencesService::update(state.db(), auth.user_id, req).await?))
}

/// GET /api/v1/user/profile
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ProfileDetails>> {
    Ok(Json(ProfileService::get(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/user/profile
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileDetailsRequest>,
) -> ApiResult<Json<ProfileDetails>> {
    let today = Utc::now().date_naive();
    Ok(Json(ProfileService::update(state.db(), auth.user_id, req, today).await?))
}
