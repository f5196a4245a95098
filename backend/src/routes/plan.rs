//! Weekly plan routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::PlanService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use calorie_tracker_shared::types::{GeneratePlanRequest, PlanDateQuery, PlanResponse, TodayPlanResponse};
use chrono::Utc;

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(latest_plan))
        .route("/generate", post(generate_plan))
        .route("/today", get(today_plan))
}

/// POST /api/v1/plan/generate
///
/// An empty body is treated as `{}`.
async fn generate_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    req: Option<Json<GeneratePlanRequest>>,
) -> ApiResult<(StatusCode, Json<PlanResponse>)> {
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let plan = PlanService::generate(
        state.db(),
        state.config().plan.options(),
        auth.user_id,
        req,
        Utc::now().date_naive(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /api/v1/plan
async fn latest_plan(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<PlanResponse>> {
    Ok(Json(PlanService::latest(state.db(), auth.user_id).await?))
}

/// GET /api/v1/plan/today?date=YYYY-MM-DD
async fn today_plan(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PlanDateQuery>,
) -> ApiResult<Json<TodayPlanResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(PlanService::for_date(state.db(), auth.user_id, date).await?))
}
