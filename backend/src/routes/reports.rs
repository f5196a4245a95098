//! Nutrition reports

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::ReportService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use calorie_tracker_shared::reports::NutritionReport;
use calorie_tracker_shared::types::{DailyReportQuery, DailyReportResponse, SummaryQuery};
use chrono::Utc;

pub fn reports_routes() -> Router<AppState> {
    Router::new()
        .route("/daily", get(daily_report))
        .route("/summary", get(summary_report))
}

/// GET /api/v1/reports/daily?date=YYYY-MM-DD&targets=preferences|plan
async fn daily_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DailyReportQuery>,
) -> ApiResult<Json<DailyReportResponse>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let targets = query.targets.unwrap_or_default();
    Ok(Json(ReportService::daily(state.db(), auth.user_id, date, targets).await?))
}

/// GET /api/v1/reports/summary?period=weekly|monthly&range=
async fn summary_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<NutritionReport>> {
    let today = Utc::now().date_naive();
    Ok(Json(ReportService::summary(state.db(), auth.user_id, query, today).await?))
}
