//! Daily progress and period summaries over logged food

use crate::error::ApiError;
use crate::repositories::{FoodEntryRecord, FoodEntryRepository, PlanRepository, TimeWindow};
use crate::services::PreferencesService;
use calorie_tracker_shared::reports::{build_report, daily_progress, NutritionReport, ReportPeriod};
use calorie_tracker_shared::types::{DailyReportResponse, SummaryQuery, TargetSource};
use calorie_tracker_shared::{NutritionPlan, NutritionTotals};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

pub struct ReportService;

pub(crate) fn plan_targets(nutrition: &NutritionPlan) -> NutritionTotals {
    NutritionTotals {
        calories: nutrition.daily_calories as f64,
        protein: nutrition.macros.protein as f64,
        carbs: nutrition.macros.carbs as f64,
        fat: nutrition.macros.fat as f64,
    }
}

/// Resolve the period and range of a summary request
pub(crate) fn summary_window(query: &SummaryQuery) -> Result<(ReportPeriod, u32), ApiError> {
    let period = match query.period.as_deref() {
        Some(raw) => raw
            .trim()
            .to_lowercase()
            .parse::<ReportPeriod>()
            .map_err(|e| ApiError::field("period", e))?,
        None => ReportPeriod::Weekly,
    };
    let range = query.range.unwrap_or_else(|| period.default_range());
    period.validate_range(range).map_err(|e| ApiError::field("range", e))?;
    Ok((period, range))
}

fn dated_totals(records: Vec<FoodEntryRecord>) -> Vec<(NaiveDate, NutritionTotals)> {
    records
        .into_iter()
        .map(|r| (r.consumed_at.date_naive(), r.food_data.0.total))
        .collect()
}

impl ReportService {
    /// Consumption against targets for one day
    ///
    /// Targets come from the preferences unless `requested` is
    /// [`TargetSource::Plan`] and a plan has been generated.
    #[instrument(skip(pool))]
    pub async fn daily(
        pool: &PgPool,
        user_id: Uuid,
        date: NaiveDate,
        requested: TargetSource,
    ) -> Result<DailyReportResponse, ApiError> {
        let records = FoodEntryRepository::in_window(pool, user_id, TimeWindow::day(date))
            .await
            .map_err(ApiError::Internal)?;
        let totals: Vec<NutritionTotals> = records.into_iter().map(|r| r.food_data.0.total).collect();

        let plan = match requested {
            TargetSource::Plan => PlanRepository::latest(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
            TargetSource::Preferences => None,
        };
        let (targets, target_source) = match plan {
            Some(record) => (plan_targets(&record.plan.0.nutrition), TargetSource::Plan),
            None => (
                PreferencesService::get(pool, user_id).await?.targets(),
                TargetSource::Preferences,
            ),
        };

        Ok(DailyReportResponse {
            progress: daily_progress(date, &totals, &targets),
            target_source,
        })
    }

    #[instrument(skip(pool, query))]
    pub async fn summary(
        pool: &PgPool,
        user_id: Uuid,
        query: SummaryQuery,
        today: NaiveDate,
    ) -> Result<NutritionReport, ApiError> {
        let (period, range) = summary_window(&query)?;
        let window = TimeWindow::days(period.window_start(range, today), today);
        let records = FoodEntryRepository::in_window(pool, user_id, window)
            .await
            .map_err(ApiError::Internal)?;

        Ok(build_report(period, range, today, &dated_totals(records)))
    }
}
