//! Nutrition reports
//!
//! Aggregates logged food totals into daily progress against targets and
//! into weekly (per day) or monthly (per month) report series.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::food::NutritionTotals;

pub const WEEKLY_RANGES: &[u32] = &[7, 14, 30];
pub const MONTHLY_RANGES: &[u32] = &[3, 6, 12];

// ============================================================================
// Daily Progress
// ============================================================================

/// Percentage of `target` reached, clamped to 0..=100. Zero when there is no target.
pub fn progress_percentage(current: f64, target: f64) -> f64 {
    if target <= 0.0 || !target.is_finite() {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

/// Sum the totals of a day's entries
pub fn daily_totals<'a>(entries: impl IntoIterator<Item = &'a NutritionTotals>) -> NutritionTotals {
    entries.into_iter().fold(NutritionTotals::default(), |mut acc, t| {
        acc.add(t);
        acc
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub consumed: f64,
    pub target: f64,
    pub percentage: f64,
}

impl Progress {
    pub fn new(consumed: f64, target: f64) -> Self {
        Self {
            consumed,
            target,
            percentage: progress_percentage(consumed, target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub entry_count: usize,
    pub calories: Progress,
    pub protein: Progress,
    pub carbs: Progress,
    pub fat: Progress,
}

pub fn daily_progress(date: NaiveDate, entries: &[NutritionTotals], targets: &NutritionTotals) -> DailyProgress {
    let consumed = daily_totals(entries);
    DailyProgress {
        date,
        entry_count: entries.len(),
        calories: Progress::new(consumed.calories, targets.calories),
        protein: Progress::new(consumed.protein, targets.protein),
        carbs: Progress::new(consumed.carbs, targets.carbs),
        fat: Progress::new(consumed.fat, targets.fat),
    }
}

// ============================================================================
// Period Reports
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// One bucket per day
    Weekly,
    /// One bucket per calendar month
    Monthly,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
        }
    }

    pub fn allowed_ranges(&self) -> &'static [u32] {
        match self {
            ReportPeriod::Weekly => WEEKLY_RANGES,
            ReportPeriod::Monthly => MONTHLY_RANGES,
        }
    }

    pub fn default_range(&self) -> u32 {
        self.allowed_ranges()[0]
    }

    pub fn validate_range(&self, range: u32) -> Result<(), String> {
        if self.allowed_ranges().contains(&range) {
            Ok(())
        } else {
            Err(format!(
                "Invalid range {} for {} report. Must be one of: {}",
                range,
                self.as_str(),
                self.allowed_ranges()
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        }
    }

    /// First day covered by a report of `range` buckets ending on `today`
    pub fn window_start(&self, range: u32, today: NaiveDate) -> NaiveDate {
        let back = range.saturating_sub(1);
        match self {
            ReportPeriod::Weekly => today - chrono::Duration::days(back as i64),
            ReportPeriod::Monthly => {
                let month_start = today.with_day(1).unwrap_or(today);
                month_start.checked_sub_months(Months::new(back)).unwrap_or(month_start)
            }
        }
    }

    fn key(&self, date: NaiveDate) -> String {
        match self {
            ReportPeriod::Weekly => date.format("%Y-%m-%d").to_string(),
            ReportPeriod::Monthly => date.format("%Y-%m").to_string(),
        }
    }

    fn label(&self, date: NaiveDate) -> String {
        match self {
            ReportPeriod::Weekly => date.format("%Y-%m-%d").to_string(),
            ReportPeriod::Monthly => date.format("%m/%Y").to_string(),
        }
    }

    fn step(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            ReportPeriod::Weekly => date.succ_opt(),
            ReportPeriod::Monthly => date.checked_add_months(Months::new(1)),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" => Ok(ReportPeriod::Weekly),
            "monthly" => Ok(ReportPeriod::Monthly),
            _ => Err(format!("Unknown report period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBucket {
    pub key: String,
    pub label: String,
    pub entry_count: usize,
    #[serde(flatten)]
    pub totals: NutritionTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_calories: f64,
    pub avg_calories: f64,
    pub total_protein: f64,
    pub avg_protein: f64,
    pub total_carbs: f64,
    pub avg_carbs: f64,
    pub total_fat: f64,
    pub avg_fat: f64,
}

impl ReportSummary {
    fn from_buckets(buckets: &[ReportBucket]) -> Self {
        let totals = daily_totals(buckets.iter().map(|b| &b.totals));
        let avg = |total: f64| {
            if buckets.is_empty() {
                0.0
            } else {
                total / buckets.len() as f64
            }
        };
        Self {
            total_calories: totals.calories,
            avg_calories: avg(totals.calories),
            total_protein: totals.protein,
            avg_protein: avg(totals.protein),
            total_carbs: totals.carbs,
            avg_carbs: avg(totals.carbs),
            total_fat: totals.fat,
            avg_fat: avg(totals.fat),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionReport {
    pub period: ReportPeriod,
    pub range: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub buckets: Vec<ReportBucket>,
    pub summary: ReportSummary,
}

/// Build a report of `range` buckets ending on `today`.
///
/// `entries` pairs each entry's consumption date with its totals. Entries
/// outside the window are ignored and empty buckets are zero-filled.
pub fn build_report(
    period: ReportPeriod,
    range: u32,
    today: NaiveDate,
    entries: &[(NaiveDate, NutritionTotals)],
) -> NutritionReport {
    let start = period.window_start(range, today);
    let mut buckets: BTreeMap<String, ReportBucket> = BTreeMap::new();

    let mut cursor = Some(start);
    while let Some(date) = cursor.filter(|d| *d <= today) {
        buckets.insert(
            period.key(date),
            ReportBucket {
                key: period.key(date),
                label: period.label(date),
                entry_count: 0,
                totals: NutritionTotals::default(),
            },
        );
        cursor = period.step(date);
    }

    for (date, totals) in entries {
        if *date < start || *date > today {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(&period.key(*date)) {
            bucket.totals.add(totals);
            bucket.entry_count += 1;
        }
    }

    let buckets: Vec<ReportBucket> = buckets.into_values().collect();
    let summary = ReportSummary::from_buckets(&buckets);

    NutritionReport {
        period,
        range,
        start,
        end: today,
        buckets,
        summary,
    }
}
