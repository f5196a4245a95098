//! CSV export of logged food

use crate::error::ApiError;
use crate::repositories::FoodEntryRepository;
use calorie_tracker_shared::FoodEntry;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One CSV row per entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryCsvRow {
    pub date: String,
    pub food_name: String,
    pub meal_type: String,
    pub entry_type: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<&FoodEntry> for FoodEntryCsvRow {
    fn from(entry: &FoodEntry) -> Self {
        let total = entry.food_data.total;
        Self {
            date: entry.consumed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            food_name: entry.food_name.clone(),
            meal_type: entry.meal_type.as_str().to_string(),
            entry_type: entry.entry_type.as_str().to_string(),
            calories: total.calories,
            protein: total.protein,
            carbs: total.carbs,
            fat: total.fat,
        }
    }
}

pub struct ExportService;

impl ExportService {
    /// Every entry the user has logged, oldest first
    pub async fn export_entries_csv(pool: &PgPool, user_id: Uuid) -> Result<String, ApiError> {
        let entries = FoodEntryRepository::all_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(FoodEntry::try_from)
            .collect::<anyhow::Result<Vec<_>>>()
            .map_err(ApiError::Internal)?;

        let rows: Vec<FoodEntryCsvRow> = entries.iter().map(FoodEntryCsvRow::from).collect();
        Self::to_csv(&rows)
    }

    /// Convert rows to a CSV string with a header line
    pub(crate) fn to_csv<T: Serialize>(data: &[T]) -> Result<String, ApiError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush error: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV encoding error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calorie_tracker_shared::{EntryType, FoodData, FoodItem, MealType};
    use chrono::{TimeZone, Utc};

    fn entry() -> FoodEntry {
        FoodEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            food_name: "Oatmeal, with honey".to_string(),
            food_data: FoodData::from_items(vec![
                FoodItem::new("Oatmeal", 150.0, 5.0, 27.0, 3.0),
                FoodItem::new("Honey", 64.0, 0.0, 17.0, 0.0),
            ]),
            entry_type: EntryType::Manual,
            meal_type: MealType::Breakfast,
            consumed_at: Utc.with_ymd_and_hms(2024, 5, 6, 7, 30, 0).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_uses_entry_totals() {
        let row = FoodEntryCsvRow::from(&entry());
        assert_eq!(row.date, "2024-05-06 07:30:00");
        assert_eq!(row.meal_type, "breakfast");
        assert_eq!(row.entry_type, "manual");
        assert_eq!(row.calories, 214.0);
        assert_eq!(row.carbs, 44.0);
    }

    #[test]
    fn test_csv_has_header_and_quotes_commas() {
        let csv = ExportService::to_csv(&[FoodEntryCsvRow::from(&entry())]).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("date,food_name,meal_type,entry_type,calories,protein,carbs,fat")
        );
        assert!(lines.next().unwrap_or_default().contains("\"Oatmeal, with honey\""));
    }

    #[test]
    fn test_empty_export_is_empty() {
        let csv = ExportService::to_csv::<FoodEntryCsvRow>(&[]).unwrap();
        assert!(csv.is_empty());
    }
}
