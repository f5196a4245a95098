//! Food logging: manual entries, barcode lookups and photo analysis
//!
//! Totals are always recomputed from the items before an entry is saved.

use std::sync::Arc;

use crate::cache;
use crate::clients::{FoodDatabase, FoodVision};
use crate::error::ApiError;
use crate::repositories::{CreateFoodEntry, FoodEntryRepository, TimeWindow};
use calorie_tracker_shared::types::{
    BarcodeEntryRequest, CreateFoodEntryRequest, FoodEntriesQuery, ImageAnalysisResponse,
};
use calorie_tracker_shared::validation::{validate_barcode, ValidationError};
use calorie_tracker_shared::{EntryType, FoodData, FoodEntry, FoodItem, MealType};
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Redis handle and TTL for barcode lookups
#[derive(Clone)]
pub struct BarcodeCache {
    pub conn: ConnectionManager,
    pub ttl_secs: u64,
}

/// Uploaded meal photo
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub meal_type: MealType,
    pub consumed_at: Option<DateTime<Utc>>,
}

pub struct FoodService;

fn entry_from_record(record: crate::repositories::FoodEntryRecord) -> Result<FoodEntry, ApiError> {
    FoodEntry::try_from(record).map_err(ApiError::Internal)
}

fn check_items(items: &[FoodItem]) -> Result<(), ApiError> {
    for item in items {
        if item.name.trim().is_empty() {
            return Err(ApiError::field("items", "Every food item needs a name"));
        }
        let values = [item.calories, item.protein, item.carbs, item.fat];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ApiError::field(
                "items",
                format!("Nutrition values for {} must be non-negative numbers", item.name),
            ));
        }
    }
    Ok(())
}

impl FoodService {
    async fn save(
        pool: &PgPool,
        user_id: Uuid,
        food_data: FoodData,
        food_name: Option<String>,
        entry_type: EntryType,
        meal_type: MealType,
        consumed_at: Option<DateTime<Utc>>,
    ) -> Result<FoodEntry, ApiError> {
        let food_name = food_name
            .or_else(|| food_data.primary_name().map(str::to_string))
            .ok_or_else(|| ApiError::field("food_name", "Food name is required"))?;

        let record = FoodEntryRepository::create(
            pool,
            CreateFoodEntry {
                user_id,
                food_name,
                food_data,
                entry_type,
                meal_type,
                consumed_at: consumed_at.unwrap_or_else(Utc::now),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        metrics::counter!("food_entries_created_total", "entry_type" => entry_type.as_str()).increment(1);
        info!(entry_id = %record.id, entry_type = entry_type.as_str(), "Food entry saved");
        entry_from_record(record)
    }

    #[instrument(skip(pool, req))]
    pub async fn create_manual(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateFoodEntryRequest,
    ) -> Result<FoodEntry, ApiError> {
        req.validate()?;
        check_items(&req.items)?;

        let food_name = req
            .food_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        Self::save(
            pool,
            user_id,
            FoodData::from_items(req.items),
            food_name,
            EntryType::Manual,
            req.meal_type.unwrap_or_default(),
            req.consumed_at,
        )
        .await
    }

    pub async fn list(pool: &PgPool, user_id: Uuid, query: FoodEntriesQuery) -> Result<Vec<FoodEntry>, ApiError> {
        FoodEntryRepository::list(pool, user_id, query.date.map(TimeWindow::day), query.effective_limit())
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .map(entry_from_record)
            .collect()
    }

    #[instrument(skip(pool))]
    pub async fn delete(pool: &PgPool, user_id: Uuid, entry_id: Uuid) -> Result<(), ApiError> {
        let deleted = FoodEntryRepository::delete(pool, entry_id, user_id)
            .await
            .map_err(ApiError::Internal)?;
        if !deleted {
            return Err(ApiError::NotFound("Food entry not found".to_string()));
        }
        Ok(())
    }

    /// Product lookup, served from the cache when possible
    #[instrument(skip(food_db, cache))]
    pub async fn lookup_barcode(
        food_db: &dyn FoodDatabase,
        cache: Option<BarcodeCache>,
        barcode: &str,
    ) -> Result<FoodItem, ApiError> {
        let barcode = barcode.trim();
        validate_barcode(barcode).map_err(|e| ValidationError::new("barcode", &e))?;
        let key = cache::barcode_key(barcode);

        if let Some(mut c) = cache.clone() {
            if let Some(item) = cache::get_json::<FoodItem>(&mut c.conn, &key).await {
                metrics::counter!("barcode_lookups_total", "result" => "cached").increment(1);
                return Ok(item);
            }
        }

        let found = food_db.lookup_barcode(barcode).await.map_err(|e| {
            metrics::counter!("barcode_lookups_total", "result" => "error").increment(1);
            warn!("Barcode lookup failed: {:#}", e);
            ApiError::Upstream("Food database is unavailable".to_string())
        })?;

        let item = match found {
            Some(item) => item,
            None => {
                metrics::counter!("barcode_lookups_total", "result" => "not_found").increment(1);
                return Err(ApiError::NotFound(format!("No product found for barcode {}", barcode)));
            }
        };

        metrics::counter!("barcode_lookups_total", "result" => "found").increment(1);
        if let Some(mut c) = cache {
            cache::set_json(&mut c.conn, &key, &item, c.ttl_secs).await;
        }
        Ok(item)
    }

    /// Look the product up and log it
    #[instrument(skip(pool, food_db, cache, req))]
    pub async fn create_from_barcode(
        pool: &PgPool,
        food_db: &dyn FoodDatabase,
        cache: Option<BarcodeCache>,
        user_id: Uuid,
        req: BarcodeEntryRequest,
    ) -> Result<FoodEntry, ApiError> {
        let item = Self::lookup_barcode(food_db, cache, &req.barcode).await?;
        Self::save(
            pool,
            user_id,
            FoodData::from_items(vec![item]),
            None,
            EntryType::Barcode,
            req.meal_type.unwrap_or_default(),
            req.consumed_at,
        )
        .await
    }

    /// Analyse a meal photo and log the result
    #[instrument(skip(pool, vision, upload), fields(bytes = upload.bytes.len(), mime = %upload.mime_type))]
    pub async fn analyze_image(
        pool: &PgPool,
        vision: Arc<dyn FoodVision>,
        user_id: Uuid,
        upload: ImageUpload,
    ) -> Result<ImageAnalysisResponse, ApiError> {
        if upload.bytes.is_empty() {
            return Err(ApiError::field("image", "No image provided"));
        }
        if !upload.mime_type.starts_with("image/") {
            return Err(ApiError::field("image", "Upload must be an image"));
        }

        let analysis = vision
            .analyze(&upload.bytes, &upload.mime_type)
            .await
            .map_err(|e| {
                warn!("Image analysis failed: {:#}", e);
                ApiError::Upstream("Failed to analyze image".to_string())
            })?;
        metrics::counter!("image_analyses_total", "source" => analysis.source.as_str()).increment(1);

        let entry = Self::save(
            pool,
            user_id,
            analysis.data.clone(),
            None,
            EntryType::Image,
            upload.meal_type,
            upload.consumed_at,
        )
        .await?;

        Ok(ImageAnalysisResponse {
            entry,
            analysis: analysis.data,
            source: analysis.source,
        })
    }
}
