//! Food logging routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::services::{BarcodeCache, ExportService, FoodService, ImageUpload};
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use calorie_tracker_shared::types::{
    BarcodeEntryRequest, CreateFoodEntryRequest, FoodEntriesQuery, ImageAnalysisResponse,
};
use calorie_tracker_shared::{FoodEntry, FoodItem, MealType};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Food routes; `max_upload_bytes` caps the photo upload body
pub fn food_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/:id", delete(delete_entry))
        .route("/barcode", post(create_barcode_entry))
        .route("/barcode/:code", get(lookup_barcode))
        .route(
            "/image",
            post(analyze_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/export", get(export_entries))
}

fn barcode_cache(state: &AppState) -> Option<BarcodeCache> {
    state.redis().map(|conn| BarcodeCache {
        conn,
        ttl_secs: state.config().redis.barcode_cache_ttl_secs,
    })
}

/// GET /api/v1/food/entries?date=&limit=
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<FoodEntriesQuery>,
) -> ApiResult<Json<Vec<FoodEntry>>> {
    Ok(Json(FoodService::list(state.db(), auth.user_id, query).await?))
}

/// POST /api/v1/food/entries
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateFoodEntryRequest>,
) -> ApiResult<(StatusCode, Json<FoodEntry>)> {
    let entry = FoodService::create_manual(state.db(), auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/food/entries/:id
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    FoodService::delete(state.db(), auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/food/barcode/:code
async fn lookup_barcode(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<Json<FoodItem>> {
    let cache = barcode_cache(&state);
    Ok(Json(
        FoodService::lookup_barcode(state.food_db.as_ref(), cache, &code).await?,
    ))
}

/// POST /api/v1/food/barcode
async fn create_barcode_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BarcodeEntryRequest>,
) -> ApiResult<(StatusCode, Json<FoodEntry>)> {
    let cache = barcode_cache(&state);
    let entry =
        FoodService::create_from_barcode(state.db(), state.food_db.as_ref(), cache, auth.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Read the multipart form of a photo upload
async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut meal_type = MealType::default();
    let mut consumed_at: Option<DateTime<Utc>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let mime_type = field.content_type().unwrap_or("image/jpeg").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
                image = Some((bytes.to_vec(), mime_type));
            }
            "meal_type" | "mealType" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                meal_type = raw.trim().parse().map_err(|e: String| ApiError::field("meal_type", e))?;
            }
            "consumed_at" | "consumedAt" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let parsed = DateTime::parse_from_rfc3339(raw.trim())
                    .map_err(|_| ApiError::field("consumed_at", "Expected an RFC 3339 timestamp"))?;
                consumed_at = Some(parsed.with_timezone(&Utc));
            }
            _ => {}
        }
    }

    let (bytes, mime_type) = image.ok_or_else(|| ApiError::field("image", "No image provided"))?;
    Ok(ImageUpload {
        bytes,
        mime_type,
        meal_type,
        consumed_at,
    })
}

/// POST /api/v1/food/image (multipart)
async fn analyze_image(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ImageAnalysisResponse>)> {
    let upload = read_upload(multipart).await?;
    let response = FoodService::analyze_image(state.db(), state.vision.clone(), auth.user_id, upload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/food/export - CSV of every entry
async fn export_entries(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse, ApiError> {
    let csv = ExportService::export_entries_csv(state.db(), auth.user_id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"food-entries.csv\""),
    );

    Ok((headers, csv))
}
