//! Integration tests for food logging: manual, barcode, photo and export

mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn breakfast() -> serde_json::Value {
    json!({
        "items": [
            { "name": "Oatmeal", "calories": 150.0, "protein": 5.0, "carbs": 27.0, "fat": 3.0 },
            { "name": "Banana", "calories": 105.0, "protein": 1.3, "carbs": 27.0, "fat": 0.4 }
        ],
        "meal_type": "breakfast",
        "consumed_at": "2024-05-06T07:30:00Z"
    })
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_manual_entry_totals_are_computed() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, body) = app
        .post_auth("/api/v1/food/entries", user.access_token(), &breakfast().to_string())
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let entry = common::json_body(&body);
    assert_eq!(entry["food_name"], "Oatmeal");
    assert_eq!(entry["entry_type"], "manual");
    assert_eq!(entry["meal_type"], "breakfast");
    assert_eq!(entry["food_data"]["total"]["calories"].as_f64().unwrap(), 255.0);
    assert_eq!(entry["food_data"]["total"]["carbs"].as_f64().unwrap(), 54.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_manual_entry_requires_items() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, _) = app
        .post_auth("/api/v1/food/entries", user.access_token(), r#"{"items": []}"#)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_list_filters_by_day_and_limits() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    for _ in 0..3 {
        app.post_auth("/api/v1/food/entries", user.access_token(), &breakfast().to_string())
            .await;
    }
    let mut other_day = breakfast();
    other_day["consumed_at"] = json!("2024-05-07T12:00:00Z");
    app.post_auth("/api/v1/food/entries", user.access_token(), &other_day.to_string())
        .await;

    let (status, body) = app
        .get_auth("/api/v1/food/entries?date=2024-05-06", user.access_token())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json_body(&body).as_array().unwrap().len(), 3);

    let (_, body) = app.get_auth("/api/v1/food/entries?limit=2", user.access_token()).await;
    let entries = common::json_body(&body);
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first
    assert_eq!(entries[0]["consumed_at"], "2024-05-07T12:00:00Z");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_is_owner_scoped() {
    let app = common::TestApp::new().await;
    let owner = app.create_test_user().await;
    let stranger = app.create_test_user().await;

    let (_, body) = app
        .post_auth("/api/v1/food/entries", owner.access_token(), &breakfast().to_string())
        .await;
    let id = common::json_body(&body)["id"].as_str().unwrap().to_string();
    let path = format!("/api/v1/food/entries/{}", id);

    let (status, _) = app.delete_auth(&path, stranger.access_token()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete_auth(&path, owner.access_token()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.delete_auth(&path, owner.access_token()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_barcode_lookup_and_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v0/product/3017620422003.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": {
                "product_name": "Hazelnut Spread",
                "serving_size": "15g",
                "nutriments": {
                    "energy-kcal_100g": 539,
                    "proteins_100g": 6.3,
                    "carbohydrates_100g": 57.5,
                    "fat_100g": 30.9
                }
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v0/product/0000000000000.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 0 })))
        .mount(&server)
        .await;

    let app = common::TestApp::with_food_db(&server.uri()).await;
    let user = app.create_test_user().await;

    let (status, body) = app
        .get_auth("/api/v1/food/barcode/3017620422003", user.access_token())
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let item = common::json_body(&body);
    assert_eq!(item["name"], "Hazelnut Spread");
    assert_eq!(item["calories"].as_f64().unwrap(), 539.0);

    let (status, _) = app
        .get_auth("/api/v1/food/barcode/0000000000000", user.access_token())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get_auth("/api/v1/food/barcode/abc", user.access_token()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post_auth(
            "/api/v1/food/barcode",
            user.access_token(),
            r#"{"barcode": "3017620422003"}"#,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let entry = common::json_body(&body);
    assert_eq!(entry["entry_type"], "barcode");
    assert_eq!(entry["meal_type"], "other");
    assert_eq!(entry["food_name"], "Hazelnut Spread");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_barcode_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = common::TestApp::with_food_db(&server.uri()).await;
    let user = app.create_test_user().await;

    let (status, _) = app
        .get_auth("/api/v1/food/barcode/3017620422003", user.access_token())
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_image_upload_uses_mock_analysis() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let boundary = "calorie-tracker-boundary";
    let body = common::multipart_body(boundary, b"\xFF\xD8\xFF\xE0fake-jpeg", "image/jpeg", &[("meal_type", "lunch")]);
    let (status, response) = app
        .post_multipart("/api/v1/food/image", user.access_token(), boundary, body)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", response);

    let response = common::json_body(&response);
    assert_eq!(response["source"], "mock");
    assert_eq!(response["entry"]["entry_type"], "image");
    assert_eq!(response["entry"]["meal_type"], "lunch");
    assert_eq!(response["entry"]["food_name"], "Grilled Chicken Salad");
    assert_eq!(response["analysis"]["total"]["calories"].as_f64().unwrap(), 375.0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_image_upload_requires_image_part() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let boundary = "calorie-tracker-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"meal_type\"\r\n\r\nlunch\r\n--{b}--\r\n",
        b = boundary
    );
    let (status, _) = app
        .post_multipart("/api/v1/food/image", user.access_token(), boundary, body.into_bytes())
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_export_csv() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;
    app.post_auth("/api/v1/food/entries", user.access_token(), &breakfast().to_string())
        .await;

    let (status, csv) = app.get_auth("/api/v1/food/export", user.access_token()).await;
    assert_eq!(status, StatusCode::OK);

    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("date,food_name,meal_type,entry_type,calories,protein,carbs,fat")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("2024-05-06 07:30:00,Oatmeal,breakfast,manual,255"));
    assert!(lines.next().is_none());
}
