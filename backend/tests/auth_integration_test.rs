//! Integration tests for authentication endpoints

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_success() {
    let app = common::TestApp::new().await;

    let email = format!("register_test_{}@example.com", uuid::Uuid::new_v4());
    let body = json!({
        "email": email,
        "password": "SecurePassword123!",
        "name": "Register Test"
    });

    let (status, response) = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = common::json_body(&response);
    assert!(!response["access_token"].as_str().unwrap().is_empty());
    assert!(!response["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(response["token_type"], "Bearer");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_duplicate_email_is_case_insensitive() {
    let app = common::TestApp::new().await;

    let email = format!("duplicate_{}@example.com", uuid::Uuid::new_v4().simple());
    let body = json!({ "email": email, "password": "SecurePassword123!" });
    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED);

    let shouted = json!({ "email": email.to_uppercase(), "password": "SecurePassword123!" });
    let (status, _) = app.post("/api/v1/auth/register", &shouted.to_string()).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_invalid_email() {
    let app = common::TestApp::new().await;

    let body = json!({ "email": "not-an-email", "password": "SecurePassword123!" });
    let (status, response) = app.post("/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(common::json_body(&response)["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_register_weak_password() {
    let app = common::TestApp::new().await;

    let body = json!({ "email": "weak_password@example.com", "password": "123" });
    let (status, _) = app.post("/api/v1/auth/register", &body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_success() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "email": user.email, "password": user.password });
    let (status, response) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!common::json_body(&response)["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_wrong_password() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "email": user.email, "password": "WrongPassword123!" });
    let (status, _) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_login_nonexistent_user() {
    let app = common::TestApp::new().await;

    let body = json!({ "email": "nonexistent@example.com", "password": "SomePassword123!" });
    let (status, _) = app.post("/api/v1/auth/login", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_refresh_token() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "refresh_token": user.tokens.refresh_token });
    let (status, response) = app.post("/api/v1/auth/refresh", &body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!common::json_body(&response)["access_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_access_token_cannot_refresh() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let body = json!({ "refresh_token": user.tokens.access_token });
    let (status, _) = app.post("/api/v1/auth/refresh", &body.to_string()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_me_returns_current_user() {
    let app = common::TestApp::new().await;
    let user = app.create_test_user().await;

    let (status, response) = app.get_auth("/api/v1/auth/me", user.access_token()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::json_body(&response)["email"], user.email.to_lowercase());
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_protected_endpoint_with_expired_token() {
    let app = common::TestApp::new().await;

    let fake_token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIiwiZXhwIjoxfQ.invalid";
    let (status, _) = app.get_auth("/api/v1/user/profile", fake_token).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
