//! Account registration, login and token refresh
//!
//! Password hashing and verification run on the blocking pool.

use crate::auth::{JwtService, PasswordService, TokenType};
use crate::error::ApiError;
use crate::repositories::UserRepository;
use calorie_tracker_shared::types::{AuthTokens, LoginRequest, RegisterRequest, UserProfile};
use calorie_tracker_shared::User;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

pub struct UserService;

/// Emails are matched case-insensitively
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserService {
    #[instrument(skip(pool, jwt, req), fields(email = %req.email))]
    pub async fn register(pool: &PgPool, jwt: &JwtService, req: RegisterRequest) -> Result<AuthTokens, ApiError> {
        req.validate()?;
        let email = normalize_email(&req.email);

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let user = UserRepository::create(pool, &email, &password_hash, name)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id = %user.id, "User registered");
        jwt.issue_pair(user.id).map_err(ApiError::Internal)
    }

    #[instrument(skip(pool, jwt, req))]
    pub async fn login(pool: &PgPool, jwt: &JwtService, req: LoginRequest) -> Result<AuthTokens, ApiError> {
        let user = UserRepository::find_by_email(pool, &normalize_email(&req.email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;
        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        jwt.issue_pair(user.id).map_err(ApiError::Internal)
    }

    /// Trade a refresh token for a new pair
    #[instrument(skip_all)]
    pub async fn refresh_token(pool: &PgPool, jwt: &JwtService, refresh_token: &str) -> Result<AuthTokens, ApiError> {
        let claims = jwt
            .verify(refresh_token, TokenType::Refresh)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        UserRepository::find_by_id(pool, claims.sub)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        jwt.issue_pair(claims.sub).map_err(ApiError::Internal)
    }

    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        let user: User = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?
            .into();

        Ok(UserProfile {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        })
    }
}
