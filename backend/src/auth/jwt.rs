//! Access and refresh tokens
//!
//! Both token kinds are HS256 JWTs signed with the configured secret. The
//! `typ` claim keeps a refresh token from being accepted as an access token
//! and the other way round.

use anyhow::{anyhow, Result};
use calorie_tracker_shared::types::AuthTokens;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ISSUER: &str = "calorie-tracker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub typ: TokenType,
}

/// Token issuing and checking with keys derived once at startup
#[derive(Clone)]
pub struct JwtService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    validation: Arc<Validation>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Fresh access and refresh token for `user_id`
    pub fn issue_pair(&self, user_id: Uuid) -> Result<AuthTokens> {
        Ok(AuthTokens {
            access_token: self.issue(user_id, TokenType::Access)?,
            refresh_token: self.issue(user_id, TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_secs,
        })
    }

    pub fn issue(&self, user_id: Uuid, typ: TokenType) -> Result<String> {
        let ttl = match typ {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            typ,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow!("Failed to sign {:?} token: {}", typ, e))
    }

    /// Decode `token` and require it to be of kind `expected`
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| anyhow!("Invalid token: {}", e))?
            .claims;
        if claims.typ != expected {
            return Err(anyhow!("Expected a {:?} token", expected));
        }
        Ok(claims)
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }
}
