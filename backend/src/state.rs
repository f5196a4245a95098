//! Application state shared by every handler
//!
//! Everything here is cheap to clone: the pool and clients are internally
//! reference counted and the configuration sits behind an `Arc`.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use redis::aio::ConnectionManager;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::auth::JwtService;
use crate::clients::{self, FoodDatabase, FoodVision};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub jwt: JwtService,
    /// Barcode cache; `None` runs without caching
    pub redis: Option<ConnectionManager>,
    /// Prometheus render handle; `None` when no recorder is installed
    pub metrics: Option<PrometheusHandle>,
    pub food_db: Arc<dyn FoodDatabase>,
    pub vision: Arc<dyn FoodVision>,
}

impl AppState {
    /// Build state with clients created from `config`
    ///
    /// JWT keys are derived here once; do not call this per request.
    pub fn new(db: PgPool, redis: Option<ConnectionManager>, config: AppConfig) -> Result<Self> {
        let food_db = clients::build_food_database(&config.food_db)?;
        let vision = clients::build_vision(&config.ai)?;
        Ok(Self::with_clients(db, redis, config, food_db, vision))
    }

    /// Build state around caller-supplied clients
    pub fn with_clients(
        db: PgPool,
        redis: Option<ConnectionManager>,
        config: AppConfig,
        food_db: Arc<dyn FoodDatabase>,
        vision: Arc<dyn FoodVision>,
    ) -> Self {
        let jwt = JwtService::new(
            config.jwt.secret.expose_secret(),
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        Self {
            db,
            config: Arc::new(config),
            jwt,
            redis,
            metrics: None,
            food_db,
            vision,
        }
    }

    /// Attach the Prometheus handle served at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    /// A connection handle for the cache, if Redis is configured
    pub fn redis(&self) -> Option<ConnectionManager> {
        self.redis.clone()
    }
}
