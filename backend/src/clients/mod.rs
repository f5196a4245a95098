//! External service clients
//!
//! Handlers reach the product database and the vision model through the
//! traits below so tests can substitute canned implementations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use calorie_tracker_shared::types::AnalysisSource;
use calorie_tracker_shared::{FoodData, FoodItem};
use reqwest::Client;
use tracing::{info, warn};

use crate::config::{AiConfig, FoodDbConfig};

pub mod open_food_facts;
pub mod vision;

pub use open_food_facts::OpenFoodFactsClient;
pub use vision::{GeminiVision, MockVision};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Packaged product lookup by barcode
#[async_trait]
pub trait FoodDatabase: Send + Sync {
    /// `Ok(None)` when the product is unknown
    async fn lookup_barcode(&self, barcode: &str) -> Result<Option<FoodItem>>;
}

/// Meal photo recognition
#[async_trait]
pub trait FoodVision: Send + Sync {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<FoodAnalysis>;
}

/// Result of analysing a meal photo
#[derive(Debug, Clone)]
pub struct FoodAnalysis {
    pub data: FoodData,
    pub source: AnalysisSource,
}

pub(crate) fn http_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// Open Food Facts client from configuration
pub fn build_food_database(config: &FoodDbConfig) -> Result<Arc<dyn FoodDatabase>> {
    Ok(Arc::new(OpenFoodFactsClient::new(config)?))
}

/// Gemini client when enabled and keyed, the canned analysis otherwise
pub fn build_vision(config: &AiConfig) -> Result<Arc<dyn FoodVision>> {
    match (&config.enabled, &config.api_key) {
        (true, Some(key)) => {
            info!(model = %config.model, "Image analysis uses the vision model");
            Ok(Arc::new(GeminiVision::new(config, key.clone())?))
        }
        (true, None) => {
            warn!("ai.enabled is set without ai.api_key, falling back to sample analysis");
            Ok(Arc::new(MockVision))
        }
        (false, _) => Ok(Arc::new(MockVision)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    #[tokio::test]
    async fn test_disabled_ai_uses_mock() {
        let vision = build_vision(&AiConfig::default()).unwrap();
        let analysis = vision.analyze(b"jpeg", "image/jpeg").await.unwrap();
        assert_eq!(analysis.source, AnalysisSource::Mock);
    }

    #[tokio::test]
    async fn test_enabled_without_key_uses_mock() {
        let config = AiConfig {
            enabled: true,
            ..AiConfig::default()
        };
        let vision = build_vision(&config).unwrap();
        let analysis = vision.analyze(b"jpeg", "image/jpeg").await.unwrap();
        assert_eq!(analysis.source, AnalysisSource::Mock);
    }

    #[test]
    fn test_enabled_with_key_builds_client() {
        let config = AiConfig {
            enabled: true,
            api_key: Some(Secret::new("key".to_string())),
            ..AiConfig::default()
        };
        assert!(build_vision(&config).is_ok());
    }
}
