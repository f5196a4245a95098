//! Open Food Facts product lookup
//!
//! `GET {base_url}/api/v0/product/{barcode}.json`. Nutrient values are per
//! 100g; the API sometimes sends them as strings.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use calorie_tracker_shared::FoodItem;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use super::{http_client, FoodDatabase};
use crate::config::FoodDbConfig;

const UNKNOWN_PRODUCT: &str = "Unknown Product";
const DEFAULT_SERVING: &str = "100g";

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    product: Option<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    product_name: Option<String>,
    #[serde(default)]
    nutriments: Nutriments,
    serving_size: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default, deserialize_with = "lenient_number")]
    energy_kcal_100g: Option<f64>,
    #[serde(rename = "energy-kcal", default, deserialize_with = "lenient_number")]
    energy_kcal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    proteins_100g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    carbohydrates_100g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    fat_100g: Option<f64>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

impl Product {
    fn into_food_item(self, barcode: &str) -> FoodItem {
        let n = self.nutriments;
        let name = self
            .product_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string());

        let mut item = FoodItem::new(
            name,
            n.energy_kcal_100g.or(n.energy_kcal).unwrap_or(0.0),
            n.proteins_100g.unwrap_or(0.0),
            n.carbohydrates_100g.unwrap_or(0.0),
            n.fat_100g.unwrap_or(0.0),
        );
        item.serving_size = Some(
            self.serving_size
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SERVING.to_string()),
        );
        item.image_url = self.image_url;
        item.barcode = Some(barcode.to_string());
        item
    }
}

/// Client for the public Open Food Facts API
pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(config: &FoodDbConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs, &config.user_agent)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn product_url(&self, barcode: &str) -> String {
        format!("{}/api/v0/product/{}.json", self.base_url, barcode)
    }
}

#[async_trait]
impl FoodDatabase for OpenFoodFactsClient {
    #[instrument(skip(self))]
    async fn lookup_barcode(&self, barcode: &str) -> Result<Option<FoodItem>> {
        let response = self
            .client
            .get(self.product_url(barcode))
            .send()
            .await
            .context("Food database request failed")?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            bail!("Food database returned HTTP {}", status);
        }

        let body: ProductResponse = response
            .json()
            .await
            .context("Failed to parse food database response")?;

        debug!(status = body.status, "Food database replied");
        if body.status != 1 {
            return Ok(None);
        }
        Ok(body.product.map(|product| product.into_food_item(barcode)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BARCODE: &str = "3017620422003";

    async fn client_for(server: &MockServer) -> OpenFoodFactsClient {
        OpenFoodFactsClient::new(&FoodDbConfig {
            base_url: server.uri(),
            ..FoodDbConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_maps_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/api/v0/product/{}.json", BARCODE)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": {
                    "product_name": "Nutella",
                    "serving_size": "15 g",
                    "image_url": "https://images.example/nutella.jpg",
                    "nutriments": {
                        "energy-kcal_100g": 539,
                        "proteins_100g": 6.3,
                        "carbohydrates_100g": "57.5",
                        "fat_100g": 30.9
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let item = client_for(&server).await.lookup_barcode(BARCODE).await.unwrap().unwrap();
        assert_eq!(item.name, "Nutella");
        assert_eq!(item.calories, 539.0);
        assert_eq!(item.carbs, 57.5);
        assert_eq!(item.serving_size.as_deref(), Some("15 g"));
        assert_eq!(item.barcode.as_deref(), Some(BARCODE));
    }

    #[tokio::test]
    async fn test_lookup_defaults_and_energy_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 1,
                "product": { "nutriments": { "energy-kcal": 120 } }
            })))
            .mount(&server)
            .await;

        let item = client_for(&server).await.lookup_barcode(BARCODE).await.unwrap().unwrap();
        assert_eq!(item.name, "Unknown Product");
        assert_eq!(item.calories, 120.0);
        assert_eq!(item.protein, 0.0);
        assert_eq!(item.serving_size.as_deref(), Some("100g"));
    }

    #[tokio::test]
    async fn test_unknown_product_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 0,
                "status_verbose": "product not found"
            })))
            .mount(&server)
            .await;

        assert!(client_for(&server).await.lookup_barcode(BARCODE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_http_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(client_for(&server).await.lookup_barcode(BARCODE).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_err() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(client_for(&server).await.lookup_barcode(BARCODE).await.is_err());
    }
}
