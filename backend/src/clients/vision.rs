//! Meal photo analysis
//!
//! [`GeminiVision`] sends the photo inline to a `generateContent` endpoint and
//! pulls the nutrition JSON out of the model's free-text reply.
//! [`MockVision`] returns a fixed sample so the upload flow works without
//! an API key.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use calorie_tracker_shared::types::AnalysisSource;
use calorie_tracker_shared::{FoodData, FoodItem};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{http_client, FoodAnalysis, FoodVision};
use crate::config::AiConfig;

const TEMPERATURE: f32 = 0.4;
const TOP_P: f32 = 0.8;
const TOP_K: u32 = 40;

const ANALYSIS_PROMPT: &str = r#"You are a professional nutritionist and food analyst specializing in global cuisines.
Analyze this food image and provide accurate nutritional information.

Guidelines:
1. Identify the main dish name only, do not break it into components.
2. Assume a standard restaurant serving (a rice dish is about 300-350g).
3. Include cooking oils, fats, seasonings and garnishes in the values.

Reply with a JSON object of exactly this shape:
{
  "items": [
    { "name": "dish name", "calories": number, "protein": number, "carbs": number, "fat": number }
  ],
  "total": { "calories": number, "protein": number, "carbs": number, "fat": number }
}"#;

static FENCED_JSON: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)```json\s*\n(.*?)\n\s*```").ok());
static BARE_OBJECT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// JSON payload inside a model reply: a ```json fence first, else the
/// outermost `{...}` span
pub(crate) fn extract_json(text: &str) -> Option<&str> {
    let fenced = FENCED_JSON
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|c| c.get(1));
    if let Some(inner) = fenced {
        return Some(inner.as_str());
    }
    BARE_OBJECT.as_ref()?.find(text).map(|m| m.as_str())
}

/// Parse a model reply into food data with a recomputed total
pub(crate) fn parse_analysis(text: &str) -> Result<FoodData> {
    let json = extract_json(text).ok_or_else(|| anyhow!("No JSON found in model reply"))?;
    let mut data: FoodData = serde_json::from_str(json).context("Model reply is not valid food JSON")?;
    data.items.retain(|item| !item.name.trim().is_empty());
    if data.items.is_empty() {
        bail!("Model reply contained no food items");
    }
    data.recompute_total();
    Ok(data)
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Clients
// ============================================================================

/// Gemini-compatible vision client
pub struct GeminiVision {
    client: Client,
    endpoint: String,
    api_key: Secret<String>,
}

impl GeminiVision {
    pub fn new(config: &AiConfig, api_key: Secret<String>) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout_secs, concat!("calorie-tracker/", env!("CARGO_PKG_VERSION")))?,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key,
        })
    }
}

#[async_trait]
impl FoodVision for GeminiVision {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<FoodAnalysis> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: ANALYSIS_PROMPT },
                    Part::Image {
                        inline_data: InlineData {
                            mime_type,
                            data: BASE64_STANDARD.encode(image),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose_secret().as_str())
            .json(&request)
            .send()
            .await
            .context("Vision request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Vision API error");
            bail!("Vision API returned HTTP {}", status);
        }

        let reply: GenerateResponse = response.json().await.context("Failed to parse vision response")?;
        let text = reply.text();
        debug!(chars = text.len(), "Vision reply received");

        Ok(FoodAnalysis {
            data: parse_analysis(&text)?,
            source: AnalysisSource::Ai,
        })
    }
}

/// Fixed sample analysis
pub struct MockVision;

impl MockVision {
    pub fn sample() -> FoodData {
        FoodData::from_items(vec![
            FoodItem::new("Grilled Chicken Salad", 350.0, 30.0, 15.0, 18.0),
            FoodItem::new("Cherry Tomatoes", 25.0, 1.0, 5.0, 0.0),
        ])
    }
}

#[async_trait]
impl FoodVision for MockVision {
    async fn analyze(&self, _image: &[u8], _mime_type: &str) -> Result<FoodAnalysis> {
        Ok(FoodAnalysis {
            data: Self::sample(),
            source: AnalysisSource::Mock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reply(text: &str) -> serde_json::Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    fn client_for(server: &MockServer) -> GeminiVision {
        let config = AiConfig {
            enabled: true,
            base_url: server.uri(),
            ..AiConfig::default()
        };
        GeminiVision::new(&config, Secret::new("test-key".to_string())).unwrap()
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here you go:\n```json\n{\"items\": []}\n```\nEnjoy";
        assert_eq!(extract_json(text), Some("{\"items\": []}"));
    }

    #[test]
    fn test_extract_bare_object() {
        let text = "Result: {\"items\": [{\"name\": \"Soup\"}]} done";
        assert_eq!(extract_json(text), Some("{\"items\": [{\"name\": \"Soup\"}]}"));
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn test_parse_analysis_recomputes_total() {
        let text = r#"{"items":[{"name":"Biryani","calories":600,"protein":20,"carbs":80,"fat":22}],
                      "total":{"calories":1,"protein":1,"carbs":1,"fat":1}}"#;
        let data = parse_analysis(text).unwrap();
        assert_eq!(data.total.calories, 600.0);
        assert_eq!(data.total.fat, 22.0);
    }

    #[test]
    fn test_parse_analysis_rejects_empty_items() {
        assert!(parse_analysis(r#"{"items":[]}"#).is_err());
        assert!(parse_analysis("I cannot see any food").is_err());
    }

    #[test]
    fn test_mock_sample_totals() {
        let data = MockVision::sample();
        assert_eq!(data.primary_name(), Some("Grilled Chicken Salad"));
        assert_eq!(data.total.calories, 375.0);
        assert_eq!(data.total.protein, 31.0);
        assert_eq!(data.total.carbs, 20.0);
        assert_eq!(data.total.fat, 18.0);
    }

    #[tokio::test]
    async fn test_gemini_analyze() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "topK": 40 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply(
                "```json\n{\"items\":[{\"name\":\"Pad Thai\",\"calories\":700,\"protein\":25,\"carbs\":90,\"fat\":26}]}\n```",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let analysis = client_for(&server).analyze(b"\xff\xd8\xff", "image/jpeg").await.unwrap();
        assert_eq!(analysis.source, AnalysisSource::Ai);
        assert_eq!(analysis.data.primary_name(), Some("Pad Thai"));
        assert_eq!(analysis.data.total.calories, 700.0);
    }

    #[tokio::test]
    async fn test_gemini_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        assert!(client_for(&server).analyze(b"img", "image/png").await.is_err());
    }
}
