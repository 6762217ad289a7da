//! Recommendation gateway
//!
//! Turns a validated metrics snapshot into a prompt, sends it to an
//! Ollama-compatible `/api/generate` endpoint and returns the generated text.
//! One request per call: no retries, no streaming. The HTTP client carries the
//! configured timeout.

use async_trait::async_trait;
use health_calculators_shared::{GatewayError, RecommendationSnapshot};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::config::AiConfig;

/// Connection timeout for the upstream; the request timeout comes from config
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Something that can turn a metrics snapshot into advice
#[async_trait]
pub trait RecommendationGateway: Send + Sync {
    async fn recommend(&self, snapshot: &RecommendationSnapshot) -> Result<String, GatewayError>;

    /// Whether calls can reach an upstream at all
    fn is_enabled(&self) -> bool;
}

/// Build the prompt sent upstream
pub fn build_prompt(snapshot: &RecommendationSnapshot) -> String {
    let mut prompt = format!(
        "You are a fitness and nutrition coach. Based on these metrics, give concise, \
         practical recommendations for diet and exercise.\n\n\
         - BMI: {:.1}\n\
         - Body fat: {:.1}%\n\
         - Ideal weight range: {}\n\
         - BMR: {:.0} kcal/day\n\
         - Daily calorie needs: {:.0} kcal/day\n",
        snapshot.bmi,
        snapshot.body_fat_percentage,
        snapshot.ideal_weight,
        snapshot.bmr,
        snapshot.daily_calorie_needs,
    );

    let preferences = snapshot.preferences.trim();
    if !preferences.is_empty() {
        prompt.push_str(&format!("\nUser preferences: {}\n", preferences));
    }
    prompt
}

// ============================================================================
// Ollama
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Gateway backed by an Ollama `/api/generate` endpoint
#[derive(Clone)]
pub struct OllamaGateway {
    client: Client,
    config: AiConfig,
}

impl OllamaGateway {
    /// Create a gateway from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.ollama_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RecommendationGateway for OllamaGateway {
    #[instrument(skip(self, snapshot), fields(model = %self.config.model))]
    async fn recommend(&self, snapshot: &RecommendationSnapshot) -> Result<String, GatewayError> {
        if !self.config.enabled {
            return Err(GatewayError::Disabled);
        }

        let request = GenerateRequest {
            model: &self.config.model,
            prompt: build_prompt(snapshot),
            stream: false,
        };

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to reach recommendation upstream: {}", e);
                if e.is_timeout() {
                    GatewayError::Upstream("request timed out".to_string())
                } else if e.is_connect() {
                    GatewayError::Upstream(format!(
                        "cannot connect to {}",
                        self.config.ollama_url
                    ))
                } else {
                    GatewayError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read upstream response: {}", e);
            GatewayError::Upstream(format!("failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(%status, "Upstream returned an error");
            return Err(GatewayError::Upstream(format!("upstream returned {}", status)));
        }

        let generated: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse upstream response: {}", e);
            GatewayError::Upstream(format!("failed to parse response: {}", e))
        })?;

        let text = generated.response.trim().to_string();
        if text.is_empty() {
            return Err(GatewayError::Upstream("empty response".to_string()));
        }

        debug!(chars = text.len(), "Received recommendations");
        info!("Recommendations generated");
        Ok(text)
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
