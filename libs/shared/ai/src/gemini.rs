use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service not configured")]
    NotConfigured,

    #[error("AI request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("AI provider error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
}

/// Sampling parameters forwarded to the provider as `generationConfig`.
#[derive(Debug, Clone, Copy)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 2000,
        }
    }
}

/// Client for the Gemini `generateContent` API.
///
/// Covers the two call shapes the application needs: plain text prompts
/// and prompts with an attached document (sent as inline base64 data).
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AiError> {
        if !config.is_ai_configured() {
            return Err(AiError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_base_url.clone(),
        })
    }

    /// Generate text from a plain prompt.
    pub async fn generate_text(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, AiError> {
        let parts = vec![json!({ "text": prompt })];
        self.generate(parts, config).await
    }

    /// Generate text from a prompt plus an attached file payload.
    pub async fn generate_with_file(
        &self,
        prompt: &str,
        mime_type: &str,
        data: &[u8],
        config: &GenerationConfig,
    ) -> Result<String, AiError> {
        let parts = vec![
            json!({ "text": prompt }),
            json!({
                "inline_data": {
                    "mime_type": mime_type,
                    "data": STANDARD.encode(data),
                }
            }),
        ];
        self.generate(parts, config).await
    }

    async fn generate(
        &self,
        parts: Vec<Value>,
        config: &GenerationConfig,
    ) -> Result<String, AiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, GEMINI_MODEL
        );

        let request_body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": config.temperature,
                "maxOutputTokens": config.max_output_tokens,
            },
        });

        debug!("Sending generation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, response_text);
            return Err(AiError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let payload: Value = serde_json::from_str(&response_text).map_err(|e| {
            AiError::MalformedResponse(format!("Invalid JSON from provider: {}", e))
        })?;

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AiError::MalformedResponse("No candidate text in provider response".to_string())
            })?;

        Ok(text.to_string())
    }
}
