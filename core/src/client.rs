use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

/// Anything that turns a single text prompt into generated text.
///
/// The Query Service only depends on this seam, so handlers can be driven by
/// a stub in tests and by [`GeminiClient`] in production.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> GeminiResult<String>;
}

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    model: GeminiModel,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GeminiError::ConfigError(
                "API key is required to initialize the Gemini client".to_string(),
            )
        })?;

        let model = GeminiModel::new(api_key, config.model_name_or_default().to_string());

        let client = Client::new();

        Ok(Self {
            client,
            config,
            model,
        })
    }

    /// Name of the model every request is sent to
    pub fn model_name(&self) -> &str {
        &self.model.model_name
    }

    /// Get the generateContent URL for the configured model
    fn get_base_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base_url_or_default(),
            self.model.model_name,
            self.model.api_key
        )
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.get_base_url();

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }

    /// Creates a single-turn request that asks the model to reply with JSON only.
    pub fn create_json_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt.to_string())],
                role: Some("user".to_string()),
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        }
    }
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text_from_response(response: &GenerateContentResponse) -> GeminiResult<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| GeminiError::ResponseError("No candidates in response".to_string()))?;

    let content = candidate
        .content
        .as_ref()
        .ok_or_else(|| GeminiError::ResponseError("No content in candidate".to_string()))?;

    let texts: Vec<&str> = content
        .parts
        .iter()
        .filter_map(|part| part.text.as_deref())
        .collect();

    if texts.is_empty() {
        return Err(GeminiError::ResponseError("No text in content parts".to_string()));
    }

    Ok(texts.concat())
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> GeminiResult<String> {
        let request = self.create_json_request(prompt);
        debug!(model = %self.model.model_name, prompt_len = prompt.len(), "Calling generateContent");
        let response = self.generate_content(request).await?;
        extract_text_from_response(&response)
    }
}
