use serde::{Deserialize, Serialize};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public Gemini REST endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration struct for Gemini API
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
}

impl GeminiConfig {
    /// Creates a new configuration
    pub fn new(
        api_key: Option<String>,
        model_name: Option<String>,
        api_base_url: Option<String>,
    ) -> Self {
        Self {
            api_key,
            model_name,
            api_base_url,
        }
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
        }
    }

    pub fn model_name_or_default(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base_url_or_default(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }
}
