//! Caption service configuration.
//!
//! The API credential is the only value read from the environment. Endpoint
//! and model are fixed, with builder overrides for tests and self-hosted
//! OpenAI-compatible gateways.

use crate::error::{AppError, Result};

/// Environment variable holding the vision API credential
pub const API_KEY_VAR: &str = "CAPTION_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.x.ai";
const DEFAULT_MODEL: &str = "grok-2-vision-1212";

#[derive(Debug, Clone)]
pub struct CaptionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CaptionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 300,
            temperature: 0.2,
        }
    }

    /// Load the config from `CAPTION_API_KEY`. A missing key is kept empty
    /// and reported by `validate` when a caption is requested.
    pub fn from_env() -> Self {
        let key = std::env::var(API_KEY_VAR).unwrap_or_default();
        Self::new(key.trim())
    }

    /// Reject an empty or placeholder credential
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::MissingApiKey);
        }
        validate_api_key(&self.api_key)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

/// Load `.env` from the working directory, then from its parent
/// (running from a nested build directory during development).
pub fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}

fn validate_api_key(key: &str) -> Result<()> {
    let key_lower = key.to_lowercase();

    let placeholder_patterns = [
        "your-api-key",
        "your_api_key",
        "api-key-here",
        "api_key_here",
        "replace-with",
        "replace_with",
        "placeholder",
        "xxx",
    ];

    for pattern in placeholder_patterns {
        if key_lower.contains(pattern) {
            return Err(AppError::InvalidApiKey(pattern.to_string()));
        }
    }

    Ok(())
}
