//! Vision captioning client
//!
//! Sends one image per request to an OpenAI-compatible chat completions
//! endpoint and returns the model's text. No retries: a failed request is
//! terminal for its item.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http_client::vision_client;
use super::prompts::CAPTION_PROMPT;
use crate::config::CaptionConfig;
use crate::error::CaptionError;
use crate::rename::PLACEHOLDER_CAPTION;

/// Produces raw caption text for an image
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &[u8], media_type: &str) -> Result<String, CaptionError>;
}

/// Vision API client
pub struct VisionClient {
    client: Client,
    config: CaptionConfig,
}

impl VisionClient {
    pub fn new(config: CaptionConfig) -> Self {
        Self {
            client: vision_client().clone(),
            config,
        }
    }

    fn build_request(&self, image: &[u8], media_type: &str) -> ChatRequest {
        let data_url = format!("data:{};base64,{}", media_type, STANDARD.encode(image));

        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: CAPTION_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrlContent { url: data_url },
                    },
                ],
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

#[async_trait]
impl Captioner for VisionClient {
    async fn caption(&self, image: &[u8], media_type: &str) -> Result<String, CaptionError> {
        self.config
            .validate()
            .map_err(|e| CaptionError::NotConfigured(e.to_string()))?;

        let request = self.build_request(image, media_type);

        tracing::debug!(
            model = %self.config.model,
            media_type,
            bytes = image.len(),
            "Sending caption request"
        );

        let resp = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CaptionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        caption_text(parse_response(&body)?)
    }
}

fn parse_response(body: &str) -> Result<ChatResponse, CaptionError> {
    serde_json::from_str(body).map_err(|e| CaptionError::MalformedResponse(e.to_string()))
}

/// Text of the first choice. A valid response with no text yields the
/// placeholder; a response without choices is malformed.
fn caption_text(response: ChatResponse) -> Result<String, CaptionError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CaptionError::MalformedResponse("no choices in response".to_string()))?;

    match choice.message.content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => {
            tracing::warn!("Vision API returned no caption text, using placeholder");
            Ok(PLACEHOLDER_CAPTION.to_string())
        }
    }
}

// API request/response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlContent },
}

#[derive(Serialize)]
struct ImageUrlContent {
    url: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
