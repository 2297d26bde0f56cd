//! AI completion provider client (marketing copy from a product image).
//!
//! Speaks the chat-completions wire shape: one user message carrying a
//! text prompt plus an image URL, answered with a single choice.

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;

use super::ProviderError;
use crate::config::AiConfig;

/// Prompt used for product description generation.
const DESCRIPTION_PROMPT: &str = "In 2-3 sentences, describe the good qualities \
of the product shown in this image as if promoting it to customers.";

/// Token budget for a generated description.
const MAX_TOKENS: u32 = 300;

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

/// Client for the AI completion provider.
#[derive(Clone)]
pub struct CompletionClient {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl CompletionClient {
    /// Create a new completion client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &AiConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ProviderError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    /// Generate marketing copy for a hosted product image.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the provider rejects it, or the
    /// response carries no completion.
    pub async fn describe_image(&self, image_url: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.api_url);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": DESCRIPTION_PROMPT },
                    { "type": "image_url", "image_url": { "url": image_url } },
                ],
            }],
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Parse("no completion in response".to_string()))
    }
}
