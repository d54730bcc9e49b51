//! OpenAI chat completions provider.

use super::{ChatMessage, CompletionProvider, ProviderError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub model: String,
    pub max_tokens: u32,
}

/// OpenAI chat completions client.
///
/// The authorization headers are baked into the client once; the provider is
/// shared read-only across requests.
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "OpenAI API key not configured".to_string(),
            ));
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
            .map_err(|e| ProviderError::NotConfigured(format!("Invalid OpenAI API key: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            max_tokens = self.config.max_tokens,
            "Sending request to OpenAI API"
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.map_err(|e| {
                tracing::warn!(status = status.as_u16(), error = %e, "Failed to read OpenAI error body");
                ProviderError::NetworkError(format!(
                    "failed to read error body (status {}): {}",
                    status.as_u16(),
                    e
                ))
            })?;
            tracing::warn!(status = status.as_u16(), "OpenAI API returned an error");
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("response contained no choices".into()))?;

        choice.message.content.ok_or_else(|| {
            ProviderError::InvalidResponse("first choice has no message content".into())
        })
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
