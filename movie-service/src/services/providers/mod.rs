//! Completion provider abstractions and implementations.
//!
//! The summary endpoint talks to a chat-completion service through the
//! [`CompletionProvider`] trait so the OpenAI backend can be swapped for a
//! mock in tests.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The service answered with a non-200 status; `body` is its raw text.
    #[error("OpenAI API request failed: {body}")]
    ApiError { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::ApiError { .. } => AppError::UpstreamFailure(err.to_string()),
            other => AppError::UpstreamFailure(format!("Internal server error: {}", other)),
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Trait for chat-completion providers (e.g., OpenAI).
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the conversation and return the first choice's raw content.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;
}
