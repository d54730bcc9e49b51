//! Mock provider implementation for testing.

use super::{ChatMessage, CompletionProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    ApiError { status: u16, body: String },
}

/// Mock completion provider that returns a canned reply and records every
/// conversation it receives.
pub struct MockCompletionProvider {
    reply: MockReply,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockCompletionProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Text(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: MockReply::ApiError {
                status,
                body: body.into(),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Conversations received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .expect("mock provider lock poisoned")
            .clone()
    }
}

#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.requests
            .lock()
            .expect("mock provider lock poisoned")
            .push(messages.to_vec());

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::ApiError { status, body } => Err(ProviderError::ApiError {
                status: *status,
                body: body.clone(),
            }),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }
}
