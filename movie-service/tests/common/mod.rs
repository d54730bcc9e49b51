#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use movie_service::models::Movie;
use movie_service::services::providers::mock::MockCompletionProvider;
use movie_service::services::providers::openai::{OpenAiConfig, OpenAiProvider};
use movie_service::services::providers::CompletionProvider;
use movie_service::services::{InMemoryMovieStore, MovieStore};
use movie_service::{build_router, AppState};
use secrecy::Secret;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "sk-test-key";

pub fn sample_movies() -> Vec<Movie> {
    vec![
        Movie::new("Inception", "Sci-Fi", "2010"),
        Movie::new("The Social Network", "Drama", "2010"),
        Movie::new("Heat", "Crime", "1995"),
        Movie::new("Arrival", "Sci-Fi", "2016"),
    ]
}

pub struct TestApp {
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

impl TestApp {
    pub fn new(store: Arc<dyn MovieStore>, completions: Arc<dyn CompletionProvider>) -> Self {
        Self {
            router: build_router(AppState::new(store, completions)),
        }
    }

    /// Sample catalog with a mock completion provider.
    pub fn with_mock(provider: Arc<MockCompletionProvider>) -> Self {
        Self::new(Arc::new(InMemoryMovieStore::new(sample_movies())), provider)
    }

    /// Sample catalog talking to a wiremock stand-in for OpenAI.
    pub fn with_openai(server: &MockServer) -> Self {
        let provider = OpenAiProvider::new(OpenAiConfig {
            api_url: format!("{}/v1/chat/completions", server.uri()),
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
        })
        .expect("Failed to build OpenAI provider");

        Self::new(
            Arc::new(InMemoryMovieStore::new(sample_movies())),
            Arc::new(provider),
        )
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub fn titles(body: &serde_json::Value) -> Vec<String> {
    let mut titles: Vec<String> = body
        .as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|m| m["title"].as_str().unwrap().to_string())
        .collect();
    titles.sort();
    titles
}
