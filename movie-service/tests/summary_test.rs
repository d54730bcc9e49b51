mod common;

use axum::http::StatusCode;
use common::{TestApp, TEST_API_KEY};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

#[tokio::test]
async fn summarize_merges_trimmed_completion_into_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 150,
            "messages": [
                { "role": "system", "content": "You are a helpful assistant." },
                { "role": "user", "content": "Summarize the movie 'Inception', a Sci-Fi film released in 2010." }
            ]
        })))
        .respond_with(completion("  A thief steals secrets via dreams.  "))
        .expect(1)
        .mount(&server)
        .await;

    let response = TestApp::with_openai(&server)
        .get("/movies/Inception/summary")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({
            "title": "Inception",
            "genre": "Sci-Fi",
            "releaseYear": "2010",
            "generatedSummary": "A thief steals secrets via dreams."
        })
    );
}

#[tokio::test]
async fn summarize_decodes_percent_encoded_titles() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("A dorm-room startup."))
        .expect(1)
        .mount(&server)
        .await;

    let response = TestApp::with_openai(&server)
        .get("/movies/The%20Social%20Network/summary")
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "The Social Network");
    assert_eq!(response.body["generatedSummary"], "A dorm-room startup.");
}

#[tokio::test]
async fn summarize_unknown_title_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(completion("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let response = TestApp::with_openai(&server)
        .get("/movies/Solaris/summary")
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, json!("Movie not found."));
}

#[tokio::test]
async fn summarize_reports_completion_failures_with_raw_text() {
    let server = MockServer::start().await;
    let error_body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string(error_body))
        .expect(1)
        .mount(&server)
        .await;

    let response = TestApp::with_openai(&server)
        .get("/movies/Heat/summary")
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = response.body.as_str().expect("error body is a JSON string");
    assert_eq!(message, format!("OpenAI API request failed: {}", error_body));
}

#[tokio::test]
async fn summarize_with_empty_choices_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let response = TestApp::with_openai(&server)
        .get("/movies/Arrival/summary")
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response
        .body
        .as_str()
        .unwrap()
        .starts_with("Internal server error:"));
}
