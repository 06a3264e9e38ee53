mod common;

use serde_json::json;
use url_summarizer::error::AppError;
use url_summarizer::pipeline::summarize_url;
use url_summarizer::source::SourceKind;
use url_summarizer::video::{PLACEHOLDER_BODY, UNKNOWN_TITLE, UNKNOWN_UPLOADER};
use wiremock::matchers::{any, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{mount_chat_reply, test_state, CHAT_PATH};

fn watch_page(timedtext_url: &str) -> String {
    format!(
        r#"<html><body><script>var ytInitialPlayerResponse = {{"captions":{{"playerCaptionsTracklistRenderer":{{"captionTracks":[{{"baseUrl":"{timedtext_url}","languageCode":"en","kind":"asr"}}]}}}}}};</script></body></html>"#
    )
}

#[tokio::test]
async fn video_url_with_transcript_is_summarized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/watch"))
        .and(query_param("v", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(watch_page(&format!(
            "{}/api/timedtext?v=abc123\\u0026lang=en",
            server.uri()
        ))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/timedtext"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.2">Hello</text><text start="1.2" dur="0.8">world</text></transcript>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/oembed"))
        .and(query_param("url", "https://www.youtube.com/watch?v=abc123"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "T", "author_name": "A" })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_string_contains("Hello world"))
        .and(body_string_contains("gemma2-9b-it"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "A greeting." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(&server.uri(), Some("gsk_test"));
    let result = summarize_url(&state, "https://www.youtube.com/watch?v=abc123")
        .await
        .expect("pipeline should succeed");

    assert_eq!(result.source, SourceKind::Video);
    assert_eq!(result.summary, "A greeting.");
    assert!(result.raw_content.contains("Video Title: T"));
    assert!(result.raw_content.contains("Uploader: A"));
    assert!(result.raw_content.contains("Content:\nHello world"));
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn video_without_transcript_or_description_warns_about_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/watch"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no captions</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oembed"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_chat_reply(&server, "Nothing to say.").await;

    let state = test_state(&server.uri(), Some("gsk_test"));
    let result = summarize_url(&state, "https://youtu.be/abc123").await.expect("pipeline should succeed");

    assert!(result.raw_content.contains(&format!("Video Title: {UNKNOWN_TITLE}")));
    assert!(result.raw_content.contains(&format!("Uploader: {UNKNOWN_UPLOADER}")));
    assert!(result.raw_content.ends_with(PLACEHOLDER_BODY));
    assert_eq!(result.warnings.len(), 1);
}

#[tokio::test]
async fn generic_page_uses_article_text_only() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><head><title>Example</title><script>ignored()</script></head>\
             <body><main>Navigation</main><article>Main   text.</article></body></html>",
        ))
        .mount(&server)
        .await;
    mount_chat_reply(&server, "Summary of the page.").await;

    let url = format!("{}/page", server.uri());
    let state = test_state(&server.uri(), Some("gsk_test"));
    let result = summarize_url(&state, &url).await.expect("pipeline should succeed");

    assert_eq!(result.source, SourceKind::GenericPage);
    assert_eq!(result.summary, "Summary of the page.");
    assert_eq!(
        result.raw_content,
        format!("Title: Example\nURL: {url}\n\nContent:\nMain text.")
    );
    assert!(!result.raw_content.contains("ignored()"));
}

#[tokio::test]
async fn empty_input_is_rejected_without_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_state(&server.uri(), Some("gsk_test"));
    let err = summarize_url(&state, "   ").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn missing_api_key_stops_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let state = test_state(&server.uri(), None);
    let err = summarize_url(&state, &format!("{}/page", server.uri())).await.unwrap_err();

    assert!(matches!(err, AppError::MissingConfiguration(_)));
    assert_eq!(err.kind(), "missing_configuration");
}

#[tokio::test]
async fn unrecognized_video_shape_is_invalid_video_url() {
    let server = MockServer::start().await;
    let state = test_state(&server.uri(), Some("gsk_test"));

    let err = summarize_url(&state, "https://www.youtube.com/channel/UCxyz").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidVideoUrl(_)));
}

#[tokio::test]
async fn failing_page_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let state = test_state(&server.uri(), Some("gsk_test"));
    let err = summarize_url(&state, &format!("{}/missing", server.uri())).await.unwrap_err();

    assert!(matches!(err, AppError::FetchError(_)));
}

#[tokio::test]
async fn completion_failure_is_a_summarization_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Some text</p>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let state = test_state(&server.uri(), Some("gsk_test"));
    let err = summarize_url(&state, &format!("{}/page", server.uri())).await.unwrap_err();

    match err {
        AppError::LlmError(msg) => assert!(msg.contains("500")),
        other => panic!("expected LlmError, got {other:?}"),
    }
}
