#![allow(dead_code)]

use std::collections::HashMap;

use serde_json::json;
use url_summarizer::{config::Config, AppState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_PATH: &str = "/openai/v1/chat/completions";

/// Config whose every outbound endpoint points at `server_uri`.
pub fn test_config(server_uri: &str, api_key: Option<&str>) -> Config {
    let mut vars: HashMap<&str, String> = HashMap::new();
    if let Some(key) = api_key {
        vars.insert("GROQ_API_KEY", key.to_string());
    }
    vars.insert("LLM_API_URL", format!("{server_uri}{CHAT_PATH}"));
    vars.insert("YOUTUBE_BASE_URL", server_uri.to_string());
    vars.insert("OEMBED_URL", format!("{server_uri}/oembed"));
    vars.insert("YTDLP_PATH", "/nonexistent/bin/yt-dlp".to_string());

    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config should load")
}

pub fn test_state(server_uri: &str, api_key: Option<&str>) -> AppState {
    AppState::new(test_config(server_uri, api_key)).expect("state should build")
}

pub async fn mount_chat_reply(server: &MockServer, reply: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": reply } }]
        })))
        .mount(server)
        .await;
}
