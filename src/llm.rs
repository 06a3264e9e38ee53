use serde::Serialize;
use reqwest::Client;
use tracing::debug;
use crate::error::{Result, AppError};

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

/// OpenAI-compatible chat completion endpoint (Groq by default).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(client: Client, api_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `prompt` as a single user message and returns the reply text.
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "user".into(),
                    content: prompt.into(),
                }
            ],
        };

        debug!("Calling {} with model {}", self.api_url, self.model);
        let res = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmError(format!("request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(AppError::LlmError(format!("API returned HTTP {}: {}", status, detail.trim())));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| AppError::LlmError(format!("unreadable response: {}", e)))?;
        let reply = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AppError::LlmError("Invalid response format from LLM".to_string()))?
            .to_string();

        Ok(reply)
    }
}
