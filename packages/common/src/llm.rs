//! Chat-completion client for the evaluation LLM.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::LlmConfig;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error [{status}]: {message}")]
    Api { status: u16, message: String },
    #[error("LLM unavailable: {0}")]
    Unavailable(String),
    #[error("LLM returned an empty reply")]
    EmptyReply,
    #[error("Invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Anything that can answer a chat conversation with a single text reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError>;
}

/// Mistral (or any OpenAI-compatible) `/v1/chat/completions` client.
pub struct MistralClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl MistralClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }
}

#[async_trait]
impl ChatBackend for MistralClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        debug!(model = %self.model, "Sending chat completion request");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let text = resp.text().await?;
        read_completion(status, &text)
    }
}

/// Pull the reply text out of a chat-completion response body.
///
/// Error statuses are reported as [`LlmError::Api`] even when the body is not JSON.
fn read_completion(status: u16, body: &str) -> Result<String, LlmError> {
    let json = serde_json::from_str::<serde_json::Value>(body);
    if status >= 400 {
        let message = json
            .ok()
            .and_then(|json| {
                json["error"]["message"]
                    .as_str()
                    .or_else(|| json["message"].as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| body.trim().chars().take(200).collect());
        return Err(LlmError::Api { status, message });
    }

    let json = json.map_err(|e| LlmError::Decode(e.to_string()))?;
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .trim()
        .to_string();
    if content.is_empty() {
        return Err(LlmError::EmptyReply);
    }
    Ok(content)
}

/// Backend used when no API key is configured.
pub struct DisabledBackend;

#[async_trait]
impl ChatBackend for DisabledBackend {
    async fn complete(&self, _messages: Vec<ChatMessage>) -> Result<String, LlmError> {
        Err(LlmError::Unavailable("no API key configured".into()))
    }
}

/// Build the backend described by `config`.
pub fn backend_from_config(config: &LlmConfig) -> Result<Arc<dyn ChatBackend>, LlmError> {
    if !config.is_enabled() {
        info!("LLM API key not set, AI features use fallback generators");
        return Ok(Arc::new(DisabledBackend));
    }
    info!(base_url = %config.base_url, model = %config.model, "LLM backend configured");
    Ok(Arc::new(MistralClient::new(config)?))
}
