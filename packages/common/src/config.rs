use serde::Deserialize;

/// LLM chat-completion settings shared by the server and the queue worker.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible API. Default: "https://api.mistral.ai".
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Bearer key. Empty disables the LLM and every caller uses its fallback.
    #[serde(default)]
    pub api_key: String,
    /// Model name. Default: "mistral-small-latest".
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature. Default: 0.3.
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    /// Completion token cap. Default: 1024.
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in seconds. Default: 60.
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_llm_base_url() -> String {
    "https://api.mistral.ai".into()
}
fn default_llm_model() -> String {
    "mistral-small-latest".into()
}
fn default_llm_temperature() -> f32 {
    0.3
}
fn default_llm_max_tokens() -> u32 {
    1024
}
fn default_llm_timeout_secs() -> u64 {
    60
}

impl LlmConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            api_key: String::new(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            max_tokens: default_llm_max_tokens(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}
