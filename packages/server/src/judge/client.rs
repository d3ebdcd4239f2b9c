use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use common::poll::poll_delay;

use super::language::resolve_language;
use crate::config::JudgeConfig;

#[derive(Debug, Error)]
pub enum JudgeError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("Code execution request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Code execution service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Malformed code execution response: {0}")]
    Decode(String),
    #[error("Code execution did not finish after {attempts} status checks")]
    Timeout { attempts: u32 },
}

/// Judge0 status, collapsed to what the application distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    InQueue,
    Processing,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    CompilationError,
    RuntimeError,
    InternalError,
    ExecFormatError,
    Unknown,
}

impl ExecutionStatus {
    pub fn from_judge_id(id: u32) -> Self {
        match id {
            1 => Self::InQueue,
            2 => Self::Processing,
            3 => Self::Accepted,
            4 => Self::WrongAnswer,
            5 => Self::TimeLimitExceeded,
            6 => Self::CompilationError,
            7..=12 => Self::RuntimeError,
            13 => Self::InternalError,
            14 => Self::ExecFormatError,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InQueue => "in_queue",
            Self::Processing => "processing",
            Self::Accepted => "accepted",
            Self::WrongAnswer => "wrong_answer",
            Self::TimeLimitExceeded => "time_limit_exceeded",
            Self::CompilationError => "compilation_error",
            Self::RuntimeError => "runtime_error",
            Self::InternalError => "internal_error",
            Self::ExecFormatError => "exec_format_error",
            Self::Unknown => "unknown",
        }
    }

    /// Still waiting on the judge.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::InQueue | Self::Processing)
    }

    /// The program ran to completion (its output still has to be compared).
    pub fn ran_successfully(&self) -> bool {
        matches!(self, Self::Accepted | Self::WrongAnswer)
    }
}

/// Outcome of one program run.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[schema(example = "Accepted")]
    pub status_description: String,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    /// CPU time in milliseconds.
    pub time_ms: Option<f64>,
    /// Peak memory in kilobytes.
    pub memory_kb: Option<u64>,
}

#[derive(Serialize)]
struct SubmitBody {
    source_code: String,
    language_id: u32,
    stdin: String,
}

#[derive(Deserialize)]
struct SubmitReply {
    token: String,
}

#[derive(Deserialize)]
struct RawStatus {
    id: u32,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct RawSubmission {
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    message: Option<String>,
    status: RawStatus,
    time: Option<Value>,
    memory: Option<u64>,
}

/// Decode a base64 field. Judge0 wraps long payloads with newlines.
fn decode_field(field: Option<String>) -> Result<Option<String>, JudgeError> {
    let Some(encoded) = field else {
        return Ok(None);
    };
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| JudgeError::Decode(e.to_string()))?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

impl RawSubmission {
    fn into_result(self, status: ExecutionStatus) -> Result<ExecutionResult, JudgeError> {
        let time_ms = self
            .time
            .as_ref()
            .and_then(common::llm_json::as_number)
            .map(|secs| secs * 1000.0);

        // Judge0 reports internal failures in `message` rather than stderr.
        let stderr = match decode_field(self.stderr)? {
            Some(stderr) => Some(stderr),
            None => decode_field(self.message)?,
        };

        Ok(ExecutionResult {
            status,
            status_description: self.status.description,
            stdout: decode_field(self.stdout)?,
            stderr,
            compile_output: decode_field(self.compile_output)?,
            time_ms,
            memory_kb: self.memory,
        })
    }
}

/// Client for a Judge0-compatible code execution API.
pub struct JudgeClient {
    base_url: String,
    api_key: String,
    api_host: String,
    max_poll_attempts: u32,
    poll_base_delay_ms: u64,
    poll_max_delay_ms: u64,
    linear_poll_attempts: u32,
    client: reqwest::Client,
}

impl JudgeClient {
    pub fn new(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
            max_poll_attempts: config.max_poll_attempts.max(1),
            poll_base_delay_ms: config.poll_base_delay_ms,
            poll_max_delay_ms: config.poll_max_delay_ms,
            linear_poll_attempts: config.linear_poll_attempts,
            client,
        })
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let req = if self.api_key.is_empty() {
            req
        } else {
            req.header("X-RapidAPI-Key", &self.api_key)
        };
        if self.api_host.is_empty() {
            req
        } else {
            req.header("X-RapidAPI-Host", &self.api_host)
        }
    }

    /// Run `source` with `stdin` and wait for the verdict.
    #[instrument(skip(self, source, stdin), fields(language))]
    pub async fn run(
        &self,
        language: &str,
        source: &str,
        stdin: &str,
    ) -> Result<ExecutionResult, JudgeError> {
        let lang = resolve_language(language)
            .ok_or_else(|| JudgeError::UnsupportedLanguage(language.to_string()))?;

        let token = self.submit(lang.judge_id, source, stdin).await?;
        debug!(token = %token, "Submitted to code execution service");

        for attempt in 1..=self.max_poll_attempts {
            tokio::time::sleep(poll_delay(
                attempt,
                self.poll_base_delay_ms,
                self.poll_max_delay_ms,
                self.linear_poll_attempts,
            ))
            .await;

            let raw = self.fetch(&token).await?;
            let status = ExecutionStatus::from_judge_id(raw.status.id);
            if !status.is_pending() {
                return raw.into_result(status);
            }
            debug!(token = %token, attempt, "Submission still running");
        }

        Err(JudgeError::Timeout {
            attempts: self.max_poll_attempts,
        })
    }

    async fn submit(&self, language_id: u32, source: &str, stdin: &str) -> Result<String, JudgeError> {
        let url = format!("{}/submissions?base64_encoded=true&wait=false", self.base_url);
        let body = SubmitBody {
            source_code: STANDARD.encode(source),
            language_id,
            stdin: STANDARD.encode(stdin),
        };

        let resp = self.with_auth(self.client.post(&url)).json(&body).send().await?;
        let reply: SubmitReply = Self::read_json(resp).await?;
        Ok(reply.token)
    }

    async fn fetch(&self, token: &str) -> Result<RawSubmission, JudgeError> {
        let url = format!(
            "{}/submissions/{}?base64_encoded=true&fields=stdout,stderr,compile_output,message,status,time,memory",
            self.base_url, token
        );
        let resp = self.with_auth(self.client.get(&url)).send().await?;
        Self::read_json(resp).await
    }

    async fn read_json<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T, JudgeError> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(JudgeError::Api {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }
        serde_json::from_str(&text).map_err(|e| JudgeError::Decode(e.to_string()))
    }
}
