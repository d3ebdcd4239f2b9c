use thiserror::Error;

/// Why a queue job ended in the `error` state.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid JSON: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("LLM error: {0}")]
    Llm(#[from] common::LlmError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
