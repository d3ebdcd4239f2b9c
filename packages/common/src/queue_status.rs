#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a deferred evaluation job in the `mistral_queue` table.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum QueueJobStatus {
    /// Waiting for the worker.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    /// Claimed by a worker, LLM call in flight.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "processing"))]
    Processing,
    /// Evaluation stored.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "done"))]
    Done,
    /// Processing failed; needs an operator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "error"))]
    Error,
}

impl QueueJobStatus {
    pub const ALL: &'static [QueueJobStatus] =
        &[Self::Pending, Self::Processing, Self::Done, Self::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for QueueJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for QueueJobStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Body of a `mistral_queue` row: everything the worker needs to evaluate one answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationJobPayload {
    pub response_id: i32,
    pub session_id: Uuid,
    pub question: String,
    pub answer: String,
}

/// Error when parsing an invalid job status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQueueStatusError {
    invalid: String,
}

impl fmt::Display for ParseQueueStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid job status '{}'. Valid values: {}",
            self.invalid,
            QueueJobStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseQueueStatusError {}

impl FromStr for QueueJobStatus {
    type Err = ParseQueueStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "done" => Ok(Self::Done),
            "error" => Ok(Self::Error),
            _ => Err(ParseQueueStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
