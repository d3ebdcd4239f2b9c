use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::submission::{self, StoredCaseResult};
use crate::error::AppError;

pub use super::execute::validate_program;

/// Submit a solution to a stored problem.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitRequest {
    #[schema(example = "python")]
    pub language: String,
    pub source_code: String,
}

pub fn validate_submit_request(req: &SubmitRequest) -> Result<(), AppError> {
    validate_program(&req.language, &req.source_code)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub problem_id: i32,
    pub user_id: i32,
    pub language: String,
    pub source_code: String,
    pub passed: i32,
    pub total: i32,
    pub accepted: bool,
    pub results: Vec<StoredCaseResult>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<submission::Model> for SubmissionResponse {
    type Error = AppError;

    fn try_from(m: submission::Model) -> Result<Self, Self::Error> {
        let results: Vec<StoredCaseResult> = serde_json::from_value(m.results)
            .map_err(|e| AppError::Internal(format!("Corrupt submission results: {e}")))?;
        Ok(Self {
            id: m.id,
            problem_id: m.problem_id,
            user_id: m.user_id,
            language: m.language,
            source_code: m.source_code,
            passed: m.passed,
            total: m.total,
            accepted: m.accepted,
            results,
            created_at: m.created_at,
        })
    }
}

/// Row in a submission history list (no source, no per-case detail).
#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionListItem {
    pub id: i32,
    pub language: String,
    pub passed: i32,
    pub total: i32,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<submission::Model> for SubmissionListItem {
    fn from(m: submission::Model) -> Self {
        Self {
            id: m.id,
            language: m.language,
            passed: m.passed,
            total: m.total,
            accepted: m.accepted,
            created_at: m.created_at,
        }
    }
}
