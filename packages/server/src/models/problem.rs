use chrono::{DateTime, Utc};
use common::Difficulty;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::{problem, test_case};
use crate::error::AppError;

pub use super::shared::{Pagination, escape_like};
use super::shared::{validate_optional_position, validate_text_len, validate_title};

const MAX_DESCRIPTION_BYTES: usize = 1_000_000;
const MAX_CASE_BYTES: usize = 1_000_000;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProblemRequest {
    #[schema(example = "Two Sum")]
    pub title: String,
    /// Problem statement in Markdown.
    pub description: String,
    pub difficulty: Difficulty,
    #[schema(example = "Arrays")]
    pub category: String,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateProblemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub category: String,
    /// Sample test cases (hidden ones are never listed here).
    pub samples: Vec<TestCaseResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProblemResponse {
    pub fn new(m: problem::Model, samples: Vec<test_case::Model>) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            difficulty: m.difficulty,
            category: m.category,
            samples: samples.into_iter().map(Into::into).collect(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProblemListItem {
    pub id: i32,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemListResponse {
    pub data: Vec<ProblemListItem>,
    pub pagination: Pagination,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProblemListQuery {
    /// Page number (1-based). Default: 1.
    pub page: Option<u64>,
    /// Items per page (1-100). Default: 20.
    pub per_page: Option<u64>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTestCaseRequest {
    #[schema(example = "2 7 11 15\n9")]
    pub input: String,
    #[schema(example = "0 1")]
    pub expected_output: String,
    #[serde(default)]
    pub is_sample: bool,
    /// Auto-assigned after the last case when omitted.
    pub position: Option<i32>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateTestCaseRequest {
    pub input: Option<String>,
    pub expected_output: Option<String>,
    pub is_sample: Option<bool>,
    pub position: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TestCaseResponse {
    pub id: i32,
    pub input: String,
    pub expected_output: String,
    pub is_sample: bool,
    pub position: i32,
    pub problem_id: i32,
}

impl From<test_case::Model> for TestCaseResponse {
    fn from(m: test_case::Model) -> Self {
        Self {
            id: m.id,
            input: m.input,
            expected_output: m.expected_output,
            is_sample: m.is_sample,
            position: m.position,
            problem_id: m.problem_id,
        }
    }
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.trim().is_empty() || description.len() > MAX_DESCRIPTION_BYTES {
        return Err(AppError::Validation(
            "Description must be non-empty and at most 1MB".into(),
        ));
    }
    Ok(())
}

fn validate_case_text(value: &str, field: &str) -> Result<(), AppError> {
    if value.len() > MAX_CASE_BYTES {
        return Err(AppError::Validation(format!("{field} must be at most 1MB")));
    }
    Ok(())
}

pub fn validate_create_problem(req: &CreateProblemRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_description(&req.description)?;
    validate_text_len(&req.category, "Category", 64)
}

pub fn validate_update_problem(req: &UpdateProblemRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref description) = req.description {
        validate_description(description)?;
    }
    if let Some(ref category) = req.category {
        validate_text_len(category, "Category", 64)?;
    }
    Ok(())
}

pub fn validate_create_test_case(req: &CreateTestCaseRequest) -> Result<(), AppError> {
    validate_case_text(&req.input, "Input")?;
    validate_case_text(&req.expected_output, "Expected output")?;
    validate_optional_position(req.position)
}

pub fn validate_update_test_case(req: &UpdateTestCaseRequest) -> Result<(), AppError> {
    if let Some(ref input) = req.input {
        validate_case_text(input, "Input")?;
    }
    if let Some(ref expected) = req.expected_output {
        validate_case_text(expected, "Expected output")?;
    }
    validate_optional_position(req.position)
}
