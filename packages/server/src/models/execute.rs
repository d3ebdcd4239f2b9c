use common::BatchSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::judge::{ExecutionResult, resolve_language};

pub const MAX_SOURCE_BYTES: usize = 256 * 1024;
pub const MAX_STDIN_BYTES: usize = 1024 * 1024;
pub const MAX_ADHOC_CASES: usize = 20;

/// Run a program once.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RunRequest {
    #[schema(example = "python")]
    pub language: String,
    #[schema(example = "print(input())")]
    pub source_code: String,
    #[serde(default)]
    #[schema(example = "hello")]
    pub stdin: String,
}

/// An ad-hoc test case. `expected_output` may be any JSON scalar.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdhocTestCase {
    #[serde(default)]
    pub input: String,
    #[schema(value_type = Object, example = json!(5))]
    pub expected_output: Value,
}

/// Run a program against caller-supplied cases, without persisting anything.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ExecuteRequest {
    #[schema(example = "python")]
    pub language: String,
    pub source_code: String,
    pub test_cases: Vec<AdhocTestCase>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CaseResult {
    /// 0-based position of the case in the request.
    pub index: usize,
    pub passed: bool,
    pub input: String,
    #[schema(value_type = Object)]
    pub expected_output: Value,
    pub result: ExecutionResult,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ExecuteResponse {
    pub results: Vec<CaseResult>,
    pub summary: BatchSummary,
}

pub fn validate_program(language: &str, source_code: &str) -> Result<(), AppError> {
    if resolve_language(language).is_none() {
        return Err(AppError::Validation(format!(
            "Unsupported language: {language}"
        )));
    }
    if source_code.trim().is_empty() {
        return Err(AppError::Validation("Source code must not be empty".into()));
    }
    if source_code.len() > MAX_SOURCE_BYTES {
        return Err(AppError::Validation(
            "Source code must be at most 256KB".into(),
        ));
    }
    Ok(())
}

fn validate_stdin(stdin: &str) -> Result<(), AppError> {
    if stdin.len() > MAX_STDIN_BYTES {
        return Err(AppError::Validation("Input must be at most 1MB".into()));
    }
    Ok(())
}

pub fn validate_run_request(req: &RunRequest) -> Result<(), AppError> {
    validate_program(&req.language, &req.source_code)?;
    validate_stdin(&req.stdin)
}

pub fn validate_execute_request(req: &ExecuteRequest) -> Result<(), AppError> {
    validate_program(&req.language, &req.source_code)?;
    if req.test_cases.is_empty() || req.test_cases.len() > MAX_ADHOC_CASES {
        return Err(AppError::Validation(format!(
            "Provide 1-{MAX_ADHOC_CASES} test cases"
        )));
    }
    for case in &req.test_cases {
        validate_stdin(&case.input)?;
        if case.expected_output.is_array() || case.expected_output.is_object() {
            return Err(AppError::Validation(
                "expected_output must be a string, number, boolean or null".into(),
            ));
        }
    }
    Ok(())
}
