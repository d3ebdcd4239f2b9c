use axum::Json;
use axum::extract::State;
use common::summarize;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::judge::{CaseInput, ExecutionResult, LANGUAGES, Language, run_test_cases};
use crate::models::execute::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/languages",
    tag = "Execution",
    operation_id = "listLanguages",
    summary = "Languages accepted by the code execution service",
    responses(
        (status = 200, description = "Supported languages", body = Vec<Language>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
pub async fn list_languages(_auth_user: AuthUser) -> Json<&'static [Language]> {
    Json(LANGUAGES)
}

#[utoipa::path(
    post,
    path = "/run",
    tag = "Execution",
    operation_id = "runCode",
    summary = "Run a program once",
    description = "Sends the program and stdin to the code execution service and waits for the result.",
    request_body = RunRequest,
    responses(
        (status = 200, description = "Execution result", body = ExecutionResult),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Execution service error (UPSTREAM_ERROR)", body = ErrorBody),
        (status = 504, description = "Execution service timed out (UPSTREAM_TIMEOUT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, language = %payload.language))]
pub async fn run(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RunRequest>,
) -> Result<Json<ExecutionResult>, AppError> {
    validate_run_request(&payload)?;
    let result = state
        .judge
        .run(&payload.language, &payload.source_code, &payload.stdin)
        .await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Execution",
    operation_id = "executeTestCases",
    summary = "Run a program against ad-hoc test cases",
    description = "Runs each case, compares stdout with the expected output and returns per-case verdicts plus a summary. Nothing is persisted.",
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "Per-case results", body = ExecuteResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 502, description = "Execution service error (UPSTREAM_ERROR)", body = ErrorBody),
        (status = 504, description = "Execution service timed out (UPSTREAM_TIMEOUT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, language = %payload.language, cases = payload.test_cases.len()))]
pub async fn execute(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, AppError> {
    validate_execute_request(&payload)?;

    let cases: Vec<CaseInput> = payload
        .test_cases
        .iter()
        .map(|c| CaseInput {
            input: c.input.clone(),
            expected: c.expected_output.clone(),
        })
        .collect();

    let outcomes = run_test_cases(
        &state.judge,
        &payload.language,
        &payload.source_code,
        &cases,
    )
    .await?;

    let summary = summarize(&outcomes.iter().map(|o| o.passed).collect::<Vec<_>>());
    let results = payload
        .test_cases
        .into_iter()
        .zip(outcomes)
        .enumerate()
        .map(|(index, (case, outcome))| CaseResult {
            index,
            passed: outcome.passed,
            input: case.input,
            expected_output: case.expected_output,
            result: outcome.result,
        })
        .collect();

    Ok(Json(ExecuteResponse { results, summary }))
}
