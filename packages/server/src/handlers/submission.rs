use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait, LockType};
use sea_orm::*;
use serde_json::Value;
use tracing::{info, instrument};

use crate::entity::submission::StoredCaseResult;
use crate::entity::{submission, test_case, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::problem::find_problem;
use crate::judge::{CaseInput, CaseOutcome, run_test_cases};
use crate::models::submission::*;
use crate::state::AppState;

/// Find a submission by ID or return 404.
async fn find_submission<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<submission::Model, AppError> {
    submission::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".into()))
}

/// Per-case record kept on the submission. Hidden cases keep only the verdict.
fn stored_result(case: &test_case::Model, outcome: CaseOutcome) -> StoredCaseResult {
    let result = outcome.result;
    let status = if result.status.ran_successfully() {
        if outcome.passed { "accepted" } else { "wrong_answer" }
    } else {
        result.status.as_str()
    };
    StoredCaseResult {
        test_case_id: case.id,
        is_sample: case.is_sample,
        passed: outcome.passed,
        status: status.to_string(),
        time_ms: result.time_ms,
        memory_kb: result.memory_kb,
        stdout: if case.is_sample { result.stdout } else { None },
        stderr: if case.is_sample { result.stderr } else { None },
        compile_output: result.compile_output,
    }
}

/// Take the user's row lock for the rest of the transaction.
///
/// Submissions by the same user are serialized from here on, so the first-solve
/// count in [`record_progress`] always sees the other submission's committed row.
async fn lock_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<(), AppError> {
    user::Entity::find_by_id(user_id)
        .lock(LockType::Update)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(())
}

/// Bump the user's counters for a new judged submission.
///
/// `problems_solved` only moves on the first accepted submission for the problem.
/// The caller must hold the user's row lock (see [`lock_user`]).
async fn record_progress<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    problem_id: i32,
    submission_id: i32,
    accepted: bool,
) -> Result<(), AppError> {
    let first_solve = accepted
        && submission::Entity::find()
            .filter(submission::Column::UserId.eq(user_id))
            .filter(submission::Column::ProblemId.eq(problem_id))
            .filter(submission::Column::Accepted.eq(true))
            .filter(submission::Column::Id.ne(submission_id))
            .count(db)
            .await?
            == 0;

    let mut update = user::Entity::update_many()
        .col_expr(
            user::Column::SubmissionsCount,
            Expr::col(user::Column::SubmissionsCount).add(1),
        )
        .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()));
    if first_solve {
        update = update.col_expr(
            user::Column::ProblemsSolved,
            Expr::col(user::Column::ProblemsSolved).add(1),
        );
    }
    update
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;

    Ok(())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution to a problem",
    description = "Runs the solution against every stored test case, persists the verdicts and updates progress. Hidden case output is never returned. Requires `submission:submit` permission.",
    params(("id" = i32, Path, description = "Problem ID")),
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Submission judged", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Execution service error (UPSTREAM_ERROR)", body = ErrorBody),
        (status = 504, description = "Execution service timed out (UPSTREAM_TIMEOUT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, problem_id = %problem_id))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
    AppJson(payload): AppJson<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("submission:submit")?;
    validate_submit_request(&payload)?;

    find_problem(&state.db, problem_id).await?;
    let cases = test_case::Entity::find()
        .filter(test_case::Column::ProblemId.eq(problem_id))
        .order_by_asc(test_case::Column::Position)
        .order_by_asc(test_case::Column::Id)
        .all(&state.db)
        .await?;
    if cases.is_empty() {
        return Err(AppError::Validation(
            "Problem has no test cases to judge against".into(),
        ));
    }

    let inputs: Vec<CaseInput> = cases
        .iter()
        .map(|c| CaseInput {
            input: c.input.clone(),
            expected: Value::String(c.expected_output.clone()),
        })
        .collect();
    let outcomes = run_test_cases(
        &state.judge,
        &payload.language,
        &payload.source_code,
        &inputs,
    )
    .await?;

    let results: Vec<StoredCaseResult> = cases
        .iter()
        .zip(outcomes)
        .map(|(case, outcome)| stored_result(case, outcome))
        .collect();
    let passed = results.iter().filter(|r| r.passed).count() as i32;
    let total = results.len() as i32;
    let accepted = passed == total;

    let results_json = serde_json::to_value(&results)
        .map_err(|e| AppError::Internal(format!("Failed to encode results: {e}")))?;

    let txn = state.db.begin().await?;
    lock_user(&txn, auth_user.user_id).await?;
    let model = submission::ActiveModel {
        language: Set(payload.language.trim().to_ascii_lowercase()),
        source_code: Set(payload.source_code),
        passed: Set(passed),
        total: Set(total),
        accepted: Set(accepted),
        results: Set(results_json),
        user_id: Set(auth_user.user_id),
        problem_id: Set(problem_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    record_progress(&txn, auth_user.user_id, problem_id, model.id, accepted).await?;
    txn.commit().await?;

    info!(submission_id = model.id, passed, total, accepted, "Submission judged");

    Ok((StatusCode::CREATED, Json(SubmissionResponse::try_from(model)?)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Submissions",
    operation_id = "listMySubmissions",
    summary = "List your submissions for a problem",
    description = "Newest first. Only the caller's own submissions are listed.",
    params(("id" = i32, Path, description = "Problem ID")),
    responses(
        (status = 200, description = "Submission history", body = Vec<SubmissionListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, problem_id = %problem_id))]
pub async fn list_my_submissions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
) -> Result<Json<Vec<SubmissionListItem>>, AppError> {
    find_problem(&state.db, problem_id).await?;

    let rows = submission::Entity::find()
        .filter(submission::Column::ProblemId.eq(problem_id))
        .filter(submission::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(submission::Column::CreatedAt)
        .order_by_desc(submission::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get submission details",
    description = "Users can view their own submissions; users with `submission:view_all` permission can view any submission.",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission details", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(submission_id = %id))]
pub async fn get_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let sub = find_submission(&state.db, id).await?;

    // Other users' submissions look nonexistent.
    if auth_user
        .require_owner_or(sub.user_id, "submission:view_all")
        .is_err()
    {
        return Err(AppError::NotFound("Submission not found".into()));
    }

    Ok(Json(SubmissionResponse::try_from(sub)?))
}
