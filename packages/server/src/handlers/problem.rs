use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{problem, submission, test_case};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::problem::*;
use crate::models::shared::page_params;
use crate::state::AppState;

const EDITOR_PERMISSIONS: &[&str] = &["problem:create", "problem:edit"];

#[utoipa::path(
    post,
    path = "/",
    tag = "Problems",
    operation_id = "createProblem",
    summary = "Create a new problem",
    description = "Requires `problem:create` permission.",
    request_body = CreateProblemRequest,
    responses(
        (status = 201, description = "Problem created", body = ProblemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_problem(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProblemRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("problem:create")?;
    validate_create_problem(&payload)?;

    let now = chrono::Utc::now();
    let new_problem = problem::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        difficulty: Set(payload.difficulty),
        category: Set(payload.category.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_problem.insert(&state.db).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProblemResponse::new(model, Vec::new())),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Problems",
    operation_id = "listProblems",
    summary = "List problems with pagination and filters",
    description = "Any authenticated user. Newest first. `search` is a case-insensitive title match; `difficulty` and `category` filter exactly.",
    params(ProblemListQuery),
    responses(
        (status = 200, description = "List of problems", body = ProblemListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_problems(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProblemListQuery>,
) -> Result<Json<ProblemListResponse>, AppError> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut select = problem::Entity::find();

    if let Some(ref search) = query.search {
        let term = escape_like(search.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(problem::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }
    if let Some(difficulty) = query.difficulty {
        select = select.filter(problem::Column::Difficulty.eq(difficulty));
    }
    if let Some(ref category) = query.category {
        select = select.filter(problem::Column::Category.eq(category.trim()));
    }

    let total = select
        .clone()
        .paginate(&state.db, per_page)
        .num_items()
        .await?;

    let data = select
        .order_by_desc(problem::Column::CreatedAt)
        .order_by_desc(problem::Column::Id)
        .select_only()
        .column(problem::Column::Id)
        .column(problem::Column::Title)
        .column(problem::Column::Difficulty)
        .column(problem::Column::Category)
        .column(problem::Column::CreatedAt)
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .into_model::<ProblemListItem>()
        .all(&state.db)
        .await?;

    Ok(Json(ProblemListResponse {
        data,
        pagination: Pagination::new(page, per_page, total),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Problems",
    operation_id = "getProblem",
    summary = "Get a problem by ID",
    description = "Returns the statement and the sample test cases. Hidden cases are never included.",
    params(("id" = i32, Path, description = "Problem ID")),
    responses(
        (status = 200, description = "Problem details", body = ProblemResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_problem(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProblemResponse>, AppError> {
    let model = find_problem(&state.db, id).await?;
    let samples = test_case::Entity::find()
        .filter(test_case::Column::ProblemId.eq(id))
        .filter(test_case::Column::IsSample.eq(true))
        .order_by_asc(test_case::Column::Position)
        .all(&state.db)
        .await?;
    Ok(Json(ProblemResponse::new(model, samples)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Problems",
    operation_id = "updateProblem",
    summary = "Update an existing problem",
    description = "Partially updates a problem; only provided fields are modified. Requires `problem:edit` permission.",
    params(("id" = i32, Path, description = "Problem ID")),
    request_body = UpdateProblemRequest,
    responses(
        (status = 200, description = "Problem updated", body = ProblemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_problem(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateProblemRequest>,
) -> Result<Json<ProblemResponse>, AppError> {
    auth_user.require_permission("problem:edit")?;
    validate_update_problem(&payload)?;

    let txn = state.db.begin().await?;

    let existing = find_problem_for_update(&txn, id).await?;

    let model = if payload == UpdateProblemRequest::default() {
        existing
    } else {
        let mut active: problem::ActiveModel = existing.into();
        if let Some(ref title) = payload.title {
            active.title = Set(title.trim().to_string());
        }
        if let Some(description) = payload.description {
            active.description = Set(description);
        }
        if let Some(difficulty) = payload.difficulty {
            active.difficulty = Set(difficulty);
        }
        if let Some(ref category) = payload.category {
            active.category = Set(category.trim().to_string());
        }
        active.updated_at = Set(chrono::Utc::now());
        active.update(&txn).await?
    };

    let samples = test_case::Entity::find()
        .filter(test_case::Column::ProblemId.eq(id))
        .filter(test_case::Column::IsSample.eq(true))
        .order_by_asc(test_case::Column::Position)
        .all(&txn)
        .await?;
    txn.commit().await?;

    Ok(Json(ProblemResponse::new(model, samples)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Problems",
    operation_id = "deleteProblem",
    summary = "Delete a problem by ID",
    description = "Deletes a problem and its test cases. Requires `problem:delete` permission. Returns 409 CONFLICT if the problem has submissions.",
    params(("id" = i32, Path, description = "Problem ID")),
    responses(
        (status = 204, description = "Problem deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Cannot delete: has submissions (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_problem(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("problem:delete")?;

    let txn = state.db.begin().await?;

    find_problem_for_update(&txn, id).await?;

    let sub_count = submission::Entity::find()
        .filter(submission::Column::ProblemId.eq(id))
        .count(&txn)
        .await?;
    if sub_count > 0 {
        return Err(AppError::Conflict(
            "Cannot delete problem with existing submissions".into(),
        ));
    }

    test_case::Entity::delete_many()
        .filter(test_case::Column::ProblemId.eq(id))
        .exec(&txn)
        .await?;
    problem::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Test Cases",
    operation_id = "createTestCase",
    summary = "Create a test case for a problem",
    description = "Requires `problem:edit` permission. Position is auto-assigned after the last case if omitted.",
    params(("id" = i32, Path, description = "Problem ID")),
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Test case created", body = TestCaseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(problem_id))]
pub async fn create_test_case(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
    AppJson(payload): AppJson<CreateTestCaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("problem:edit")?;
    validate_create_test_case(&payload)?;

    let txn = state.db.begin().await?;
    find_problem_for_update(&txn, problem_id).await?;

    let position = match payload.position {
        Some(p) => p,
        None => next_position(&txn, problem_id).await?,
    };

    let new_tc = test_case::ActiveModel {
        input: Set(payload.input),
        expected_output: Set(payload.expected_output),
        is_sample: Set(payload.is_sample),
        position: Set(position),
        problem_id: Set(problem_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_tc.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TestCaseResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Test Cases",
    operation_id = "listTestCases",
    summary = "List test cases for a problem",
    description = "Ordered by position. Users with `problem:create` or `problem:edit` see every case; everyone else sees sample cases only.",
    params(("id" = i32, Path, description = "Problem ID")),
    responses(
        (status = 200, description = "List of test cases", body = Vec<TestCaseResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Problem not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(problem_id))]
pub async fn list_test_cases(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(problem_id): Path<i32>,
) -> Result<Json<Vec<TestCaseResponse>>, AppError> {
    find_problem(&state.db, problem_id).await?;

    let mut select = test_case::Entity::find().filter(test_case::Column::ProblemId.eq(problem_id));
    if auth_user.require_any_permission(EDITOR_PERMISSIONS).is_err() {
        select = select.filter(test_case::Column::IsSample.eq(true));
    }

    let rows = select
        .order_by_asc(test_case::Column::Position)
        .order_by_asc(test_case::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    patch,
    path = "/{tc_id}",
    tag = "Test Cases",
    operation_id = "updateTestCase",
    summary = "Update a test case",
    description = "Partially updates a test case. Requires `problem:edit` permission.",
    params(
        ("id" = i32, Path, description = "Problem ID"),
        ("tc_id" = i32, Path, description = "Test case ID"),
    ),
    request_body = UpdateTestCaseRequest,
    responses(
        (status = 200, description = "Test case updated", body = TestCaseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Test case not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(problem_id, tc_id))]
pub async fn update_test_case(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((problem_id, tc_id)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateTestCaseRequest>,
) -> Result<Json<TestCaseResponse>, AppError> {
    auth_user.require_permission("problem:edit")?;
    validate_update_test_case(&payload)?;

    let existing = find_test_case_for_problem(&state.db, problem_id, tc_id).await?;
    if payload == UpdateTestCaseRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: test_case::ActiveModel = existing.into();
    if let Some(input) = payload.input {
        active.input = Set(input);
    }
    if let Some(expected_output) = payload.expected_output {
        active.expected_output = Set(expected_output);
    }
    if let Some(is_sample) = payload.is_sample {
        active.is_sample = Set(is_sample);
    }
    if let Some(position) = payload.position {
        active.position = Set(position);
    }

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{tc_id}",
    tag = "Test Cases",
    operation_id = "deleteTestCase",
    summary = "Delete a test case",
    description = "Requires `problem:edit` permission.",
    params(
        ("id" = i32, Path, description = "Problem ID"),
        ("tc_id" = i32, Path, description = "Test case ID"),
    ),
    responses(
        (status = 204, description = "Test case deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Test case not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(problem_id, tc_id))]
pub async fn delete_test_case(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((problem_id, tc_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("problem:edit")?;

    find_test_case_for_problem(&state.db, problem_id, tc_id).await?;
    test_case::Entity::delete_by_id(tc_id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn find_problem<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<problem::Model, AppError> {
    problem::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))
}

async fn find_problem_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<problem::Model, AppError> {
    use sea_orm::sea_query::LockType;
    problem::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))
}

async fn find_test_case_for_problem<C: ConnectionTrait>(
    db: &C,
    problem_id: i32,
    tc_id: i32,
) -> Result<test_case::Model, AppError> {
    test_case::Entity::find_by_id(tc_id)
        .one(db)
        .await?
        .filter(|tc| tc.problem_id == problem_id)
        .ok_or_else(|| AppError::NotFound("Test case not found".into()))
}

/// Compute the next position for a new test case in a problem.
async fn next_position<C: ConnectionTrait>(db: &C, problem_id: i32) -> Result<i32, AppError> {
    let max_pos: Option<i32> = test_case::Entity::find()
        .filter(test_case::Column::ProblemId.eq(problem_id))
        .select_only()
        .column_as(test_case::Column::Position.max(), "max_pos")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_pos
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Position overflow".into()))
}
