use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::{
    Difficulty, EvaluationJobPayload, InterviewKind, QuestionKind, QueueJobStatus, SessionStatus,
};
use sea_orm::sea_query::{LockType, OnConflict};
use sea_orm::*;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entity::{
    final_report, interview_question, interview_session, mistral_queue, response_evaluation, user,
    user_response,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::user::find_user;
use crate::interview::{QuestionRequest, WrittenOutcome, compute_report, generate_questions};
use crate::models::interview::*;
use crate::models::shared::trimmed;
use crate::state::AppState;

const DEFAULT_TARGET_ROLE: &str = "Software Engineer";
const DEFAULT_TOPIC: &str = "general computer science";

/// Load a session the caller may read: their own, or any with `permission`.
///
/// Sessions of other users look nonexistent.
async fn find_visible_session<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    auth_user: &AuthUser,
    permission: &str,
) -> Result<interview_session::Model, AppError> {
    interview_session::Entity::find_by_id(id)
        .one(db)
        .await?
        .filter(|s| auth_user.require_owner_or(s.user_id, permission).is_ok())
        .ok_or_else(|| AppError::NotFound("Interview session not found".into()))
}

/// Lock the caller's own session row for the rest of the transaction.
async fn lock_own_session(
    txn: &DatabaseTransaction,
    id: Uuid,
    user_id: i32,
) -> Result<interview_session::Model, AppError> {
    interview_session::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| AppError::NotFound("Interview session not found".into()))
}

async fn session_questions<C: ConnectionTrait>(
    db: &C,
    session_id: Uuid,
) -> Result<Vec<interview_question::Model>, AppError> {
    Ok(interview_question::Entity::find()
        .filter(interview_question::Column::SessionId.eq(session_id))
        .order_by_asc(interview_question::Column::Position)
        .all(db)
        .await?)
}

async fn session_responses<C: ConnectionTrait>(
    db: &C,
    session_id: Uuid,
) -> Result<Vec<user_response::Model>, AppError> {
    Ok(user_response::Entity::find()
        .filter(user_response::Column::SessionId.eq(session_id))
        .order_by_asc(user_response::Column::Id)
        .all(db)
        .await?)
}

async fn session_evaluations<C: ConnectionTrait>(
    db: &C,
    session_id: Uuid,
) -> Result<Vec<response_evaluation::Model>, AppError> {
    Ok(response_evaluation::Entity::find()
        .filter(response_evaluation::Column::SessionId.eq(session_id))
        .order_by_asc(response_evaluation::Column::ResponseId)
        .all(db)
        .await?)
}

fn build_detail(
    session: interview_session::Model,
    questions: Vec<interview_question::Model>,
    responses: Vec<user_response::Model>,
) -> SessionDetail {
    let reveal = session.status == SessionStatus::Completed;
    SessionDetail {
        session: session.into(),
        questions: questions
            .into_iter()
            .map(|q| QuestionView::new(q, reveal))
            .collect(),
        responses: responses.into_iter().map(Into::into).collect(),
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Interviews",
    operation_id = "createInterview",
    summary = "Start an interview session",
    description = "Generates the session's questions with the LLM, or uses the built-in question set when the LLM is unavailable or replies with an invalid shape. Requires `interview:take` permission.",
    request_body = CreateInterviewRequest,
    responses(
        (status = 201, description = "Session created", body = SessionDetail),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, kind = %payload.kind))]
pub async fn create_interview(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInterviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("interview:take")?;
    validate_create_interview(&payload)?;

    let profile = find_user(&state.db, auth_user.user_id).await?;
    let target_role = trimmed(payload.target_role)
        .or_else(|| trimmed(profile.target_role))
        .unwrap_or_else(|| DEFAULT_TARGET_ROLE.to_string());
    let topic = match payload.kind {
        InterviewKind::Technical => {
            Some(trimmed(payload.topic).unwrap_or_else(|| DEFAULT_TOPIC.to_string()))
        }
        InterviewKind::Hr => None,
    };
    let difficulty = payload.difficulty.unwrap_or(Difficulty::Medium);

    let request = QuestionRequest {
        kind: payload.kind,
        target_role: &target_role,
        topic: topic.as_deref().unwrap_or(DEFAULT_TOPIC),
        difficulty,
    };
    let (generated, source) =
        generate_questions(state.llm.as_ref(), &request, &state.config.interview).await;

    let session_id = Uuid::new_v4();
    let txn = state.db.begin().await?;

    let session = interview_session::ActiveModel {
        id: Set(session_id),
        kind: Set(payload.kind),
        target_role: Set(target_role),
        topic: Set(topic),
        difficulty: Set(difficulty),
        status: Set(SessionStatus::Active),
        question_source: Set(source.as_str().to_string()),
        user_id: Set(auth_user.user_id),
        created_at: Set(Utc::now()),
        completed_at: Set(None),
    }
    .insert(&txn)
    .await?;

    let rows: Vec<interview_question::ActiveModel> = generated
        .into_iter()
        .enumerate()
        .map(|(position, q)| interview_question::ActiveModel {
            position: Set(position as i32),
            kind: Set(q.kind),
            prompt: Set(q.prompt),
            options: Set(serde_json::json!(q.options)),
            correct_option: Set(q.correct_option.map(|i| i as i32)),
            session_id: Set(session_id),
            ..Default::default()
        })
        .collect();
    if !rows.is_empty() {
        interview_question::Entity::insert_many(rows)
            .exec(&txn)
            .await?;
    }

    let questions = session_questions(&txn, session_id).await?;
    txn.commit().await?;

    info!(
        %session_id,
        questions = questions.len(),
        source = source.as_str(),
        "Interview session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(build_detail(session, questions, Vec::new())),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Interviews",
    operation_id = "listInterviews",
    summary = "List your interview sessions",
    description = "Newest first.",
    responses(
        (status = 200, description = "Sessions", body = Vec<SessionSummary>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_interviews(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SessionSummary>>, AppError> {
    let rows = interview_session::Entity::find()
        .filter(interview_session::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(interview_session::Column::CreatedAt)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Interviews",
    operation_id = "getInterview",
    summary = "Get a session with its questions and responses",
    description = "Correct MCQ options are withheld until the session is completed. Readable by the owner or with `report:view_all`.",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session detail", body = SessionDetail),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Session not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(session_id = %id))]
pub async fn get_interview(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionDetail>, AppError> {
    let session = find_visible_session(&state.db, id, &auth_user, "report:view_all").await?;
    let questions = session_questions(&state.db, id).await?;
    let responses = session_responses(&state.db, id).await?;
    Ok(Json(build_detail(session, questions, responses)))
}

#[utoipa::path(
    post,
    path = "/{id}/responses",
    tag = "Interviews",
    operation_id = "submitAnswer",
    summary = "Answer one question of your session",
    description = "MCQs are graded immediately. Written answers are stored and queued for AI evaluation. Each question accepts one response; completed sessions accept none.",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 201, description = "Response recorded", body = SubmitAnswerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Session or question not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already answered or session completed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, session_id = %id, question_id = payload.question_id))]
pub async fn submit_answer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let session = lock_own_session(&txn, id, auth_user.user_id).await?;
    if session.status == SessionStatus::Completed {
        return Err(AppError::Conflict(
            "Interview session is already completed".into(),
        ));
    }

    let question = interview_question::Entity::find_by_id(payload.question_id)
        .one(&txn)
        .await?
        .filter(|q| q.session_id == id)
        .ok_or_else(|| AppError::NotFound("Question not found in this session".into()))?;

    let options: Vec<String> = serde_json::from_value(question.options.clone()).unwrap_or_default();
    validate_answer(&payload, question.kind, options.len())?;

    let (selected_option, answer, is_correct) = match question.kind {
        QuestionKind::Mcq => (
            payload.selected_option,
            None,
            Some(payload.selected_option == question.correct_option),
        ),
        QuestionKind::Written => (None, payload.answer, None),
    };

    let now = Utc::now();
    let response = user_response::ActiveModel {
        question_id: Set(question.id),
        user_id: Set(auth_user.user_id),
        kind: Set(question.kind),
        selected_option: Set(selected_option),
        answer: Set(answer.clone()),
        is_correct: Set(is_correct),
        session_id: Set(id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict("Question has already been answered".into())
        }
        _ => AppError::from(e),
    })?;

    let job_id = match answer {
        Some(answer) => {
            let body = EvaluationJobPayload {
                response_id: response.id,
                session_id: id,
                question: question.prompt.clone(),
                answer,
            };
            let payload_json = serde_json::to_value(&body)
                .map_err(|e| AppError::Internal(format!("Failed to encode job payload: {e}")))?;
            let job = mistral_queue::ActiveModel {
                session_id: Set(id),
                response_id: Set(response.id),
                user_id: Set(auth_user.user_id),
                status: Set(QueueJobStatus::Pending),
                payload: Set(payload_json),
                result: Set(None),
                error_message: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                processed_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
            Some(job.id)
        }
        None => None,
    };

    txn.commit().await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitAnswerResponse {
            response: response.into(),
            job_id,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/{id}/finalize",
    tag = "Interviews",
    operation_id = "finalizeInterview",
    summary = "Score your session and store its final report",
    description = "Written answers whose evaluation has not finished are scored heuristically, unanswered written questions score 0 and unanswered MCQs count as wrong. The first finalization completes the session and updates progress; later calls refresh the report with newly finished evaluations.",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Final report", body = SessionReportResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Session not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, session_id = %id))]
pub async fn finalize_interview(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionReportResponse>, AppError> {
    let txn = state.db.begin().await?;

    let session = lock_own_session(&txn, id, auth_user.user_id).await?;
    let questions = session_questions(&txn, id).await?;
    let responses = session_responses(&txn, id).await?;
    let evaluations = session_evaluations(&txn, id).await?;

    let mut mcq_results = Vec::new();
    let mut written = Vec::new();
    for question in &questions {
        let response = responses.iter().find(|r| r.question_id == question.id);
        match question.kind {
            QuestionKind::Mcq => mcq_results.push(response.and_then(|r| r.is_correct)),
            QuestionKind::Written => written.push(match response {
                None => WrittenOutcome::Unanswered,
                Some(r) => match evaluations.iter().find(|e| e.response_id == r.id) {
                    Some(evaluation) => WrittenOutcome::Evaluated(evaluation.score),
                    None => WrittenOutcome::Pending(r.answer.clone().unwrap_or_default()),
                },
            }),
        }
    }
    let summary = compute_report(&mcq_results, &written);
    let overall = summary.overall_score as i32;

    let now = Utc::now();
    let row = final_report::ActiveModel {
        session_id: Set(id),
        user_id: Set(session.user_id),
        mcq_correct: Set(summary.mcq_correct as i32),
        mcq_total: Set(summary.mcq_total as i32),
        mcq_score: Set(summary.mcq_score),
        written_count: Set(summary.written_count as i32),
        written_score: Set(summary.written_score),
        overall_score: Set(overall),
        passed: Set(summary.passed),
        pending_evaluations: Set(summary.pending_evaluations as i32),
        summary: Set(summary.summary),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    final_report::Entity::insert(row)
        .on_conflict(
            OnConflict::column(final_report::Column::SessionId)
                .update_columns([
                    final_report::Column::McqCorrect,
                    final_report::Column::McqTotal,
                    final_report::Column::McqScore,
                    final_report::Column::WrittenCount,
                    final_report::Column::WrittenScore,
                    final_report::Column::OverallScore,
                    final_report::Column::Passed,
                    final_report::Column::PendingEvaluations,
                    final_report::Column::Summary,
                    final_report::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    if session.status == SessionStatus::Active {
        let mut active: interview_session::ActiveModel = session.into();
        active.status = Set(SessionStatus::Completed);
        active.completed_at = Set(Some(now));
        active.update(&txn).await?;

        let profile = user::Entity::find_by_id(auth_user.user_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        let mut progress: user::ActiveModel = profile.clone().into();
        progress.interviews_completed = Set(profile.interviews_completed + 1);
        progress.total_interview_score = Set(profile.total_interview_score + i64::from(overall));
        progress.best_interview_score = Set(std::cmp::Ord::max(profile.best_interview_score, overall));
        progress.updated_at = Set(now);
        progress.update(&txn).await?;

        info!(overall, passed = summary.passed, "Interview session completed");
    }

    let report = final_report::Entity::find()
        .filter(final_report::Column::SessionId.eq(id))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::Internal("Final report missing after upsert".into()))?;
    txn.commit().await?;

    Ok(Json(SessionReportResponse {
        report: report.into(),
        evaluations: evaluations.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/report",
    tag = "Interviews",
    operation_id = "getInterviewReport",
    summary = "Final report and per-answer evaluations",
    description = "Available once the session has been finalized. Readable by the owner or with `report:view_all`.",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Final report", body = SessionReportResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Session or report not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(session_id = %id))]
pub async fn get_interview_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionReportResponse>, AppError> {
    find_visible_session(&state.db, id, &auth_user, "report:view_all").await?;

    let report = final_report::Entity::find()
        .filter(final_report::Column::SessionId.eq(id))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Report is not available until the session is finalized".into())
        })?;
    let evaluations = session_evaluations(&state.db, id).await?;

    Ok(Json(SessionReportResponse {
        report: report.into(),
        evaluations: evaluations.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/{id}/jobs",
    tag = "Interviews",
    operation_id = "listInterviewJobs",
    summary = "Evaluation queue jobs of a session",
    description = "Readable by the owner or with `queue:view_all`.",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Queue jobs, oldest first", body = Vec<QueueJobView>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Session not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(session_id = %id))]
pub async fn list_interview_jobs(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<QueueJobView>>, AppError> {
    find_visible_session(&state.db, id, &auth_user, "queue:view_all").await?;

    let jobs = mistral_queue::Entity::find()
        .filter(mistral_queue::Column::SessionId.eq(id))
        .order_by_asc(mistral_queue::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(jobs.into_iter().map(Into::into).collect()))
}
