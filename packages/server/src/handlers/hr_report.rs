use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::InterviewKind;
use common::hr::assess_transcript;
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{hr_interview_report, interview_session};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::hr::*;
use crate::state::AppState;

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::Internal(format!("JSON encode failed: {e}")))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "HR Reports",
    operation_id = "createHrReport",
    summary = "Assess an HR interview transcript",
    description = "Scores communication, confidence, professionalism and problem solving with the LLM, or heuristically from answer length when the LLM is unavailable. The report is stored and returned. `session_id`, when given, must be one of your HR sessions.",
    request_body = CreateHrReportRequest,
    responses(
        (status = 201, description = "Report created", body = HrReportResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Session not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, turns = payload.transcript.len()))]
pub async fn create_hr_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateHrReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_hr_report(&payload)?;

    if let Some(session_id) = payload.session_id {
        let session = interview_session::Entity::find_by_id(session_id)
            .one(&state.db)
            .await?
            .filter(|s| s.user_id == auth_user.user_id)
            .ok_or_else(|| AppError::NotFound("Interview session not found".into()))?;
        if session.kind != InterviewKind::Hr {
            return Err(AppError::Validation(
                "session_id must refer to an HR interview session".into(),
            ));
        }
    }

    let (assessment, source) = assess_transcript(state.llm.as_ref(), &payload.transcript).await;

    let model = hr_interview_report::ActiveModel {
        user_id: Set(auth_user.user_id),
        session_id: Set(payload.session_id),
        communication: Set(assessment.communication),
        confidence: Set(assessment.confidence),
        professionalism: Set(assessment.professionalism),
        problem_solving: Set(assessment.problem_solving),
        overall_score: Set(assessment.overall_score as i32),
        recommendation: Set(assessment.recommendation.as_str().to_string()),
        summary: Set(assessment.summary),
        strengths: Set(to_json(&assessment.strengths)?),
        improvements: Set(to_json(&assessment.improvements)?),
        transcript: Set(to_json(&payload.transcript)?),
        source: Set(source.as_str().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(
        report_id = model.id,
        overall = model.overall_score,
        source = source.as_str(),
        "HR report stored"
    );

    Ok((StatusCode::CREATED, Json(HrReportResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "HR Reports",
    operation_id = "listHrReports",
    summary = "List your HR reports",
    description = "Newest first.",
    responses(
        (status = 200, description = "Reports", body = Vec<HrReportListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_hr_reports(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<HrReportListItem>>, AppError> {
    let rows = hr_interview_report::Entity::find()
        .filter(hr_interview_report::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(hr_interview_report::Column::CreatedAt)
        .order_by_desc(hr_interview_report::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "HR Reports",
    operation_id = "getHrReport",
    summary = "Get an HR report",
    description = "Readable by the owner or with `report:view_all`.",
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report", body = HrReportResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Report not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(report_id = %id))]
pub async fn get_hr_report(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HrReportResponse>, AppError> {
    let report = hr_interview_report::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .filter(|r| auth_user.require_owner_or(r.user_id, "report:view_all").is_ok())
        .ok_or_else(|| AppError::NotFound("HR report not found".into()))?;
    Ok(Json(report.into()))
}
