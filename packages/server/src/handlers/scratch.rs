use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::scratch::*;
use crate::scratch::ScratchEntry;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/entries",
    tag = "Scratch",
    operation_id = "appendScratchEntry",
    summary = "Append a record to the local entries file",
    request_body = AppendEntryRequest,
    responses(
        (status = 201, description = "Entry appended", body = AppendEntryResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn append_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AppendEntryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let total = state
        .scratch
        .append_entry(ScratchEntry {
            entry: payload.entry,
            user_id: auth_user.user_id,
            recorded_at: Utc::now(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(AppendEntryResponse { total })))
}

#[utoipa::path(
    get,
    path = "/reports/{session_id}",
    tag = "Scratch",
    operation_id = "getScratchReport",
    summary = "Read a local JSON report file",
    params(("session_id" = String, Path, description = "Report name: letters, digits, '-' or '_'")),
    responses(
        (status = 200, description = "Report contents", body = Object),
        (status = 400, description = "Invalid report name (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Report not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(session_id = %session_id))]
pub async fn get_report(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.scratch.read_report(&session_id).await?))
}

#[utoipa::path(
    put,
    path = "/reports/{session_id}",
    tag = "Scratch",
    operation_id = "putScratchReport",
    summary = "Replace a local JSON report file",
    description = "The new contents are written to a temporary file and renamed into place, so readers never see a partial report.",
    params(("session_id" = String, Path, description = "Report name: letters, digits, '-' or '_'")),
    request_body(content = Object, description = "Any JSON value"),
    responses(
        (status = 204, description = "Report written"),
        (status = 400, description = "Invalid report name or body (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(session_id = %session_id))]
pub async fn put_report(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    AppJson(payload): AppJson<Value>,
) -> Result<StatusCode, AppError> {
    state.scratch.write_report(&session_id, &payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
