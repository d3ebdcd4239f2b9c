use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;

use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::trimmed;
use crate::models::user::{UpdateProfileRequest, UserMeResponse, validate_update_profile};
use crate::state::AppState;

pub(crate) async fn find_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<user::Model, AppError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

#[utoipa::path(
    get,
    path = "/me",
    tag = "Users",
    operation_id = "getMyProfile",
    summary = "Profile and progress of the current user",
    responses(
        (status = 200, description = "Profile and progress", body = UserMeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Account no longer exists (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserMeResponse>, AppError> {
    let user = find_user(&state.db, auth_user.user_id).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    patch,
    path = "/me",
    tag = "Users",
    operation_id = "updateMyProfile",
    summary = "Update the current user's profile",
    description = "PATCH semantics: omitted fields are unchanged, `null` clears a nullable field.",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile and progress", body = UserMeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<UserMeResponse>, AppError> {
    validate_update_profile(&payload)?;

    let existing = find_user(&state.db, auth_user.user_id).await?;
    if payload == UpdateProfileRequest::default() {
        return Ok(Json(existing.into()));
    }

    let mut active: user::ActiveModel = existing.into();
    if let Some(name) = payload.full_name {
        active.full_name = Set(name.trim().to_string());
    }
    if let Some(college) = payload.college {
        active.college = Set(trimmed(college));
    }
    if let Some(year) = payload.graduation_year {
        active.graduation_year = Set(year);
    }
    if let Some(role) = payload.target_role {
        active.target_role = Set(trimmed(role));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}
