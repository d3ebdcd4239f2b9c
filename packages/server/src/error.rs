use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::judge::JudgeError;
use crate::scratch::ScratchError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `CONFLICT`, `EMAIL_TAKEN`, `UPSTREAM_ERROR`, `UPSTREAM_TIMEOUT`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    Conflict(String),
    EmailTaken,
    /// The code execution service failed or rejected the request.
    Upstream(String),
    /// The code execution service did not finish in time.
    UpstreamTimeout(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid email or password".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                },
            ),
            AppError::EmailTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "EMAIL_TAKEN",
                    message: "An account with this email already exists".into(),
                },
            ),
            AppError::Upstream(detail) => {
                tracing::warn!("Code execution service error: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        code: "UPSTREAM_ERROR",
                        message: detail,
                    },
                )
            }
            AppError::UpstreamTimeout(detail) => {
                tracing::warn!("Code execution service timeout: {}", detail);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ErrorBody {
                        code: "UPSTREAM_TIMEOUT",
                        message: detail,
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JudgeError> for AppError {
    fn from(err: JudgeError) -> Self {
        match err {
            JudgeError::UnsupportedLanguage(lang) => {
                AppError::Validation(format!("Unsupported language: {lang}"))
            }
            JudgeError::Timeout { .. } => AppError::UpstreamTimeout(err.to_string()),
            JudgeError::Http(_) | JudgeError::Api { .. } | JudgeError::Decode(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}

impl From<ScratchError> for AppError {
    fn from(err: ScratchError) -> Self {
        match err {
            ScratchError::NotFound(name) => AppError::NotFound(format!("Report '{name}' not found")),
            ScratchError::InvalidName(name) => AppError::Validation(format!(
                "Invalid report name '{name}': use letters, digits, '-' or '_' (max 128)"
            )),
            other => AppError::Internal(other.to_string()),
        }
    }
}
