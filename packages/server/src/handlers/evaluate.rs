use axum::Json;
use axum::extract::State;
use common::scoring::fallback_evaluation;
use common::{EvaluationSource, evaluate_answer};
use tracing::{instrument, warn};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::evaluate::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Evaluation",
    operation_id = "evaluateAnswer",
    summary = "Evaluate a written answer synchronously",
    description = "Scores the answer 0-10 with the LLM. When the LLM is unavailable or its reply cannot be parsed, a heuristic evaluation is returned with `source = fallback`.",
    request_body = EvaluateRequest,
    responses(
        (status = 200, description = "Evaluation", body = EvaluateResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn evaluate(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    validate_evaluate_request(&payload)?;

    let (evaluation, source) =
        match evaluate_answer(state.llm.as_ref(), &payload.question, &payload.answer).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Answer evaluation LLM call failed, using fallback");
                (
                    fallback_evaluation(&payload.answer),
                    EvaluationSource::Fallback,
                )
            }
        };

    Ok(Json(EvaluateResponse { evaluation, source }))
}
