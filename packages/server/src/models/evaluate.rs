use common::{Evaluation, EvaluationSource};
use serde::{Deserialize, Serialize};

use super::interview::MAX_ANSWER_CHARS;
use super::shared::validate_text_len;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct EvaluateRequest {
    #[schema(example = "Explain the difference between a process and a thread.")]
    pub question: String,
    #[schema(example = "A process has its own address space; threads share one.")]
    pub answer: String,
}

pub fn validate_evaluate_request(req: &EvaluateRequest) -> Result<(), AppError> {
    validate_text_len(&req.question, "Question", 2_000)?;
    if req.answer.chars().count() > MAX_ANSWER_CHARS {
        return Err(AppError::Validation(format!(
            "Answer must be at most {MAX_ANSWER_CHARS} characters"
        )));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EvaluateResponse {
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub source: EvaluationSource,
}
