use common::scoring::fallback_evaluation;
use common::{ChatBackend, Evaluation, EvaluationJobPayload, EvaluationSource, LlmError, evaluate_answer};
use tracing::{info, instrument, warn};

use crate::error::Result;

/// Decode a queue payload and evaluate the answer it carries.
///
/// A disabled LLM scores with the heuristic instead of failing the job.
/// Transport and API errors are returned so the job is marked `error`.
#[instrument(skip(backend, payload))]
pub async fn handle_evaluation_job(
    backend: &dyn ChatBackend,
    payload: &serde_json::Value,
) -> Result<(EvaluationJobPayload, Evaluation, EvaluationSource)> {
    let job: EvaluationJobPayload = serde_json::from_value(payload.clone())?;

    let (evaluation, source) = match evaluate_answer(backend, &job.question, &job.answer).await {
        Ok(result) => result,
        Err(LlmError::Unavailable(reason)) => {
            warn!(response_id = job.response_id, %reason, "LLM unavailable, using fallback evaluation");
            (fallback_evaluation(&job.answer), EvaluationSource::Fallback)
        }
        Err(e) => return Err(e.into()),
    };

    info!(
        response_id = job.response_id,
        score = evaluation.score,
        source = source.as_str(),
        "Answer evaluated"
    );
    Ok((job, evaluation, source))
}
