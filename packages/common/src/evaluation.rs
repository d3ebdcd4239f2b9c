use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm::{ChatBackend, LlmError};
use crate::llm_json::{as_number, extract_json_object, string_list};
use crate::prompts;
use crate::scoring::{MAX_WRITTEN_SCORE, fallback_evaluation};

/// Evaluation of one written answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Evaluation {
    /// Score on a 0-10 scale.
    #[schema(example = 7.5)]
    pub score: f64,
    #[schema(example = "Correct approach, but the complexity analysis is missing.")]
    pub feedback: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// Where an evaluation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationSource {
    Llm,
    Fallback,
}

impl EvaluationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llm => "llm",
            Self::Fallback => "fallback",
        }
    }
}

impl Evaluation {
    /// Parse a model reply. Returns `None` unless it carries a numeric `score`.
    pub fn from_llm_reply(reply: &str) -> Option<Self> {
        let value = extract_json_object(reply)?;
        let score = value.get("score").and_then(as_number)?;

        let feedback = value
            .get("feedback")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("No feedback provided.")
            .to_string();

        Some(Self {
            score: score.clamp(0.0, MAX_WRITTEN_SCORE),
            feedback,
            strengths: string_list(value.get("strengths")),
            improvements: string_list(value.get("improvements")),
        })
    }
}

/// Evaluate a written answer with the LLM.
///
/// Empty answers are scored without calling the model. A reply that cannot be
/// parsed yields the fallback evaluation; transport and API errors are returned
/// so the caller decides between falling back and failing the job.
pub async fn evaluate_answer(
    backend: &dyn ChatBackend,
    question: &str,
    answer: &str,
) -> Result<(Evaluation, EvaluationSource), LlmError> {
    if answer.trim().is_empty() {
        return Ok((fallback_evaluation(answer), EvaluationSource::Fallback));
    }

    let reply = backend
        .complete(prompts::answer_evaluation(question, answer))
        .await?;

    match Evaluation::from_llm_reply(&reply) {
        Some(evaluation) => Ok((evaluation, EvaluationSource::Llm)),
        None => {
            warn!(
                reply_len = reply.len(),
                "LLM evaluation reply was not valid JSON, using fallback"
            );
            Ok((fallback_evaluation(answer), EvaluationSource::Fallback))
        }
    }
}
