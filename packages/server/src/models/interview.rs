use chrono::{DateTime, Utc};
use common::{Difficulty, InterviewKind, QuestionKind, QueueJobStatus, SessionStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::validate_optional_text;
use crate::entity::{
    final_report, interview_question, interview_session, mistral_queue, response_evaluation,
    user_response,
};
use crate::error::AppError;

pub const MAX_ANSWER_CHARS: usize = 10_000;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateInterviewRequest {
    pub kind: InterviewKind,
    /// Defaults to the user's target role, then "Software Engineer".
    #[schema(example = "Backend Engineer")]
    pub target_role: Option<String>,
    /// Technical sessions only. Default: "general computer science".
    #[schema(example = "Databases")]
    pub topic: Option<String>,
    /// Default: medium.
    pub difficulty: Option<Difficulty>,
}

pub fn validate_create_interview(req: &CreateInterviewRequest) -> Result<(), AppError> {
    validate_optional_text(req.target_role.as_deref(), "Target role", 128)?;
    validate_optional_text(req.topic.as_deref(), "Topic", 128)
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionSummary {
    pub id: Uuid,
    pub kind: InterviewKind,
    pub target_role: String,
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    pub status: SessionStatus,
    /// `llm` or `fallback`.
    #[schema(example = "llm")]
    pub question_source: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<interview_session::Model> for SessionSummary {
    fn from(m: interview_session::Model) -> Self {
        Self {
            id: m.id,
            kind: m.kind,
            target_role: m.target_role,
            topic: m.topic,
            difficulty: m.difficulty,
            status: m.status,
            question_source: m.question_source,
            created_at: m.created_at,
            completed_at: m.completed_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestionView {
    pub id: i32,
    pub position: i32,
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    /// Withheld until the session is completed.
    pub correct_option: Option<i32>,
}

impl QuestionView {
    pub fn new(m: interview_question::Model, reveal_answer: bool) -> Self {
        Self {
            id: m.id,
            position: m.position,
            kind: m.kind,
            prompt: m.prompt,
            options: serde_json::from_value(m.options).unwrap_or_default(),
            correct_option: if reveal_answer { m.correct_option } else { None },
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ResponseView {
    pub id: i32,
    pub question_id: i32,
    pub kind: QuestionKind,
    pub selected_option: Option<i32>,
    pub answer: Option<String>,
    /// Set for MCQs only.
    pub is_correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl From<user_response::Model> for ResponseView {
    fn from(m: user_response::Model) -> Self {
        Self {
            id: m.id,
            question_id: m.question_id,
            kind: m.kind,
            selected_option: m.selected_option,
            answer: m.answer,
            is_correct: m.is_correct,
            created_at: m.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionDetail {
    pub session: SessionSummary,
    pub questions: Vec<QuestionView>,
    pub responses: Vec<ResponseView>,
}

/// Answer one question: `selected_option` for MCQs, `answer` for written questions.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitAnswerRequest {
    pub question_id: i32,
    pub selected_option: Option<i32>,
    pub answer: Option<String>,
}

/// Check the answer matches the question kind and bounds.
pub fn validate_answer(
    req: &SubmitAnswerRequest,
    kind: QuestionKind,
    option_count: usize,
) -> Result<(), AppError> {
    match kind {
        QuestionKind::Mcq => {
            let Some(selected) = req.selected_option else {
                return Err(AppError::Validation(
                    "selected_option is required for multiple-choice questions".into(),
                ));
            };
            if selected < 0 || selected as usize >= option_count {
                return Err(AppError::Validation(format!(
                    "selected_option must be between 0 and {}",
                    option_count.saturating_sub(1)
                )));
            }
        }
        QuestionKind::Written => {
            let Some(ref answer) = req.answer else {
                return Err(AppError::Validation(
                    "answer is required for written questions".into(),
                ));
            };
            if answer.chars().count() > MAX_ANSWER_CHARS {
                return Err(AppError::Validation(format!(
                    "Answer must be at most {MAX_ANSWER_CHARS} characters"
                )));
            }
        }
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmitAnswerResponse {
    pub response: ResponseView,
    /// Queue job created for a written answer.
    pub job_id: Option<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EvaluationView {
    pub response_id: i32,
    #[schema(example = 7.5)]
    pub score: f64,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    /// `llm` or `fallback`.
    pub source: String,
}

impl From<response_evaluation::Model> for EvaluationView {
    fn from(m: response_evaluation::Model) -> Self {
        Self {
            response_id: m.response_id,
            score: m.score,
            feedback: m.feedback,
            strengths: serde_json::from_value(m.strengths).unwrap_or_default(),
            improvements: serde_json::from_value(m.improvements).unwrap_or_default(),
            source: m.source,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FinalReportView {
    pub session_id: Uuid,
    pub mcq_correct: i32,
    pub mcq_total: i32,
    pub mcq_score: Option<f64>,
    pub written_count: i32,
    pub written_score: Option<f64>,
    #[schema(example = 72)]
    pub overall_score: i32,
    pub passed: bool,
    pub pending_evaluations: i32,
    pub summary: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<final_report::Model> for FinalReportView {
    fn from(m: final_report::Model) -> Self {
        Self {
            session_id: m.session_id,
            mcq_correct: m.mcq_correct,
            mcq_total: m.mcq_total,
            mcq_score: m.mcq_score,
            written_count: m.written_count,
            written_score: m.written_score,
            overall_score: m.overall_score,
            passed: m.passed,
            pending_evaluations: m.pending_evaluations,
            summary: m.summary,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SessionReportResponse {
    pub report: FinalReportView,
    pub evaluations: Vec<EvaluationView>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QueueJobView {
    pub id: i32,
    pub response_id: i32,
    pub status: QueueJobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<mistral_queue::Model> for QueueJobView {
    fn from(m: mistral_queue::Model) -> Self {
        Self {
            id: m.id,
            response_id: m.response_id,
            status: m.status,
            error_message: m.error_message,
            created_at: m.created_at,
            updated_at: m.updated_at,
            processed_at: m.processed_at,
        }
    }
}
