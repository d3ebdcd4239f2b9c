use chrono::{DateTime, Utc};
use common::hr::HrTurn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::interview::MAX_ANSWER_CHARS;
use crate::entity::hr_interview_report;
use crate::error::AppError;

pub const MAX_TRANSCRIPT_TURNS: usize = 30;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateHrReportRequest {
    /// HR interview session this transcript belongs to, if any.
    pub session_id: Option<Uuid>,
    pub transcript: Vec<HrTurn>,
}

pub fn validate_create_hr_report(req: &CreateHrReportRequest) -> Result<(), AppError> {
    if req.transcript.is_empty() || req.transcript.len() > MAX_TRANSCRIPT_TURNS {
        return Err(AppError::Validation(format!(
            "Transcript must have 1-{MAX_TRANSCRIPT_TURNS} turns"
        )));
    }
    for turn in &req.transcript {
        if turn.question.trim().is_empty() {
            return Err(AppError::Validation(
                "Every transcript turn needs a question".into(),
            ));
        }
        if turn.answer.chars().count() > MAX_ANSWER_CHARS {
            return Err(AppError::Validation(format!(
                "Answers must be at most {MAX_ANSWER_CHARS} characters"
            )));
        }
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HrReportResponse {
    pub id: i32,
    pub user_id: i32,
    pub session_id: Option<Uuid>,
    pub communication: f64,
    pub confidence: f64,
    pub professionalism: f64,
    pub problem_solving: f64,
    #[schema(example = 74)]
    pub overall_score: i32,
    /// `strong_hire`, `hire` or `no_hire`.
    #[schema(example = "hire")]
    pub recommendation: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub transcript: Vec<HrTurn>,
    /// `llm` or `fallback`.
    pub source: String,
    pub created_at: DateTime<Utc>,
}

impl From<hr_interview_report::Model> for HrReportResponse {
    fn from(m: hr_interview_report::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            session_id: m.session_id,
            communication: m.communication,
            confidence: m.confidence,
            professionalism: m.professionalism,
            problem_solving: m.problem_solving,
            overall_score: m.overall_score,
            recommendation: m.recommendation,
            summary: m.summary,
            strengths: serde_json::from_value(m.strengths).unwrap_or_default(),
            improvements: serde_json::from_value(m.improvements).unwrap_or_default(),
            transcript: serde_json::from_value(m.transcript).unwrap_or_default(),
            source: m.source,
            created_at: m.created_at,
        }
    }
}

/// Row in the report list.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HrReportListItem {
    pub id: i32,
    pub session_id: Option<Uuid>,
    pub overall_score: i32,
    pub recommendation: String,
    pub created_at: DateTime<Utc>,
}

impl From<hr_interview_report::Model> for HrReportListItem {
    fn from(m: hr_interview_report::Model) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            overall_score: m.overall_score,
            recommendation: m.recommendation,
            created_at: m.created_at,
        }
    }
}
