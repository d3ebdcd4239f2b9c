//! HR interview assessment.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::evaluation::EvaluationSource;
use crate::llm::ChatBackend;
use crate::llm_json::{as_number, extract_json_object, string_list};
use crate::prompts;
use crate::scoring::{MAX_WRITTEN_SCORE, fallback_written_score};

/// One question/answer exchange of an HR interview.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HrTurn {
    #[schema(example = "Tell me about a conflict in your last team.")]
    pub question: String,
    #[schema(example = "We disagreed about the release date, so I...")]
    pub answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongHire,
    Hire,
    NoHire,
}

impl Recommendation {
    /// Derive a recommendation from a 0-100 score.
    pub fn from_score(overall: u32) -> Self {
        match overall {
            80.. => Self::StrongHire,
            60..=79 => Self::Hire,
            _ => Self::NoHire,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongHire => "strong_hire",
            Self::Hire => "hire",
            Self::NoHire => "no_hire",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "strong_hire" => Some(Self::StrongHire),
            "hire" => Some(Self::Hire),
            "no_hire" => Some(Self::NoHire),
            _ => None,
        }
    }
}

/// Scored HR interview. Dimensions are 0-10, `overall_score` is 0-100.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HrAssessment {
    pub communication: f64,
    pub confidence: f64,
    pub professionalism: f64,
    pub problem_solving: f64,
    pub overall_score: u32,
    pub recommendation: Recommendation,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

fn dimension(value: &Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(as_number)
        .map(|n| n.clamp(0.0, MAX_WRITTEN_SCORE))
}

impl HrAssessment {
    /// Parse a model reply. All four dimensions must be numeric.
    pub fn from_llm_reply(reply: &str) -> Option<Self> {
        let value = extract_json_object(reply)?;

        let communication = dimension(&value, "communication")?;
        let confidence = dimension(&value, "confidence")?;
        let professionalism = dimension(&value, "professionalism")?;
        let problem_solving = dimension(&value, "problem_solving")?;

        let overall_score = value
            .get("overall_score")
            .and_then(as_number)
            .map(|n| n.round().clamp(0.0, 100.0) as u32)
            .unwrap_or_else(|| {
                ((communication + confidence + professionalism + problem_solving) * 2.5).round()
                    as u32
            });

        let recommendation = value
            .get("recommendation")
            .and_then(Value::as_str)
            .and_then(Recommendation::parse)
            .unwrap_or_else(|| Recommendation::from_score(overall_score));

        let summary = value
            .get("summary")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("No summary provided.")
            .to_string();

        Some(Self {
            communication,
            confidence,
            professionalism,
            problem_solving,
            overall_score,
            recommendation,
            summary,
            strengths: string_list(value.get("strengths")),
            improvements: string_list(value.get("improvements")),
        })
    }
}

/// Heuristic assessment built from answer lengths.
pub fn fallback_assessment(transcript: &[HrTurn]) -> HrAssessment {
    let answered = transcript
        .iter()
        .filter(|t| !t.answer.trim().is_empty())
        .count();
    let mean = if transcript.is_empty() {
        0.0
    } else {
        transcript
            .iter()
            .map(|t| f64::from(fallback_written_score(&t.answer)))
            .sum::<f64>()
            / transcript.len() as f64
    };
    let overall_score = (mean * 10.0).round().clamp(0.0, 100.0) as u32;

    let mut improvements = vec!["Use the STAR format to structure behavioral answers.".to_string()];
    if answered < transcript.len() {
        improvements.push("Answer every question.".to_string());
    }

    HrAssessment {
        communication: mean,
        confidence: mean,
        professionalism: mean,
        problem_solving: mean,
        overall_score,
        recommendation: Recommendation::from_score(overall_score),
        summary: format!(
            "Automatically scored: {answered} of {} questions answered.",
            transcript.len()
        ),
        strengths: if answered > 0 {
            vec!["Engaged with the interview questions.".to_string()]
        } else {
            Vec::new()
        },
        improvements,
    }
}

/// Assess a transcript with the LLM, falling back to the heuristic on any failure.
pub async fn assess_transcript(
    backend: &dyn ChatBackend,
    transcript: &[HrTurn],
) -> (HrAssessment, EvaluationSource) {
    match backend.complete(prompts::hr_assessment(transcript)).await {
        Ok(reply) => match HrAssessment::from_llm_reply(&reply) {
            Some(assessment) => (assessment, EvaluationSource::Llm),
            None => {
                warn!("HR assessment reply was not valid JSON, using fallback");
                (fallback_assessment(transcript), EvaluationSource::Fallback)
            }
        },
        Err(e) => {
            warn!(error = %e, "HR assessment LLM call failed, using fallback");
            (fallback_assessment(transcript), EvaluationSource::Fallback)
        }
    }
}
