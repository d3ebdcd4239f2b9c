//! Interview scoring and the heuristics used when the LLM is unavailable.

use crate::evaluation::Evaluation;

/// Minimum overall score (0-100) for a session to count as passed.
pub const PASS_THRESHOLD: u32 = 60;

/// Upper bound of a written-answer score.
pub const MAX_WRITTEN_SCORE: f64 = 10.0;

/// Heuristic written-answer score (0-10) based on trimmed answer length.
pub fn fallback_written_score(answer: &str) -> u8 {
    match answer.trim().chars().count() {
        0 => 0,
        1..=9 => 2,
        10..=49 => 4,
        _ => 6,
    }
}

/// Percentage of MCQs answered correctly, or `None` when there were no MCQs.
pub fn mcq_score(correct: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(correct.min(total) as f64 * 100.0 / total as f64)
}

/// Mean written score on the 0-10 scale, or `None` for an empty slice.
pub fn written_score(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores
        .iter()
        .map(|s| s.clamp(0.0, MAX_WRITTEN_SCORE))
        .sum();
    Some(sum / scores.len() as f64)
}

/// Combine the MCQ percentage and the written mean into a 0-100 score.
///
/// With both parts present the result is `round((mcq + written * 10) / 2)`.
pub fn overall_score(mcq: Option<f64>, written: Option<f64>) -> u32 {
    let raw = match (mcq, written) {
        (Some(mcq), Some(written)) => (mcq + written * 10.0) / 2.0,
        (Some(mcq), None) => mcq,
        (None, Some(written)) => written * 10.0,
        (None, None) => 0.0,
    };
    raw.round().clamp(0.0, 100.0) as u32
}

pub fn is_pass(overall: u32) -> bool {
    overall >= PASS_THRESHOLD
}

/// Canned evaluation for a written answer, scored by [`fallback_written_score`].
pub fn fallback_evaluation(answer: &str) -> Evaluation {
    let score = fallback_written_score(answer);
    let (feedback, strengths, improvements): (&str, &[&str], &[&str]) = match score {
        0 => (
            "No answer was provided.",
            &[],
            &["Attempt every question, even with a partial answer."],
        ),
        2 => (
            "The answer is very brief and does not demonstrate understanding.",
            &[],
            &[
                "Explain the reasoning behind the answer.",
                "Support the answer with an example.",
            ],
        ),
        4 => (
            "The answer touches on the topic but lacks depth.",
            &["Addresses the question directly."],
            &[
                "Expand on the key concepts.",
                "Discuss trade-offs or edge cases.",
            ],
        ),
        _ => (
            "The answer is reasonably detailed. It was scored automatically because AI evaluation was unavailable.",
            &["Provides a detailed response."],
            &["Structure the answer around a concrete example."],
        ),
    };

    Evaluation {
        score: f64::from(score),
        feedback: feedback.to_string(),
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        improvements: improvements.iter().map(|s| s.to_string()).collect(),
    }
}
