use common::scoring::{
    fallback_written_score, is_pass, mcq_score, overall_score, written_score,
};

/// How a written question stands at finalization time.
#[derive(Clone, Debug, PartialEq)]
pub enum WrittenOutcome {
    /// The worker stored an evaluation with this 0-10 score.
    Evaluated(f64),
    /// Answered, but no finished evaluation yet.
    Pending(String),
    Unanswered,
}

/// Scores computed for a session's final report.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportSummary {
    pub mcq_correct: usize,
    pub mcq_total: usize,
    pub mcq_score: Option<f64>,
    pub written_count: usize,
    pub written_score: Option<f64>,
    pub overall_score: u32,
    pub passed: bool,
    pub pending_evaluations: usize,
    pub summary: String,
}

/// Score a session.
///
/// `mcq_results` has one entry per MCQ question: `Some(correct)` when answered,
/// `None` when not (counted as wrong). Pending written answers get the
/// heuristic length score; unanswered ones score 0.
pub fn compute_report(mcq_results: &[Option<bool>], written: &[WrittenOutcome]) -> ReportSummary {
    let mcq_total = mcq_results.len();
    let mcq_correct = mcq_results.iter().filter(|r| **r == Some(true)).count();

    let mut pending_evaluations = 0;
    let written_scores: Vec<f64> = written
        .iter()
        .map(|outcome| match outcome {
            WrittenOutcome::Evaluated(score) => *score,
            WrittenOutcome::Pending(answer) => {
                pending_evaluations += 1;
                f64::from(fallback_written_score(answer))
            }
            WrittenOutcome::Unanswered => 0.0,
        })
        .collect();

    let mcq = mcq_score(mcq_correct, mcq_total);
    let written_mean = written_score(&written_scores);
    let overall = overall_score(mcq, written_mean);
    let passed = is_pass(overall);

    let mut parts = Vec::new();
    if mcq_total > 0 {
        parts.push(format!(
            "Answered {mcq_correct} of {mcq_total} multiple-choice questions correctly."
        ));
    }
    if let Some(mean) = written_mean {
        parts.push(format!(
            "Average written answer score {mean:.1}/10 across {} question(s).",
            written.len()
        ));
    }
    if pending_evaluations > 0 {
        parts.push(format!(
            "{pending_evaluations} written answer(s) were scored provisionally while awaiting evaluation."
        ));
    }
    parts.push(format!(
        "Overall score {overall}/100: {}.",
        if passed { "passed" } else { "not passed" }
    ));

    ReportSummary {
        mcq_correct,
        mcq_total,
        mcq_score: mcq,
        written_count: written.len(),
        written_score: written_mean,
        overall_score: overall,
        passed,
        pending_evaluations,
        summary: parts.join(" "),
    }
}
