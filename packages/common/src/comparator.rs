//! Output comparison for judged programs.
//!
//! A program's raw stdout is normalized and checked against the expected value
//! with a fixed fallback chain. The first strategy that matches wins; a test
//! case passes when any strategy matches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snippets whose presence marks the text as source code rather than plain output.
const CODE_MARKERS: &[&str] = &[
    "{", "}", "def ", "function ", "=>", "class ", "return ", "#include",
];

/// Relative tolerance used by the numeric strategy.
const NUMERIC_EPSILON: f64 = 1e-9;

/// The strategy that accepted an output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    Exact,
    CaseInsensitive,
    Numeric,
    Boolean,
    WhitespaceInsensitive,
    LineByLine,
}

/// Normalize raw program output.
///
/// Carriage returns are removed, trailing newlines dropped and the text trimmed.
/// Unless the text looks like code, runs of whitespace inside each line collapse
/// to a single space.
pub fn normalize(raw: &str) -> String {
    let without_cr = raw.replace('\r', "");
    let text = without_cr.trim_end_matches('\n').trim();

    if looks_like_code(text) {
        return text.to_string();
    }

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Heuristic check for source-code-shaped text, whose whitespace is significant.
pub fn looks_like_code(text: &str) -> bool {
    CODE_MARKERS.iter().any(|marker| text.contains(marker))
        || text.lines().any(|line| line.trim_end().ends_with(';'))
}

/// Render an expected value as the text a program would print.
fn expected_text(expected: &Value) -> String {
    match expected {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Compare program output against an expected JSON value.
pub fn compare_outputs(actual: &str, expected: &Value) -> bool {
    matching_strategy(actual, expected).is_some()
}

/// Return the first strategy under which `actual` matches `expected`.
pub fn matching_strategy(actual: &str, expected: &Value) -> Option<MatchStrategy> {
    let actual = normalize(actual);
    let expected = normalize(&expected_text(expected));

    if actual == expected {
        return Some(MatchStrategy::Exact);
    }
    if actual.to_lowercase() == expected.to_lowercase() {
        return Some(MatchStrategy::CaseInsensitive);
    }
    if numeric_match(&actual, &expected) {
        return Some(MatchStrategy::Numeric);
    }
    if boolean_match(&actual, &expected) {
        return Some(MatchStrategy::Boolean);
    }
    if strip_whitespace(&actual) == strip_whitespace(&expected) {
        return Some(MatchStrategy::WhitespaceInsensitive);
    }
    if trimmed_lines(&actual) == trimmed_lines(&expected) {
        return Some(MatchStrategy::LineByLine);
    }
    None
}

fn numeric_match(actual: &str, expected: &str) -> bool {
    let Ok(expected) = expected.parse::<f64>() else {
        return false;
    };
    let Ok(actual) = actual.parse::<f64>() else {
        return false;
    };
    if !expected.is_finite() || !actual.is_finite() {
        return false;
    }
    (actual - expected).abs() <= NUMERIC_EPSILON * expected.abs().max(1.0)
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn boolean_match(actual: &str, expected: &str) -> bool {
    match (parse_bool(actual), parse_bool(expected)) {
        (Some(a), Some(e)) => a == e,
        _ => false,
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn trimmed_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Pass/fail counts for a batch of test cases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BatchSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Reduce per-case outcomes to counts.
    pub fn from_outcomes<I: IntoIterator<Item = bool>>(outcomes: I) -> Self {
        outcomes.into_iter().fold(Self::default(), |mut acc, passed| {
            acc.total += 1;
            if passed {
                acc.passed += 1;
            } else {
                acc.failed += 1;
            }
            acc
        })
    }

    /// True when there was at least one case and none failed.
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.failed == 0
    }
}

/// Summarize per-case pass flags.
pub fn summarize(outcomes: &[bool]) -> BatchSummary {
    BatchSummary::from_outcomes(outcomes.iter().copied())
}
