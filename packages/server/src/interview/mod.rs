//! Interview session logic that does not touch HTTP: question generation and scoring.

pub mod questions;
pub mod report;

pub use questions::{GeneratedQuestion, QuestionRequest, generate_questions};
pub use report::{ReportSummary, WrittenOutcome, compute_report};
