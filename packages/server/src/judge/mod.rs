pub mod client;
pub mod language;
pub mod runner;

pub use client::{ExecutionResult, ExecutionStatus, JudgeClient, JudgeError};
pub use language::{LANGUAGES, Language, resolve_language};
pub use runner::{CaseInput, CaseOutcome, run_test_cases};
