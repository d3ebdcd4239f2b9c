use serde_json::Value;
use tracing::{debug, instrument};

use common::compare_outputs;

use super::client::{ExecutionResult, ExecutionStatus, JudgeClient, JudgeError};

/// One case to run: stdin plus the expected output as JSON (string, number, bool or null).
pub struct CaseInput {
    pub input: String,
    pub expected: Value,
}

/// Verdict for one case.
pub struct CaseOutcome {
    pub passed: bool,
    pub result: ExecutionResult,
}

/// A case passes when the program ran cleanly and its stdout matches.
pub fn case_passed(result: &ExecutionResult, expected: &Value) -> bool {
    result.status.ran_successfully()
        && compare_outputs(result.stdout.as_deref().unwrap_or(""), expected)
}

/// Run every case sequentially against the judge.
///
/// A compilation error applies to every case, so the remaining cases reuse
/// the first compile result instead of being resubmitted.
#[instrument(skip(client, source, cases), fields(cases = cases.len()))]
pub async fn run_test_cases(
    client: &JudgeClient,
    language: &str,
    source: &str,
    cases: &[CaseInput],
) -> Result<Vec<CaseOutcome>, JudgeError> {
    let mut outcomes = Vec::with_capacity(cases.len());
    let mut compile_failure: Option<ExecutionResult> = None;

    for (index, case) in cases.iter().enumerate() {
        if let Some(ref failed) = compile_failure {
            outcomes.push(CaseOutcome {
                passed: false,
                result: failed.clone(),
            });
            continue;
        }

        let result = client.run(language, source, &case.input).await?;
        let passed = case_passed(&result, &case.expected);
        debug!(index, passed, status = ?result.status, "Test case finished");

        if result.status == ExecutionStatus::CompilationError {
            compile_failure = Some(result.clone());
        }
        outcomes.push(CaseOutcome { passed, result });
    }

    Ok(outcomes)
}
