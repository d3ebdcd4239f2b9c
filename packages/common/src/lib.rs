pub mod comparator;
pub mod config;
pub mod evaluation;
pub mod hr;
pub mod interview;
pub mod llm;
pub mod llm_json;
pub mod poll;
pub mod prompts;
pub mod queue_status;
pub mod scoring;

pub use comparator::{BatchSummary, compare_outputs, normalize, summarize};
pub use evaluation::{Evaluation, EvaluationSource, evaluate_answer};
pub use interview::{Difficulty, InterviewKind, QuestionKind, SessionStatus};
pub use llm::{ChatBackend, ChatMessage, LlmError};
pub use queue_status::{EvaluationJobPayload, QueueJobStatus};
