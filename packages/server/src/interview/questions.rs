use rand::seq::SliceRandom;
use serde_json::{Value, json};
use tracing::{info, warn};

use common::llm_json::{as_number, extract_json_array, extract_json_object};
use common::{ChatBackend, Difficulty, EvaluationSource, InterviewKind, QuestionKind, prompts};

use crate::config::InterviewConfig;

const MIN_OPTIONS: usize = 2;
const MAX_OPTIONS: usize = 6;

/// A question ready to be stored for a session.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedQuestion {
    pub kind: QuestionKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: Option<usize>,
}

/// What the session asked for.
pub struct QuestionRequest<'a> {
    pub kind: InterviewKind,
    pub target_role: &'a str,
    pub topic: &'a str,
    pub difficulty: Difficulty,
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_mcq(item: &Value) -> Option<GeneratedQuestion> {
    let prompt = non_empty_str(item.get("question"))?;
    let options: Vec<String> = item
        .get("options")?
        .as_array()?
        .iter()
        .map(|o| non_empty_str(Some(o)))
        .collect::<Option<_>>()?;
    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&options.len()) {
        return None;
    }
    let index = as_number(item.get("correct_index")?)?;
    if index.fract() != 0.0 || index < 0.0 || index as usize >= options.len() {
        return None;
    }
    Some(GeneratedQuestion {
        kind: QuestionKind::Mcq,
        prompt,
        options,
        correct_option: Some(index as usize),
    })
}

fn parse_written(item: &Value) -> Option<GeneratedQuestion> {
    let prompt = match item {
        Value::String(_) => non_empty_str(Some(item))?,
        _ => non_empty_str(item.get("question"))?,
    };
    Some(GeneratedQuestion {
        kind: QuestionKind::Written,
        prompt,
        options: Vec::new(),
        correct_option: None,
    })
}

/// A missing section is empty; a present one must be an array.
fn section<'a>(body: &'a Value, key: &str) -> Option<&'a [Value]> {
    match body.get(key) {
        Some(v) => v.as_array().map(Vec::as_slice),
        None => Some(&[]),
    }
}

/// Parse and shape-check a generated question set.
///
/// Every item must be well formed and each section must hold at least the
/// requested number of questions (extras are dropped). MCQs come first.
/// A written-only set may also arrive as a bare JSON list of questions.
pub fn parse_question_set(
    reply: &str,
    mcq_count: usize,
    written_count: usize,
) -> Option<Vec<GeneratedQuestion>> {
    let from_object = extract_json_object(reply)
        .and_then(|body| shape_question_set(&body, mcq_count, written_count));
    if from_object.is_some() || mcq_count > 0 {
        return from_object;
    }
    let written = extract_json_array(reply)?;
    shape_question_set(&json!({ "written": written }), 0, written_count)
}

fn shape_question_set(
    body: &Value,
    mcq_count: usize,
    written_count: usize,
) -> Option<Vec<GeneratedQuestion>> {
    let mcqs: Vec<GeneratedQuestion> = section(body, "mcq")?
        .iter()
        .map(parse_mcq)
        .collect::<Option<_>>()?;
    let written: Vec<GeneratedQuestion> = section(body, "written")?
        .iter()
        .map(parse_written)
        .collect::<Option<_>>()?;

    if mcqs.len() < mcq_count || written.len() < written_count {
        return None;
    }

    Some(
        mcqs.into_iter()
            .take(mcq_count)
            .chain(written.into_iter().take(written_count))
            .collect(),
    )
}

const MCQ_BANK: &[(&str, &[&str], usize)] = &[
    (
        "What is the average time complexity of looking up a key in a hash map?",
        &["O(1)", "O(log n)", "O(n)", "O(n log n)"],
        0,
    ),
    (
        "Which data structure serves elements in last-in, first-out order?",
        &["Queue", "Stack", "Heap", "Linked list"],
        1,
    ),
    (
        "Which HTTP method is idempotent but not safe?",
        &["GET", "POST", "PUT", "PATCH"],
        2,
    ),
    (
        "What does the 'I' in ACID stand for?",
        &["Integrity", "Isolation", "Indexing", "Idempotency"],
        1,
    ),
    (
        "Which sorting algorithm has the best worst-case time complexity?",
        &["Quick sort", "Bubble sort", "Merge sort", "Insertion sort"],
        2,
    ),
    (
        "What is a deadlock?",
        &[
            "A thread that loops forever",
            "Two or more tasks each waiting on a resource held by another",
            "A crash caused by null pointers",
            "A slow database query",
        ],
        1,
    ),
    (
        "Which git command creates a new commit that undoes an earlier commit?",
        &["git reset", "git revert", "git checkout", "git stash"],
        1,
    ),
    (
        "What does a database index primarily speed up?",
        &["Inserts", "Reads that filter or sort on the indexed columns", "Backups", "Schema changes"],
        1,
    ),
    (
        "Which traversal of a binary search tree yields keys in sorted order?",
        &["Pre-order", "In-order", "Post-order", "Level-order"],
        1,
    ),
    (
        "What is the height of a balanced binary tree with n nodes?",
        &["O(1)", "O(log n)", "O(n)", "O(n^2)"],
        1,
    ),
];

const WRITTEN_BANK: &[&str] = &[
    "Explain the difference between a process and a thread, and when you would prefer one over the other.",
    "Describe how you would design a URL shortening service. Cover storage, key generation and scaling.",
    "What is the difference between SQL and NoSQL databases? Give an example use case for each.",
    "Explain how HTTPS keeps traffic between a browser and a server confidential.",
    "Walk through how you would debug an API endpoint that has suddenly become slow in production.",
    "What is dynamic programming? Illustrate it with a problem you have solved.",
    "Describe the trade-offs between microservices and a monolith.",
    "How would you detect and prevent race conditions in concurrent code?",
];

const HR_BANK: &[&str] = &[
    "Tell me about yourself and what draws you to this role.",
    "Describe a time you disagreed with a teammate. How did you resolve it?",
    "Tell me about a project you are proud of and the part you personally owned.",
    "Describe a situation where you missed a deadline. What did you learn?",
    "How do you prioritize when several tasks are urgent at once?",
    "Tell me about a time you received critical feedback and how you responded.",
    "Where do you see yourself in three years?",
    "Describe a time you had to learn a new technology quickly.",
];

/// Canned question set, shuffled, used when the LLM is disabled or misbehaves.
///
/// Counts larger than a bank are capped at the bank size.
pub fn fallback_question_set(
    kind: InterviewKind,
    config: &InterviewConfig,
) -> Vec<GeneratedQuestion> {
    let mut rng = rand::rng();
    let mut questions = Vec::new();

    match kind {
        InterviewKind::Technical => {
            let mut mcqs: Vec<_> = MCQ_BANK.iter().collect();
            mcqs.shuffle(&mut rng);
            questions.extend(mcqs.into_iter().take(config.mcq_count).map(
                |(prompt, options, correct)| GeneratedQuestion {
                    kind: QuestionKind::Mcq,
                    prompt: prompt.to_string(),
                    options: options.iter().map(|o| o.to_string()).collect(),
                    correct_option: Some(*correct),
                },
            ));

            let mut written: Vec<_> = WRITTEN_BANK.iter().collect();
            written.shuffle(&mut rng);
            questions.extend(
                written
                    .into_iter()
                    .take(config.written_count)
                    .map(|p| written_question(p)),
            );
        }
        InterviewKind::Hr => {
            let mut hr: Vec<_> = HR_BANK.iter().collect();
            hr.shuffle(&mut rng);
            questions.extend(
                hr.into_iter()
                    .take(config.hr_question_count)
                    .map(|p| written_question(p)),
            );
        }
    }

    questions
}

fn written_question(prompt: &str) -> GeneratedQuestion {
    GeneratedQuestion {
        kind: QuestionKind::Written,
        prompt: prompt.to_string(),
        options: Vec::new(),
        correct_option: None,
    }
}

/// Generate questions with the LLM, falling back to the canned set on any failure.
pub async fn generate_questions(
    backend: &dyn ChatBackend,
    request: &QuestionRequest<'_>,
    config: &InterviewConfig,
) -> (Vec<GeneratedQuestion>, EvaluationSource) {
    let (messages, mcq_count, written_count) = match request.kind {
        InterviewKind::Technical => (
            prompts::technical_questions(
                request.target_role,
                request.topic,
                request.difficulty.as_str(),
                config.mcq_count,
                config.written_count,
            ),
            config.mcq_count,
            config.written_count,
        ),
        InterviewKind::Hr => (
            prompts::hr_questions(request.target_role, config.hr_question_count),
            0,
            config.hr_question_count,
        ),
    };

    match backend.complete(messages).await {
        Ok(reply) => {
            if let Some(questions) = parse_question_set(&reply, mcq_count, written_count) {
                info!(count = questions.len(), "Generated interview questions");
                return (questions, EvaluationSource::Llm);
            }
            warn!(
                reply_len = reply.len(),
                "Generated questions had an invalid shape, using fallback set"
            );
        }
        Err(e) => warn!(error = %e, "Question generation failed, using fallback set"),
    }

    (
        fallback_question_set(request.kind, config),
        EvaluationSource::Fallback,
    )
}
