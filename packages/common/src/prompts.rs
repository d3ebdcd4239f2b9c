//! Prompt templates sent to the chat-completion API.

use crate::hr::HrTurn;
use crate::llm::ChatMessage;

const EVALUATOR_SYSTEM: &str = "You are an experienced technical interviewer. \
You grade candidate answers strictly and reply with a single JSON object and nothing else.";

const QUESTION_WRITER_SYSTEM: &str = "You write interview questions for software engineering \
candidates. Reply with a single JSON object and nothing else.";

const HR_ASSESSOR_SYSTEM: &str = "You are an HR interviewer assessing a candidate's \
behavioral interview. Reply with a single JSON object and nothing else.";

/// Grade one written answer on a 0-10 scale.
pub fn answer_evaluation(question: &str, answer: &str) -> Vec<ChatMessage> {
    let user = format!(
        "Evaluate the candidate's answer to the interview question below.\n\n\
         Question:\n{question}\n\n\
         Answer:\n{answer}\n\n\
         Respond with JSON of the form:\n\
         {{\"score\": <number 0-10>, \"feedback\": \"<2-3 sentences>\", \
         \"strengths\": [\"...\"], \"improvements\": [\"...\"]}}"
    );
    vec![ChatMessage::system(EVALUATOR_SYSTEM), ChatMessage::user(user)]
}

/// Generate a technical interview: MCQs with four options plus written questions.
pub fn technical_questions(
    target_role: &str,
    topic: &str,
    difficulty: &str,
    mcq_count: usize,
    written_count: usize,
) -> Vec<ChatMessage> {
    let user = format!(
        "Create a {difficulty} technical interview for a {target_role} candidate \
         focused on {topic}.\n\
         Write exactly {mcq_count} multiple-choice questions with four options each \
         and exactly {written_count} open-ended questions answered in a few paragraphs.\n\n\
         Respond with JSON of the form:\n\
         {{\"mcq\": [{{\"question\": \"...\", \"options\": [\"...\", \"...\", \"...\", \"...\"], \
         \"correct_index\": <0-3>}}], \"written\": [{{\"question\": \"...\"}}]}}"
    );
    vec![
        ChatMessage::system(QUESTION_WRITER_SYSTEM),
        ChatMessage::user(user),
    ]
}

/// Generate behavioral HR questions.
pub fn hr_questions(target_role: &str, count: usize) -> Vec<ChatMessage> {
    let user = format!(
        "Write exactly {count} behavioral HR interview questions for a {target_role} \
         candidate covering teamwork, conflict, motivation and ownership.\n\n\
         Respond with JSON of the form:\n\
         {{\"mcq\": [], \"written\": [{{\"question\": \"...\"}}]}}"
    );
    vec![
        ChatMessage::system(QUESTION_WRITER_SYSTEM),
        ChatMessage::user(user),
    ]
}

/// Assess a full HR interview transcript.
pub fn hr_assessment(transcript: &[HrTurn]) -> Vec<ChatMessage> {
    let mut dialogue = String::new();
    for (i, turn) in transcript.iter().enumerate() {
        dialogue.push_str(&format!(
            "Q{n}: {q}\nA{n}: {a}\n\n",
            n = i + 1,
            q = turn.question.trim(),
            a = turn.answer.trim()
        ));
    }

    let user = format!(
        "Assess the following HR interview.\n\n{dialogue}\
         Score communication, confidence, professionalism and problem_solving from 0 to 10, \
         give an overall_score from 0 to 100 and a recommendation of \
         \"strong_hire\", \"hire\" or \"no_hire\".\n\n\
         Respond with JSON of the form:\n\
         {{\"communication\": 0, \"confidence\": 0, \"professionalism\": 0, \
         \"problem_solving\": 0, \"overall_score\": 0, \"recommendation\": \"...\", \
         \"summary\": \"...\", \"strengths\": [\"...\"], \"improvements\": [\"...\"]}}"
    );
    vec![ChatMessage::system(HR_ASSESSOR_SYSTEM), ChatMessage::user(user)]
}
