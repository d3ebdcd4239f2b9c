pub mod final_report;
pub mod hr_interview_report;
pub mod interview_question;
pub mod interview_session;
pub mod mistral_queue;
pub mod problem;
pub mod response_evaluation;
pub mod role;
pub mod role_permission;
pub mod submission;
pub mod test_case;
pub mod user;
pub mod user_response;
