pub mod auth;
pub mod evaluate;
pub mod execute;
pub mod health;
pub mod hr_report;
pub mod interview;
pub mod problem;
pub mod scratch;
pub mod submission;
pub mod user;
