pub mod auth;
pub mod evaluate;
pub mod execute;
pub mod hr;
pub mod interview;
pub mod problem;
pub mod scratch;
pub mod shared;
pub mod submission;
pub mod user;
