use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Verdict for one test case, stored as a JSON array on the submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StoredCaseResult {
    pub test_case_id: i32,
    pub is_sample: bool,
    pub passed: bool,
    /// `ExecutionStatus` in snake_case.
    #[schema(example = "accepted")]
    pub status: String,
    pub time_ms: Option<f64>,
    pub memory_kb: Option<u64>,
    /// Program stdout; only kept for sample cases.
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub language: String,
    #[sea_orm(column_type = "Text")]
    pub source_code: String,

    pub passed: i32,
    pub total: i32,
    /// True when every test case passed.
    pub accepted: bool,
    /// JSON array of `StoredCaseResult`.
    #[sea_orm(column_type = "JsonBinary")]
    pub results: serde_json::Value,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub problem_id: i32,
    #[sea_orm(belongs_to, from = "problem_id", to = "id")]
    pub problem: HasOne<super::problem::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
