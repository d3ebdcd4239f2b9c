use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "hr_interview_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub user_id: i32,
    pub session_id: Option<Uuid>,

    // Dimensions, 0-10 each
    pub communication: f64,
    pub confidence: f64,
    pub professionalism: f64,
    pub problem_solving: f64,

    pub overall_score: i32,
    pub recommendation: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub strengths: serde_json::Value,
    #[sea_orm(column_type = "JsonBinary")]
    pub improvements: serde_json::Value,
    /// JSON array of `{question, answer}`.
    #[sea_orm(column_type = "JsonBinary")]
    pub transcript: serde_json::Value,
    /// `llm` or `fallback`.
    pub source: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
