use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "final_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub session_id: Uuid,
    #[sea_orm(indexed)]
    pub user_id: i32,

    pub mcq_correct: i32,
    pub mcq_total: i32,
    /// Percentage, NULL when the session had no MCQs.
    pub mcq_score: Option<f64>,
    pub written_count: i32,
    /// Mean on 0-10, NULL when the session had no written questions.
    pub written_score: Option<f64>,
    pub overall_score: i32,
    pub passed: bool,
    /// Written answers scored heuristically because their job was not done yet.
    pub pending_evaluations: i32,
    #[sea_orm(column_type = "Text")]
    pub summary: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
