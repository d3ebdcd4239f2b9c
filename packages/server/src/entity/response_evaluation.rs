use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "response_evaluation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub response_id: i32,
    #[sea_orm(indexed)]
    pub session_id: Uuid,

    /// 0-10.
    pub score: f64,
    #[sea_orm(column_type = "Text")]
    pub feedback: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub strengths: serde_json::Value,
    #[sea_orm(column_type = "JsonBinary")]
    pub improvements: serde_json::Value,
    /// `llm` or `fallback`.
    pub source: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
