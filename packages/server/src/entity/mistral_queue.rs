use common::QueueJobStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Deferred evaluation of one written answer.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mistral_queue")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub session_id: Uuid,
    #[sea_orm(indexed)]
    pub response_id: i32,
    pub user_id: i32,

    #[sea_orm(indexed)]
    pub status: QueueJobStatus,

    /// `{response_id, session_id, question, answer}`
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: serde_json::Value,

    /// Evaluation JSON once done.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub result: Option<serde_json::Value>,

    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub processed_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
