use common::QuestionKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub position: i32,
    pub kind: QuestionKind,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    /// JSON array of option strings; empty for written questions.
    #[sea_orm(column_type = "JsonBinary")]
    pub options: serde_json::Value,
    /// Index into `options` for MCQs.
    pub correct_option: Option<i32>,

    pub session_id: Uuid,
    #[sea_orm(belongs_to, from = "session_id", to = "id")]
    pub session: HasOne<super::interview_session::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
