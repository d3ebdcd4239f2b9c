use common::QuestionKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_response")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// One response per question.
    #[sea_orm(unique)]
    pub question_id: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    pub kind: QuestionKind,
    pub selected_option: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub answer: Option<String>,
    /// Set immediately for MCQs; NULL for written answers.
    pub is_correct: Option<bool>,

    pub session_id: Uuid,
    #[sea_orm(belongs_to, from = "session_id", to = "id")]
    pub session: HasOne<super::interview_session::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
