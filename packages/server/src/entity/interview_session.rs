use common::{Difficulty, InterviewKind, SessionStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "interview_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub kind: InterviewKind,
    pub target_role: String,
    pub topic: Option<String>,
    pub difficulty: Difficulty,
    #[sea_orm(indexed)]
    pub status: SessionStatus,
    /// `llm` or `fallback`: where the questions came from.
    pub question_source: String,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub questions: HasMany<super::interview_question::Entity>,

    #[sea_orm(has_many)]
    pub responses: HasMany<super::user_response::Entity>,

    pub created_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
