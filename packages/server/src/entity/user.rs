use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Lowercased login email.
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub college: Option<String>,
    pub graduation_year: Option<i32>,
    pub target_role: Option<String>,

    pub role: String,
    #[sea_orm(belongs_to, from = "role", to = "name")]
    pub role_ref: HasOne<super::role::Entity>,

    // Progress counters
    #[sea_orm(default_value = 0)]
    pub problems_solved: i32,
    #[sea_orm(default_value = 0)]
    pub submissions_count: i32,
    #[sea_orm(default_value = 0)]
    pub interviews_completed: i32,
    #[sea_orm(default_value = 0)]
    pub best_interview_score: i32,
    /// Sum of overall scores of completed interviews, for the average.
    #[sea_orm(default_value = 0)]
    pub total_interview_score: i64,

    #[sea_orm(has_many)]
    pub submissions: HasMany<super::submission::Entity>,

    #[sea_orm(has_many)]
    pub interview_sessions: HasMany<super::interview_session::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
