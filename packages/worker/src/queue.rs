use chrono::Utc;
use common::{Evaluation, EvaluationSource, QueueJobStatus};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use server::entity::{mistral_queue, response_evaluation};

/// Row-level operations on the `mistral_queue` table.
pub struct QueueService<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> QueueService<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Oldest pending jobs first.
    pub async fn pending(&self, limit: u64) -> Result<Vec<mistral_queue::Model>, DbErr> {
        mistral_queue::Entity::find()
            .filter(mistral_queue::Column::Status.eq(QueueJobStatus::Pending))
            .order_by_asc(mistral_queue::Column::CreatedAt)
            .order_by_asc(mistral_queue::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await
    }

    /// Move a job from `pending` to `processing`.
    ///
    /// Returns `false` when another worker got there first.
    pub async fn claim(&self, id: i32) -> Result<bool, DbErr> {
        let result = mistral_queue::Entity::update_many()
            .col_expr(
                mistral_queue::Column::Status,
                Expr::value(QueueJobStatus::Processing),
            )
            .col_expr(mistral_queue::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(mistral_queue::Column::Id.eq(id))
            .filter(mistral_queue::Column::Status.eq(QueueJobStatus::Pending))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// Store (or replace) the evaluation for a response.
    pub async fn save_evaluation(
        &self,
        response_id: i32,
        session_id: Uuid,
        evaluation: &Evaluation,
        source: EvaluationSource,
    ) -> Result<(), DbErr> {
        let row = response_evaluation::ActiveModel {
            response_id: Set(response_id),
            session_id: Set(session_id),
            score: Set(evaluation.score),
            feedback: Set(evaluation.feedback.clone()),
            strengths: Set(serde_json::json!(evaluation.strengths)),
            improvements: Set(serde_json::json!(evaluation.improvements)),
            source: Set(source.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        response_evaluation::Entity::insert(row)
            .on_conflict(
                OnConflict::column(response_evaluation::Column::ResponseId)
                    .update_columns([
                        response_evaluation::Column::Score,
                        response_evaluation::Column::Feedback,
                        response_evaluation::Column::Strengths,
                        response_evaluation::Column::Improvements,
                        response_evaluation::Column::Source,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }

    pub async fn complete(&self, id: i32, result: serde_json::Value) -> Result<(), DbErr> {
        let now = Utc::now();
        mistral_queue::Entity::update_many()
            .col_expr(mistral_queue::Column::Status, Expr::value(QueueJobStatus::Done))
            .col_expr(mistral_queue::Column::Result, Expr::value(result))
            .col_expr(
                mistral_queue::Column::ErrorMessage,
                Expr::value(Option::<String>::None),
            )
            .col_expr(mistral_queue::Column::UpdatedAt, Expr::value(now))
            .col_expr(mistral_queue::Column::ProcessedAt, Expr::value(now))
            .filter(mistral_queue::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }

    pub async fn fail(&self, id: i32, message: &str) -> Result<(), DbErr> {
        let now = Utc::now();
        mistral_queue::Entity::update_many()
            .col_expr(mistral_queue::Column::Status, Expr::value(QueueJobStatus::Error))
            .col_expr(
                mistral_queue::Column::ErrorMessage,
                Expr::value(message.to_string()),
            )
            .col_expr(mistral_queue::Column::UpdatedAt, Expr::value(now))
            .col_expr(mistral_queue::Column::ProcessedAt, Expr::value(now))
            .filter(mistral_queue::Column::Id.eq(id))
            .exec(self.conn)
            .await?;
        Ok(())
    }
}
