use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::{interview_session, mistral_queue, role, role_permission, submission};

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &["admin", "problem_setter", "candidate"];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin: all permissions
    ("admin", "problem:create"),
    ("admin", "problem:edit"),
    ("admin", "problem:delete"),
    ("admin", "submission:submit"),
    ("admin", "submission:view_all"),
    ("admin", "interview:take"),
    ("admin", "report:view_all"),
    ("admin", "queue:view_all"),
    // Problem setter
    ("problem_setter", "problem:create"),
    ("problem_setter", "problem:edit"),
    ("problem_setter", "submission:submit"),
    ("problem_setter", "submission:view_all"),
    ("problem_setter", "interview:take"),
    // Candidate
    ("candidate", "submission:submit"),
    ("candidate", "interview:take"),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => roles_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: String) {
    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}

/// Ensure composite indexes that schema sync does not create.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Own submissions for a problem, newest first.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_submission_user_problem_created")
        .table(submission::Entity)
        .col(submission::Column::UserId)
        .col(submission::Column::ProblemId)
        .col(submission::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_submission_user_problem_created", stmt).await;

    // Worker scan: pending jobs, oldest first.
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_mistral_queue_status_created")
        .table(mistral_queue::Entity)
        .col(mistral_queue::Column::Status)
        .col(mistral_queue::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_mistral_queue_status_created", stmt).await;

    let stmt = Index::create()
        .if_not_exists()
        .name("idx_interview_session_user_created")
        .table(interview_session::Entity)
        .col(interview_session::Column::UserId)
        .col(interview_session::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);
    create_index(db, "idx_interview_session_user_created", stmt).await;

    Ok(())
}
