use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde_json::{Value, json};
use uuid::Uuid;

use server::entity::{interview_question, mistral_queue};

use crate::common::{TestApp, routes};

async fn start_technical(app: &TestApp, token: &str) -> Value {
    let res = app
        .post_with_token(
            routes::INTERVIEWS,
            &json!({"kind": "technical", "topic": "Operating Systems"}),
            token,
        )
        .await;
    assert_eq!(res.status, 201, "create interview failed: {}", res.text);
    res.body
}

fn session_id(detail: &Value) -> Uuid {
    detail["session"]["id"].as_str().unwrap().parse().unwrap()
}

fn questions_of_kind<'a>(detail: &'a Value, kind: &str) -> Vec<&'a Value> {
    detail["questions"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|q| q["kind"] == kind)
        .collect()
}

/// Correct option for every MCQ in the session, read straight from the database.
async fn answer_key(app: &TestApp, session: Uuid) -> Vec<(i32, i32)> {
    interview_question::Entity::find()
        .filter(interview_question::Column::SessionId.eq(session))
        .order_by_asc(interview_question::Column::Position)
        .all(&app.db)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|q| q.correct_option.map(|c| (q.id, c)))
        .collect()
}

mod sessions {
    use super::*;

    #[tokio::test]
    async fn technical_session_uses_fallback_questions_without_an_llm() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let detail = start_technical(&app, &token).await;

        assert_eq!(detail["session"]["status"], "active");
        assert_eq!(detail["session"]["question_source"], "fallback");
        assert_eq!(detail["session"]["target_role"], "Software Engineer");
        assert_eq!(detail["session"]["difficulty"], "medium");
        assert_eq!(questions_of_kind(&detail, "mcq").len(), 5);
        assert_eq!(questions_of_kind(&detail, "written").len(), 3);
        for q in questions_of_kind(&detail, "mcq") {
            assert!(q["correct_option"].is_null(), "answer leaked: {q}");
        }
    }

    #[tokio::test]
    async fn target_role_defaults_to_the_profile() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        app.patch_with_token(routes::USERS_ME, &json!({"target_role": "SRE"}), &token)
            .await;

        let res = app
            .post_with_token(routes::INTERVIEWS, &json!({"kind": "hr", "topic": "ignored"}), &token)
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["session"]["target_role"], "SRE");
        assert!(res.body["session"]["topic"].is_null());
        assert_eq!(questions_of_kind(&res.body, "written").len(), 5);
        assert!(questions_of_kind(&res.body, "mcq").is_empty());
    }

    #[tokio::test]
    async fn sessions_are_private_to_their_owner() {
        let app = TestApp::spawn().await;
        let asha = app.create_authenticated_user("asha@example.com").await;
        let ravi = app.create_authenticated_user("ravi@example.com").await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = session_id(&start_technical(&app, &asha).await);

        assert_eq!(app.get_with_token(&routes::interview(id), &asha).await.status, 200);
        assert_eq!(app.get_with_token(&routes::interview(id), &ravi).await.status, 404);
        assert_eq!(app.get_with_token(&routes::interview(id), &admin).await.status, 200);

        let list = app.get_with_token(routes::INTERVIEWS, &ravi).await;
        assert_eq!(list.body, json!([]));
        let list = app.get_with_token(routes::INTERVIEWS, &asha).await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_kind_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(routes::INTERVIEWS, &json!({"kind": "panel"}), &token)
            .await;

        assert_eq!(res.status, 400);
    }
}

mod answers {
    use super::*;

    #[tokio::test]
    async fn mcq_answer_is_graded_immediately() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);
        let (question_id, correct) = answer_key(&app, id).await[0];

        let res = app
            .post_with_token(
                &routes::interview_responses(id),
                &json!({"question_id": question_id, "selected_option": correct}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["response"]["is_correct"], true);
        assert!(res.body["job_id"].is_null());
    }

    #[tokio::test]
    async fn written_answer_enqueues_an_evaluation_job() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let detail = start_technical(&app, &token).await;
        let id = session_id(&detail);
        let question_id = questions_of_kind(&detail, "written")[0]["id"].as_i64().unwrap();

        let res = app
            .post_with_token(
                &routes::interview_responses(id),
                &json!({"question_id": question_id, "answer": "Threads share an address space."}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let job_id = res.body["job_id"].as_i64().unwrap() as i32;
        let job = mistral_queue::Entity::find_by_id(job_id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(job.status, ::common::QueueJobStatus::Pending);
        let payload: ::common::EvaluationJobPayload =
            serde_json::from_value(job.payload).unwrap();
        assert_eq!(payload.session_id, id);
        assert_eq!(payload.answer, "Threads share an address space.");

        let jobs = app.get_with_token(&routes::interview_jobs(id), &token).await;
        assert_eq!(jobs.status, 200);
        assert_eq!(jobs.body[0]["status"], "pending");
    }

    #[tokio::test]
    async fn question_cannot_be_answered_twice() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);
        let (question_id, _) = answer_key(&app, id).await[0];
        let body = json!({"question_id": question_id, "selected_option": 0});

        let first = app.post_with_token(&routes::interview_responses(id), &body, &token).await;
        assert_eq!(first.status, 201);
        let second = app.post_with_token(&routes::interview_responses(id), &body, &token).await;

        assert_eq!(second.status, 409);
        assert_eq!(second.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn answer_must_match_the_question_kind() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);
        let (question_id, _) = answer_key(&app, id).await[0];

        let res = app
            .post_with_token(
                &routes::interview_responses(id),
                &json!({"question_id": question_id, "answer": "B"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn question_from_another_session_is_not_found() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let first = session_id(&start_technical(&app, &token).await);
        let second = session_id(&start_technical(&app, &token).await);
        let (foreign_question, _) = answer_key(&app, first).await[0];

        let res = app
            .post_with_token(
                &routes::interview_responses(second),
                &json!({"question_id": foreign_question, "selected_option": 0}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn only_the_owner_can_answer() {
        let app = TestApp::spawn().await;
        let asha = app.create_authenticated_user("asha@example.com").await;
        let ravi = app.create_authenticated_user("ravi@example.com").await;
        let id = session_id(&start_technical(&app, &asha).await);
        let (question_id, _) = answer_key(&app, id).await[0];

        let res = app
            .post_with_token(
                &routes::interview_responses(id),
                &json!({"question_id": question_id, "selected_option": 0}),
                &ravi,
            )
            .await;

        assert_eq!(res.status, 404);
    }
}

mod finalization {
    use super::*;

    #[tokio::test]
    async fn finalize_scores_the_session_and_updates_progress() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);
        for (question_id, correct) in answer_key(&app, id).await {
            let res = app
                .post_with_token(
                    &routes::interview_responses(id),
                    &json!({"question_id": question_id, "selected_option": correct}),
                    &token,
                )
                .await;
            assert_eq!(res.status, 201);
        }

        let res = app.post_with_token(&routes::interview_finalize(id), &json!({}), &token).await;

        // 5/5 MCQs and three unanswered written questions: (100 + 0) / 2.
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["report"]["mcq_correct"], 5);
        assert_eq!(res.body["report"]["written_score"], 0.0);
        assert_eq!(res.body["report"]["overall_score"], 50);
        assert_eq!(res.body["report"]["passed"], false);

        let detail = app.get_with_token(&routes::interview(id), &token).await;
        assert_eq!(detail.body["session"]["status"], "completed");
        assert!(
            questions_of_kind(&detail.body, "mcq")
                .iter()
                .all(|q| q["correct_option"].is_number())
        );

        let me = app.get_with_token(routes::USERS_ME, &token).await;
        assert_eq!(me.body["progress"]["interviews_completed"], 1);
        assert_eq!(me.body["progress"]["best_interview_score"], 50);
        assert_eq!(me.body["progress"]["average_interview_score"], 50.0);
    }

    #[tokio::test]
    async fn pending_written_answers_get_a_provisional_score() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let detail = start_technical(&app, &token).await;
        let id = session_id(&detail);
        let written = questions_of_kind(&detail, "written")[0]["id"].as_i64().unwrap();
        app.post_with_token(
            &routes::interview_responses(id),
            &json!({"question_id": written, "answer": "A long enough answer that explains the idea in detail."}),
            &token,
        )
        .await;

        let res = app.post_with_token(&routes::interview_finalize(id), &json!({}), &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["report"]["pending_evaluations"], 1);
        assert_eq!(res.body["report"]["written_score"], 2.0);
    }

    #[tokio::test]
    async fn refinalizing_does_not_double_count_progress() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);

        for _ in 0..2 {
            let res = app.post_with_token(&routes::interview_finalize(id), &json!({}), &token).await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        let me = app.get_with_token(routes::USERS_ME, &token).await;
        assert_eq!(me.body["progress"]["interviews_completed"], 1);
    }

    #[tokio::test]
    async fn completed_session_rejects_new_answers() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);
        let (question_id, _) = answer_key(&app, id).await[0];
        app.post_with_token(&routes::interview_finalize(id), &json!({}), &token).await;

        let res = app
            .post_with_token(
                &routes::interview_responses(id),
                &json!({"question_id": question_id, "selected_option": 0}),
                &token,
            )
            .await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn report_is_not_found_before_finalization() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let id = session_id(&start_technical(&app, &token).await);

        let res = app.get_with_token(&routes::interview_report(id), &token).await;
        assert_eq!(res.status, 404);

        app.post_with_token(&routes::interview_finalize(id), &json!({}), &token).await;
        let res = app.get_with_token(&routes::interview_report(id), &token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["report"]["session_id"], id.to_string());
        assert_eq!(res.body["evaluations"], json!([]));
    }
}
