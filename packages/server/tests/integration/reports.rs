use serde_json::json;

use crate::common::{TestApp, routes};

mod evaluate {
    use super::*;

    #[tokio::test]
    async fn answer_is_scored_heuristically_without_an_llm() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(
                routes::EVALUATE,
                &json!({
                    "question": "What is a mutex?",
                    "answer": "A lock that lets only one thread into a critical section at a time.",
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["source"], "fallback");
        assert_eq!(res.body["score"], 6.0);
        assert!(res.body["feedback"].as_str().is_some_and(|f| !f.is_empty()));
    }

    #[tokio::test]
    async fn empty_answer_scores_zero() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(
                routes::EVALUATE,
                &json!({"question": "What is a mutex?", "answer": "   "}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["score"], 0.0);
    }

    #[tokio::test]
    async fn question_is_required() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(routes::EVALUATE, &json!({"question": "", "answer": "x"}), &token)
            .await;

        assert_eq!(res.status, 400);
    }
}

mod hr_reports {
    use super::*;

    fn transcript() -> serde_json::Value {
        json!([
            {"question": "Tell me about yourself.", "answer": "I am a final-year student who enjoys building backend systems."},
            {"question": "Describe a conflict.", "answer": ""},
        ])
    }

    #[tokio::test]
    async fn transcript_is_assessed_and_stored() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(routes::HR_REPORTS, &json!({"transcript": transcript()}), &token)
            .await;

        // Fallback: answers score 6 and 0, mean 3 -> overall 30.
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["source"], "fallback");
        assert_eq!(res.body["overall_score"], 30);
        assert_eq!(res.body["recommendation"], "no_hire");
        assert_eq!(res.body["transcript"].as_array().unwrap().len(), 2);
        assert!(
            res.body["improvements"]
                .as_array()
                .unwrap()
                .contains(&json!("Answer every question."))
        );

        let id = res.id();
        let fetched = app.get_with_token(&routes::hr_report(id), &token).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["summary"], res.body["summary"]);

        let list = app.get_with_token(routes::HR_REPORTS, &token).await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_transcript_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(routes::HR_REPORTS, &json!({"transcript": []}), &token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn report_can_be_linked_to_an_hr_session() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let session = app
            .post_with_token(routes::INTERVIEWS, &json!({"kind": "hr"}), &token)
            .await;
        let session_id = session.body["session"]["id"].clone();

        let res = app
            .post_with_token(
                routes::HR_REPORTS,
                &json!({"session_id": session_id, "transcript": transcript()}),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["session_id"], session_id);
    }

    #[tokio::test]
    async fn technical_session_cannot_be_linked() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("asha@example.com").await;
        let session = app
            .post_with_token(routes::INTERVIEWS, &json!({"kind": "technical"}), &token)
            .await;

        let res = app
            .post_with_token(
                routes::HR_REPORTS,
                &json!({"session_id": session.body["session"]["id"], "transcript": transcript()}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn reports_are_private_unless_privileged() {
        let app = TestApp::spawn().await;
        let asha = app.create_authenticated_user("asha@example.com").await;
        let ravi = app.create_authenticated_user("ravi@example.com").await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app
            .post_with_token(routes::HR_REPORTS, &json!({"transcript": transcript()}), &asha)
            .await
            .id();

        assert_eq!(app.get_with_token(&routes::hr_report(id), &ravi).await.status, 404);
        assert_eq!(app.get_with_token(&routes::hr_report(id), &admin).await.status, 200);
    }
}
