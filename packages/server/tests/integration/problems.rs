use serde_json::json;

use crate::common::{TestApp, routes};

mod authoring {
    use super::*;

    #[tokio::test]
    async fn problem_setter_can_create_a_problem() {
        let app = TestApp::spawn().await;
        let setter = app
            .create_user_with_role("setter@example.com", "problem_setter")
            .await;

        let res = app
            .post_with_token(
                routes::PROBLEMS,
                &json!({
                    "title": "  Two Sum  ",
                    "description": "Find two numbers that add up to the target.",
                    "difficulty": "medium",
                    "category": "Arrays",
                }),
                &setter,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "Two Sum");
        assert_eq!(res.body["difficulty"], "medium");
        assert_eq!(res.body["samples"], json!([]));
    }

    #[tokio::test]
    async fn candidate_cannot_create_a_problem() {
        let app = TestApp::spawn().await;
        let candidate = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(
                routes::PROBLEMS,
                &json!({
                    "title": "Nope",
                    "description": "x",
                    "difficulty": "easy",
                    "category": "Math",
                }),
                &candidate,
            )
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn unknown_difficulty_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;

        let res = app
            .post_with_token(
                routes::PROBLEMS,
                &json!({
                    "title": "Odd",
                    "description": "x",
                    "difficulty": "legendary",
                    "category": "Math",
                }),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn patch_updates_only_supplied_fields() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_problem(&admin, "Sum").await;

        let res = app
            .patch_with_token(&routes::problem(id), &json!({"difficulty": "hard"}), &admin)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["difficulty"], "hard");
        assert_eq!(res.body["title"], "Sum");
        assert_eq!(res.body["category"], "Math");
    }

    #[tokio::test]
    async fn patching_a_missing_problem_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;

        let res = app
            .patch_with_token(&routes::problem(9999), &json!({"title": "X"}), &admin)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod browsing {
    use super::*;

    #[tokio::test]
    async fn list_filters_by_search_and_difficulty() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        app.create_problem(&admin, "Sum of Digits").await;
        app.create_problem(&admin, "Reverse String").await;
        let hard = app.create_problem(&admin, "Sum Partition").await;
        app.patch_with_token(&routes::problem(hard), &json!({"difficulty": "hard"}), &admin)
            .await;
        let candidate = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .get_with_token(&format!("{}?search=sum", routes::PROBLEMS), &candidate)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["total"], 2);
        // Newest first.
        assert_eq!(res.body["data"][0]["title"], "Sum Partition");

        let res = app
            .get_with_token(
                &format!("{}?search=sum&difficulty=easy", routes::PROBLEMS),
                &candidate,
            )
            .await;
        assert_eq!(res.body["pagination"]["total"], 1);
        assert_eq!(res.body["data"][0]["title"], "Sum of Digits");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        app.create_problem(&admin, "Plain").await;

        let res = app
            .get_with_token(&format!("{}?search=%25", routes::PROBLEMS), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["pagination"]["total"], 0);
    }

    #[tokio::test]
    async fn pagination_splits_results() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        for i in 0..3 {
            app.create_problem(&admin, &format!("P{i}")).await;
        }

        let res = app
            .get_with_token(&format!("{}?page=2&per_page=2", routes::PROBLEMS), &admin)
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["data"].as_array().unwrap().len(), 1);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn problem_detail_only_shows_sample_cases() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_sum_problem(&admin).await;
        let candidate = app.create_authenticated_user("asha@example.com").await;

        let res = app.get_with_token(&routes::problem(id), &candidate).await;

        assert_eq!(res.status, 200);
        let samples = res.body["samples"].as_array().unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0]["input"], "1 2");
    }
}

mod test_cases {
    use super::*;

    #[tokio::test]
    async fn candidates_only_see_sample_cases() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_sum_problem(&admin).await;
        let candidate = app.create_authenticated_user("asha@example.com").await;

        let res = app.get_with_token(&routes::test_cases(id), &candidate).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 1);

        let res = app.get_with_token(&routes::test_cases(id), &admin).await;
        assert_eq!(res.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn positions_are_assigned_in_order() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_sum_problem(&admin).await;

        let res = app.get_with_token(&routes::test_cases(id), &admin).await;
        let cases = res.body.as_array().unwrap();

        assert_eq!(cases[0]["position"], 0);
        assert_eq!(cases[1]["position"], 1);
    }

    #[tokio::test]
    async fn test_case_can_be_updated_and_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_problem(&admin, "Sum").await;
        let tc = app.create_test_case(id, &admin, "1 1", "2", false).await;

        let res = app
            .patch_with_token(&routes::test_case(id, tc), &json!({"is_sample": true}), &admin)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["is_sample"], true);
        assert_eq!(res.body["input"], "1 1");

        let res = app.delete_with_token(&routes::test_case(id, tc), &admin).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::test_cases(id), &admin).await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn test_case_of_another_problem_is_not_found() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let first = app.create_problem(&admin, "First").await;
        let second = app.create_problem(&admin, "Second").await;
        let tc = app.create_test_case(first, &admin, "1", "1", true).await;

        let res = app.delete_with_token(&routes::test_case(second, tc), &admin).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn candidate_cannot_add_test_cases() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_problem(&admin, "Sum").await;
        let candidate = app.create_authenticated_user("asha@example.com").await;

        let res = app
            .post_with_token(
                &routes::test_cases(id),
                &json!({"input": "1", "expected_output": "1"}),
                &candidate,
            )
            .await;

        assert_eq!(res.status, 403);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn problem_without_submissions_can_be_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_sum_problem(&admin).await;

        let res = app.delete_with_token(&routes::problem(id), &admin).await;
        assert_eq!(res.status, 204);

        let res = app.get_with_token(&routes::problem(id), &admin).await;
        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn problem_with_submissions_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let id = app.create_sum_problem(&admin).await;
        let candidate = app.create_authenticated_user("asha@example.com").await;
        let res = app
            .post_with_token(
                &routes::problem_submissions(id),
                &json!({"language": "python", "source_code": "print(sum)"}),
                &candidate,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let res = app.delete_with_token(&routes::problem(id), &admin).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn problem_setter_cannot_delete_problems() {
        let app = TestApp::spawn().await;
        let admin = app.create_user_with_role("admin@example.com", "admin").await;
        let setter = app
            .create_user_with_role("setter@example.com", "problem_setter")
            .await;
        let id = app.create_problem(&admin, "Sum").await;

        let res = app.delete_with_token(&routes::problem(id), &setter).await;

        assert_eq!(res.status, 403);
    }
}
