use serde_json::json;

use crate::common::{TestApp, routes};

fn program(source: &str) -> serde_json::Value {
    json!({"language": "python", "source_code": source})
}

#[tokio::test]
async fn correct_solution_is_accepted_and_counts_as_solved() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(id), &program("sum"), &token)
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["accepted"], true);
    assert_eq!(res.body["passed"], 2);
    assert_eq!(res.body["total"], 2);

    let me = app.get_with_token(routes::USERS_ME, &token).await;
    assert_eq!(me.body["progress"]["problems_solved"], 1);
    assert_eq!(me.body["progress"]["submissions_count"], 1);
}

#[tokio::test]
async fn hidden_case_output_is_not_stored() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(id), &program("sum"), &token)
        .await;
    let results = res.body["results"].as_array().unwrap();

    let sample = results.iter().find(|r| r["is_sample"] == true).unwrap();
    let hidden = results.iter().find(|r| r["is_sample"] == false).unwrap();
    assert_eq!(sample["stdout"], "3\n");
    assert!(hidden["stdout"].is_null());
    assert_eq!(hidden["status"], "accepted");
    assert_eq!(hidden["passed"], true);
}

#[tokio::test]
async fn wrong_answer_is_recorded_per_case() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(id), &program("print(3)"), &token)
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["accepted"], false);
    assert_eq!(res.body["passed"], 1);
    assert_eq!(res.body["results"][1]["status"], "wrong_answer");

    let me = app.get_with_token(routes::USERS_ME, &token).await;
    assert_eq!(me.body["progress"]["problems_solved"], 0);
    assert_eq!(me.body["progress"]["submissions_count"], 1);
}

#[tokio::test]
async fn solving_twice_counts_once() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;

    for _ in 0..2 {
        let res = app
            .post_with_token(&routes::problem_submissions(id), &program("sum"), &token)
            .await;
        assert_eq!(res.status, 201);
    }

    let me = app.get_with_token(routes::USERS_ME, &token).await;
    assert_eq!(me.body["progress"]["problems_solved"], 1);
    assert_eq!(me.body["progress"]["submissions_count"], 2);
}

#[tokio::test]
async fn concurrent_accepted_submissions_count_one_solve() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;
    let path = routes::problem_submissions(id);
    let body = program("sum");

    let (first, second) = tokio::join!(
        app.post_with_token(&path, &body, &token),
        app.post_with_token(&path, &body, &token),
    );

    assert_eq!(first.status, 201, "{}", first.text);
    assert_eq!(second.status, 201, "{}", second.text);
    assert_eq!(first.body["accepted"], true);
    assert_eq!(second.body["accepted"], true);

    let me = app.get_with_token(routes::USERS_ME, &token).await;
    assert_eq!(me.body["progress"]["problems_solved"], 1);
    assert_eq!(me.body["progress"]["submissions_count"], 2);
}

#[tokio::test]
async fn runtime_error_keeps_sample_stderr() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(id), &program("raise"), &token)
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["passed"], 0);
    assert_eq!(res.body["results"][0]["status"], "runtime_error");
    assert!(res.body["results"][0]["stderr"].as_str().unwrap().contains("ValueError"));
    assert!(res.body["results"][1]["stderr"].is_null());
}

#[tokio::test]
async fn problem_without_test_cases_rejects_submissions() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_problem(&admin, "Empty").await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(id), &program("sum"), &token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(app.judge.submissions(), 0);
}

#[tokio::test]
async fn submitting_to_missing_problem_is_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(4242), &program("sum"), &token)
        .await;

    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn list_shows_only_own_submissions_newest_first() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let asha = app.create_authenticated_user("asha@example.com").await;
    let ravi = app.create_authenticated_user("ravi@example.com").await;

    let first = app
        .post_with_token(&routes::problem_submissions(id), &program("print(3)"), &asha)
        .await
        .id();
    let second = app
        .post_with_token(&routes::problem_submissions(id), &program("sum"), &asha)
        .await
        .id();
    app.post_with_token(&routes::problem_submissions(id), &program("sum"), &ravi)
        .await;

    let res = app.get_with_token(&routes::problem_submissions(id), &asha).await;

    assert_eq!(res.status, 200);
    let ids: Vec<i64> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(second), i64::from(first)]);
}

#[tokio::test]
async fn other_users_submission_is_hidden_unless_privileged() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let asha = app.create_authenticated_user("asha@example.com").await;
    let ravi = app.create_authenticated_user("ravi@example.com").await;

    let sub = app
        .post_with_token(&routes::problem_submissions(id), &program("sum"), &asha)
        .await
        .id();

    let res = app.get_with_token(&routes::submission(sub), &asha).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["source_code"], "sum");

    let res = app.get_with_token(&routes::submission(sub), &ravi).await;
    assert_eq!(res.status, 404);

    let res = app.get_with_token(&routes::submission(sub), &admin).await;
    assert_eq!(res.status, 200);
}

#[tokio::test]
async fn judge_timeout_stores_nothing() {
    let app = TestApp::spawn().await;
    let admin = app.create_user_with_role("admin@example.com", "admin").await;
    let id = app.create_sum_problem(&admin).await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(&routes::problem_submissions(id), &program("loop forever"), &token)
        .await;
    assert_eq!(res.status, 504);

    let res = app.get_with_token(&routes::problem_submissions(id), &token).await;
    assert_eq!(res.body, json!([]));
    let me = app.get_with_token(routes::USERS_ME, &token).await;
    assert_eq!(me.body["progress"]["submissions_count"], 0);
}
