use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn languages_are_listed() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app.get_with_token(routes::LANGUAGES, &token).await;

    assert_eq!(res.status, 200);
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["name"].as_str())
        .collect();
    assert!(names.contains(&"python"));
    assert!(names.contains(&"cpp"));
}

#[tokio::test]
async fn run_returns_program_output() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::RUN,
            &json!({"language": "python", "source_code": "print(hello)"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["status"], "accepted");
    assert_eq!(res.body["stdout"], "hello\n");
    assert_eq!(res.body["time_ms"], 4.0);
}

#[tokio::test]
async fn run_accepts_language_aliases() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::RUN,
            &json!({"language": "Python3", "source_code": "echo", "stdin": "abc"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["stdout"], "abc");
}

#[tokio::test]
async fn unsupported_language_is_rejected_before_reaching_the_judge() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::RUN,
            &json!({"language": "cobol", "source_code": "DISPLAY 'HI'"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    assert_eq!(app.judge.submissions(), 0);
}

#[tokio::test]
async fn program_that_never_finishes_times_out() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::RUN,
            &json!({"language": "python", "source_code": "loop forever"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 504);
    assert_eq!(res.body["code"], "UPSTREAM_TIMEOUT");
}

#[tokio::test]
async fn execute_compares_outputs_loosely() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::EXECUTE,
            &json!({
                "language": "python",
                "source_code": "sum",
                "test_cases": [
                    {"input": "1 2", "expected_output": 3},
                    {"input": "2 2", "expected_output": "4"},
                    {"input": "5 5", "expected_output": "11"},
                ],
            }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["summary"], json!({"total": 3, "passed": 2, "failed": 1}));
    assert_eq!(res.body["results"][0]["passed"], true);
    assert_eq!(res.body["results"][2]["passed"], false);
    assert_eq!(res.body["results"][2]["index"], 2);
}

#[tokio::test]
async fn compilation_error_is_submitted_once() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::EXECUTE,
            &json!({
                "language": "python",
                "source_code": "syntax error",
                "test_cases": [
                    {"input": "1", "expected_output": "1"},
                    {"input": "2", "expected_output": "2"},
                    {"input": "3", "expected_output": "3"},
                ],
            }),
            &token,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(app.judge.submissions(), 1);
    assert_eq!(res.body["summary"]["failed"], 3);
    for result in res.body["results"].as_array().unwrap() {
        assert_eq!(result["result"]["status"], "compilation_error");
        assert!(
            result["result"]["compile_output"]
                .as_str()
                .unwrap()
                .contains("SyntaxError")
        );
    }
}

#[tokio::test]
async fn execute_requires_at_least_one_case() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::EXECUTE,
            &json!({"language": "python", "source_code": "sum", "test_cases": []}),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn structured_expected_output_is_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("asha@example.com").await;

    let res = app
        .post_with_token(
            routes::EXECUTE,
            &json!({
                "language": "python",
                "source_code": "sum",
                "test_cases": [{"input": "1", "expected_output": [1]}],
            }),
            &token,
        )
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn execution_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::RUN,
            &json!({"language": "python", "source_code": "print(hi)"}),
        )
        .await;

    assert_eq!(res.status, 401);
}
