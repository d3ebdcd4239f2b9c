//! In-process stand-in for the Judge0 API.
//!
//! Programs are interpreted from their source text:
//! * contains `syntax error` -> compilation error
//! * contains `raise` -> runtime error
//! * contains `loop forever` -> never leaves the queue
//! * contains `sum` -> prints the sum of the integers on stdin
//! * `print(<text>)` -> prints `<text>`
//! * anything else echoes stdin
//!
//! Every submission reports "Processing" on its first poll.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

struct FakeRun {
    source: String,
    stdin: String,
    polls: u32,
}

#[derive(Clone, Default)]
pub struct FakeJudge {
    runs: Arc<Mutex<HashMap<String, FakeRun>>>,
    submissions: Arc<AtomicUsize>,
}

impl FakeJudge {
    /// Number of programs submitted so far.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub async fn spawn(&self) -> SocketAddr {
        let app = Router::new()
            .route("/submissions", post(submit))
            .route("/submissions/{token}", get(fetch))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake judge");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }
}

fn decode(value: &Value) -> String {
    let encoded = value.as_str().unwrap_or_default();
    String::from_utf8(STANDARD.decode(encoded).expect("fake judge expects base64")).unwrap()
}

fn encode(text: &str) -> Value {
    Value::String(STANDARD.encode(text))
}

async fn submit(State(judge): State<FakeJudge>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let token = uuid::Uuid::new_v4().to_string();
    judge.submissions.fetch_add(1, Ordering::SeqCst);
    judge.runs.lock().unwrap().insert(
        token.clone(),
        FakeRun {
            source: decode(&body["source_code"]),
            stdin: decode(&body["stdin"]),
            polls: 0,
        },
    );
    (StatusCode::CREATED, Json(json!({ "token": token })))
}

async fn fetch(
    State(judge): State<FakeJudge>,
    Path(token): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut runs = judge.runs.lock().unwrap();
    let run = runs.get_mut(&token).ok_or(StatusCode::NOT_FOUND)?;
    run.polls += 1;

    if run.source.contains("loop forever") {
        return Ok(Json(json!({ "status": { "id": 1, "description": "In Queue" } })));
    }
    if run.polls == 1 {
        return Ok(Json(json!({ "status": { "id": 2, "description": "Processing" } })));
    }

    if run.source.contains("syntax error") {
        return Ok(Json(json!({
            "status": { "id": 6, "description": "Compilation Error" },
            "compile_output": encode("main.py:1: SyntaxError: invalid syntax\n"),
            "stdout": null,
            "time": null,
            "memory": null,
        })));
    }
    if run.source.contains("raise") {
        return Ok(Json(json!({
            "status": { "id": 11, "description": "Runtime Error (NZEC)" },
            "stderr": encode("Traceback: ValueError\n"),
            "time": "0.012",
            "memory": 3100,
        })));
    }

    let stdout = if run.source.contains("sum") {
        let total: i64 = run
            .stdin
            .split_whitespace()
            .filter_map(|t| t.parse::<i64>().ok())
            .sum();
        format!("{total}\n")
    } else if let Some(inner) = run
        .source
        .trim()
        .strip_prefix("print(")
        .and_then(|s| s.strip_suffix(')'))
    {
        format!("{}\n", inner.trim_matches('"'))
    } else {
        run.stdin.clone()
    };

    Ok(Json(json!({
        "status": { "id": 3, "description": "Accepted" },
        "stdout": encode(&stdout),
        "stderr": null,
        "compile_output": null,
        "time": "0.004",
        "memory": 2048,
    })))
}
