use std::sync::Arc;

use api::{router, ApiConfig, AppState, Envelope};
use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use db::{DbConfig, Todo, TodoRepository};
use http_body_util::BodyExt;
use runner::{mock::MockRunner, ExecutionError, ShellRunner};
use serde_json::Value;
use tower::ServiceExt;

fn app_with(mock: &MockRunner) -> Router {
    let repo = TodoRepository::new(DbConfig::new("todos.db"), Arc::new(mock.clone()));
    router(AppState::new(repo), &ApiConfig::default())
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn message(value: &Value) -> &str {
    value["message"].as_str().unwrap()
}

// --- list ---

#[tokio::test]
async fn list_wraps_todos_in_envelope() {
    let mock = MockRunner::strict();
    mock.push_stdout(r#"[{"id":1,"text":"buy milk"},{"id":"2","text":"walk dog"}]"#);

    let resp = app_with(&mock).oneshot(get("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope: Envelope<Vec<Todo>> = body_json(resp).await;
    assert!(envelope.success);
    assert_eq!(
        envelope.data.unwrap(),
        vec![
            Todo { id: 1, text: "buy milk".into() },
            Todo { id: 2, text: "walk dog".into() },
        ]
    );
}

#[tokio::test]
async fn list_empty_is_success() {
    let mock = MockRunner::strict();
    mock.push_stdout("");

    let resp = app_with(&mock).oneshot(get("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let value: Value = body_json(resp).await;
    assert_eq!(value, serde_json::json!({ "success": true, "data": [] }));
}

#[tokio::test]
async fn list_engine_failure_is_500_without_engine_text() {
    let mock = MockRunner::strict();
    mock.push_failure(1, "Error: no such table: todos");

    let resp = app_with(&mock).oneshot(get("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = body_json(resp).await;
    assert_eq!(value["success"], false);
    assert_eq!(message(&value), "Failed to fetch todos");
    assert!(!value.to_string().contains("no such table"));
}

#[tokio::test]
async fn list_malformed_output_is_500() {
    let mock = MockRunner::strict();
    mock.push_stdout("not json");

    let resp = app_with(&mock).oneshot(get("/todos")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn list_timeout_is_500() {
    let mock = MockRunner::strict();
    mock.push_error(ExecutionError::TimedOut { timeout_ms: 10_000 });

    let resp = app_with(&mock).oneshot(get("/todos")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// --- create ---

#[tokio::test]
async fn create_returns_201_and_trims() {
    let mock = MockRunner::strict();
    mock.push_stdout("");

    let resp = app_with(&mock)
        .oneshot(post_json("/todos", r#"{"todo":"  buy milk  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let value: Value = body_json(resp).await;
    assert_eq!(value["success"], true);
    assert_eq!(message(&value), "Todo created successfully");
    assert_eq!(
        mock.last_input().as_deref(),
        Some("INSERT INTO todos(todo) VALUES ('buy milk');")
    );
}

#[tokio::test]
async fn blank_todos_never_reach_the_repository() {
    for body in [r#"{"todo":""}"#, r#"{"todo":"   "}"#, r#"{}"#] {
        let mock = MockRunner::strict();

        let resp = app_with(&mock).oneshot(post_json("/todos", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");
        let value: Value = body_json(resp).await;
        assert_eq!(value["success"], false);
        assert_eq!(message(&value), "Todo cannot be empty");
        assert_eq!(mock.call_count(), 0);
    }
}

#[tokio::test]
async fn unreadable_body_is_400() {
    let mock = MockRunner::strict();

    let resp = app_with(&mock)
        .oneshot(post_json("/todos", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let value: Value = body_json(resp).await;
    assert_eq!(message(&value), "Invalid request body");
}

#[tokio::test]
async fn nul_in_text_is_400() {
    let mock = MockRunner::strict();

    let resp = app_with(&mock)
        .oneshot(post_json("/todos", r#"{"todo":"a\u0000b"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn create_engine_failure_is_500() {
    let mock = MockRunner::strict();
    mock.push_failure(0, "Error: attempt to write a readonly database");

    let resp = app_with(&mock)
        .oneshot(post_json("/todos", r#"{"todo":"x"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = body_json(resp).await;
    assert_eq!(message(&value), "Failed to create todo");
}

// --- delete ---

#[tokio::test]
async fn delete_returns_200() {
    let mock = MockRunner::strict();
    mock.push_stdout("");

    let resp = app_with(&mock).oneshot(delete("/todos/5")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let value: Value = body_json(resp).await;
    assert_eq!(message(&value), "Todo deleted successfully");
    assert_eq!(
        mock.last_input().as_deref(),
        Some("DELETE FROM todos WHERE id = 5;")
    );
}

#[tokio::test]
async fn bad_ids_are_400() {
    for uri in ["/todos/abc", "/todos/0", "/todos/-3", "/todos/1.5"] {
        let mock = MockRunner::strict();

        let resp = app_with(&mock).oneshot(delete(uri)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "uri {uri}");
        let value: Value = body_json(resp).await;
        assert_eq!(message(&value), "Invalid todo id");
        assert_eq!(mock.call_count(), 0);
    }
}

#[tokio::test]
async fn missing_id_is_400() {
    let mock = MockRunner::strict();

    let resp = app_with(&mock).oneshot(delete("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let value: Value = body_json(resp).await;
    assert_eq!(message(&value), "Todo id is required");
}

#[tokio::test]
async fn delete_engine_failure_is_500() {
    let mock = MockRunner::strict();
    mock.push_failure(5, "Error: database is locked");

    let resp = app_with(&mock).oneshot(delete("/todos/1")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = body_json(resp).await;
    assert_eq!(message(&value), "Failed to delete todo");
}

// --- boundary ---

#[tokio::test]
async fn handler_panic_becomes_server_error() {
    // A strict mock with nothing queued panics inside the handler.
    let mock = MockRunner::strict();

    let resp = app_with(&mock).oneshot(get("/todos")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = body_json(resp).await;
    assert_eq!(value, serde_json::json!({ "success": false, "message": "Server error" }));
}

#[tokio::test]
async fn static_client_is_served_for_other_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>todos</h1>").unwrap();

    let repo = TodoRepository::new(DbConfig::new("todos.db"), Arc::new(MockRunner::strict()));
    let config = ApiConfig {
        static_dir: Some(dir.path().to_path_buf()),
        cors: false,
    };
    let app = router(AppState::new(repo), &config);

    let resp = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<h1>todos</h1>");

    let resp = app.oneshot(get("/missing.js")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle against a real engine ---

fn sqlite_available() -> bool {
    std::process::Command::new("sqlite3")
        .args(["-json", ":memory:", "SELECT 1 AS x;"])
        .output()
        .map(|out| out.status.success() && String::from_utf8_lossy(&out.stdout).contains("\"x\""))
        .unwrap_or(false)
}

#[tokio::test]
async fn create_list_delete_scenario() {
    if !sqlite_available() {
        eprintln!("sqlite3 with -json not found; skipping");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let repo = TodoRepository::new(
        DbConfig::new(dir.path().join("todos.db")),
        Arc::new(ShellRunner::default()),
    );
    repo.init_schema().await.unwrap();
    let app = router(AppState::new(repo), &ApiConfig::default());

    let resp = app
        .clone()
        .oneshot(post_json("/todos", r#"{"todo":"buy milk"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .clone()
        .oneshot(post_json("/todos", r#"{"todo":"O'Brien's task"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.clone().oneshot(get("/todos")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let todos = body_json::<Envelope<Vec<Todo>>>(resp).await.data.unwrap();
    let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["buy milk", "O'Brien's task"]);

    for todo in &todos {
        let resp = app
            .clone()
            .oneshot(delete(&format!("/todos/{}", todo.id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app.oneshot(get("/todos")).await.unwrap();
    let todos = body_json::<Envelope<Vec<Todo>>>(resp).await.data.unwrap();
    assert!(todos.is_empty());
}
