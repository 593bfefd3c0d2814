//! Integration tests for the task store's raw HTTP surface.
//!
//! Exercises the route contract directly with an HTTP client: status codes,
//! error bodies, ID assignment, and idempotent deletes.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::{Value, json};

use taskdeck_server::api::{AppState, start_server, start_server_with_state};
use taskdeck_server::table::TaskTable;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts a default store and returns its base URL.
async fn start_store() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = start_server("127.0.0.1:0").await.expect("start task store");
    (format!("http://{addr}"), handle)
}

/// POSTs a JSON body and returns `(status, parsed body)`.
async fn post(base: &str, path: &str, body: &Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .json(body)
        .send()
        .await
        .expect("request should reach the store");
    let status = response.status().as_u16();
    let body: Value = response.json().await.expect("JSON body");
    (status, body)
}

fn create_body(owner: &str, name: &str) -> Value {
    json!({
        "ownerId": owner,
        "name": name,
        "description": "",
        "dueDate": "2026-09-01",
        "repeat": "weekly",
    })
}

// ---------------------------------------------------------------------------
// Route contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_assigns_id_and_echoes_item() {
    let (base, _store) = start_store().await;
    let (status, body) = post(&base, "/tasks/create-task", &create_body("alice", "Buy groceries")).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Task created");
    assert_eq!(body["item"]["ownerId"], "alice");
    assert_eq!(body["item"]["name"], "Buy groceries");
    assert!(body["item"]["taskId"].is_string(), "server must assign taskId");
}

#[tokio::test]
async fn create_preserves_explicit_task_id() {
    let (base, _store) = start_store().await;
    let pinned = uuid_string();
    let mut body = create_body("alice", "Pinned");
    body["taskId"] = json!(pinned);

    let (status, response) = post(&base, "/tasks/create-task", &body).await;
    assert_eq!(status, 200);
    assert_eq!(response["item"]["taskId"], pinned);
}

#[tokio::test]
async fn create_empty_name_is_unprocessable() {
    let (base, _store) = start_store().await;
    let (status, body) = post(&base, "/tasks/create-task", &create_body("alice", "")).await;

    assert_eq!(status, 422);
    assert_eq!(body["error"], "task name cannot be empty");
}

#[tokio::test]
async fn create_missing_due_date_is_unprocessable() {
    let (base, _store) = start_store().await;
    let body = json!({
        "ownerId": "alice",
        "name": "No due date",
        "repeat": "daily",
    });
    let (status, response) = post(&base, "/tasks/create-task", &body).await;

    assert_eq!(status, 422);
    assert_eq!(response["error"], "task due date is required");
}

#[tokio::test]
async fn get_all_returns_empty_array_for_unknown_owner() {
    let (base, _store) = start_store().await;
    let (status, body) = post(&base, "/tasks/get-all-tasks", &json!({"ownerId": "nobody"})).await;

    assert_eq!(status, 200);
    assert_eq!(body["tasks"], json!([]));
}

#[tokio::test]
async fn update_absent_task_is_not_found() {
    let (base, _store) = start_store().await;
    let body = json!({
        "ownerId": "alice",
        "taskId": uuid_string(),
        "name": "Renamed",
    });
    let (status, response) = post(&base, "/tasks/update-task", &body).await;

    assert_eq!(status, 404);
    assert!(response["error"].as_str().unwrap().starts_with("task not found"));
}

#[tokio::test]
async fn update_patches_only_named_fields() {
    let (base, _store) = start_store().await;
    let mut create = create_body("alice", "Original");
    create["description"] = json!("keep me");
    let (_, created) = post(&base, "/tasks/create-task", &create).await;
    let task_id = created["item"]["taskId"].clone();

    let (status, updated) = post(
        &base,
        "/tasks/update-task",
        &json!({"ownerId": "alice", "taskId": task_id, "name": "Renamed"}),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(updated["item"]["name"], "Renamed");
    assert_eq!(updated["item"]["description"], "keep me");
    assert_eq!(updated["item"]["repeat"], "weekly");
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (base, _store) = start_store().await;
    let (_, created) = post(&base, "/tasks/create-task", &create_body("alice", "Doomed")).await;
    let task_id = created["item"]["taskId"].clone();
    let body = json!({"ownerId": "alice", "taskId": task_id});

    let (first, _) = post(&base, "/tasks/delete-task", &body).await;
    let (second, response) = post(&base, "/tasks/delete-task", &body).await;

    assert_eq!(first, 200);
    assert_eq!(second, 200, "deleting an absent key is not an error");
    assert_eq!(response["message"], "Task deleted");
}

#[tokio::test]
async fn capacity_conflict_returns_409() {
    let state = Arc::new(AppState::new(TaskTable::with_max_tasks(1)));
    let (addr, _store) = start_server_with_state("127.0.0.1:0", state)
        .await
        .expect("start task store");
    let base = format!("http://{addr}");

    let (first, _) = post(&base, "/tasks/create-task", &create_body("alice", "Fits")).await;
    let (second, body) = post(&base, "/tasks/create-task", &create_body("alice", "Rejected")).await;

    assert_eq!(first, 200);
    assert_eq!(second, 409);
    assert_eq!(body["error"], "task limit of 1 reached for this user");
}

#[tokio::test]
async fn unknown_route_is_bad_request() {
    let (base, _store) = start_store().await;
    let (status, body) = post(&base, "/tasks/rename-everything", &json!({})).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "unknown route");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (base, _store) = start_store().await;
    let response = reqwest::Client::new()
        .post(format!("{base}/tasks/create-task"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request should reach the store");
    assert!(response.status().is_client_error());
}

/// A fresh UUID string for pinned-ID and absent-key tests.
fn uuid_string() -> String {
    // The proto TaskId serializes as a plain UUID string.
    serde_json::to_value(taskdeck_proto::task::TaskId::new())
        .expect("serialize task id")
        .as_str()
        .expect("string form")
        .to_string()
}
