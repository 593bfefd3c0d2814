//! Integration tests: the client collection manager driving a live
//! in-process task store over HTTP.
//!
//! Covers the end-to-end create/load/update/delete flow, filter and search
//! against stored data, owner isolation, and capacity enforcement on both
//! sides of the wire.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use url::Url;

use taskdeck::gateway::HttpTaskGateway;
use taskdeck::tasks::{RepeatFilter, TaskCollectionManager, TaskListError};
use taskdeck_proto::task::{OwnerId, Repeat, TaskDraft, TaskPatch};
use taskdeck_server::api::{AppState, start_server, start_server_with_state};
use taskdeck_server::table::TaskTable;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Starts an in-process store on an OS-assigned port.
async fn start_store() -> (Url, tokio::task::JoinHandle<()>) {
    let (addr, handle) = start_server("127.0.0.1:0").await.expect("start task store");
    let url = Url::parse(&format!("http://{addr}")).expect("valid store url");
    (url, handle)
}

/// Starts a store whose table caps each owner at `max_tasks`.
async fn start_capped_store(max_tasks: usize) -> (Url, tokio::task::JoinHandle<()>) {
    let state = Arc::new(AppState::new(TaskTable::with_max_tasks(max_tasks)));
    let (addr, handle) = start_server_with_state("127.0.0.1:0", state)
        .await
        .expect("start task store");
    let url = Url::parse(&format!("http://{addr}")).expect("valid store url");
    (url, handle)
}

/// A manager with an HTTP gateway pointed at the store.
fn manager_for(url: &Url) -> TaskCollectionManager {
    let gateway = Arc::new(HttpTaskGateway::with_timeout(url, Duration::from_secs(5)));
    TaskCollectionManager::new(gateway)
}

fn owner(id: &str) -> OwnerId {
    OwnerId::new(id)
}

fn draft(name: &str, repeat: Repeat, description: &str) -> TaskDraft {
    TaskDraft {
        name: name.to_string(),
        description: description.to_string(),
        due_date: NaiveDate::from_ymd_opt(2026, 9, 1),
        repeat,
        ..TaskDraft::default()
    }
}

// ---------------------------------------------------------------------------
// End-to-end CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn load_create_reload_round_trip() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");

    let mgr = manager_for(&url);
    mgr.load(&alice).await.expect("initial load");
    assert!(mgr.is_empty());

    let first = mgr
        .create(&alice, draft("First", Repeat::Daily, ""))
        .await
        .expect("create first");
    mgr.create(&alice, draft("Second", Repeat::Weekly, ""))
        .await
        .expect("create second");
    assert_eq!(mgr.len(), 2);

    // A fresh session sees the durable state in creation order.
    let fresh = manager_for(&url);
    fresh.load(&alice).await.expect("reload");
    let tasks = fresh.tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].task_id, first.task_id);
    assert_eq!(tasks[0].name, "First");
    assert_eq!(tasks[1].name, "Second");
}

#[tokio::test]
async fn filter_and_search_over_stored_tasks() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");
    let mgr = manager_for(&url);

    mgr.create(&alice, draft("A", Repeat::Daily, "")).await.expect("create A");
    let b = mgr
        .create(&alice, draft("B", Repeat::Weekly, ""))
        .await
        .expect("create B");
    let c = mgr
        .create(&alice, draft("C zzz", Repeat::Weekly, ""))
        .await
        .expect("create C");

    mgr.set_filter_repeat(RepeatFilter::Only(Repeat::Weekly));
    let view = mgr.filtered_view();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].task_id, b.task_id);
    assert_eq!(view[1].task_id, c.task_id);

    mgr.set_search_query("ZZZ");
    let view = mgr.filtered_view();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].task_id, c.task_id);
}

#[tokio::test]
async fn update_persists_to_the_store() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");
    let mgr = manager_for(&url);

    let task = mgr
        .create(&alice, draft("Original", Repeat::Weekly, "keep this description"))
        .await
        .expect("create");

    let patch = TaskPatch {
        name: Some("Renamed".to_string()),
        repeat: Some(Repeat::Yearly),
        ..TaskPatch::default()
    };
    mgr.update(&alice, &task.task_id, patch).await.expect("update");
    assert_eq!(mgr.tasks()[0].name, "Renamed");

    // Fields outside the patch survive on the durable record too.
    let fresh = manager_for(&url);
    fresh.load(&alice).await.expect("reload");
    let tasks = fresh.tasks();
    assert_eq!(tasks[0].name, "Renamed");
    assert_eq!(tasks[0].repeat, Repeat::Yearly);
    assert_eq!(tasks[0].description, "keep this description");
}

#[tokio::test]
async fn delete_persists_to_the_store() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");
    let mgr = manager_for(&url);

    let doomed = mgr
        .create(&alice, draft("Doomed", Repeat::Daily, ""))
        .await
        .expect("create doomed");
    mgr.create(&alice, draft("Survivor", Repeat::Daily, ""))
        .await
        .expect("create survivor");

    mgr.delete(&alice, &doomed.task_id).await.expect("delete");
    assert!(!mgr.filtered_view().iter().any(|t| t.task_id == doomed.task_id));

    let fresh = manager_for(&url);
    fresh.load(&alice).await.expect("reload");
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh.tasks()[0].name, "Survivor");
}

#[tokio::test]
async fn updating_a_remotely_deleted_task_reports_not_found() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");

    let mgr = manager_for(&url);
    let task = mgr
        .create(&alice, draft("Contested", Repeat::Daily, ""))
        .await
        .expect("create");

    // Another session deletes the task out from under this one.
    let other = manager_for(&url);
    other.load(&alice).await.expect("load");
    other.delete(&alice, &task.task_id).await.expect("delete");

    let err = mgr
        .update(
            &alice,
            &task.task_id,
            TaskPatch {
                name: Some("Too late".to_string()),
                ..TaskPatch::default()
            },
        )
        .await
        .expect_err("update should fail");
    assert_eq!(err, TaskListError::NotFound(task.task_id));
}

// ---------------------------------------------------------------------------
// Ownership and capacity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn owners_are_isolated() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");
    let bob = owner("bob@example.com");

    let alice_mgr = manager_for(&url);
    alice_mgr.create(&alice, draft("Hers", Repeat::Daily, "")).await.expect("create");
    alice_mgr
        .create(&alice, draft("Also hers", Repeat::Daily, ""))
        .await
        .expect("create");

    let bob_mgr = manager_for(&url);
    bob_mgr.create(&bob, draft("His", Repeat::Weekly, "")).await.expect("create");

    let fresh = manager_for(&url);
    fresh.load(&alice).await.expect("load alice");
    assert_eq!(fresh.len(), 2);
    fresh.load(&bob).await.expect("load bob");
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh.tasks()[0].name, "His");
}

#[tokio::test]
async fn client_capacity_blocks_before_any_request() {
    let (url, _store) = start_store().await;
    let alice = owner("alice@example.com");

    let gateway = Arc::new(HttpTaskGateway::with_timeout(&url, Duration::from_secs(5)));
    let mgr = TaskCollectionManager::with_capacity(gateway, 2);
    mgr.create(&alice, draft("One", Repeat::Daily, "")).await.expect("create");
    mgr.create(&alice, draft("Two", Repeat::Daily, "")).await.expect("create");

    let err = mgr
        .create(&alice, draft("Three", Repeat::Daily, ""))
        .await
        .expect_err("capacity should block");
    assert_eq!(err, TaskListError::CapacityExceeded { limit: 2 });

    // The store never saw a third task.
    let fresh = manager_for(&url);
    fresh.load(&alice).await.expect("reload");
    assert_eq!(fresh.len(), 2);
}

#[tokio::test]
async fn store_side_capacity_surfaces_as_create_failure() {
    let (url, _store) = start_capped_store(1).await;
    let alice = owner("alice@example.com");
    let mgr = manager_for(&url);

    mgr.create(&alice, draft("Fits", Repeat::Daily, "")).await.expect("create");
    let err = mgr
        .create(&alice, draft("Rejected", Repeat::Daily, ""))
        .await
        .expect_err("store should reject");
    assert!(matches!(&err, TaskListError::CreateFailed(_)));
    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.last_error(), Some(err));
}
