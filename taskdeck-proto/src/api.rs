//! HTTP API contract between the `TaskDeck` client and the task store.
//!
//! All four operations are JSON-over-POST; request and response bodies are
//! defined here so client and server cannot drift apart. Error responses
//! carry a single `{"error": "..."}` body regardless of status code.

use serde::{Deserialize, Serialize};

use crate::task::{OwnerId, Task, TaskDraft, TaskId, TaskPatch};

/// Route for creating a task.
pub const CREATE_TASK_PATH: &str = "/tasks/create-task";

/// Route for fetching an owner's full task set.
pub const GET_ALL_TASKS_PATH: &str = "/tasks/get-all-tasks";

/// Route for updating fields of an existing task.
pub const UPDATE_TASK_PATH: &str = "/tasks/update-task";

/// Route for deleting a task.
pub const DELETE_TASK_PATH: &str = "/tasks/delete-task";

/// Request body for [`CREATE_TASK_PATH`].
///
/// The draft fields are flattened into the body alongside the owner, so the
/// wire shape is `{ownerId, name, dueDate, repeat, ...}`. A caller may pin
/// an explicit `taskId`; otherwise the server assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Owner the new task belongs to.
    pub owner_id: OwnerId,
    /// Optional caller-supplied task ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// The task fields.
    #[serde(flatten)]
    pub draft: TaskDraft,
}

/// Response body for [`CREATE_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The stored record, carrying the server-assigned `taskId`.
    pub item: Task,
}

/// Request body for [`GET_ALL_TASKS_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksRequest {
    /// Owner whose task set is requested.
    pub owner_id: OwnerId,
}

/// Response body for [`GET_ALL_TASKS_PATH`].
///
/// `tasks` is empty (never absent) when the owner has no tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTasksResponse {
    /// All of the owner's tasks, in creation order.
    pub tasks: Vec<Task>,
}

/// Request body for [`UPDATE_TASK_PATH`].
///
/// Patch fields are flattened alongside the key, so the wire shape is
/// `{ownerId, taskId, ...changed fields}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// Owner of the task being updated.
    pub owner_id: OwnerId,
    /// Which task to update.
    pub task_id: TaskId,
    /// The fields to change.
    #[serde(flatten)]
    pub patch: TaskPatch,
}

/// Response body for [`UPDATE_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The record after the patch was applied.
    pub item: Task,
}

/// Request body for [`DELETE_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    /// Owner of the task being deleted.
    pub owner_id: OwnerId,
    /// Which task to delete. Deleting an absent key is not an error.
    pub task_id: TaskId,
}

/// Response body for [`DELETE_TASK_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Error body returned with any non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    pub error: String,
}
