//! Client-side task collection management.
//!
//! The [`TaskCollectionManager`] owns the in-memory task list the UI
//! renders from, keeps it consistent with the remote store, and enforces
//! the per-owner capacity limit.

pub mod manager;

pub use manager::{RepeatFilter, TaskCollectionManager};

use thiserror::Error;

use taskdeck_proto::task::{TaskId, ValidationError};

use crate::gateway::RemoteError;

/// Reported outcomes of task collection operations.
///
/// Each is terminal: nothing is retried automatically. User-input errors
/// (`Validation`, `CapacityExceeded`, `Unauthenticated`, `NotFound`) are
/// detected locally before any remote call; the `*Failed` variants wrap the
/// underlying remote failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskListError {
    /// No owner is signed in for the operation.
    #[error("not signed in")]
    Unauthenticated,
    /// The task fields failed boundary validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The owner already holds the maximum number of tasks.
    #[error("task limit of {limit} reached")]
    CapacityExceeded {
        /// The configured per-owner limit.
        limit: usize,
    },
    /// No task with the given ID is in the collection.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// Fetching the task set from the remote store failed.
    #[error("failed to load tasks: {0}")]
    LoadFailed(RemoteError),
    /// Storing a new task remotely failed.
    #[error("failed to create task: {0}")]
    CreateFailed(RemoteError),
    /// Updating a task remotely failed.
    #[error("failed to update task: {0}")]
    UpdateFailed(RemoteError),
    /// Deleting a task remotely failed.
    #[error("failed to delete task: {0}")]
    DeleteFailed(RemoteError),
}
