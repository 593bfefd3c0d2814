//! Remote task store boundary.
//!
//! [`RemoteTaskGateway`] is the contract the collection manager calls for
//! durable reads and writes. The store itself is opaque beyond this trait;
//! failures surface as [`RemoteError`] values the manager turns into
//! reported outcomes, never panics.

pub mod http;

pub use http::HttpTaskGateway;

use async_trait::async_trait;

use taskdeck_proto::task::{OwnerId, Task, TaskDraft, TaskId, TaskPatch};

/// Failures crossing the remote store boundary.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The store could not be reached (connect, DNS, timeout).
    #[error("remote store unreachable: {0}")]
    Unreachable(String),
    /// The store answered with a non-success status.
    #[error("remote store rejected the request (status {status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error body from the store, or a generic reason.
        message: String,
    },
    /// The addressed task does not exist in the store.
    #[error("task does not exist in the remote store")]
    NotFound,
    /// The store's response could not be decoded.
    #[error("malformed remote response: {0}")]
    Codec(String),
}

/// The four durable operations the collection manager depends on.
///
/// Implementations must be shareable across tasks (`Send + Sync`); the
/// manager holds one behind an `Arc` and may have several calls in flight.
#[async_trait]
pub trait RemoteTaskGateway: Send + Sync {
    /// Stores a new task and returns the record with its assigned ID.
    async fn create(&self, owner: &OwnerId, draft: &TaskDraft) -> Result<Task, RemoteError>;

    /// Fetches the owner's full task set, oldest first.
    ///
    /// An owner with no tasks yields an empty vec, never an error.
    async fn list_all(&self, owner: &OwnerId) -> Result<Vec<Task>, RemoteError>;

    /// Applies a patch to an existing task.
    ///
    /// Fails with [`RemoteError::NotFound`] when the task is absent.
    async fn update(
        &self,
        owner: &OwnerId,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<(), RemoteError>;

    /// Deletes a task. Deleting an absent key is not an error.
    async fn delete(&self, owner: &OwnerId, task_id: &TaskId) -> Result<(), RemoteError>;
}
