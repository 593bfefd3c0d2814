//! In-memory task table keyed by `(owner, task)`.
//!
//! The [`TaskTable`] is the durable collaborator behind the HTTP routes:
//! per-owner rows in insertion order, upsert by task ID, and a per-owner
//! capacity cap that rejects new rows once reached.

use std::collections::HashMap;

use tokio::sync::RwLock;

use taskdeck_proto::task::{MAX_TASKS_PER_USER, OwnerId, Task, TaskId, TaskPatch};

/// Errors produced by table operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    /// The owner already holds the maximum number of tasks.
    #[error("task limit of {limit} reached for this user")]
    CapacityExceeded {
        /// The configured per-owner limit.
        limit: usize,
    },
    /// No row matched the `(owner, task)` key.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Per-owner task rows with a configurable capacity cap.
///
/// Thread-safe via [`RwLock`]. Rows for each owner keep insertion order,
/// which matches creation order since task IDs are assigned at insert time.
pub struct TaskTable {
    rows: RwLock<HashMap<OwnerId, Vec<Task>>>,
    max_tasks_per_owner: usize,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTable {
    /// Creates an empty table with the default per-owner capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_tasks(MAX_TASKS_PER_USER)
    }

    /// Creates an empty table with a custom per-owner capacity.
    #[must_use]
    pub fn with_max_tasks(max_tasks_per_owner: usize) -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            max_tasks_per_owner,
        }
    }

    /// Inserts or replaces a task row.
    ///
    /// A row with the same `(owner, task)` key is replaced in place; a new
    /// key is appended, preserving insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityExceeded`] when inserting a new key
    /// would push the owner past the capacity cap. Replacement of an
    /// existing row never fails.
    pub async fn put(&self, task: Task) -> Result<(), TableError> {
        let mut rows = self.rows.write().await;
        let owner_rows = rows.entry(task.owner_id.clone()).or_default();
        if let Some(existing) = owner_rows.iter_mut().find(|t| t.task_id == task.task_id) {
            *existing = task;
            return Ok(());
        }
        if owner_rows.len() >= self.max_tasks_per_owner {
            return Err(TableError::CapacityExceeded {
                limit: self.max_tasks_per_owner,
            });
        }
        owner_rows.push(task);
        Ok(())
    }

    /// Returns all of an owner's tasks in insertion order.
    ///
    /// Returns an empty vec (never an error) for an unknown owner.
    pub async fn query(&self, owner: &OwnerId) -> Vec<Task> {
        let rows = self.rows.read().await;
        rows.get(owner).cloned().unwrap_or_default()
    }

    /// Applies a patch to an existing row and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotFound`] if no row matches the key.
    pub async fn update(
        &self,
        owner: &OwnerId,
        task_id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<Task, TableError> {
        let mut rows = self.rows.write().await;
        let task = rows
            .get_mut(owner)
            .and_then(|owner_rows| owner_rows.iter_mut().find(|t| &t.task_id == task_id))
            .ok_or_else(|| TableError::NotFound(task_id.clone()))?;
        patch.apply_to(task);
        Ok(task.clone())
    }

    /// Deletes a row, returning whether it existed.
    ///
    /// Deleting an absent key is not an error.
    pub async fn delete(&self, owner: &OwnerId, task_id: &TaskId) -> bool {
        let mut rows = self.rows.write().await;
        let Some(owner_rows) = rows.get_mut(owner) else {
            return false;
        };
        let before = owner_rows.len();
        owner_rows.retain(|t| &t.task_id != task_id);
        owner_rows.len() < before
    }

    /// Returns the number of tasks currently stored for an owner.
    pub async fn task_count(&self, owner: &OwnerId) -> usize {
        let rows = self.rows.read().await;
        rows.get(owner).map_or(0, Vec::len)
    }
}
