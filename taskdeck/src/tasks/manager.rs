//! Task collection manager: the in-memory source of truth for one owner's
//! task list.
//!
//! `TaskCollectionManager` mediates every task operation between the UI and
//! the remote store. Mutations are confirmation-first: nothing is added,
//! changed, or removed locally until the remote call has succeeded, so the
//! list never shows a task that does not exist durably. State lives behind
//! a mutex that is never held across an await; preconditions are checked
//! and the owner plus load sequence captured before the remote call, and
//! each completion re-checks them before applying. Completions for a stale
//! load or an owner that is no longer active are discarded.

use std::sync::Arc;

use parking_lot::Mutex;

use taskdeck_proto::task::{
    MAX_TASKS_PER_USER, OwnerId, Repeat, Task, TaskDraft, TaskId, TaskPatch,
};

use super::TaskListError;
use crate::gateway::{RemoteError, RemoteTaskGateway};

/// Which repeat cadences the filtered view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RepeatFilter {
    /// Show every cadence.
    #[default]
    All,
    /// Show only tasks with the given cadence.
    Only(Repeat),
}

impl RepeatFilter {
    /// Returns whether a task with the given cadence passes the filter.
    #[must_use]
    pub fn matches(self, repeat: Repeat) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == repeat,
        }
    }

    /// Returns the next filter in the cycle `all → daily → … → yearly → all`.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::All => Self::Only(Repeat::Daily),
            Self::Only(Repeat::Daily) => Self::Only(Repeat::Weekly),
            Self::Only(Repeat::Weekly) => Self::Only(Repeat::Monthly),
            Self::Only(Repeat::Monthly) => Self::Only(Repeat::Yearly),
            Self::Only(Repeat::Yearly) => Self::All,
        }
    }

    /// Display label for the filter.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(repeat) => repeat.as_str(),
        }
    }
}

/// Mutable collection state guarded by the manager's mutex.
struct CollectionState {
    /// The active owner; `None` until the first operation binds one.
    owner: Option<OwnerId>,
    /// Insertion-ordered task list; the display order before filtering.
    tasks: Vec<Task>,
    /// Active repeat filter.
    filter: RepeatFilter,
    /// Active case-insensitive search query.
    search: String,
    /// Number of `load` calls currently awaiting the store.
    loads_in_flight: usize,
    /// Most recent reported failure; overwritten, never queued.
    last_error: Option<TaskListError>,
    /// Sequence of the most recently issued `load`. A load completion is
    /// applied only while its captured sequence is still the latest.
    load_seq: u64,
}

impl CollectionState {
    const fn new() -> Self {
        Self {
            owner: None,
            tasks: Vec::new(),
            filter: RepeatFilter::All,
            search: String::new(),
            loads_in_flight: 0,
            last_error: None,
            load_seq: 0,
        }
    }

    /// Makes `owner` the active owner, clearing all prior state when it
    /// differs. The load sequence keeps counting so completions issued for
    /// the previous owner can never be applied.
    fn bind_owner(&mut self, owner: &OwnerId) {
        if self.owner.as_ref() == Some(owner) {
            return;
        }
        if self.owner.is_some() {
            tracing::debug!(owner = %owner, "owner changed, clearing task collection");
        }
        self.owner = Some(owner.clone());
        self.tasks.clear();
        self.filter = RepeatFilter::All;
        self.search.clear();
        self.last_error = None;
    }

    fn position(&self, task_id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.task_id == task_id)
    }
}

/// Owns the authoritative in-memory list of one owner's tasks.
///
/// Constructed explicitly around a gateway and shared by reference (or
/// `Arc`) with the UI; there is no ambient singleton. All snapshot
/// accessors return owned copies so render code never holds the lock.
pub struct TaskCollectionManager {
    gateway: Arc<dyn RemoteTaskGateway>,
    capacity: usize,
    state: Mutex<CollectionState>,
}

impl TaskCollectionManager {
    /// Creates a manager with the default capacity of
    /// [`MAX_TASKS_PER_USER`] tasks.
    #[must_use]
    pub fn new(gateway: Arc<dyn RemoteTaskGateway>) -> Self {
        Self::with_capacity(gateway, MAX_TASKS_PER_USER)
    }

    /// Creates a manager with a custom capacity limit.
    #[must_use]
    pub fn with_capacity(gateway: Arc<dyn RemoteTaskGateway>, capacity: usize) -> Self {
        Self {
            gateway,
            capacity,
            state: Mutex::new(CollectionState::new()),
        }
    }

    // -- remote operations --------------------------------------------------

    /// Fetches the owner's full task set and replaces the list wholesale.
    ///
    /// On success the previous list is discarded (no merge) and the error
    /// slot cleared. On failure the list is left untouched. A completion
    /// that is no longer the most recently issued load, or whose owner is
    /// no longer active, is discarded.
    ///
    /// # Errors
    ///
    /// [`TaskListError::Unauthenticated`] for a blank owner,
    /// [`TaskListError::LoadFailed`] when the store call fails.
    pub async fn load(&self, owner: &OwnerId) -> Result<(), TaskListError> {
        if owner.is_blank() {
            return Err(TaskListError::Unauthenticated);
        }
        let seq = {
            let mut state = self.state.lock();
            state.bind_owner(owner);
            state.loads_in_flight += 1;
            state.load_seq += 1;
            state.load_seq
        };

        let result = self.gateway.list_all(owner).await;

        let mut state = self.state.lock();
        state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
        if state.owner.as_ref() != Some(owner) {
            tracing::debug!(owner = %owner, "discarding load completion for inactive owner");
            return Ok(());
        }
        if seq != state.load_seq {
            tracing::debug!(seq, latest = state.load_seq, "discarding stale load completion");
            return Ok(());
        }
        match result {
            Ok(mut tasks) => {
                if tasks.len() > self.capacity {
                    tracing::warn!(
                        count = tasks.len(),
                        capacity = self.capacity,
                        "remote task set exceeds capacity, truncating"
                    );
                    tasks.truncate(self.capacity);
                }
                tracing::debug!(owner = %owner, count = tasks.len(), "task list loaded");
                state.tasks = tasks;
                state.last_error = None;
                Ok(())
            }
            Err(err) => {
                let err = TaskListError::LoadFailed(err);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Creates a task remotely, then appends the confirmed record.
    ///
    /// Preconditions, checked in order before any remote call: an owner is
    /// present, the collection is below capacity, and the draft validates.
    /// The server-returned record (carrying the assigned ID) is appended on
    /// success; on failure the list is unchanged.
    ///
    /// # Errors
    ///
    /// [`TaskListError::Unauthenticated`], [`TaskListError::CapacityExceeded`],
    /// [`TaskListError::Validation`], or [`TaskListError::CreateFailed`].
    pub async fn create(&self, owner: &OwnerId, draft: TaskDraft) -> Result<Task, TaskListError> {
        if owner.is_blank() {
            return Err(TaskListError::Unauthenticated);
        }
        {
            let mut state = self.state.lock();
            state.bind_owner(owner);
            if state.tasks.len() >= self.capacity {
                return Err(TaskListError::CapacityExceeded {
                    limit: self.capacity,
                });
            }
        }
        draft.validate()?;

        let created = match self.gateway.create(owner, &draft).await {
            Ok(task) => task,
            Err(err) => {
                let err = TaskListError::CreateFailed(err);
                self.state.lock().last_error = Some(err.clone());
                return Err(err);
            }
        };

        let mut state = self.state.lock();
        if state.owner.as_ref() != Some(owner) {
            tracing::debug!(owner = %owner, task = %created.task_id, "owner changed while create was in flight, not admitting task");
            return Ok(created);
        }
        if let Some(pos) = state.position(&created.task_id) {
            // Key uniqueness: a duplicate confirmation replaces, never doubles.
            state.tasks[pos] = created.clone();
        } else if state.tasks.len() >= self.capacity {
            tracing::warn!(task = %created.task_id, "capacity reached while create was in flight, not admitting task");
        } else {
            state.tasks.push(created.clone());
        }
        tracing::debug!(owner = %owner, task = %created.task_id, "task created");
        Ok(created)
    }

    /// Updates a task remotely, then merges the patch into the in-memory
    /// record (merge, not wholesale replace, so fields the patch does not
    /// name survive).
    ///
    /// The task must be present in the collection before the call; if a
    /// delete wins the race while the update is in flight, the confirmed
    /// patch is dropped rather than resurrecting the task.
    ///
    /// # Errors
    ///
    /// [`TaskListError::Unauthenticated`], [`TaskListError::NotFound`]
    /// (locally absent, or the store reports the task gone),
    /// [`TaskListError::Validation`], or [`TaskListError::UpdateFailed`].
    pub async fn update(
        &self,
        owner: &OwnerId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<(), TaskListError> {
        if owner.is_blank() {
            return Err(TaskListError::Unauthenticated);
        }
        {
            let mut state = self.state.lock();
            state.bind_owner(owner);
            if state.position(task_id).is_none() {
                return Err(TaskListError::NotFound(task_id.clone()));
            }
        }
        patch.validate()?;

        match self.gateway.update(owner, task_id, &patch).await {
            Ok(()) => {
                let mut state = self.state.lock();
                if state.owner.as_ref() != Some(owner) {
                    tracing::debug!(task = %task_id, "owner changed while update was in flight, dropping patch");
                    return Ok(());
                }
                if let Some(pos) = state.position(task_id) {
                    patch.apply_to(&mut state.tasks[pos]);
                    tracing::debug!(owner = %owner, task = %task_id, "task updated");
                } else {
                    tracing::debug!(task = %task_id, "task removed while update was in flight, dropping patch");
                }
                Ok(())
            }
            Err(RemoteError::NotFound) => {
                let err = TaskListError::NotFound(task_id.clone());
                self.state.lock().last_error = Some(err.clone());
                Err(err)
            }
            Err(err) => {
                let err = TaskListError::UpdateFailed(err);
                self.state.lock().last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Deletes a task remotely, then removes it from the list.
    ///
    /// Deleting an ID that is not in the collection is a no-op success as
    /// long as the store call itself does not error (the store treats
    /// absent keys as deletable).
    ///
    /// # Errors
    ///
    /// [`TaskListError::Unauthenticated`] or [`TaskListError::DeleteFailed`].
    pub async fn delete(&self, owner: &OwnerId, task_id: &TaskId) -> Result<(), TaskListError> {
        if owner.is_blank() {
            return Err(TaskListError::Unauthenticated);
        }
        self.state.lock().bind_owner(owner);

        match self.gateway.delete(owner, task_id).await {
            Ok(()) => {
                let mut state = self.state.lock();
                if state.owner.as_ref() != Some(owner) {
                    tracing::debug!(task = %task_id, "owner changed while delete was in flight");
                    return Ok(());
                }
                if let Some(pos) = state.position(task_id) {
                    state.tasks.remove(pos);
                    tracing::debug!(owner = %owner, task = %task_id, "task deleted");
                }
                Ok(())
            }
            Err(err) => {
                let err = TaskListError::DeleteFailed(err);
                self.state.lock().last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // -- views and local state ----------------------------------------------

    /// Returns the tasks passing the active repeat filter and search query,
    /// preserving list order. A fresh vec every call; never mutates state.
    ///
    /// The search query matches case-insensitively against name and
    /// description; an empty query matches everything.
    #[must_use]
    pub fn filtered_view(&self) -> Vec<Task> {
        let state = self.state.lock();
        let needle = state.search.to_lowercase();
        state
            .tasks
            .iter()
            .filter(|task| {
                state.filter.matches(task.repeat)
                    && (needle.is_empty()
                        || task.name.to_lowercase().contains(&needle)
                        || task.description.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Snapshot of the full unfiltered task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks.clone()
    }

    /// Number of tasks currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    /// Returns `true` when the collection holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().tasks.is_empty()
    }

    /// How many more tasks the owner may create before hitting the limit.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.len())
    }

    /// The configured capacity limit.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The active owner, if any operation has bound one.
    #[must_use]
    pub fn owner(&self) -> Option<OwnerId> {
        self.state.lock().owner.clone()
    }

    /// Whether at least one `load` is awaiting the store.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.lock().loads_in_flight > 0
    }

    /// The most recent reported failure, if not yet dismissed.
    #[must_use]
    pub fn last_error(&self) -> Option<TaskListError> {
        self.state.lock().last_error.clone()
    }

    /// Dismisses the error notice.
    pub fn dismiss_error(&self) {
        self.state.lock().last_error = None;
    }

    /// The active repeat filter.
    #[must_use]
    pub fn filter_repeat(&self) -> RepeatFilter {
        self.state.lock().filter
    }

    /// Sets the repeat filter for [`filtered_view`](Self::filtered_view).
    pub fn set_filter_repeat(&self, filter: RepeatFilter) {
        self.state.lock().filter = filter;
    }

    /// The active search query.
    #[must_use]
    pub fn search_query(&self) -> String {
        self.state.lock().search.clone()
    }

    /// Sets the search query for [`filtered_view`](Self::filtered_view).
    pub fn set_search_query(&self, query: impl Into<String>) {
        self.state.lock().search = query.into();
    }

    /// Empties the collection and resets filter and search to defaults.
    ///
    /// Invoked on logout or owner change. Remote copies are untouched; any
    /// in-flight completion for the cleared owner will be discarded when it
    /// arrives.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.owner = None;
        state.tasks.clear();
        state.filter = RepeatFilter::All;
        state.search.clear();
        state.last_error = None;
    }
}
