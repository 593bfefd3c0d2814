//! Core task model for `TaskDeck`.
//!
//! Defines the owner-scoped [`Task`] record stored in the remote table, the
//! [`TaskDraft`]/[`TaskPatch`] inputs accepted at the create/update boundary,
//! and the validation rules applied before any record is admitted.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of tasks a single owner may hold.
pub const MAX_TASKS_PER_USER: usize = 100;

/// Maximum allowed task name length in characters.
pub const MAX_TASK_NAME_LENGTH: usize = 256;

/// Stable identifier of the user owning a task set.
///
/// An email address for authenticated sessions, or a generated
/// `@incognito.local` address for guest sessions. Scopes every task
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an owner identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is blank (no authenticated owner).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a task, based on UUID v7 for time-ordering.
///
/// Unique within an owner's task set; assigned by the server at creation
/// time unless the create payload supplies one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repeat cadence of a task. Governs display categorization only; no
/// recurrence instances are generated from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Repeats every year.
    Yearly,
}

impl Repeat {
    /// All cadences in display order.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Returns the lowercase wire/display name of the cadence.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(format!("unknown repeat cadence: {other}")),
        }
    }
}

/// Who may see a task besides its owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to the owner only.
    #[default]
    Private,
    /// Visible to the owner's friends.
    Friends,
    /// Visible to everyone.
    Public,
}

/// A user-owned to-do item.
///
/// `(owner_id, task_id)` is the unique key, in memory and in the remote
/// table. Wire names are camelCase to match the stored record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Owning user; immutable after creation.
    pub owner_id: OwnerId,
    /// Unique within the owner's task set; assigned at creation.
    pub task_id: TaskId,
    /// Short task name (required, non-empty).
    pub name: String,
    /// Free-form description; defaults to empty.
    #[serde(default)]
    pub description: String,
    /// When the task is due (required).
    pub due_date: NaiveDate,
    /// Repeat cadence, used for display categorization.
    pub repeat: Repeat,
    /// Optional free-form location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Who may see the task.
    #[serde(default)]
    pub visibility: Visibility,
    /// Optional notification date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_date: Option<NaiveDate>,
    /// Optional notification time-of-day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<NaiveTime>,
}

/// Errors produced by boundary validation of drafts and patches.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Task name cannot be empty.
    #[error("task name cannot be empty")]
    NameEmpty,
    /// Task name exceeds the maximum length.
    #[error("task name too long (max {MAX_TASK_NAME_LENGTH} characters)")]
    NameTooLong,
    /// A due date is required to create a task.
    #[error("task due date is required")]
    DueDateMissing,
}

/// Input fields for creating a task, before the server assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    /// Task name (required, non-empty).
    pub name: String,
    /// Free-form description; defaults to empty.
    #[serde(default)]
    pub description: String,
    /// Due date; required for the draft to be valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Repeat cadence.
    pub repeat: Repeat,
    /// Optional free-form location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Who may see the task.
    #[serde(default)]
    pub visibility: Visibility,
    /// Optional notification date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_date: Option<NaiveDate>,
    /// Optional notification time-of-day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<NaiveTime>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            due_date: None,
            repeat: Repeat::Weekly,
            location: None,
            visibility: Visibility::default(),
            notification_date: None,
            notification_time: None,
        }
    }
}

impl TaskDraft {
    /// Validates the draft for creation.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NameEmpty`] if the name is empty,
    /// [`ValidationError::NameTooLong`] if it exceeds
    /// [`MAX_TASK_NAME_LENGTH`] characters, or
    /// [`ValidationError::DueDateMissing`] if no due date is set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        if self.due_date.is_none() {
            return Err(ValidationError::DueDateMissing);
        }
        Ok(())
    }

    /// Validates the draft and builds the stored [`Task`] record from it.
    ///
    /// The caller supplies the owner and the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`validate`](Self::validate).
    pub fn into_task(self, owner_id: OwnerId, task_id: TaskId) -> Result<Task, ValidationError> {
        self.validate()?;
        let due_date = self.due_date.ok_or(ValidationError::DueDateMissing)?;
        Ok(Task {
            owner_id,
            task_id,
            name: self.name,
            description: self.description,
            due_date,
            repeat: self.repeat,
            location: self.location,
            visibility: self.visibility,
            notification_date: self.notification_date,
            notification_time: self.notification_time,
        })
    }
}

/// A partial update to an existing task. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    /// New task name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// New repeat cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    /// New location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// New notification date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_date: Option<NaiveDate>,
    /// New notification time-of-day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_time: Option<NaiveTime>,
}

impl TaskPatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.repeat.is_none()
            && self.location.is_none()
            && self.visibility.is_none()
            && self.notification_date.is_none()
            && self.notification_time.is_none()
    }

    /// Validates the patch for an update.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NameEmpty`] or
    /// [`ValidationError::NameTooLong`] if the patch sets an invalid name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        Ok(())
    }

    /// Merges the patch into a task in place, leaving `None` fields alone.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            task.description.clone_from(description);
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(repeat) = self.repeat {
            task.repeat = repeat;
        }
        if let Some(location) = &self.location {
            task.location = Some(location.clone());
        }
        if let Some(visibility) = self.visibility {
            task.visibility = visibility;
        }
        if let Some(date) = self.notification_date {
            task.notification_date = Some(date);
        }
        if let Some(time) = self.notification_time {
            task.notification_time = Some(time);
        }
    }
}

/// Shared name rule for drafts and patches.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() > MAX_TASK_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}
