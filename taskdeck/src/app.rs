//! Application state and event handling.
//!
//! `App` owns the interaction state (mode, selection, form input) and turns
//! key events into [`AppCommand`]s for the main loop to dispatch. It never
//! touches the network itself; task data is read from the collection
//! manager each frame.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

use taskdeck_proto::task::{OwnerId, Repeat, Task, TaskDraft, TaskId, TaskPatch};

use crate::identity::Session;

/// Which interaction mode the UI is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the task list (default).
    Browse,
    /// Typing into the search bar.
    Search,
    /// Filling the create/edit form.
    Editor,
}

/// A user action that the main loop dispatches against the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Re-fetch the owner's task set.
    Reload,
    /// Create a task from the submitted form.
    Create(TaskDraft),
    /// Update a task with the submitted form fields.
    Update(TaskId, TaskPatch),
    /// Delete the selected task.
    Delete(TaskId),
    /// Advance the repeat filter to the next cadence.
    CycleFilter,
    /// Replace the search query.
    SetSearch(String),
    /// Dismiss the error notice.
    DismissError,
}

/// Which form field has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Task name input.
    Name,
    /// Description input.
    Description,
    /// Due date input (`YYYY-MM-DD`).
    DueDate,
    /// Repeat cadence selector.
    Repeat,
}

impl FormField {
    const fn next(self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Description => Self::DueDate,
            Self::DueDate => Self::Repeat,
            Self::Repeat => Self::Name,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Repeat,
            Self::Description => Self::Name,
            Self::DueDate => Self::Description,
            Self::Repeat => Self::DueDate,
        }
    }
}

/// Create/edit form state.
#[derive(Debug, Clone)]
pub struct TaskForm {
    /// `Some` when editing an existing task.
    pub editing: Option<TaskId>,
    /// Name input buffer.
    pub name: String,
    /// Description input buffer.
    pub description: String,
    /// Due date input buffer (`YYYY-MM-DD`).
    pub due_date: String,
    /// Selected repeat cadence.
    pub repeat: Repeat,
    /// Focused field.
    pub focus: FormField,
    /// Inline form error shown until the next keystroke.
    pub error: Option<String>,
}

impl TaskForm {
    /// An empty form for creating a task.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            editing: None,
            name: String::new(),
            description: String::new(),
            due_date: String::new(),
            repeat: Repeat::Weekly,
            focus: FormField::Name,
            error: None,
        }
    }

    /// A form pre-filled from an existing task.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        Self {
            editing: Some(task.task_id.clone()),
            name: task.name.clone(),
            description: task.description.clone(),
            due_date: task.due_date.format("%Y-%m-%d").to_string(),
            repeat: task.repeat,
            focus: FormField::Name,
            error: None,
        }
    }

    /// Validates the buffers and builds the command to dispatch.
    ///
    /// Returns `None` (with `self.error` set) when the input cannot be
    /// submitted yet; the manager re-validates authoritatively either way.
    fn submit(&mut self) -> Option<AppCommand> {
        if self.name.is_empty() {
            self.error = Some("task name is required".to_string());
            return None;
        }
        let Ok(due_date) = NaiveDate::parse_from_str(&self.due_date, "%Y-%m-%d") else {
            self.error = Some("due date must be YYYY-MM-DD".to_string());
            return None;
        };

        match self.editing.clone() {
            Some(task_id) => Some(AppCommand::Update(
                task_id,
                TaskPatch {
                    name: Some(self.name.clone()),
                    description: Some(self.description.clone()),
                    due_date: Some(due_date),
                    repeat: Some(self.repeat),
                    ..TaskPatch::default()
                },
            )),
            None => Some(AppCommand::Create(TaskDraft {
                name: self.name.clone(),
                description: self.description.clone(),
                due_date: Some(due_date),
                repeat: self.repeat,
                ..TaskDraft::default()
            })),
        }
    }

    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Name => Some(&mut self.name),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Repeat => None,
        }
    }
}

/// Advance a cadence to the next one, wrapping around.
const fn next_repeat(repeat: Repeat) -> Repeat {
    match repeat {
        Repeat::Daily => Repeat::Weekly,
        Repeat::Weekly => Repeat::Monthly,
        Repeat::Monthly => Repeat::Yearly,
        Repeat::Yearly => Repeat::Daily,
    }
}

/// Main application state.
pub struct App {
    /// The signed-in (or guest) session.
    pub session: Session,
    /// Current interaction mode.
    pub mode: Mode,
    /// Search input buffer, mirrored into the manager per keystroke.
    pub search_input: String,
    /// The create/edit form; meaningful while in [`Mode::Editor`].
    pub form: TaskForm,
    /// Selected row in the filtered view.
    pub selected: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the application state for a session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            mode: Mode::Browse,
            search_input: String::new(),
            form: TaskForm::empty(),
            selected: 0,
            should_quit: false,
        }
    }

    /// The owner all dispatched commands act for.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        self.session.owner()
    }

    /// Keeps the selection inside the current view.
    pub fn clamp_selection(&mut self, view_len: usize) {
        if view_len == 0 {
            self.selected = 0;
        } else if self.selected >= view_len {
            self.selected = view_len - 1;
        }
    }

    /// Handles a key press against the current filtered view, returning a
    /// command for the main loop to dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent, view: &[Task]) -> Option<AppCommand> {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key, view),
            Mode::Search => self.handle_search_key(key),
            Mode::Editor => self.handle_editor_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, view: &[Task]) -> Option<AppCommand> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('r') => Some(AppCommand::Reload),
            KeyCode::Char('n') => {
                self.form = TaskForm::empty();
                self.mode = Mode::Editor;
                None
            }
            KeyCode::Char('e') => {
                let task = view.get(self.selected)?;
                self.form = TaskForm::for_task(task);
                self.mode = Mode::Editor;
                None
            }
            KeyCode::Char('d') => {
                let task = view.get(self.selected)?;
                Some(AppCommand::Delete(task.task_id.clone()))
            }
            KeyCode::Char('f') => Some(AppCommand::CycleFilter),
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                None
            }
            KeyCode::Esc => Some(AppCommand::DismissError),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < view.len() {
                    self.selected += 1;
                }
                None
            }
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Esc => {
                self.search_input.clear();
                self.mode = Mode::Browse;
                Some(AppCommand::SetSearch(String::new()))
            }
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                None
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                Some(AppCommand::SetSearch(self.search_input.clone()))
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                Some(AppCommand::SetSearch(self.search_input.clone()))
            }
            _ => None,
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        self.form.error = None;
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                None
            }
            KeyCode::Tab => {
                self.form.focus = self.form.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.form.focus = self.form.focus.prev();
                None
            }
            KeyCode::Enter => {
                let command = self.form.submit();
                if command.is_some() {
                    self.mode = Mode::Browse;
                }
                command
            }
            KeyCode::Left | KeyCode::Right if self.form.focus == FormField::Repeat => {
                self.form.repeat = next_repeat(self.form.repeat);
                None
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.form.focused_buffer() {
                    buffer.pop();
                }
                None
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.form.focused_buffer() {
                    buffer.push(c);
                } else if c == ' ' {
                    // Space also cycles the cadence selector.
                    self.form.repeat = next_repeat(self.form.repeat);
                }
                None
            }
            _ => None,
        }
    }
}
