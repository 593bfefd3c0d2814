//! Terminal UI rendering.

pub mod editor;
pub mod status_bar;
pub mod task_panel;
pub mod theme;

use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use taskdeck_proto::task::Task;

use crate::app::{App, Mode};

/// Per-frame snapshot of the collection manager, read once and shared by
/// every panel so a frame renders one consistent state.
pub struct ViewState<'a> {
    /// The filtered, search-narrowed tasks to display.
    pub tasks: &'a [Task],
    /// Label of the active repeat filter.
    pub filter_label: &'static str,
    /// Total tasks held (unfiltered).
    pub task_count: usize,
    /// Capacity limit for the owner.
    pub capacity: usize,
    /// Whether a load is in flight.
    pub is_loading: bool,
    /// The current error notice, if any.
    pub error: Option<String>,
    /// Today's date, for overdue highlighting.
    pub today: NaiveDate,
}

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App, view: &ViewState<'_>) {
    // Task list on top, one-line status bar at the bottom.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    task_panel::render(frame, chunks[0], app, view);
    status_bar::render(frame, chunks[1], app, view);

    if app.mode == Mode::Editor {
        let area = centered_rect(frame.area(), 60, 12);
        editor::render(frame, area, &app.form);
    }
}

/// A centered rect of at most `width` x `height` inside `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
