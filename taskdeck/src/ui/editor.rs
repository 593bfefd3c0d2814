//! Create/edit form modal rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::{FormField, TaskForm};

use super::theme;

/// Render the task form as a centered modal over the list.
pub fn render(frame: &mut Frame, area: Rect, form: &TaskForm) {
    let title = if form.editing.is_some() {
        " Edit Task "
    } else {
        " New Task "
    };
    let block = Block::default()
        .title(Span::styled(title, theme::bold().fg(theme::EDITOR_TITLE)))
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(theme::EDITOR_TITLE));

    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // name
            Constraint::Length(1), // description
            Constraint::Length(1), // due date
            Constraint::Length(1), // repeat
            Constraint::Length(1), // error line
        ])
        .split(inner);

    render_field(frame, rows[0], "Name", &form.name, form.focus == FormField::Name);
    render_field(
        frame,
        rows[1],
        "Description",
        &form.description,
        form.focus == FormField::Description,
    );
    render_field(
        frame,
        rows[2],
        "Due (YYYY-MM-DD)",
        &form.due_date,
        form.focus == FormField::DueDate,
    );
    render_field(
        frame,
        rows[3],
        "Repeat",
        form.repeat.as_str(),
        form.focus == FormField::Repeat,
    );

    if let Some(error) = &form.error {
        let line = Line::from(Span::styled(error.clone(), theme::normal().fg(theme::ERROR)));
        frame.render_widget(Paragraph::new(line), rows[4]);
    }
}

/// Render one labeled input row, highlighting the focused field.
fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let marker = if focused { "› " } else { "  " };
    let value_style = if focused {
        theme::bold().fg(theme::HIGHLIGHT)
    } else {
        theme::normal()
    };
    let line = Line::from(vec![
        Span::styled(marker, theme::bold().fg(theme::HIGHLIGHT)),
        Span::styled(format!("{label}: "), theme::dimmed()),
        Span::styled(value.to_string(), value_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
