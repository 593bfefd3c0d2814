//! Task list rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::app::{App, Mode};

use super::{ViewState, theme};

/// Render the task list with selection, cadence badges, and due dates.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &ViewState<'_>) {
    let searching = app.mode == Mode::Search || !app.search_input.is_empty();
    let title = if searching {
        format!(" Tasks · filter: {} · search: {} ", view.filter_label, app.search_input)
    } else {
        format!(" Tasks · filter: {} ", view.filter_label)
    };

    let block = Block::default()
        .title(Span::styled(title, theme::bold().fg(theme::TASKS_TITLE)))
        .borders(Borders::ALL)
        .border_style(if app.mode == Mode::Search {
            theme::bold().fg(theme::HIGHLIGHT)
        } else {
            theme::normal()
        });

    if view.tasks.is_empty() {
        let message = if view.is_loading {
            "Loading tasks..."
        } else {
            "No tasks found for the selected filter."
        };
        let placeholder = Paragraph::new(Line::from(Span::styled(message, theme::dimmed())))
            .block(block)
            .centered();
        frame.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = view
        .tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let row_style = if i == app.selected {
                theme::selected()
            } else {
                theme::normal()
            };
            let overdue = task.due_date < view.today;
            let due_style = if overdue {
                theme::normal().fg(theme::ERROR)
            } else {
                theme::dimmed()
            };

            let mut spans = vec![
                Span::styled(
                    format!("[{}]", &task.repeat.as_str()[..1]),
                    theme::normal().fg(theme::repeat_color(task.repeat)),
                ),
                Span::raw(" "),
                Span::styled(task.name.clone(), row_style),
                Span::raw("  "),
                Span::styled(format!("due {}", task.due_date.format("%Y-%m-%d")), due_style),
            ];
            if !task.description.is_empty() {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(task.description.clone(), theme::dimmed()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
