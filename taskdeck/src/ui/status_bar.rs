//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Mode};

use super::{ViewState, theme};

/// Render the one-line status bar: session, capacity, state, key hints.
///
/// When an error notice is pending it takes over the bar until dismissed;
/// the task list above stays visible either way.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &ViewState<'_>) {
    if let Some(error) = &view.error {
        let line = Line::from(vec![
            Span::styled(" ✗ ", theme::bold().fg(theme::ERROR)),
            Span::styled(error.clone(), theme::normal().fg(theme::ERROR)),
            Span::styled("  (Esc to dismiss)", theme::dimmed()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let remaining = view.capacity.saturating_sub(view.task_count);
    let capacity_style = if remaining == 0 {
        theme::normal().fg(theme::ERROR)
    } else if remaining <= view.capacity / 10 {
        theme::normal().fg(theme::WARNING)
    } else {
        theme::dimmed()
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", app.session.display_name()), theme::bold()),
        Span::styled(
            if app.session.is_guest() { "(guest) " } else { "" },
            theme::dimmed(),
        ),
        Span::styled(
            format!("{}/{} tasks · {remaining} remaining ", view.task_count, view.capacity),
            capacity_style,
        ),
    ];
    if view.is_loading {
        spans.push(Span::styled("· loading… ", theme::normal().fg(theme::WARNING)));
    }
    spans.push(Span::styled(
        match app.mode {
            Mode::Browse => "· n:new e:edit d:del f:filter /:search r:reload q:quit",
            Mode::Search => "· type to search · Enter:keep Esc:clear",
            Mode::Editor => "· Tab:next field ←/→:cadence Enter:save Esc:cancel",
        },
        theme::dimmed(),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
