//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

use taskdeck_proto::task::Repeat;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for the selected row and focused form field.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success/confirmation color.
pub const SUCCESS: Color = Color::Green;

/// Warning color (capacity nearly reached).
pub const WARNING: Color = Color::Yellow;

/// Error/overdue color.
pub const ERROR: Color = Color::Red;

/// Panel title color for the task list.
pub const TASKS_TITLE: Color = Color::Green;

/// Panel title color for the editor form.
pub const EDITOR_TITLE: Color = Color::Cyan;

/// Accent color per repeat cadence badge.
#[must_use]
pub const fn repeat_color(repeat: Repeat) -> Color {
    match repeat {
        Repeat::Daily => Color::Red,
        Repeat::Weekly => Color::Blue,
        Repeat::Monthly => Color::LightBlue,
        Repeat::Yearly => Color::Green,
    }
}

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (metadata, hints).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Style for the selected list row.
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}
