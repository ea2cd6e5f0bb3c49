use ratatui::{prelude::*, widgets::*};

use crate::models::Role;

/// Renders a text input field
pub fn render_input<'a>(content: impl Into<Text<'a>>, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Password as shown on screen
pub fn masked(len: usize) -> String {
    "•".repeat(len)
}

/// Role color
pub fn role_color(role: Role) -> Color {
    match role {
        Role::Admin => Color::Red,
        Role::User => Color::Green,
    }
}

/// Renders the role badge
pub fn role_badge(role: Role) -> Span<'static> {
    Span::styled(
        format!(" {} ", role.badge()),
        Style::default().fg(Color::Black).bg(role_color(role)).bold(),
    )
}

/// Hint under the dashboard title
pub fn role_hint(role: Role) -> &'static str {
    match role {
        Role::Admin => "You have full access to add and delete songs.",
        Role::User => "You can view and filter the music collection.",
    }
}

/// Style for a key label in the controls bars
pub fn key_style() -> Style {
    Style::default().fg(Color::Cyan).bold()
}

/// Builds a "key:label" hint line
pub fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(*key, key_style()));
        spans.push(Span::raw(format!(":{}", label)));
    }
    Line::from(spans)
}

/// Column of the cursor after `len` characters inside a bordered input
pub fn input_cursor_x(area: Rect, len: usize) -> u16 {
    let len = u16::try_from(len).unwrap_or(u16::MAX);
    let max_x = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(len).saturating_add(1).min(max_x)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
