//! Shared drawing helpers.

use crate::notify::{Notice, NoticeKind};
use ratatui::{prelude::*, widgets::*};

/// A centered rect of the given percentage size, for modal dialogs.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Render the newest notice as a one-line banner.
pub fn notice_banner(f: &mut Frame, area: Rect, notice: &Notice) {
    let style = match notice.kind {
        NoticeKind::Info => Style::default().fg(Color::Cyan),
        NoticeKind::Success => Style::default().fg(Color::Green),
        NoticeKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    let banner = Paragraph::new(notice.text.as_str())
        .style(style)
        .alignment(Alignment::Center);
    f.render_widget(banner, area);
}

/// A labelled input line inside a form, highlighted when focused.
pub fn form_field<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let value_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if focused { "█" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(Color::Gray)),
        Span::styled(value, value_style),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}

/// Footer hint line.
pub fn key_hints(f: &mut Frame, area: Rect, hints: &str) {
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, area);
}

/// Format a price for display.
pub fn money(value: f64) -> String {
    format!("${:.2}", value)
}
