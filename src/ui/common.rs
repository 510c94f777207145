use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, StatusMessage};

/// Render the footer: status message on the first line, key hints below.
pub fn render_footer(frame: &mut Frame, area: Rect, app: &App, hints: &str) {
    let mut lines = Vec::with_capacity(2);
    if let Some(status) = &app.status {
        lines.push(status_line(status));
    }
    lines.push(Line::from(Span::styled(
        hints.to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn status_line(status: &StatusMessage) -> Line<'static> {
    let style = if status.is_error() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    Line::from(vec![
        Span::styled(
            format!("[{}] ", status.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(status.text.clone(), style),
    ])
}

/// 表示幅 `max_width` に収まるよう切り詰める（全角文字は幅 2）
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        // 末尾の "…" 分を残す
        if width + w > max_width - 1 {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

/// Flatten line breaks so a cell stays on one row.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
