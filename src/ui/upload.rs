use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

use super::common::render_footer;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Instructions
            Constraint::Length(3), // Path input
            Constraint::Length(4), // Footer
        ])
        .split(frame.area());

    let variant = app.session.variant();
    let header = Paragraph::new(format!("Upload dataset: {}", variant.display_name()))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title("descval"));
    frame.render_widget(header, chunks[0]);

    let mut lines = vec![
        Line::from("Загрузите CSV файл с колонками:"),
        Line::from(""),
    ];
    for column in variant.required_columns() {
        lines.push(Line::from(vec![
            Span::raw("  • "),
            Span::styled(*column, Style::default().fg(Color::Cyan)),
        ]));
    }
    if app.session.dataset().is_some() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Новый файл заменит текущую сессию. Esc вернёт к ней.",
            Style::default().fg(Color::Yellow),
        )));
    }
    let instructions = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Columns"));
    frame.render_widget(instructions, chunks[1]);

    let (before, after) = app.path_input.split_at_cursor();
    let mut after_chars = after.chars();
    let under_cursor = after_chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let input = Paragraph::new(Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled(
            under_cursor,
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(after_chars.as_str().to_string()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("CSV path"),
    );
    frame.render_widget(input, chunks[2]);

    let hints = if app.session.dataset().is_some() {
        "Enter: load | Esc: back | Ctrl+U: clear | Ctrl+C: quit"
    } else {
        "Enter: load | Esc: quit | Ctrl+U: clear"
    };
    render_footer(frame, chunks[3], app, hints);
}
