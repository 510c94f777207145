use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::config::{KeybindingsConfig, RETRY_SAVE_KEY};
use crate::dataset::Variant;
use crate::session::Choice;

/// Format a key display with padding for alignment
fn fmt_key(key: &str, width: usize) -> String {
    format!("  {:<width$}", key, width = width)
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Help content
        ])
        .split(frame.area());

    let title = Paragraph::new("descval - description rating TUI")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title("Help"));
    frame.render_widget(title, chunks[0]);

    let help_lines = build_help_lines(app.session.variant(), &app.config.keybindings);
    let help = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Keybindings"));
    frame.render_widget(help, chunks[1]);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

fn build_help_lines(variant: Variant, kb: &KeybindingsConfig) -> Vec<Line<'static>> {
    let key_width = 14;

    let mut lines = vec![Line::from(""), section("Rating")];
    for choice in Choice::actions(variant) {
        lines.push(Line::from(format!(
            "{}  {}",
            fmt_key(&choice.symbol(kb).to_string(), key_width),
            choice.label(variant)
        )));
    }
    lines.extend([
        Line::from(format!(
            "{}  Move button focus",
            fmt_key("h/l, ←/→, Tab", key_width)
        )),
        Line::from(format!(
            "{}  Press focused button",
            fmt_key("Enter, Space", key_width)
        )),
        Line::from(""),
        section("Session"),
        Line::from(format!(
            "{}  Upload another CSV",
            fmt_key(&kb.upload.to_string(), key_width)
        )),
        Line::from(format!(
            "{}  Reset: discard decisions and reshuffle",
            fmt_key(&kb.reset.to_string(), key_width)
        )),
        Line::from(format!(
            "{}  Retry saving results",
            fmt_key(&RETRY_SAVE_KEY.to_string(), key_width)
        )),
        Line::from(format!(
            "{}  Scroll results",
            fmt_key("j/k, ↓/↑", key_width)
        )),
        Line::from(""),
        section("General"),
        Line::from(format!(
            "{}  Toggle help",
            fmt_key(&kb.help.to_string(), key_width)
        )),
        Line::from(format!(
            "{}  Quit",
            fmt_key(&format!("{}, Ctrl+C", kb.quit), key_width)
        )),
    ]);
    lines
}
