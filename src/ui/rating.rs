use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::session::{Choice, Grade};
use crate::view::{self, Panel};

use super::common::render_footer;

pub fn render(frame: &mut Frame, app: &mut App) {
    let variant = app.session.variant();
    let view = app
        .session
        .current_item()
        .zip(app.session.dataset())
        .and_then(|(item, dataset)| view::item_view(item, dataset));

    let context_height = match &view {
        Some(v) if v.context.len() > 1 => Constraint::Percentage(35),
        _ => Constraint::Length(3),
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            context_height,        // Title / context
            Constraint::Min(5),    // Compared texts
            Constraint::Length(3), // Buttons
            Constraint::Length(3), // Progress
            Constraint::Length(4), // Footer
        ])
        .split(frame.area());

    let header = Paragraph::new(format!(
        "{} | item {}",
        variant.display_name(),
        app.session.cursor() + 1
    ))
    .style(Style::default().add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL).title("descval"));
    frame.render_widget(header, chunks[0]);

    match view {
        Some(view) => {
            render_context(frame, chunks[1], &view.context);

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);
            for (panel, area) in view.panels.iter().zip(columns.iter()) {
                render_panel(frame, *area, panel, Style::default());
            }
        }
        None => {
            let empty = Paragraph::new("Нет элементов для разметки")
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, chunks[2]);
        }
    }

    render_buttons(frame, chunks[3], app);
    render_progress(frame, chunks[4], app);

    let kb = &app.config.keybindings;
    let hints = format!(
        "←/→: focus | Enter: choose | {}: upload | {}: reset | {}: help | {}: quit",
        kb.upload, kb.reset, kb.help, kb.quit
    );
    render_footer(frame, chunks[5], app, &hints);
}

fn render_panel(frame: &mut Frame, area: Rect, panel: &Panel, style: Style) {
    let widget = Paragraph::new(panel.text)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(panel.heading.clone()),
        );
    frame.render_widget(widget, area);
}

fn render_context(frame: &mut Frame, area: Rect, context: &[Panel]) {
    if context.len() <= 1 {
        if let Some(panel) = context.first() {
            render_panel(
                frame,
                area,
                panel,
                Style::default().add_modifier(Modifier::BOLD),
            );
        }
        return;
    }

    // タイトルは 1 行、残りで本文を分ける
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(
        std::iter::repeat(Constraint::Ratio(1, (context.len() - 1) as u32))
            .take(context.len() - 1),
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    for (i, (panel, row)) in context.iter().zip(rows.iter()).enumerate() {
        let style = if i == 0 {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        render_panel(frame, *row, panel, style);
    }
}

fn button_color(choice: Choice) -> Color {
    match choice {
        Choice::Grade(Grade::Worse) => Color::Red,
        Choice::Grade(Grade::Same) => Color::Yellow,
        Choice::Grade(Grade::Better) => Color::Green,
        Choice::Position(_) => Color::Cyan,
    }
}

fn render_buttons(frame: &mut Frame, area: Rect, app: &App) {
    let actions = app.actions();
    if actions.is_empty() {
        return;
    }
    let variant = app.session.variant();
    let kb = &app.config.keybindings;
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, actions.len() as u32);
            actions.len()
        ])
        .split(area);

    for (i, (choice, area)) in actions.iter().zip(areas.iter()).enumerate() {
        let color = button_color(*choice);
        let focused = i == app.focused_action;
        let (style, border) = if focused {
            (
                Style::default()
                    .fg(Color::Black)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        } else {
            (Style::default().fg(color), Style::default().fg(Color::DarkGray))
        };
        let button = Paragraph::new(Line::from(format!(
            "[{}] {}",
            choice.symbol(kb),
            choice.label(variant)
        )))
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(button, *area);
    }
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let done = app.session.cursor();
    let total = app.session.len();
    let ratio = if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("Прогресс: {}/{}", done, total));
    frame.render_widget(gauge, area);
}
