use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::session::{DecisionRecord, Description, Grade};
use crate::summary::Summary;

use super::common::{render_footer, single_line, truncate};

pub fn render(frame: &mut Frame, app: &mut App) {
    let variant = app.session.variant();
    let summary = Summary::from_decisions(variant, app.session.decisions());

    let summary_height = summary.rows.len() as u16 + 3 + u16::from(summary.mean_grade.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),              // Header + save state
            Constraint::Length(summary_height), // Summary
            Constraint::Min(3),                 // Decisions
            Constraint::Length(4),              // Footer
        ])
        .split(frame.area());

    let saved = match app.session.saved_path() {
        Some(path) => {
            let at = app
                .saved_at
                .map(|t| format!(" ({})", t.format("%H:%M:%S")))
                .unwrap_or_default();
            Line::from(Span::styled(
                format!("Сохранено: {}{}", path.display(), at),
                Style::default().fg(Color::Green),
            ))
        }
        None => Line::from(Span::styled(
            "Не сохранено (s: повторить)",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    };
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(
                "{}: {}/{} decisions",
                variant.display_name(),
                app.session.decisions().len(),
                app.session.len()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        saved,
    ])
    .block(Block::default().borders(Borders::ALL).title("Results"));
    frame.render_widget(header, chunks[0]);

    render_summary(frame, chunks[1], &summary);
    render_decisions(frame, chunks[2], app);

    let kb = &app.config.keybindings;
    let hints = format!(
        "j/k: scroll | s: retry save | {}: upload | {}: restart | {}: help | {}: quit",
        kb.upload, kb.reset, kb.help, kb.quit
    );
    render_footer(frame, chunks[3], app, &hints);
}

fn render_summary(frame: &mut Frame, area: Rect, summary: &Summary) {
    let mut rows: Vec<Row> = summary
        .rows
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.label.clone()),
                Cell::from(r.count.to_string()),
                Cell::from(format!("{:.1}%", r.share * 100.0)),
            ])
        })
        .collect();
    if let Some(mean) = summary.mean_grade {
        rows.push(Row::new(vec![
            Cell::from("mean grade"),
            Cell::from(format!("{:+.2}", mean)),
            Cell::from(""),
        ]));
    }
    let table = Table::new(
        rows,
        [
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(8),
        ],
    )
    .header(
        Row::new(vec!["", "count", "share"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Summary ({})", summary.total)),
    );
    frame.render_widget(table, area);
}

/// 1 判定 = 1 行（タイトルと選択結果）
fn decision_cells(record: &DecisionRecord) -> (String, String) {
    match record {
        DecisionRecord::Graded(r) => {
            let label = Grade::ALL
                .iter()
                .find(|g| g.value() == r.grade)
                .map(|g| g.label())
                .unwrap_or("?");
            (r.title.clone(), format!("{} ({:+})", label, r.grade))
        }
        DecisionRecord::Blind(r) => {
            let source = match r.selected_desc {
                Description::Generated => "gen",
                Description::True => "true",
            };
            (
                r.title.clone(),
                format!("Описание {} → {}", r.selected_position, source),
            )
        }
        DecisionRecord::ThreeWay(r) => (
            format!("#{} {}", r.publication_index, r.title),
            format!(
                "{}: Вариант {} → {}",
                r.comparison.as_str(),
                r.selected_position,
                r.selected_source.as_str()
            ),
        ),
    }
}

fn render_decisions(frame: &mut Frame, area: Rect, app: &App) {
    let decisions = app.session.decisions();
    let title_width = (area.width as usize / 2).saturating_sub(4);
    let rows: Vec<Row> = decisions
        .iter()
        .enumerate()
        .skip(app.results_scroll_offset)
        .map(|(i, record)| {
            let (title, choice) = decision_cells(record);
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(truncate(&single_line(&title), title_width)),
                Cell::from(choice),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["#", "title", "choice"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Decisions ({})", decisions.len())),
    );
    frame.render_widget(table, area);
}
