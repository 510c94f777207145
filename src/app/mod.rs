use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{self, Event};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{SessionError, SinkWriteError};
use crate::session::{Choice, Outcome, Phase, Session};
use crate::sink::CsvFileSink;
use crate::ui;

mod types;
pub use types::*;

mod input;
mod path_input;
pub use path_input::PathInput;
#[cfg(test)]
mod tests;

/// TUI が駆動するセッションの具体型
pub type RatingSession = Session<ChaCha8Rng, CsvFileSink>;

pub struct App {
    pub session: RatingSession,
    pub config: Config,
    pub state: AppState,
    /// Help を閉じたときの戻り先
    help_return_state: AppState,
    pub path_input: PathInput,
    /// フォーカス中の選択ボタン（Enter で確定）
    pub focused_action: usize,
    pub status: Option<StatusMessage>,
    /// 最後に保存した時刻
    pub saved_at: Option<DateTime<Local>>,
    pub results_scroll_offset: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: RatingSession, config: Config) -> Self {
        Self {
            session,
            config,
            state: AppState::Upload,
            help_return_state: AppState::Upload,
            path_input: PathInput::new(),
            focused_action: 0,
            status: None,
            saved_at: None,
            results_scroll_offset: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;

        let result = self.event_loop(&mut terminal);

        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut ui::Tui) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;
            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// データセットを読み込み、結果に応じて画面を切り替える
    ///
    /// 読み込みに失敗してもセッションは変更しない。
    pub fn upload_path(&mut self, path: &Path) {
        self.path_input.set(&path.display().to_string());
        match self.session.upload_file(path) {
            Ok(outcome) => {
                self.status = Some(StatusMessage::info(format!(
                    "Loaded {} ({} items)",
                    path.display(),
                    self.session.len()
                )));
                self.after_transition(outcome);
            }
            Err(SessionError::Load(e)) => {
                warn!(%e, path = %path.display(), "upload rejected");
                self.status = Some(StatusMessage::error(e.to_string()));
            }
            Err(SessionError::Sink(e)) => self.on_sink_error(e),
        }
    }

    pub fn choose(&mut self, choice: Choice) {
        match self.session.decide(choice) {
            Ok(outcome) => self.after_transition(outcome),
            Err(e) => self.on_sink_error(e),
        }
    }

    pub fn reset_session(&mut self) {
        match self.session.reset() {
            Ok(Outcome::Ignored) => {}
            Ok(outcome) => {
                info!("worklist regenerated");
                self.status = Some(StatusMessage::info("Worklist regenerated"));
                self.after_transition(outcome);
            }
            Err(e) => self.on_sink_error(e),
        }
    }

    pub fn retry_save(&mut self) {
        match self.session.retry_persist() {
            Ok(Some(path)) => {
                self.saved_at = Some(Local::now());
                self.status = Some(StatusMessage::info(format!(
                    "Результаты разметки сохранены в '{}'",
                    path.display()
                )));
            }
            Ok(None) => {}
            Err(e) => self.on_sink_error(e),
        }
    }

    fn after_transition(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Started => {
                self.focused_action = 0;
                self.state = AppState::Rating;
            }
            Outcome::Unchanged => {
                if self.session.phase() == Phase::InProgress {
                    self.state = AppState::Rating;
                }
            }
            Outcome::Recorded => {
                self.focused_action = 0;
            }
            Outcome::Completed => {
                self.saved_at = Some(Local::now());
                self.results_scroll_offset = 0;
                self.state = AppState::Results;
                if let Some(path) = self.session.saved_path() {
                    self.status = Some(StatusMessage::info(format!(
                        "Результаты разметки сохранены в '{}'",
                        path.display()
                    )));
                }
            }
            Outcome::Ignored => {}
        }
    }

    fn on_sink_error(&mut self, e: SinkWriteError) {
        tracing::error!(%e, "failed to save results");
        self.saved_at = None;
        self.state = AppState::Results;
        self.status = Some(StatusMessage::error(format!("{} (press s to retry)", e)));
    }

    pub fn open_help(&mut self) {
        if self.state != AppState::Help {
            self.help_return_state = self.state;
            self.state = AppState::Help;
        }
    }

    pub fn close_help(&mut self) {
        self.state = self.help_return_state;
    }

    /// アップロード画面を開く（セッションはアップロード成功まで維持）
    pub fn open_upload(&mut self) {
        self.state = AppState::Upload;
    }

    /// The screen to return to when the upload prompt is dismissed.
    pub(crate) fn session_screen(&self) -> Option<AppState> {
        match self.session.phase() {
            Phase::AwaitingUpload => None,
            Phase::InProgress => Some(AppState::Rating),
            Phase::Complete => Some(AppState::Results),
        }
    }

    pub fn actions(&self) -> Vec<Choice> {
        Choice::actions(self.session.variant())
    }
}
