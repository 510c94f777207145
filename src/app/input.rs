use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use tracing::debug;

use crate::config::{
    FOCUS_LEFT_KEY, FOCUS_RIGHT_KEY, PRESS_KEY, RETRY_SAVE_KEY, SCROLL_DOWN_KEY, SCROLL_UP_KEY,
};
use crate::session::Choice;

use super::{App, AppState};

impl App {
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Kitty keyboard protocol が有効な場合、Release/Repeat イベントも
        // 報告されるため、Press のみ処理して二重実行を防止する。
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.state {
            AppState::Upload => self.handle_upload_input(key),
            AppState::Rating => self.handle_rating_input(key),
            AppState::Results => self.handle_results_input(key),
            AppState::Help => self.handle_help_input(key),
        }
    }

    fn handle_upload_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if self.path_input.is_empty() {
                    return;
                }
                let path = PathBuf::from(self.path_input.value.trim());
                self.upload_path(&path);
            }
            KeyCode::Esc => match self.session_screen() {
                Some(screen) => self.state = screen,
                None => self.should_quit = true,
            },
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.path_input.clear();
            }
            KeyCode::Char(c) => self.path_input.insert_char(c),
            KeyCode::Backspace => self.path_input.delete_char(),
            KeyCode::Left => self.path_input.move_left(),
            KeyCode::Right => self.path_input.move_right(),
            KeyCode::Home => self.path_input.move_home(),
            KeyCode::End => self.path_input.move_end(),
            _ => {}
        }
    }

    fn handle_rating_input(&mut self, key: KeyEvent) {
        let kb = self.config.keybindings.clone();
        let actions = self.actions();

        match key.code {
            KeyCode::Char(c) => {
                // 選択記号が最優先（範囲外の文字は無視）
                if let Some(choice) = Choice::from_symbol(self.session.variant(), c, &kb) {
                    self.choose(choice);
                } else if c == kb.quit {
                    self.should_quit = true;
                } else if c == kb.help {
                    self.open_help();
                } else if c == kb.reset {
                    self.reset_session();
                } else if c == kb.upload {
                    self.open_upload();
                } else if c == FOCUS_LEFT_KEY {
                    self.focused_action = self.focused_action.saturating_sub(1);
                } else if c == FOCUS_RIGHT_KEY {
                    self.focused_action = (self.focused_action + 1).min(actions.len() - 1);
                } else if c == PRESS_KEY {
                    self.press_focused(&actions);
                } else {
                    debug!(%c, "ignored key in rating view");
                }
            }
            KeyCode::Left => {
                self.focused_action = self.focused_action.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Tab => {
                self.focused_action = (self.focused_action + 1).min(actions.len() - 1);
            }
            KeyCode::Enter => self.press_focused(&actions),
            _ => {}
        }
    }

    fn press_focused(&mut self, actions: &[Choice]) {
        if let Some(&choice) = actions.get(self.focused_action) {
            self.choose(choice);
        }
    }

    fn handle_results_input(&mut self, key: KeyEvent) {
        let kb = self.config.keybindings.clone();
        match key.code {
            KeyCode::Char(c) if c == kb.quit => self.should_quit = true,
            KeyCode::Char(c) if c == kb.help => self.open_help(),
            KeyCode::Char(c) if c == kb.upload => self.open_upload(),
            KeyCode::Char(c) if c == kb.reset => self.reset_session(),
            KeyCode::Char(RETRY_SAVE_KEY) => self.retry_save(),
            KeyCode::Char(SCROLL_DOWN_KEY) | KeyCode::Down => {
                let max = self.session.decisions().len().saturating_sub(1);
                self.results_scroll_offset = (self.results_scroll_offset + 1).min(max);
            }
            KeyCode::Char(SCROLL_UP_KEY) | KeyCode::Up => {
                self.results_scroll_offset = self.results_scroll_offset.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn handle_help_input(&mut self, key: KeyEvent) {
        let kb = &self.config.keybindings;
        match key.code {
            KeyCode::Esc => self.close_help(),
            KeyCode::Char(c) if c == kb.quit || c == kb.help => self.close_help(),
            _ => {}
        }
    }
}
