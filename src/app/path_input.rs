/// アップロード用のパス入力欄
///
/// カーソルは char 単位で保持する（Unicode 安全）。
#[derive(Debug, Clone, Default)]
pub struct PathInput {
    pub value: String,
    /// カーソル位置（char単位）
    pub cursor_chars: usize,
}

impl PathInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_pos(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// カーソル位置に文字を挿入する
    pub fn insert_char(&mut self, c: char) {
        let byte_pos = self.byte_pos(self.cursor_chars);
        self.value.insert(byte_pos, c);
        self.cursor_chars += 1;
    }

    /// カーソル位置の手前の文字を削除する（Backspace）
    pub fn delete_char(&mut self) {
        if self.cursor_chars == 0 {
            return;
        }
        self.cursor_chars -= 1;
        let start = self.byte_pos(self.cursor_chars);
        let end = self.byte_pos(self.cursor_chars + 1);
        self.value.replace_range(start..end, "");
    }

    pub fn move_left(&mut self) {
        self.cursor_chars = self.cursor_chars.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_chars = (self.cursor_chars + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor_chars = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_chars = self.char_count();
    }

    /// 全クリアする（Ctrl+U）
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_chars = 0;
    }

    pub fn set(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_chars = self.char_count();
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_pos(self.cursor_chars))
    }
}
