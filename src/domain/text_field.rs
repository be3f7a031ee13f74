//! Editable single-line text buffer behind the composer and the search bar.

const COMPOSER_MAX_CHARS: usize = 4096;
const SEARCH_MAX_CHARS: usize = 120;

/// Text plus a cursor kept on a char boundary (byte offset into `text`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
    max_chars: usize,
}

impl TextField {
    pub fn composer() -> Self {
        Self::with_limit(COMPOSER_MAX_CHARS)
    }

    pub fn search() -> Self {
        Self::with_limit(SEARCH_MAX_CHARS)
    }

    fn with_limit(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            max_chars,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The part of the text left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Inserts at the cursor. Refused once the field is full.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= self.max_chars {
            return false;
        }
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Applies one named key (`backspace`, `left`, `space`, a single char,
    /// ...). Returns true when the text changed; cursor-only moves return
    /// false.
    pub fn apply_key(&mut self, key: &str, ctrl: bool) -> bool {
        match (key, ctrl) {
            ("w", true) => self.delete_word_before(),
            ("u", true) => {
                let changed = self.cursor > 0;
                self.text.drain(..self.cursor);
                self.cursor = 0;
                changed
            }
            (_, true) => false,
            ("backspace", _) => self.delete_before(),
            ("delete", _) => self.delete_at(),
            ("left", _) => {
                self.cursor = self.prev_boundary();
                false
            }
            ("right", _) => {
                self.cursor = self.next_boundary();
                false
            }
            ("home", _) => {
                self.cursor = 0;
                false
            }
            ("end", _) => {
                self.cursor = self.text.len();
                false
            }
            ("space", _) => self.insert(' '),
            (other, _) => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => self.insert(ch),
                    _ => false,
                }
            }
        }
    }

    fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = self.prev_boundary();
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    fn delete_at(&mut self) -> bool {
        if self.cursor == self.text.len() {
            return false;
        }
        let end = self.next_boundary();
        self.text.drain(self.cursor..end);
        true
    }

    /// Removes trailing whitespace before the cursor, then the word before it.
    fn delete_word_before(&mut self) -> bool {
        let head = self.before_cursor().trim_end();
        let start = head
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(idx, ch)| idx + ch.len_utf8());
        if start == self.cursor {
            return false;
        }
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    fn prev_boundary(&self) -> usize {
        self.before_cursor()
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .chars()
            .next()
            .map_or(self.cursor, |ch| self.cursor + ch.len_utf8())
    }
}
