// cmdbar — interactive command line for a keyboard-driven file manager
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Which history-navigation strategy the current turn has committed to.
/// The pre-history snapshot is taken exactly once per turn, guarded by this
/// being `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryMode {
    #[default]
    None,
    /// `Ctrl-N`/`Ctrl-P`: cycle through every entry.
    Sequential,
    /// `Up`/`Down`: only entries sharing the line's prefix at search start.
    PrefixSearch,
}

/// The mutable state of one interactive turn: the line being edited, the
/// insertion point and its display column, plus the history/completion
/// bookkeeping that belongs to the buffer rather than the state machine.
///
/// `index` is a character index into `line`; `cursor_col` is the display
/// column of the insertion point counted from the start of the prompt.
/// The invariant `cursor_col == prompt_width + width(line[..index])` holds
/// after every operation and can be re-derived via [`Self::derived_cursor_col`].
#[derive(Debug)]
pub struct EditSession {
    line: String,
    /// Character count of `line`, maintained incrementally.
    len: usize,
    /// Insertion point as a character index, `0 ..= len`.
    index: usize,
    /// Display column of the insertion point, prompt included.
    cursor_col: usize,
    prompt: String,
    prompt_width: usize,
    /// True while a multi-candidate completion cycle is active.
    pub(crate) continue_completion: bool,
    pub(crate) history_mode: HistoryMode,
    /// Distance from the newest history entry; `None` means the line has not
    /// entered history yet.
    pub(crate) history_pos: Option<usize>,
    /// Snapshot of `len` at the moment prefix search began.
    pub(crate) prefix_len: usize,
    /// The line as it was before history navigation started; restored when
    /// navigation returns past the newest entry.
    pub(crate) saved_line: Option<String>,
}

impl EditSession {
    pub fn new(prompt: &str, seed: &str) -> Self {
        let prompt_width = UnicodeWidthStr::width(prompt);
        let len = seed.chars().count();
        Self {
            line: seed.to_owned(),
            len,
            index: len,
            cursor_col: prompt_width + UnicodeWidthStr::width(seed),
            prompt: prompt.to_owned(),
            prompt_width,
            continue_completion: false,
            history_mode: HistoryMode::None,
            history_pos: None,
            prefix_len: 0,
            saved_line: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.line
    }

    /// Character count of the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn prompt_width(&self) -> usize {
        self.prompt_width
    }

    /// The portion of the buffer left of the insertion point.
    #[must_use]
    pub fn before_cursor(&self) -> &str {
        &self.line[..char_to_byte_index(&self.line, self.index)]
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = char_to_byte_index(&self.line, self.index);
        self.line.insert(byte_idx, c);
        self.index += 1;
        self.len += 1;
        self.cursor_col += UnicodeWidthChar::width(c).unwrap_or(0);
        self.check_cursor_invariant();
    }

    /// Remove the character immediately left of the insertion point.
    /// No-op at the start of the buffer.
    pub fn delete_before(&mut self) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        let byte_idx = char_to_byte_index(&self.line, self.index);
        let removed = self.line.remove(byte_idx);
        self.len -= 1;
        self.cursor_col -= UnicodeWidthChar::width(removed).unwrap_or(0);
        self.check_cursor_invariant();
    }

    /// Remove the character at the insertion point. No-op at the end.
    pub fn delete_at(&mut self) {
        if self.index == self.len {
            return;
        }
        let byte_idx = char_to_byte_index(&self.line, self.index);
        self.line.remove(byte_idx);
        self.len -= 1;
        self.check_cursor_invariant();
    }

    /// Remove `count` characters beginning at character index `start`,
    /// clamped to the buffer. The insertion point collapses onto the start
    /// of the removed range when it was inside it.
    pub fn delete_range(&mut self, start: usize, count: usize) {
        let start = start.min(self.len);
        let count = count.min(self.len - start);
        if count == 0 {
            return;
        }
        let from = char_to_byte_index(&self.line, start);
        let to = char_to_byte_index(&self.line, start + count);
        self.line.replace_range(from..to, "");
        self.len -= count;
        self.index = if self.index <= start {
            self.index
        } else if self.index <= start + count {
            start
        } else {
            self.index - count
        };
        self.recompute_cursor_col();
    }

    /// Kill from the insertion point to the end of the line.
    pub fn kill_to_end(&mut self) {
        let count = self.len - self.index;
        self.delete_range(self.index, count);
    }

    /// Kill from the start of the line to the insertion point.
    pub fn kill_to_start(&mut self) {
        self.delete_range(0, self.index);
    }

    /// Character index of the previous word boundary: whitespace is skipped
    /// first, then the word itself.
    #[must_use]
    fn prev_word_boundary(&self) -> usize {
        let chars: Vec<char> = self.line.chars().collect();
        let mut i = self.index;
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }
        i
    }

    /// Character index of the next word boundary (mirror of
    /// [`Self::prev_word_boundary`]).
    #[must_use]
    fn next_word_boundary(&self) -> usize {
        let chars: Vec<char> = self.line.chars().collect();
        let mut i = self.index;
        while i < self.len && chars[i].is_whitespace() {
            i += 1;
        }
        while i < self.len && !chars[i].is_whitespace() {
            i += 1;
        }
        i
    }

    pub fn word_left(&mut self) {
        self.index = self.prev_word_boundary();
        self.recompute_cursor_col();
    }

    pub fn word_right(&mut self) {
        self.index = self.next_word_boundary();
        self.recompute_cursor_col();
    }

    /// Delete from the previous word boundary to the insertion point.
    pub fn delete_word_back(&mut self) {
        let start = self.prev_word_boundary();
        self.delete_range(start, self.index - start);
    }

    /// Delete from the insertion point to the next word boundary.
    pub fn delete_word_forward(&mut self) {
        let end = self.next_word_boundary();
        self.delete_range(self.index, end - self.index);
    }

    pub fn move_left(&mut self) {
        if self.index == 0 {
            return;
        }
        self.index -= 1;
        let c = self.char_at(self.index);
        self.cursor_col -= UnicodeWidthChar::width(c).unwrap_or(0);
        self.check_cursor_invariant();
    }

    pub fn move_right(&mut self) {
        if self.index == self.len {
            return;
        }
        let c = self.char_at(self.index);
        self.cursor_col += UnicodeWidthChar::width(c).unwrap_or(0);
        self.index += 1;
        self.check_cursor_invariant();
    }

    pub fn move_home(&mut self) {
        self.index = 0;
        self.cursor_col = self.prompt_width;
    }

    pub fn move_end(&mut self) {
        self.index = self.len;
        self.recompute_cursor_col();
    }

    /// Replace the buffer wholesale, placing the insertion point at the end.
    /// Used by history navigation.
    pub fn set_line(&mut self, text: &str) {
        self.line.clear();
        self.line.push_str(text);
        self.len = self.line.chars().count();
        self.index = self.len;
        self.recompute_cursor_col();
    }

    /// Replace the segment between character index `offset` and the insertion
    /// point with `replacement`, preserving everything from the old insertion
    /// point onward. The new insertion point sits right after the replacement.
    ///
    /// The new line is assembled before the buffer is touched, so the buffer
    /// is never observable in a half-spliced state.
    pub fn splice(&mut self, offset: usize, replacement: &str) {
        debug_assert!(offset <= self.index, "splice offset beyond cursor");
        let offset = offset.min(self.index);
        let head_end = char_to_byte_index(&self.line, offset);
        let tail_start = char_to_byte_index(&self.line, self.index);

        let mut next =
            String::with_capacity(head_end + replacement.len() + self.line.len() - tail_start);
        next.push_str(&self.line[..head_end]);
        next.push_str(replacement);
        next.push_str(&self.line[tail_start..]);

        self.line = next;
        self.len = self.line.chars().count();
        self.index = offset + replacement.chars().count();
        self.recompute_cursor_col();
    }

    /// Number of terminal rows the prompt plus buffer occupies at the given
    /// width, leaving one trailing column for the cursor at end-of-line.
    #[must_use]
    pub fn required_rows(&self, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let width = width as usize;
        let cells = self.prompt_width + self.len + 1;
        let rows = cells.div_ceil(width).max(1);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    /// The display column recomputed from scratch; equals `cursor_col()` by
    /// invariant and is used as the consistency oracle in tests.
    #[must_use]
    pub fn derived_cursor_col(&self) -> usize {
        let byte_idx = char_to_byte_index(&self.line, self.index);
        self.prompt_width + UnicodeWidthStr::width(&self.line[..byte_idx])
    }

    fn recompute_cursor_col(&mut self) {
        self.cursor_col = self.derived_cursor_col();
    }

    fn char_at(&self, char_idx: usize) -> char {
        let byte_idx = char_to_byte_index(&self.line, char_idx);
        self.line[byte_idx..].chars().next().unwrap_or('\0')
    }

    #[inline]
    fn check_cursor_invariant(&self) {
        debug_assert_eq!(self.cursor_col, self.derived_cursor_col());
    }
}

/// Convert a character index to a byte index within a string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
