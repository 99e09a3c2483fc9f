//! Text buffer — an ordered sequence of lines backed by a rope.
//!
//! A `Buffer` wraps a [`ropey::Rope`] whose lines are joined by `\n` with no
//! trailing newline. That gives the invariants the interpreter relies on:
//!
//! - there is always at least one line (the empty buffer is one empty line);
//! - lines never contain `\n`, and `\n` is the only line break (ropey is
//!   built without `unicode_lines`, so form feeds and U+2028 stay text);
//! - columns are char offsets, so byte offsets never leak out.
//!
//! Editing methods clamp their positions to the buffer instead of panicking.
//! A motion that lands one past the end of the text, or a stale mark, can
//! never crash an edit.
//!
//! There is no file I/O. Content comes from lesson fixtures and leaves
//! through [`Buffer::lines`].

use std::fmt;

use ropey::Rope;

use crate::position::{Position, Range};

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// The text being edited.
#[derive(Clone, PartialEq, Eq)]
pub struct Buffer {
    rope: Rope,
    modified: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// A buffer holding one empty line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
        }
    }

    /// Build a buffer from text. `\r\n` and lone `\r` count as line breaks.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(&normalize_line_endings(text)),
            modified: false,
        }
    }

    /// Build a buffer from a list of lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = lines
            .into_iter()
            .map(|l| l.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        Self::from_text(&joined)
    }

    // -- Text access --------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Number of lines, never zero.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Index of the last line.
    #[inline]
    #[must_use]
    pub fn last_row(&self) -> usize {
        self.line_count() - 1
    }

    /// Char length of a line, excluding the line break. Rows past the end
    /// have length 0.
    #[must_use]
    pub fn line_len(&self, row: usize) -> usize {
        if row >= self.line_count() {
            return 0;
        }
        let line = self.rope.line(row);
        let total = line.len_chars();
        if total > 0 && line.char(total - 1) == '\n' {
            total - 1
        } else {
            total
        }
    }

    /// The text of a line without its line break. Rows past the end are
    /// empty.
    #[must_use]
    pub fn line(&self, row: usize) -> String {
        if row >= self.line_count() {
            return String::new();
        }
        let mut text = self.rope.line(row).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// The characters of a line, for column-indexed scans.
    #[must_use]
    pub fn line_chars(&self, row: usize) -> Vec<char> {
        self.line(row).chars().collect()
    }

    /// All lines, in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|row| self.line(row)).collect()
    }

    /// The character at a position, if the position is inside line content.
    #[must_use]
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if pos.row >= self.line_count() || pos.col >= self.line_len(pos.row) {
            return None;
        }
        let idx = self.rope.line_to_char(pos.row) + pos.col;
        Some(self.rope.char(idx))
    }

    /// The text in a range. Endpoints are clamped.
    #[must_use]
    pub fn text_in(&self, range: Range) -> String {
        let start = self.char_idx(range.start);
        let end = self.char_idx(range.end);
        self.rope.slice(start..end.max(start)).to_string()
    }

    /// The whole buffer as one string, lines joined by `\n`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Coordinate conversion ----------------------------------------------

    /// Absolute char index of a position. Rows past the end clamp to the
    /// last row; columns past the end of a line clamp to the line's end
    /// (the position just before its line break).
    #[must_use]
    pub fn char_idx(&self, pos: Position) -> usize {
        let row = pos.row.min(self.last_row());
        self.rope.line_to_char(row) + pos.col.min(self.line_len(row))
    }

    /// Position of an absolute char index. Indexes past the end clamp to the
    /// end of the buffer.
    #[must_use]
    pub fn pos_of(&self, char_idx: usize) -> Position {
        let idx = char_idx.min(self.rope.len_chars());
        let row = self.rope.char_to_line(idx);
        Position::new(row, idx - self.rope.line_to_char(row))
    }

    /// Clamp a position into the buffer.
    ///
    /// With `past_end` the column may sit one past the last char (insert
    /// mode); without it the column stops on the last char, or 0 on an
    /// empty line.
    #[must_use]
    pub fn clamp(&self, pos: Position, past_end: bool) -> Position {
        let row = pos.row.min(self.last_row());
        Position::new(row, pos.col.min(self.max_col(row, past_end)))
    }

    /// The largest valid cursor column on a row.
    #[must_use]
    pub fn max_col(&self, row: usize, past_end: bool) -> usize {
        let len = self.line_len(row);
        if past_end { len } else { len.saturating_sub(1) }
    }

    // -- Character editing --------------------------------------------------

    /// Insert text at a position. Newlines in `text` create new lines.
    pub fn insert(&mut self, pos: Position, text: &str) {
        if text.is_empty() {
            return;
        }
        let idx = self.char_idx(pos);
        self.rope.insert(idx, &normalize_line_endings(text));
        self.modified = true;
    }

    /// Insert a single character.
    pub fn insert_char(&mut self, pos: Position, ch: char) {
        let idx = self.char_idx(pos);
        self.rope.insert_char(idx, ch);
        self.modified = true;
    }

    /// Delete the text in a range and return it. Empty ranges are a no-op.
    pub fn delete(&mut self, range: Range) -> String {
        let start = self.char_idx(range.start);
        let end = self.char_idx(range.end);
        if end <= start {
            return String::new();
        }
        let removed = self.rope.slice(start..end).to_string();
        self.rope.remove(start..end);
        self.modified = true;
        removed
    }

    /// Split a line in two at `pos` (what Enter does in insert mode).
    pub fn split_line(&mut self, pos: Position) {
        self.insert_char(pos, '\n');
    }

    /// Join `row` onto the end of the previous line. Returns the column where
    /// the join happened, or `None` for row 0.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row > self.last_row() {
            return None;
        }
        let col = self.line_len(row - 1);
        let idx = self.rope.line_to_char(row) - 1;
        self.rope.remove(idx..=idx);
        self.modified = true;
        Some(col)
    }

    // -- Line editing -------------------------------------------------------

    /// Replace the text of a whole line.
    pub fn set_line(&mut self, row: usize, text: &str) {
        if row > self.last_row() {
            return;
        }
        let start = self.rope.line_to_char(row);
        let end = start + self.line_len(row);
        self.rope.remove(start..end);
        self.rope.insert(start, &text.replace(['\n', '\r'], ""));
        self.modified = true;
    }

    /// Insert whole lines so that the first one becomes row `at`. `at` may
    /// equal `line_count()` to append.
    pub fn insert_lines(&mut self, at: usize, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let body = lines.join("\n");
        if at > self.last_row() {
            let end = self.rope.len_chars();
            self.rope.insert(end, &format!("\n{body}"));
        } else {
            let idx = self.rope.line_to_char(at);
            self.rope.insert(idx, &format!("{body}\n"));
        }
        self.modified = true;
    }

    /// Remove `count` lines starting at `first` and return them.
    ///
    /// The buffer keeps at least one line: removing every line leaves a
    /// single empty one.
    pub fn remove_lines(&mut self, first: usize, count: usize) -> Vec<String> {
        if first > self.last_row() || count == 0 {
            return Vec::new();
        }
        let last = (first + count - 1).min(self.last_row());
        let removed: Vec<String> = (first..=last).map(|row| self.line(row)).collect();

        let total = self.rope.len_chars();
        let (start, end) = if last < self.last_row() {
            // Take the lines with their trailing breaks.
            (self.rope.line_to_char(first), self.rope.line_to_char(last + 1))
        } else if first > 0 {
            // Removing through the last line: take the break before `first`.
            (self.rope.line_to_char(first) - 1, total)
        } else {
            (0, total)
        };
        self.rope.remove(start..end);
        self.modified = true;
        removed
    }

    // -- Metadata -----------------------------------------------------------

    /// True after any edit since construction or the last
    /// [`mark_saved`](Self::mark_saved).
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.lines())
            .field("modified", &self.modified)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert `\r\n` and lone `\r` to `\n`.
fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_owned();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buf(lines: &[&str]) -> Buffer {
        Buffer::from_lines(lines)
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn new_buffer_has_one_empty_line() {
        let b = Buffer::new();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.lines(), vec![String::new()]);
        assert!(!b.is_modified());
    }

    #[test]
    fn from_lines_round_trips() {
        let b = buf(&["one", "", "three"]);
        assert_eq!(b.line_count(), 3);
        assert_eq!(b.lines(), vec!["one", "", "three"]);
    }

    #[test]
    fn from_text_normalizes_crlf() {
        let b = Buffer::from_text("a\r\nb\rc");
        assert_eq!(b.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn only_newline_breaks_lines() {
        let b = buf(&["x\u{0C}y", "a\u{2028}b\u{85}c"]);
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.lines(), vec!["x\u{0C}y", "a\u{2028}b\u{85}c"]);
        assert_eq!(b.line_len(0), 3);
    }

    #[test]
    fn empty_line_list_is_one_empty_line() {
        let b = Buffer::from_lines(Vec::<String>::new());
        assert_eq!(b.line_count(), 1);
    }

    // -- Access -------------------------------------------------------------

    #[test]
    fn line_len_excludes_break() {
        let b = buf(&["hello", "café"]);
        assert_eq!(b.line_len(0), 5);
        assert_eq!(b.line_len(1), 4);
        assert_eq!(b.line_len(9), 0);
    }

    #[test]
    fn char_at_content_only() {
        let b = buf(&["ab", "c"]);
        assert_eq!(b.char_at(Position::new(0, 1)), Some('b'));
        assert_eq!(b.char_at(Position::new(0, 2)), None);
        assert_eq!(b.char_at(Position::new(5, 0)), None);
    }

    #[test]
    fn text_in_crosses_lines() {
        let b = buf(&["hello", "world"]);
        let r = Range::new(Position::new(0, 3), Position::new(1, 2));
        assert_eq!(b.text_in(r), "lo\nwo");
    }

    // -- Coordinates --------------------------------------------------------

    #[test]
    fn char_idx_and_back() {
        let b = buf(&["abc", "de"]);
        assert_eq!(b.char_idx(Position::new(1, 1)), 5);
        assert_eq!(b.pos_of(5), Position::new(1, 1));
    }

    #[test]
    fn char_idx_clamps() {
        let b = buf(&["abc", "de"]);
        assert_eq!(b.char_idx(Position::new(0, 99)), 3);
        assert_eq!(b.char_idx(Position::new(99, 0)), 4);
    }

    #[test]
    fn clamp_normal_and_insert() {
        let b = buf(&["abc", ""]);
        assert_eq!(b.clamp(Position::new(0, 9), false), Position::new(0, 2));
        assert_eq!(b.clamp(Position::new(0, 9), true), Position::new(0, 3));
        assert_eq!(b.clamp(Position::new(7, 4), false), Position::new(1, 0));
    }

    // -- Character editing --------------------------------------------------

    #[test]
    fn insert_and_delete() {
        let mut b = buf(&["held"]);
        b.insert(Position::new(0, 3), "lo wor");
        assert_eq!(b.line(0), "hello world");
        let removed = b.delete(Range::on_row(0, 0, 6));
        assert_eq!(removed, "hello ");
        assert_eq!(b.line(0), "world");
        assert!(b.is_modified());
    }

    #[test]
    fn insert_with_newline_splits() {
        let mut b = buf(&["ab"]);
        b.insert(Position::new(0, 1), "x\ny");
        assert_eq!(b.lines(), vec!["ax", "yb"]);
    }

    #[test]
    fn delete_across_lines_joins() {
        let mut b = buf(&["abc", "def"]);
        b.delete(Range::new(Position::new(0, 2), Position::new(1, 1)));
        assert_eq!(b.lines(), vec!["abef"]);
    }

    #[test]
    fn split_and_join() {
        let mut b = buf(&["hello"]);
        b.split_line(Position::new(0, 2));
        assert_eq!(b.lines(), vec!["he", "llo"]);
        assert_eq!(b.join_with_previous(1), Some(2));
        assert_eq!(b.lines(), vec!["hello"]);
        assert_eq!(b.join_with_previous(0), None);
    }

    // -- Line editing -------------------------------------------------------

    #[test]
    fn set_line_replaces_content() {
        let mut b = buf(&["a", "b"]);
        b.set_line(1, "bee");
        assert_eq!(b.lines(), vec!["a", "bee"]);
    }

    #[test]
    fn insert_lines_middle_and_end() {
        let mut b = buf(&["a", "d"]);
        b.insert_lines(1, &["b".into(), "c".into()]);
        assert_eq!(b.lines(), vec!["a", "b", "c", "d"]);
        b.insert_lines(4, &["e".into()]);
        assert_eq!(b.lines(), vec!["a", "b", "c", "d", "e"]);
        b.insert_lines(0, &["_".into()]);
        assert_eq!(b.lines()[0], "_");
    }

    #[test]
    fn remove_middle_lines() {
        let mut b = buf(&["a", "b", "c", "d"]);
        assert_eq!(b.remove_lines(1, 2), vec!["b", "c"]);
        assert_eq!(b.lines(), vec!["a", "d"]);
    }

    #[test]
    fn remove_last_lines() {
        let mut b = buf(&["a", "b", "c"]);
        assert_eq!(b.remove_lines(1, 5), vec!["b", "c"]);
        assert_eq!(b.lines(), vec!["a"]);
    }

    #[test]
    fn remove_every_line_leaves_one() {
        let mut b = buf(&["a", "b"]);
        b.remove_lines(0, 2);
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), "");
    }

    #[test]
    fn mark_saved_clears_modified() {
        let mut b = buf(&["x"]);
        b.insert_char(Position::ZERO, 'y');
        assert!(b.is_modified());
        b.mark_saved();
        assert!(!b.is_modified());
    }
}
