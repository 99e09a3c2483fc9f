//! Cursor — position tracking with movement and a selection anchor.
//!
//! Movement methods take a `past_end: bool` instead of a mode. Normal and
//! visual modes pass `false` (the cursor sits ON a character); insert mode
//! passes `true` (the cursor may sit after the last character). The cursor
//! only moves within the limit it is given.
//!
//! # Sticky column
//!
//! Vertical movement remembers the column the cursor came from, so moving
//! through a short line and back onto a long one restores the column.
//! Horizontal movement resets it.
//!
//! # Selection
//!
//! Visual modes set an `anchor`. The selection runs between the anchor and
//! the cursor; `o` swaps the two ends.

use crate::buffer::Buffer;
use crate::position::{Position, Range};
use crate::word::{self, WordKind};

/// A cursor in a buffer. Does not own the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
    sticky_col: usize,
    anchor: Option<Position>,
}

impl Cursor {
    /// A cursor at `pos`, unclamped.
    #[must_use]
    pub const fn at(pos: Position) -> Self {
        Self {
            pos,
            sticky_col: pos.col,
            anchor: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    #[must_use]
    pub const fn row(&self) -> usize {
        self.pos.row
    }

    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    #[inline]
    #[must_use]
    pub const fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// The ordered `[anchor, cursor]` span, if a selection is active. The
    /// end is the cursor or anchor itself, so callers decide inclusivity.
    #[must_use]
    pub fn selection(&self) -> Option<Range> {
        self.anchor.map(|a| Range::ordered(a, self.pos))
    }

    // -- Anchor -------------------------------------------------------------

    /// Drop the anchor at the current position.
    pub const fn set_anchor(&mut self) {
        self.anchor = Some(self.pos);
    }

    pub const fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Exchange the cursor and the anchor (`o` in visual mode).
    pub const fn swap_anchor(&mut self) {
        if let Some(anchor) = self.anchor {
            self.anchor = Some(self.pos);
            self.pos = anchor;
            self.sticky_col = anchor.col;
        }
    }

    // -- Direct positioning -------------------------------------------------

    /// Move to `pos`, clamped. Resets the sticky column.
    pub fn set_position(&mut self, pos: Position, buf: &Buffer, past_end: bool) {
        self.pos = buf.clamp(pos, past_end);
        self.sticky_col = self.pos.col;
    }

    /// Move to column 0 of `row` (`G`, `gg`, `5G`).
    pub fn goto_row(&mut self, row: usize, buf: &Buffer, past_end: bool) {
        self.set_position(Position::new(row, 0), buf, past_end);
    }

    // -- Horizontal movement ------------------------------------------------

    /// `h`: left by `count`, stopping at column 0.
    pub fn move_left(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        let col = self.pos.col.min(buf.max_col(self.pos.row, past_end));
        self.pos.col = col.saturating_sub(count);
        self.sticky_col = self.pos.col;
    }

    /// `l`: right by `count`, stopping at the line's column limit.
    pub fn move_right(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        let max = buf.max_col(self.pos.row, past_end);
        self.pos.col = self.pos.col.saturating_add(count).min(max);
        self.sticky_col = self.pos.col;
    }

    /// `0`.
    pub const fn move_to_line_start(&mut self) {
        self.pos.col = 0;
        self.sticky_col = 0;
    }

    /// `^`: first non-blank character of the line.
    pub fn move_to_first_non_blank(&mut self, buf: &Buffer, past_end: bool) {
        let col = buf
            .line(self.pos.row)
            .chars()
            .take_while(|ch| ch.is_whitespace())
            .count();
        self.pos.col = col.min(buf.max_col(self.pos.row, past_end));
        self.sticky_col = self.pos.col;
    }

    /// `$`: last character of the line (or past it in insert mode).
    pub fn move_to_line_end(&mut self, buf: &Buffer, past_end: bool) {
        self.pos.col = buf.max_col(self.pos.row, past_end);
        self.sticky_col = usize::MAX;
    }

    // -- Vertical movement --------------------------------------------------

    /// `k`: up by `count`, honoring the sticky column.
    pub fn move_up(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        self.pos.row = self.pos.row.saturating_sub(count);
        self.pos.col = self.sticky_col.min(buf.max_col(self.pos.row, past_end));
    }

    /// `j`: down by `count`, honoring the sticky column.
    pub fn move_down(&mut self, count: usize, buf: &Buffer, past_end: bool) {
        self.pos.row = self.pos.row.saturating_add(count).min(buf.last_row());
        self.pos.col = self.sticky_col.min(buf.max_col(self.pos.row, past_end));
    }

    // -- Word motions -------------------------------------------------------

    /// `w` / `W`.
    pub fn word_forward(&mut self, count: usize, kind: WordKind, buf: &Buffer, past_end: bool) {
        for _ in 0..count {
            self.pos = word::next_word_start(buf, self.pos, kind);
        }
        self.settle(buf, past_end);
    }

    /// `b` / `B`.
    pub fn word_backward(&mut self, count: usize, kind: WordKind, buf: &Buffer, past_end: bool) {
        for _ in 0..count {
            self.pos = word::prev_word_start(buf, self.pos, kind);
        }
        self.settle(buf, past_end);
    }

    /// `e` / `E`.
    pub fn word_end(&mut self, count: usize, kind: WordKind, buf: &Buffer, past_end: bool) {
        for _ in 0..count {
            self.pos = word::word_end(buf, self.pos, kind);
        }
        self.settle(buf, past_end);
    }

    // -- Character find -----------------------------------------------------

    /// `f{ch}` / `F{ch}` / `t{ch}` / `T{ch}`: jump to the `count`th
    /// occurrence of `ch` on the current line. Returns `false` (and does not
    /// move) when there is no such occurrence.
    pub fn find_char(&mut self, kind: FindKind, ch: char, count: usize, buf: &Buffer) -> bool {
        let line = buf.line_chars(self.pos.row);
        let col = self.pos.col;
        let target = match kind {
            FindKind::Forward => nth_forward(&line, col, ch, count),
            FindKind::Backward => nth_backward(&line, col, ch, count),
            FindKind::TillForward => nth_forward(&line, col, ch, count)
                .map(|c| c - 1)
                .filter(|&c| c > col),
            FindKind::TillBackward => nth_backward(&line, col, ch, count)
                .map(|c| c + 1)
                .filter(|&c| c < col),
        };
        let Some(target) = target else {
            return false;
        };
        self.pos.col = target;
        self.sticky_col = target;
        true
    }

    // -- Clamping -----------------------------------------------------------

    /// Pull the cursor (and anchor) back inside the buffer. Called after
    /// every edit and every keystroke.
    pub fn clamp(&mut self, buf: &Buffer, past_end: bool) {
        self.pos = buf.clamp(self.pos, past_end);
        if let Some(anchor) = &mut self.anchor {
            *anchor = buf.clamp(*anchor, past_end);
        }
    }

    fn settle(&mut self, buf: &Buffer, past_end: bool) {
        self.pos = buf.clamp(self.pos, past_end);
        self.sticky_col = self.pos.col;
    }
}

// ---------------------------------------------------------------------------
// Character find
// ---------------------------------------------------------------------------

/// The four flavors of in-line character search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindKind {
    /// `f`
    Forward,
    /// `F`
    Backward,
    /// `t`
    TillForward,
    /// `T`
    TillBackward,
}

impl FindKind {
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'f' => Some(Self::Forward),
            'F' => Some(Self::Backward),
            't' => Some(Self::TillForward),
            'T' => Some(Self::TillBackward),
            _ => None,
        }
    }

    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Forward => 'f',
            Self::Backward => 'F',
            Self::TillForward => 't',
            Self::TillBackward => 'T',
        }
    }

    /// The same search in the other direction (what `,` repeats).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
            Self::TillForward => Self::TillBackward,
            Self::TillBackward => Self::TillForward,
        }
    }
}

fn nth_forward(line: &[char], from: usize, ch: char, count: usize) -> Option<usize> {
    line.iter()
        .enumerate()
        .skip(from + 1)
        .filter(|(_, c)| **c == ch)
        .nth(count.saturating_sub(1))
        .map(|(i, _)| i)
}

fn nth_backward(line: &[char], from: usize, ch: char, count: usize) -> Option<usize> {
    line.iter()
        .enumerate()
        .take(from.min(line.len()))
        .rev()
        .filter(|(_, c)| **c == ch)
        .nth(count.saturating_sub(1))
        .map(|(i, _)| i)
}

/// `%`: the bracket matching the one under `pos`, counting nesting.
/// Searches across lines.
#[must_use]
pub fn matching_bracket(buf: &Buffer, pos: Position) -> Option<Position> {
    let ch = buf.char_at(pos)?;
    let (open, close, forward) = match ch {
        '(' => ('(', ')', true),
        '[' => ('[', ']', true),
        '{' => ('{', '}', true),
        ')' => ('(', ')', false),
        ']' => ('[', ']', false),
        '}' => ('{', '}', false),
        _ => return None,
    };

    let rope = buf.rope();
    let start = buf.char_idx(pos);
    let mut depth = 0usize;
    let step = |c: char, depth: &mut usize| -> bool {
        let (inc, dec) = if forward { (open, close) } else { (close, open) };
        if c == inc {
            *depth += 1;
        } else if c == dec {
            *depth -= 1;
        }
        *depth == 0
    };

    if forward {
        (start..rope.len_chars())
            .find(|&i| step(rope.char(i), &mut depth))
            .map(|i| buf.pos_of(i))
    } else {
        (0..=start)
            .rev()
            .find(|&i| step(rope.char(i), &mut depth))
            .map(|i| buf.pos_of(i))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Buffer {
        Buffer::from_lines(["hello", "world", "hi", "", "last line"])
    }

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_stops_at_zero() {
        let buf = sample();
        let mut c = Cursor::at(p(0, 2));
        c.move_left(5, &buf, false);
        assert_eq!(c.position(), p(0, 0));
    }

    #[test]
    fn right_stops_on_last_char_in_normal() {
        let buf = sample();
        let mut c = Cursor::default();
        c.move_right(99, &buf, false);
        assert_eq!(c.col(), 4);
        c.move_right(99, &buf, true);
        assert_eq!(c.col(), 5);
    }

    #[test]
    fn line_end_and_start() {
        let buf = sample();
        let mut c = Cursor::at(p(4, 3));
        c.move_to_line_end(&buf, false);
        assert_eq!(c.col(), 8);
        c.move_to_line_start();
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn first_non_blank() {
        let buf = Buffer::from_text("    indented");
        let mut c = Cursor::at(p(0, 9));
        c.move_to_first_non_blank(&buf, false);
        assert_eq!(c.col(), 4);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn sticky_column_survives_short_lines() {
        let buf = sample();
        let mut c = Cursor::at(p(1, 4));
        c.move_down(1, &buf, false);
        assert_eq!(c.position(), p(2, 1));
        c.move_down(1, &buf, false);
        assert_eq!(c.position(), p(3, 0));
        c.move_down(1, &buf, false);
        assert_eq!(c.position(), p(4, 4));
    }

    #[test]
    fn dollar_then_vertical_sticks_to_line_end() {
        let buf = sample();
        let mut c = Cursor::at(p(2, 0));
        c.move_to_line_end(&buf, false);
        c.move_down(2, &buf, false);
        assert_eq!(c.position(), p(4, 8));
    }

    #[test]
    fn vertical_clamps_to_buffer() {
        let buf = sample();
        let mut c = Cursor::default();
        c.move_down(100, &buf, false);
        assert_eq!(c.row(), 4);
        c.move_up(100, &buf, false);
        assert_eq!(c.row(), 0);
    }

    #[test]
    fn goto_row_lands_on_col_zero() {
        let buf = sample();
        let mut c = Cursor::at(p(0, 3));
        c.goto_row(4, &buf, false);
        assert_eq!(c.position(), p(4, 0));
        c.goto_row(40, &buf, false);
        assert_eq!(c.position(), p(4, 0));
    }

    // -- Words --------------------------------------------------------------

    #[test]
    fn word_motions_with_count() {
        let buf = Buffer::from_text("one two three four");
        let mut c = Cursor::default();
        c.word_forward(2, WordKind::Small, &buf, false);
        assert_eq!(c.col(), 8);
        c.word_end(1, WordKind::Small, &buf, false);
        assert_eq!(c.col(), 12);
        c.word_backward(3, WordKind::Small, &buf, false);
        assert_eq!(c.col(), 0);
    }

    // -- Character find -----------------------------------------------------

    #[test]
    fn find_forward_and_till() {
        let buf = Buffer::from_text("a,b,c,d");
        let mut c = Cursor::default();
        assert!(c.find_char(FindKind::Forward, ',', 2, &buf));
        assert_eq!(c.col(), 3);
        assert!(c.find_char(FindKind::TillForward, 'd', 1, &buf));
        assert_eq!(c.col(), 5);
    }

    #[test]
    fn find_backward_and_till() {
        let buf = Buffer::from_text("a,b,c,d");
        let mut c = Cursor::at(p(0, 6));
        assert!(c.find_char(FindKind::Backward, 'b', 1, &buf));
        assert_eq!(c.col(), 2);
        assert!(c.find_char(FindKind::TillBackward, 'a', 1, &buf));
        assert_eq!(c.col(), 1);
    }

    #[test]
    fn find_missing_does_not_move() {
        let buf = Buffer::from_text("abc");
        let mut c = Cursor::default();
        assert!(!c.find_char(FindKind::Forward, 'z', 1, &buf));
        assert_eq!(c.col(), 0);
    }

    #[test]
    fn till_adjacent_does_not_move() {
        let buf = Buffer::from_text("ab");
        let mut c = Cursor::default();
        assert!(!c.find_char(FindKind::TillForward, 'b', 1, &buf));
    }

    #[test]
    fn find_kind_opposites() {
        assert_eq!(FindKind::Forward.opposite(), FindKind::Backward);
        assert_eq!(FindKind::TillBackward.opposite(), FindKind::TillForward);
        assert_eq!(FindKind::from_char('t'), Some(FindKind::TillForward));
        assert_eq!(FindKind::from_char('x'), None);
    }

    // -- Matching bracket ---------------------------------------------------

    #[test]
    fn percent_forward_and_back() {
        let buf = Buffer::from_text("f(a, (b), c)");
        assert_eq!(matching_bracket(&buf, p(0, 1)), Some(p(0, 11)));
        assert_eq!(matching_bracket(&buf, p(0, 11)), Some(p(0, 1)));
        assert_eq!(matching_bracket(&buf, p(0, 5)), Some(p(0, 7)));
    }

    #[test]
    fn percent_across_lines() {
        let buf = Buffer::from_lines(["fn x() {", "  y", "}"]);
        assert_eq!(matching_bracket(&buf, p(0, 7)), Some(p(2, 0)));
    }

    #[test]
    fn percent_unbalanced_or_not_bracket() {
        let buf = Buffer::from_text("(abc");
        assert_eq!(matching_bracket(&buf, p(0, 0)), None);
        assert_eq!(matching_bracket(&buf, p(0, 1)), None);
    }

    // -- Anchor -------------------------------------------------------------

    #[test]
    fn selection_is_ordered_and_swappable() {
        let mut c = Cursor::at(p(2, 3));
        c.set_anchor();
        c.set_position(p(0, 1), &sample(), false);
        assert_eq!(c.selection(), Some(Range::new(p(0, 1), p(2, 3))));
        c.swap_anchor();
        assert_eq!(c.position(), p(2, 3));
        assert_eq!(c.anchor(), Some(p(0, 1)));
        c.clear_anchor();
        assert_eq!(c.selection(), None);
    }

    #[test]
    fn clamp_pulls_anchor_too() {
        let buf = Buffer::from_text("ab");
        let mut c = Cursor::at(p(5, 5));
        c.set_anchor();
        c.clamp(&buf, false);
        assert_eq!(c.position(), p(0, 1));
        assert_eq!(c.anchor(), Some(p(0, 1)));
    }
}
