//! Word motions: `w`, `b`, `e` and their WORD variants `W`, `B`, `E`.
//!
//! A **word** is a run of word characters (letters, digits, `_`) or a run of
//! other non-blank characters, so `foo.bar` holds three words. A **WORD** is
//! any run of non-blank characters.
//!
//! Motions walk the rope by absolute char index, which lets them cross line
//! breaks without special casing. An empty line counts as a word for `w` and
//! `b`, as in Vim.

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Punctuation,
    Blank,
    Newline,
}

/// True for letters, digits and `_`.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

const fn is_token(class: CharClass) -> bool {
    matches!(class, CharClass::Word | CharClass::Punctuation)
}

/// Which notion of "word" a motion uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordKind {
    /// `w`/`b`/`e`: punctuation runs are separate words.
    Small,
    /// `W`/`B`/`E`: only blanks separate words.
    Big,
}

impl WordKind {
    fn classify(self, ch: char) -> CharClass {
        if ch == '\n' {
            CharClass::Newline
        } else if ch.is_whitespace() {
            CharClass::Blank
        } else if self == Self::Big || is_word_char(ch) {
            CharClass::Word
        } else {
            CharClass::Punctuation
        }
    }
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// `w` / `W`: start of the next word. Stays put when there is none.
#[must_use]
pub fn next_word_start(buf: &Buffer, pos: Position, kind: WordKind) -> Position {
    let rope = buf.rope();
    let total = rope.len_chars();
    let mut idx = buf.char_idx(pos);
    if idx >= total {
        return pos;
    }

    let class = kind.classify(rope.char(idx));
    if is_token(class) {
        while idx < total && kind.classify(rope.char(idx)) == class {
            idx += 1;
        }
    }

    while idx < total {
        match kind.classify(rope.char(idx)) {
            CharClass::Word | CharClass::Punctuation => return buf.pos_of(idx),
            CharClass::Blank => idx += 1,
            CharClass::Newline => {
                idx += 1;
                // The next line is empty: it is a word of its own.
                if idx == total || rope.char(idx) == '\n' {
                    return buf.pos_of(idx);
                }
            }
        }
    }
    pos
}

/// `b` / `B`: start of the previous word. Stays put at the buffer start.
#[must_use]
pub fn prev_word_start(buf: &Buffer, pos: Position, kind: WordKind) -> Position {
    let rope = buf.rope();
    let start = buf.char_idx(pos);
    if start == 0 {
        return pos;
    }

    let mut idx = start - 1;
    loop {
        match kind.classify(rope.char(idx)) {
            CharClass::Word | CharClass::Punctuation => break,
            CharClass::Newline if buf.line_len(rope.char_to_line(idx)) == 0 => {
                return buf.pos_of(idx);
            }
            _ if idx == 0 => return Position::ZERO,
            _ => idx -= 1,
        }
    }

    let class = kind.classify(rope.char(idx));
    while idx > 0 && kind.classify(rope.char(idx - 1)) == class {
        idx -= 1;
    }
    buf.pos_of(idx)
}

/// True if `pos` is on the last char of a word (`cw` there changes only
/// that char).
#[must_use]
pub fn at_word_end(buf: &Buffer, pos: Position, kind: WordKind) -> bool {
    let rope = buf.rope();
    let idx = buf.char_idx(pos);
    if idx >= rope.len_chars() {
        return false;
    }
    let class = kind.classify(rope.char(idx));
    is_token(class) && (idx + 1 >= rope.len_chars() || kind.classify(rope.char(idx + 1)) != class)
}

/// True if `pos` is on a blank (space or tab), not a word char.
#[must_use]
pub fn on_blank(buf: &Buffer, pos: Position) -> bool {
    buf.char_at(pos).is_some_and(|ch| ch.is_whitespace())
}

/// `e` / `E`: last char of the current or next word. Stays put when there
/// is none.
#[must_use]
pub fn word_end(buf: &Buffer, pos: Position, kind: WordKind) -> Position {
    let rope = buf.rope();
    let total = rope.len_chars();
    let mut idx = buf.char_idx(pos) + 1;

    while idx < total && !is_token(kind.classify(rope.char(idx))) {
        idx += 1;
    }
    if idx >= total {
        return pos;
    }

    let class = kind.classify(rope.char(idx));
    while idx + 1 < total && kind.classify(rope.char(idx + 1)) == class {
        idx += 1;
    }
    buf.pos_of(idx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
