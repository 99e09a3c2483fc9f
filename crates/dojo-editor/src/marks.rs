//! Marks — named positions (`ma`..`mz`) and the last-jump position.
//!
//! `m{a-z}` stores the cursor position under a letter. `'{a-z}` and
//! `` `{a-z} `` jump back to it. Before any jump (mark jump, `G`, `gg`,
//! search) the cursor position is remembered as the *last jump*, and `''`
//! or ` `` ` swaps the cursor with it.
//!
//! Marks are not adjusted when lines move. A mark that points past the end
//! of the buffer is clamped by whoever uses it.

use crate::position::Position;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marks {
    letters: [Option<Position>; 26],
    last_jump: Option<Position>,
}

fn slot(letter: char) -> Option<usize> {
    letter
        .is_ascii_lowercase()
        .then(|| (letter as u8 - b'a') as usize)
}

impl Marks {
    /// Store `pos` under `letter`. Returns `false` for anything but `a-z`.
    pub fn set(&mut self, letter: char, pos: Position) -> bool {
        let Some(i) = slot(letter) else {
            return false;
        };
        self.letters[i] = Some(pos);
        true
    }

    #[must_use]
    pub fn get(&self, letter: char) -> Option<Position> {
        slot(letter).and_then(|i| self.letters[i])
    }

    /// Remember `from` as the position to come back to with `''`.
    pub const fn record_jump(&mut self, from: Position) {
        self.last_jump = Some(from);
    }

    #[must_use]
    pub const fn last_jump(&self) -> Option<Position> {
        self.last_jump
    }

    /// `''`: the last-jump position, replacing it with `from` so that a
    /// second `''` comes back.
    pub const fn swap_last_jump(&mut self, from: Position) -> Option<Position> {
        let target = self.last_jump;
        if target.is_some() {
            self.last_jump = Some(from);
        }
        target
    }

    /// Letters that currently hold a mark, in order.
    pub fn set_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.letters
            .iter()
            .zip('a'..='z')
            .filter_map(|(pos, letter)| pos.map(|_| letter))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
