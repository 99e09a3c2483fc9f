//! Insert mode — typing into the buffer.
//!
//! The undo snapshot for an insert session is held by the history when the
//! session starts (`i`, `a`, `A`, `I`) and pushed on the first real edit, so
//! entering and leaving insert without typing leaves no undo step. `c`,
//! `o` and `O` push their snapshot before entering, and the typed text joins
//! that step.

use dojo_input::{KeyCode, KeyEvent};
use tracing::debug;

use super::Session;
use crate::mode::Mode;
use crate::position::{Position, Range};

impl Session {
    pub(super) fn handle_insert(&mut self, key: KeyEvent) {
        if key.is_escape() {
            self.history.discard_pending();
            self.mode = Mode::Normal;
            self.cursor.move_left(1, &self.buffer, true);
            return;
        }

        let pos = self.cursor.position();
        match key.code {
            KeyCode::Enter => {
                self.history.commit_pending();
                self.buffer.split_line(pos);
                self.cursor
                    .set_position(Position::new(pos.row + 1, 0), &self.buffer, true);
            }
            KeyCode::Tab => self.insert_char('\t'),
            KeyCode::Backspace => self.backspace(pos),
            KeyCode::Delete => self.delete_forward(pos),
            KeyCode::Left => self.cursor.move_left(1, &self.buffer, true),
            KeyCode::Right => self.cursor.move_right(1, &self.buffer, true),
            KeyCode::Up => self.cursor.move_up(1, &self.buffer, true),
            KeyCode::Down => self.cursor.move_down(1, &self.buffer, true),
            KeyCode::Home => self.cursor.move_to_line_start(),
            KeyCode::End => self.cursor.move_to_line_end(&self.buffer, true),
            _ => match key.printable() {
                Some(ch) => self.insert_char(ch),
                None => debug!(%key, "unmapped key in insert mode"),
            },
        }
    }

    fn insert_char(&mut self, ch: char) {
        self.history.commit_pending();
        let pos = self.cursor.position();
        self.buffer.insert_char(pos, ch);
        self.cursor
            .set_position(pos.with_col(pos.col + 1), &self.buffer, true);
    }

    /// Delete before the cursor; at column 0, join with the line above.
    fn backspace(&mut self, pos: Position) {
        if pos.col > 0 {
            self.history.commit_pending();
            self.buffer
                .delete(Range::on_row(pos.row, pos.col - 1, pos.col));
            self.cursor
                .set_position(pos.with_col(pos.col - 1), &self.buffer, true);
        } else if pos.row > 0 {
            self.history.commit_pending();
            if let Some(col) = self.buffer.join_with_previous(pos.row) {
                self.cursor
                    .set_position(Position::new(pos.row - 1, col), &self.buffer, true);
            }
        }
    }

    /// Delete under the cursor; at the line end, join the next line up.
    fn delete_forward(&mut self, pos: Position) {
        if pos.col < self.buffer.line_len(pos.row) {
            self.history.commit_pending();
            self.buffer
                .delete(Range::on_row(pos.row, pos.col, pos.col + 1));
        } else if pos.row < self.buffer.last_row() {
            self.history.commit_pending();
            self.buffer.join_with_previous(pos.row + 1);
        }
    }
}
