//! Visual mode — selections and the operators that act on them.
//!
//! The selection runs from the anchor (set on entering visual mode) to the
//! cursor. Motions move the cursor only. Three shapes:
//!
//! - **Char** (`v`): every char from start to end inclusive, across lines.
//! - **Line** (`V`): every selected row, whole.
//! - **Block** (`Ctrl-v`): the column rectangle between anchor and cursor,
//!   clipped to each line.
//!
//! Operators leave visual mode before they snapshot, so undo always lands
//! back in normal mode.

use dojo_input::{KeyCode, KeyEvent};
use tracing::debug;

use super::operator::Span;
use super::{Operator, Pending, Session};
use crate::cursor::FindKind;
use crate::mode::{Mode, VisualKind};
use crate::position::{Position, Range};

impl Session {
    pub(super) fn enter_visual(&mut self, kind: VisualKind) {
        self.cursor.set_anchor();
        self.mode = Mode::Visual(kind);
        self.note_visual(kind);
    }

    fn note_visual(&mut self, kind: VisualKind) {
        self.usage.visual_kinds.insert(kind);
        self.usage.practice(match kind {
            VisualKind::Char => "v_visual_mode",
            VisualKind::Line => "V_visual_line_mode",
            VisualKind::Block => "ctrl_v_visual_block_mode",
        });
    }

    /// `v`, `V`, `Ctrl-v` inside visual mode: switch shape, or leave when
    /// the shape is already active.
    fn switch_visual(&mut self, to: VisualKind, from: VisualKind) {
        if to == from {
            self.leave_visual();
        } else {
            self.mode = Mode::Visual(to);
            self.note_visual(to);
        }
    }

    fn leave_visual(&mut self) {
        self.cursor.clear_anchor();
        self.mode = Mode::Normal;
    }

    pub(super) fn handle_visual(&mut self, key: KeyEvent, kind: VisualKind) {
        self.clear_message();

        if key.is_escape() {
            self.pending = None;
            self.count = None;
            self.leave_visual();
            return;
        }
        if key.is_ctrl() {
            self.pending = None;
            self.count = None;
            if key.is_ctrl_char('v') {
                self.switch_visual(VisualKind::Block, kind);
            } else {
                debug!(%key, "unmapped ctrl key in visual mode");
            }
            return;
        }

        if let Some(pending) = self.pending.take() {
            match (pending, key.printable()) {
                (Pending::G { count }, Some('g')) => self.goto_line(count, 0),
                (Pending::CharFind { kind, count }, Some(ch)) => self.char_find(kind, ch, count),
                _ => debug!(%key, "dropped pending keys in visual mode"),
            }
            return;
        }

        match key.code {
            KeyCode::Char(d @ '1'..='9') => {
                self.push_count_digit(d);
                return;
            }
            KeyCode::Char('0') if self.count.is_some() => {
                self.push_count_digit('0');
                return;
            }
            _ => {}
        }

        let raw_count = self.count.take();
        if self.apply_motion(key, raw_count) {
            return;
        }
        let Some(ch) = key.printable() else {
            debug!(%key, "unmapped key in visual mode");
            return;
        };

        match ch {
            'g' => self.pending = Some(Pending::G { count: raw_count }),
            'f' | 'F' | 't' | 'T' => {
                if let Some(find) = FindKind::from_char(ch) {
                    self.pending = Some(Pending::CharFind {
                        kind: find,
                        count: raw_count.unwrap_or(1),
                    });
                }
            }
            'o' => self.cursor.swap_anchor(),
            'v' => self.switch_visual(VisualKind::Char, kind),
            'V' => self.switch_visual(VisualKind::Line, kind),
            'd' | 'x' => self.visual_operator(Operator::Delete, kind),
            'c' => self.visual_operator(Operator::Change, kind),
            'y' => self.visual_operator(Operator::Yank, kind),
            '>' => self.visual_shift(false),
            '<' => self.visual_shift(true),
            _ => debug!(%key, "unmapped key in visual mode"),
        }
    }

    // -- Selection ----------------------------------------------------------

    /// Anchor and cursor in buffer order.
    fn visual_bounds(&self) -> (Position, Position) {
        let pos = self.cursor.position();
        let anchor = self.cursor.anchor().unwrap_or(pos);
        if anchor <= pos { (anchor, pos) } else { (pos, anchor) }
    }

    /// Rows and columns of the block rectangle: `(top, bottom, left, right)`,
    /// all inclusive.
    fn block_bounds(&self) -> (usize, usize, usize, usize) {
        let pos = self.cursor.position();
        let anchor = self.cursor.anchor().unwrap_or(pos);
        (
            anchor.row.min(pos.row),
            anchor.row.max(pos.row),
            anchor.col.min(pos.col),
            anchor.col.max(pos.col),
        )
    }

    /// The cells a renderer highlights.
    pub(super) fn selection_cells(&self, kind: VisualKind) -> Vec<Position> {
        let (start, end) = self.visual_bounds();
        let row_cells = |row: usize, from: usize, to: usize| -> Vec<Position> {
            let len = self.buffer.line_len(row);
            if len == 0 {
                return vec![Position::new(row, 0)];
            }
            (from..=to.min(len - 1))
                .map(|col| Position::new(row, col))
                .collect()
        };

        match kind {
            VisualKind::Char => (start.row..=end.row)
                .flat_map(|row| {
                    let from = if row == start.row { start.col } else { 0 };
                    let to = if row == end.row { end.col } else { usize::MAX };
                    row_cells(row, from, to)
                })
                .collect(),
            VisualKind::Line => (start.row..=end.row)
                .flat_map(|row| row_cells(row, 0, usize::MAX))
                .collect(),
            VisualKind::Block => {
                let (top, bottom, left, right) = self.block_bounds();
                (top..=bottom)
                    .flat_map(|row| {
                        let len = self.buffer.line_len(row);
                        (left..=right.min(len.saturating_sub(1)))
                            .filter(move |&col| col < len)
                            .map(move |col| Position::new(row, col))
                    })
                    .collect()
            }
        }
    }

    // -- Operators ----------------------------------------------------------

    fn visual_operator(&mut self, op: Operator, kind: VisualKind) {
        let (start, end) = self.visual_bounds();
        let span = match kind {
            VisualKind::Char => {
                // The end char is included; on an empty line that is its
                // line break.
                let past_end = self.buffer.pos_of(self.buffer.char_idx(end) + 1);
                Span::Chars(Range::new(start, past_end))
            }
            VisualKind::Line => Span::Lines {
                first: start.row,
                last: end.row,
            },
            VisualKind::Block => {
                self.block_operator(op);
                return;
            }
        };
        self.leave_visual();
        if matches!(span, Span::Chars(range) if range.is_empty()) {
            debug!("empty selection");
            return;
        }
        self.apply_operator(op, span);
        self.usage
            .practice(&format!("v{}_visual_{}", op.key(), op.name()));
    }

    /// Block delete, yank or change. The register receives the clipped
    /// rows joined by line breaks.
    fn block_operator(&mut self, op: Operator) {
        let (top, bottom, left, right) = self.block_bounds();
        let pieces: Vec<String> = (top..=bottom)
            .map(|row| {
                self.buffer
                    .line_chars(row)
                    .into_iter()
                    .skip(left)
                    .take(right + 1 - left)
                    .collect()
            })
            .collect();
        self.leave_visual();
        let corner = Position::new(top, left);

        let changed = op != Operator::Yank && pieces.iter().any(|piece| !piece.is_empty());
        if changed {
            self.push_undo();
            for row in top..=bottom {
                let len = self.buffer.line_len(row);
                if left < len {
                    self.buffer
                        .delete(Range::on_row(row, left, (right + 1).min(len)));
                }
            }
        }
        self.register.set_chars(pieces.join("\n"));

        if op == Operator::Change {
            if !changed {
                self.begin_insert();
            }
            self.enter_insert_at(corner);
        } else {
            self.cursor.set_position(corner, &self.buffer, false);
        }
        self.usage
            .practice(&format!("ctrl_v_{}_block_{}", op.key(), op.name()));
    }

    /// `>` / `<` over the selected rows.
    fn visual_shift(&mut self, outdent: bool) {
        let (start, end) = self.visual_bounds();
        self.leave_visual();
        if outdent {
            self.outdent_lines(start.row, end.row);
        } else {
            self.indent_lines(start.row, end.row);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
