//! Normal mode — counts, the pending-key state machine and single-key
//! commands.
//!
//! Order of resolution for each key:
//!
//! 1. Ctrl combos (`Ctrl-r`, `Ctrl-v`) drop any pending state.
//! 2. A pending state consumes the key.
//! 3. Digits extend the count (`0` only once a count is started).
//! 4. Motions, then single-key commands and pending-state openers.

use dojo_input::{KeyCode, KeyEvent};
use tracing::debug;

use super::{Operator, Pending, Session, merge_counts};
use crate::cursor::{FindKind, matching_bracket};
use crate::mode::{Mode, VisualKind};
use crate::search::SearchDirection;
use crate::text_object::ObjectKind;
use crate::word::WordKind;

/// Progress name of a character find.
const fn find_name(kind: FindKind) -> &'static str {
    match kind {
        FindKind::Forward => "f_find_character",
        FindKind::Backward => "F_find_character",
        FindKind::TillForward => "t_till_character",
        FindKind::TillBackward => "T_till_character",
    }
}

impl Session {
    pub(super) fn handle_normal(&mut self, key: KeyEvent) {
        self.clear_message();

        if key.is_ctrl() && !key.is_escape() {
            self.pending = None;
            let count = self.take_count();
            if key.is_ctrl_char('r') {
                self.redo(count);
            } else if key.is_ctrl_char('v') {
                self.enter_visual(VisualKind::Block);
            } else {
                debug!(%key, "unmapped ctrl key");
            }
            return;
        }

        if let Some(pending) = self.pending.take() {
            self.handle_pending(pending, key);
            return;
        }

        if key.is_escape() {
            self.count = None;
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
        self.handle_normal_key(key, raw_count);
    }

    // -- Pending keys -------------------------------------------------------

    /// Feed `key` to a pending state. Anything that cannot continue it
    /// drops it silently.
    fn handle_pending(&mut self, pending: Pending, key: KeyEvent) {
        if key.is_escape() {
            self.count = None;
            return;
        }
        let ch = key.printable();

        match pending {
            Pending::Operator { op, count } => self.continue_operator(op, count, key),
            Pending::TextObject { op, inner } => {
                match ch.and_then(ObjectKind::from_char) {
                    Some(kind) => self.operate_on_object(op, kind, inner),
                    None => debug!(%key, "not a text object"),
                }
            }
            Pending::G { count } => {
                if ch == Some('g') {
                    self.goto_line(count, 0);
                    self.usage.practice("gg_first_line");
                } else {
                    debug!(%key, "unknown g command");
                }
            }
            Pending::OperatorG { op, count } => {
                if ch == Some('g') {
                    self.operate_to_line(op, count, 0);
                } else {
                    debug!(%key, "unknown operator motion");
                }
            }
            Pending::Replace { count } => match ch {
                Some(c) => self.replace_chars(c, count),
                // Named keys other than Escape keep `r` waiting.
                None => self.pending = Some(pending),
            },
            Pending::CharFind { kind, count } => {
                if let Some(c) = ch {
                    self.char_find(kind, c, count);
                }
            }
            Pending::OperatorCharFind { op, kind, count } => {
                if let Some(c) = ch {
                    self.operate_char_find(op, kind, c, count);
                }
            }
            Pending::SetMark => {
                if let Some(letter) = ch {
                    self.set_mark(letter);
                }
            }
            Pending::GotoMark { exact } => match ch {
                Some('\'' | '`') => self.jump_back(exact),
                Some(letter) => self.goto_mark(letter, exact),
                None => debug!(%key, "not a mark"),
            },
            Pending::MacroRecord => {
                if let Some(reg) = ch {
                    self.start_recording(reg);
                }
            }
            Pending::MacroPlay { count } => match ch {
                Some('@') => match self.macros.last_played() {
                    Some(reg) => {
                        self.play_macro(reg, count);
                        self.usage.practice("@@_repeat_macro");
                    }
                    None => debug!("no macro played yet"),
                },
                Some(reg) => self.play_macro(reg, count),
                None => debug!(%key, "not a register"),
            },
        }
    }

    /// The key after `d`, `c` or `y`.
    fn continue_operator(&mut self, op: Operator, op_count: Option<usize>, key: KeyEvent) {
        match key.code {
            KeyCode::Char(d @ '1'..='9') => {
                self.push_count_digit(d);
                self.pending = Some(Pending::Operator { op, count: op_count });
                return;
            }
            KeyCode::Char('0') if self.count.is_some() => {
                self.push_count_digit('0');
                self.pending = Some(Pending::Operator { op, count: op_count });
                return;
            }
            _ => {}
        }

        let count = merge_counts(op_count, self.count.take());
        match key.printable() {
            Some(ch) if ch == op.key() => self.operator_line(op, count.unwrap_or(1)),
            Some(ch @ ('i' | 'a')) => {
                self.pending = Some(Pending::TextObject {
                    op,
                    inner: ch == 'i',
                });
            }
            Some('g') => self.pending = Some(Pending::OperatorG { op, count }),
            Some(ch @ ('f' | 'F' | 't' | 'T')) => {
                if let Some(kind) = FindKind::from_char(ch) {
                    self.pending = Some(Pending::OperatorCharFind { op, kind, count });
                }
            }
            _ => self.operate_motion(op, key, count),
        }
    }

    // -- Single keys --------------------------------------------------------

    fn handle_normal_key(&mut self, key: KeyEvent, raw_count: Option<usize>) {
        if self.apply_motion(key, raw_count) {
            return;
        }
        let count = raw_count.unwrap_or(1);

        if key.code == KeyCode::Delete {
            self.delete_chars_at_cursor(count);
            return;
        }
        let Some(ch) = key.printable() else {
            debug!(%key, "unmapped key");
            return;
        };

        match ch {
            'd' | 'c' | 'y' => {
                if let Some(op) = Operator::from_char(ch) {
                    self.pending = Some(Pending::Operator {
                        op,
                        count: raw_count,
                    });
                }
            }
            'g' => self.pending = Some(Pending::G { count: raw_count }),
            'f' | 'F' | 't' | 'T' => {
                if let Some(kind) = FindKind::from_char(ch) {
                    self.pending = Some(Pending::CharFind { kind, count });
                }
            }
            'r' => self.pending = Some(Pending::Replace { count }),
            'm' => self.pending = Some(Pending::SetMark),
            '\'' => self.pending = Some(Pending::GotoMark { exact: false }),
            '`' => self.pending = Some(Pending::GotoMark { exact: true }),
            'q' => {
                if self.macros.recording().is_some() {
                    self.stop_recording();
                } else {
                    self.pending = Some(Pending::MacroRecord);
                }
            }
            '@' => self.pending = Some(Pending::MacroPlay { count }),

            'x' => self.delete_chars_at_cursor(count),
            'D' => self.delete_to_line_end(count),
            'p' => self.put(true, count),
            'P' => self.put(false, count),
            'u' => self.undo(count),

            'i' => {
                self.begin_insert();
                self.usage.practice("i_insert_mode");
            }
            'a' => {
                self.begin_insert();
                self.cursor.move_right(1, &self.buffer, true);
                self.usage.practice("a_append");
            }
            'A' => {
                self.begin_insert();
                self.cursor.move_to_line_end(&self.buffer, true);
                self.usage.practice("A_append_line_end");
            }
            'I' => {
                self.begin_insert();
                self.cursor.move_to_first_non_blank(&self.buffer, true);
                self.usage.practice("I_insert_line_start");
            }
            'o' => self.open_line(true),
            'O' => self.open_line(false),

            'v' => self.enter_visual(VisualKind::Char),
            'V' => self.enter_visual(VisualKind::Line),

            'n' => self.search_next(false, count),
            'N' => self.search_next(true, count),
            '/' => self.open_prompt(Mode::Search(SearchDirection::Forward)),
            '?' => self.open_prompt(Mode::Search(SearchDirection::Backward)),
            ':' => self.open_prompt(Mode::Command),

            _ => debug!(%key, "unmapped key"),
        }
    }

    // -- Motions ------------------------------------------------------------

    /// Move the cursor for a motion key. Returns `false` if `key` is not a
    /// motion. Shared by normal and visual mode.
    ///
    /// `raw_count` repeats most motions; `G` reads it as a line number.
    pub(super) fn apply_motion(&mut self, key: KeyEvent, raw_count: Option<usize>) -> bool {
        if key.is_ctrl() {
            return false;
        }
        let count = raw_count.unwrap_or(1);
        let buf = &self.buffer;

        let name = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.cursor.move_left(count, buf, false);
                "h_left"
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.cursor.move_right(count, buf, false);
                "l_right"
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor.move_down(count, buf, false);
                "j_down"
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor.move_up(count, buf, false);
                "k_up"
            }
            KeyCode::Char('0') | KeyCode::Home => {
                self.cursor.move_to_line_start();
                "0_line_start"
            }
            KeyCode::Char('^') => {
                self.cursor.move_to_first_non_blank(buf, false);
                "^_first_non_blank"
            }
            KeyCode::Char('$') | KeyCode::End => {
                self.cursor.move_to_line_end(buf, false);
                "$_line_end"
            }
            KeyCode::Char('w') => {
                self.cursor.word_forward(count, WordKind::Small, buf, false);
                "w_word_forward"
            }
            KeyCode::Char('W') => {
                self.cursor.word_forward(count, WordKind::Big, buf, false);
                "W_WORD_forward"
            }
            KeyCode::Char('b') => {
                self.cursor.word_backward(count, WordKind::Small, buf, false);
                "b_word_backward"
            }
            KeyCode::Char('B') => {
                self.cursor.word_backward(count, WordKind::Big, buf, false);
                "B_WORD_backward"
            }
            KeyCode::Char('e') => {
                self.cursor.word_end(count, WordKind::Small, buf, false);
                "e_word_end"
            }
            KeyCode::Char('E') => {
                self.cursor.word_end(count, WordKind::Big, buf, false);
                "E_WORD_end"
            }
            KeyCode::Char('G') => {
                self.goto_line(raw_count, self.buffer.last_row());
                "G_last_line"
            }
            KeyCode::Char('%') => {
                match matching_bracket(buf, self.cursor.position()) {
                    Some(target) => {
                        self.jump_to(target);
                        self.usage.advanced_motions += 1;
                    }
                    None => debug!("no bracket under cursor"),
                }
                "%_match_delimiter"
            }
            KeyCode::Char(';') => {
                self.repeat_find(false, count);
                ";_repeat_find"
            }
            KeyCode::Char(',') => {
                self.repeat_find(true, count);
                ",_repeat_find_reverse"
            }
            _ => return false,
        };
        self.usage.practice(name);
        true
    }

    /// `G`, `gg`: line `count`, or `default_row`. Column 0.
    pub(super) fn goto_line(&mut self, raw_count: Option<usize>, default_row: usize) {
        let row = raw_count.map_or(default_row, |n| n.saturating_sub(1));
        self.marks.record_jump(self.cursor.position());
        self.cursor.goto_row(row, &self.buffer, false);
    }

    /// `f{c}` and friends.
    pub(super) fn char_find(&mut self, kind: FindKind, ch: char, count: usize) {
        self.last_find = Some((ch, kind));
        if self.cursor.find_char(kind, ch, count, &self.buffer) {
            self.usage.advanced_motions += 1;
            self.usage.practice(find_name(kind));
        } else {
            debug!(target_char = %ch, "character not found on line");
        }
    }

    /// `;` and `,`.
    fn repeat_find(&mut self, reverse: bool, count: usize) {
        let Some((ch, kind)) = self.last_find else {
            debug!("no previous character find");
            return;
        };
        let kind = if reverse { kind.opposite() } else { kind };
        if self.cursor.find_char(kind, ch, count, &self.buffer) {
            self.usage.advanced_motions += 1;
        }
    }

    // -- Marks --------------------------------------------------------------

    /// `m{a-z}`. Also becomes the last-jump position.
    fn set_mark(&mut self, letter: char) {
        let here = self.cursor.position();
        if !self.marks.set(letter, here) {
            debug!(%letter, "not a mark letter");
            return;
        }
        self.marks.record_jump(here);
        self.usage.marks_set += 1;
        self.usage.practice(&format!("m{letter}_set_mark"));
    }

    /// `'{a-z}` and `` `{a-z} ``.
    fn goto_mark(&mut self, letter: char, exact: bool) {
        let Some(target) = self.marks.get(letter) else {
            debug!(%letter, "mark not set");
            self.set_error("E20: Mark not set");
            return;
        };
        self.jump_to(target);
        self.usage.mark_jumps += 1;
        self.usage.practice(&if exact {
            format!("`{letter}_jump_to_exact_mark")
        } else {
            format!("'{letter}_jump_to_mark")
        });
    }

    /// `''` and ` `` `: swap with the last-jump position.
    fn jump_back(&mut self, exact: bool) {
        let here = self.cursor.position();
        let Some(target) = self.marks.swap_last_jump(here) else {
            debug!("no previous jump");
            return;
        };
        self.cursor.set_position(target, &self.buffer, false);
        self.usage.mark_jumps += 1;
        self.usage.practice(if exact {
            "``_jump_to_last_exact_position"
        } else {
            "''_jump_to_last_position"
        });
    }

    // -- Macro recording ----------------------------------------------------

    fn start_recording(&mut self, reg: char) {
        if self.macros.start(reg) {
            self.set_message(format!("recording @{reg}"));
            self.usage.practice(&format!("q{reg}_start_macro"));
        } else {
            debug!(register = %reg, "not a macro register");
        }
    }

    fn stop_recording(&mut self) {
        if let Some(reg) = self.macros.stop() {
            debug!(register = %reg, "macro recorded");
            self.usage.macros_recorded += 1;
            self.usage.practice("q_stop_macro");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
