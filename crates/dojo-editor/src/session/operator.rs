//! Operators and the other buffer-changing commands of normal mode.
//!
//! An operator works on a [`Span`]: either a half-open char range or a run
//! of whole lines. Motions become spans in [`Session::motion_span`]:
//!
//! | Motion                 | Span                          |
//! |------------------------|-------------------------------|
//! | `h` `l` `0` `^` `w` `b`| exclusive char range          |
//! | `e` `$` `%` `f` `F` `t` `T` `;` `,` | inclusive char range |
//! | `j` `k` `G` `gg`       | line-wise                     |
//!
//! `cw` behaves like `ce`, and `dw` never crosses the end of the line.

use dojo_input::{KeyCode, KeyEvent};
use tracing::debug;

use super::{Operator, Session};
use crate::cursor::{FindKind, matching_bracket};
use crate::position::{Position, Range};
use crate::register::RegisterKind;
use crate::text_object::{self, ObjectKind};
use crate::word::{self, WordKind};

/// What an operator acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Span {
    Chars(Range),
    Lines { first: usize, last: usize },
}

impl Span {
    fn lines_between(a: usize, b: usize) -> Self {
        Self::Lines {
            first: a.min(b),
            last: a.max(b),
        }
    }
}

impl Session {
    // -- Operator + motion --------------------------------------------------

    pub(super) fn operate_motion(&mut self, op: Operator, key: KeyEvent, count: Option<usize>) {
        let Some(span) = self.motion_span(op, key, count) else {
            debug!(op = op.name(), %key, "motion has no target");
            return;
        };
        self.apply_operator(op, span);
        self.usage
            .practice(&format!("{}{key}_{}", op.key(), op.name()));
    }

    /// `dgg`, `ygg`.
    pub(super) fn operate_to_line(&mut self, op: Operator, count: Option<usize>, default_row: usize) {
        let target = count
            .map_or(default_row, |n| n.saturating_sub(1))
            .min(self.buffer.last_row());
        self.apply_operator(op, Span::lines_between(self.cursor.row(), target));
        self.usage
            .practice(&format!("{}gg_{}", op.key(), op.name()));
    }

    /// `df{c}`, `ct{c}`. Inclusive in both directions.
    pub(super) fn operate_char_find(
        &mut self,
        op: Operator,
        kind: FindKind,
        ch: char,
        count: Option<usize>,
    ) {
        self.last_find = Some((ch, kind));
        let start = self.cursor.position();
        let mut probe = self.cursor;
        if !probe.find_char(kind, ch, count.unwrap_or(1), &self.buffer) {
            debug!(target_char = %ch, "character not found on line");
            return;
        }
        let Some(span) = self.char_span(start, probe.position(), true) else {
            return;
        };
        self.usage.advanced_motions += 1;
        self.apply_operator(op, span);
        self.usage
            .practice(&format!("{}{}_{}", op.key(), kind.key(), op.name()));
    }

    /// The span an operator covers for a motion key, or `None` when the
    /// motion goes nowhere.
    pub(super) fn motion_span(&self, op: Operator, key: KeyEvent, raw_count: Option<usize>) -> Option<Span> {
        if key.is_ctrl() {
            return None;
        }
        let count = raw_count.unwrap_or(1);
        let buf = &self.buffer;
        let start = self.cursor.position();
        let mut c = self.cursor;

        let inclusive = match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                c.move_left(count, buf, false);
                false
            }
            KeyCode::Char('l') | KeyCode::Right => {
                c.move_right(count, buf, true);
                false
            }
            KeyCode::Char('j') | KeyCode::Down => {
                c.move_down(count, buf, false);
                return (c.row() != start.row).then(|| Span::lines_between(start.row, c.row()));
            }
            KeyCode::Char('k') | KeyCode::Up => {
                c.move_up(count, buf, false);
                return (c.row() != start.row).then(|| Span::lines_between(start.row, c.row()));
            }
            KeyCode::Char('G') => {
                let target = raw_count
                    .map_or(buf.last_row(), |n| n.saturating_sub(1))
                    .min(buf.last_row());
                return Some(Span::lines_between(start.row, target));
            }
            KeyCode::Char('0') | KeyCode::Home => {
                c.move_to_line_start();
                false
            }
            KeyCode::Char('^') => {
                c.move_to_first_non_blank(buf, false);
                false
            }
            KeyCode::Char('$') | KeyCode::End => {
                c.move_to_line_end(buf, false);
                true
            }
            KeyCode::Char('w') => return self.word_span(op, WordKind::Small, count),
            KeyCode::Char('W') => return self.word_span(op, WordKind::Big, count),
            KeyCode::Char('b') => {
                c.word_backward(count, WordKind::Small, buf, false);
                false
            }
            KeyCode::Char('B') => {
                c.word_backward(count, WordKind::Big, buf, false);
                false
            }
            KeyCode::Char('e') => {
                c.word_end(count, WordKind::Small, buf, false);
                true
            }
            KeyCode::Char('E') => {
                c.word_end(count, WordKind::Big, buf, false);
                true
            }
            KeyCode::Char('%') => {
                let target = matching_bracket(buf, start)?;
                c.set_position(target, buf, false);
                true
            }
            KeyCode::Char(ch @ (';' | ',')) => {
                let (target_char, kind) = self.last_find?;
                let kind = if ch == ',' { kind.opposite() } else { kind };
                if !c.find_char(kind, target_char, count, buf) {
                    return None;
                }
                true
            }
            _ => return None,
        };
        self.char_span(start, c.position(), inclusive)
    }

    /// `w` / `W` after an operator.
    fn word_span(&self, op: Operator, kind: WordKind, count: usize) -> Option<Span> {
        let buf = &self.buffer;
        let start = self.cursor.position();

        if op == Operator::Change && !word::on_blank(buf, start) {
            let mut end = start;
            for i in 0..count {
                // On a word's last char the first `cw` changes only that char.
                if i == 0 && word::at_word_end(buf, end, kind) {
                    continue;
                }
                end = word::word_end(buf, end, kind);
            }
            return self.char_span(start, end, true);
        }

        let line_end = Position::new(start.row, buf.line_len(start.row));
        let mut target = start;
        for _ in 0..count {
            let next = word::next_word_start(buf, target, kind);
            if next == target {
                target = line_end;
                break;
            }
            target = next;
        }
        if target.row > start.row {
            target = line_end;
        }
        self.char_span(start, target, false)
    }

    /// Order two positions into a char span. An inclusive end takes the
    /// char under it, without running past the line.
    pub(super) fn char_span(&self, a: Position, b: Position, inclusive: bool) -> Option<Span> {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        let to = if inclusive {
            to.with_col((to.col + 1).min(self.buffer.line_len(to.row)))
        } else {
            to
        };
        let range = Range::new(from, to);
        (!range.is_empty()).then_some(Span::Chars(range))
    }

    // -- Operator + text object ---------------------------------------------

    /// `diw`, `ci"`, `yap`. The cursor ends at the object's start.
    pub(super) fn operate_on_object(&mut self, op: Operator, kind: ObjectKind, inner: bool) {
        let pos = self.cursor.position();
        let Some(object) = text_object::resolve(&self.buffer, pos, kind, inner) else {
            debug!(object = kind.name(), inner, "no text object at cursor");
            return;
        };
        self.usage.text_objects.insert(kind);
        self.usage.practice(&format!(
            "{}{}_{}_{}",
            op.key(),
            if inner { 'i' } else { 'a' },
            kind.name(),
            op.name()
        ));

        let range = object.range;
        if object.linewise {
            self.apply_operator(op, Span::lines_between(range.start.row, range.end.row));
        } else if range.is_empty() {
            // `ci(` on `()` still enters insert between the delimiters.
            if op == Operator::Change {
                self.begin_insert();
                self.cursor.set_position(range.start, &self.buffer, true);
            }
        } else {
            self.apply_operator(op, Span::Chars(range));
        }
    }

    // -- Applying -----------------------------------------------------------

    pub(super) fn apply_operator(&mut self, op: Operator, span: Span) {
        match (op, span) {
            (Operator::Yank, Span::Chars(range)) => {
                self.register.set_chars(self.buffer.text_in(range));
                self.cursor.set_position(range.start, &self.buffer, false);
            }
            (Operator::Yank, Span::Lines { first, last }) => {
                let lines = self.lines_in(first, last);
                self.register.set_lines(&lines);
                let col = self.cursor.col();
                self.cursor
                    .set_position(Position::new(first, col), &self.buffer, false);
            }
            (Operator::Delete, Span::Chars(range)) => {
                self.push_undo();
                let text = self.buffer.delete(range);
                self.register.set_chars(text);
                self.cursor.set_position(range.start, &self.buffer, false);
            }
            (Operator::Delete, Span::Lines { first, last }) => {
                self.push_undo();
                let removed = self.buffer.remove_lines(first, last - first + 1);
                self.register.set_lines(&removed);
                let row = first.min(self.buffer.last_row());
                self.cursor.goto_row(row, &self.buffer, false);
            }
            (Operator::Change, Span::Chars(range)) => {
                self.push_undo();
                let text = self.buffer.delete(range);
                self.register.set_chars(text);
                self.enter_insert_at(range.start);
            }
            (Operator::Change, Span::Lines { first, last }) => {
                self.push_undo();
                let lines = self.lines_in(first, last);
                self.register.set_lines(&lines);
                if last > first {
                    self.buffer.remove_lines(first + 1, last - first);
                }
                self.buffer.set_line(first, "");
                self.enter_insert_at(Position::new(first, 0));
            }
        }
    }

    /// `dd`, `cc`, `yy` over `count` lines from the cursor.
    pub(super) fn operator_line(&mut self, op: Operator, count: usize) {
        let first = self.cursor.row();
        let last = first
            .saturating_add(count.saturating_sub(1))
            .min(self.buffer.last_row());
        self.apply_operator(op, Span::Lines { first, last });
        self.usage.practice(&format!(
            "{}{}_{}_line",
            op.key(),
            op.key(),
            op.name()
        ));
    }

    fn lines_in(&self, first: usize, last: usize) -> Vec<String> {
        (first..=last).map(|row| self.buffer.line(row)).collect()
    }

    // -- Single-key edits ---------------------------------------------------

    /// `x`: up to `count` chars from the cursor, on this line only.
    pub(super) fn delete_chars_at_cursor(&mut self, count: usize) {
        let pos = self.cursor.position();
        let len = self.buffer.line_len(pos.row);
        if len == 0 {
            debug!("nothing to delete on empty line");
            return;
        }
        let end = pos.col.saturating_add(count).min(len);
        self.push_undo();
        let text = self.buffer.delete(Range::on_row(pos.row, pos.col, end));
        self.register.set_chars(text);
        self.usage.practice("x_delete_char");
    }

    /// `D`: to the end of the line (`count - 1` more lines with a count).
    pub(super) fn delete_to_line_end(&mut self, count: usize) {
        let pos = self.cursor.position();
        let row = pos
            .row
            .saturating_add(count.saturating_sub(1))
            .min(self.buffer.last_row());
        let range = Range::new(pos, Position::new(row, self.buffer.line_len(row)));
        if range.is_empty() {
            debug!("nothing to delete after cursor");
            return;
        }
        self.push_undo();
        let text = self.buffer.delete(range);
        self.register.set_chars(text);
        self.usage.practice("D_delete_to_end");
    }

    /// `p` (`after`) and `P`.
    pub(super) fn put(&mut self, after: bool, count: usize) {
        if self.register.is_empty() {
            debug!("register is empty");
            return;
        }
        self.push_undo();
        let pos = self.cursor.position();

        match self.register.kind() {
            RegisterKind::Line => {
                let lines: Vec<String> = (0..count).flat_map(|_| self.register.lines()).collect();
                let at = if after { pos.row + 1 } else { pos.row };
                self.buffer.insert_lines(at, &lines);
                self.cursor.goto_row(at, &self.buffer, false);
                self.cursor.move_to_first_non_blank(&self.buffer, false);
            }
            RegisterKind::Char => {
                let text = self.register.content().repeat(count);
                let at = if after && self.buffer.line_len(pos.row) > 0 {
                    pos.with_col(pos.col + 1)
                } else {
                    pos
                };
                let idx = self.buffer.char_idx(at);
                self.buffer.insert(at, &text);
                let last = idx + text.chars().count().saturating_sub(1);
                let target = self.buffer.pos_of(last);
                self.cursor.set_position(target, &self.buffer, false);
            }
        }
        self.usage
            .practice(if after { "p_put_after" } else { "P_put_before" });
    }

    /// `r{c}`: replace `count` chars. Appends on an empty line.
    pub(super) fn replace_chars(&mut self, ch: char, count: usize) {
        let pos = self.cursor.position();
        let len = self.buffer.line_len(pos.row);
        if len == 0 {
            self.push_undo();
            self.buffer.insert_char(pos, ch);
        } else {
            if pos.col.saturating_add(count) > len {
                debug!(count, "not enough characters to replace");
                return;
            }
            self.push_undo();
            let end = pos.col + count;
            self.buffer.delete(Range::on_row(pos.row, pos.col, end));
            let text: String = std::iter::repeat_n(ch, count).collect();
            self.buffer.insert(pos, &text);
            self.cursor
                .set_position(pos.with_col(end - 1), &self.buffer, false);
        }
        self.usage.practice("r_replace_char");
    }

    /// `o` (`below`) and `O`.
    pub(super) fn open_line(&mut self, below: bool) {
        self.push_undo();
        let row = if below {
            self.cursor.row() + 1
        } else {
            self.cursor.row()
        };
        self.buffer.insert_lines(row, &[String::new()]);
        self.enter_insert_at(Position::new(row, 0));
        self.usage.practice(if below {
            "o_open_line_below"
        } else {
            "O_open_line_above"
        });
    }

    // -- Indent -------------------------------------------------------------

    /// `>`: `shiftwidth` spaces in front of each non-empty line.
    pub(super) fn indent_lines(&mut self, first: usize, last: usize) {
        let pad = " ".repeat(self.options.shiftwidth);
        self.rewrite_lines(first, last, |line| {
            if line.is_empty() {
                line.to_owned()
            } else {
                format!("{pad}{line}")
            }
        });
        self.usage.practice(">_indent");
    }

    /// `<`: up to `shiftwidth` leading spaces, or one leading tab.
    pub(super) fn outdent_lines(&mut self, first: usize, last: usize) {
        let width = self.options.shiftwidth;
        self.rewrite_lines(first, last, |line| {
            if let Some(rest) = line.strip_prefix('\t') {
                return rest.to_owned();
            }
            let spaces = line.chars().take(width).take_while(|&c| c == ' ').count();
            line[spaces..].to_owned()
        });
        self.usage.practice("<_outdent");
    }

    /// Replace each line in `first..=last` with `f(line)`, as one undo step.
    /// Leaves the cursor on the first non-blank of `first`.
    fn rewrite_lines(&mut self, first: usize, last: usize, f: impl Fn(&str) -> String) {
        let updates: Vec<(usize, String)> = (first..=last)
            .filter_map(|row| {
                let line = self.buffer.line(row);
                let new = f(&line);
                (new != line).then_some((row, new))
            })
            .collect();
        if !updates.is_empty() {
            self.push_undo();
            for (row, text) in updates {
                self.buffer.set_line(row, &text);
            }
        }
        self.cursor.goto_row(first, &self.buffer, false);
        self.cursor.move_to_first_non_blank(&self.buffer, false);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::{Session, run};
    use crate::mode::Mode;
    use crate::position::Position;
    use crate::register::RegisterKind;
    use crate::text_object::ObjectKind;
    use pretty_assertions::assert_eq;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn at(text: &str, pos: Position, keys: &str) -> Session {
        let mut s = Session::new(text);
        s.set_cursor(pos);
        s.feed_notation(keys).unwrap();
        s
    }

    // -- d + motion ---------------------------------------------------------

    #[test]
    fn dw_deletes_word_and_space() {
        let s = run("one two three", "dw");
        assert_eq!(s.lines(), vec!["two three"]);
        assert_eq!(s.register().content(), "one ");
    }

    #[test]
    fn dw_stops_at_line_end() {
        let s = at("one two\nthree", p(0, 4), "dw");
        assert_eq!(s.lines(), vec!["one ", "three"]);
        let s = at("one two", p(0, 4), "dw");
        assert_eq!(s.lines(), vec!["one "]);
        let s = run("one two\nthree four", "5dw");
        assert_eq!(s.lines(), vec!["", "three four"]);
    }

    #[test]
    fn counts_multiply() {
        let s = run("a b c d e f g h", "2d3w");
        assert_eq!(s.lines(), vec!["g h"]);
    }

    #[test]
    fn inclusive_motions() {
        assert_eq!(run("one two", "de").lines(), vec![" two"]);
        assert_eq!(at("one two", p(0, 2), "d$").lines(), vec!["on"]);
        assert_eq!(run("f(a, b) x", "ld%").lines(), vec!["f x"]);
        assert_eq!(run("a,b,c", "df,").lines(), vec!["b,c"]);
        assert_eq!(run("ab,c", "dt,").lines(), vec![",c"]);
        assert_eq!(at("a,b,c", p(0, 4), "dF,").lines(), vec!["a,b"]);
    }

    #[test]
    fn exclusive_motions() {
        assert_eq!(at("one two", p(0, 4), "db").lines(), vec!["two"]);
        assert_eq!(at("one two", p(0, 4), "d0").lines(), vec!["two"]);
        assert_eq!(at("one two", p(0, 4), "dh").lines(), vec!["onetwo"]);
        assert_eq!(run("one", "3dl").lines(), vec![""]);
    }

    #[test]
    fn linewise_motions() {
        let text = "a\nb\nc\nd";
        assert_eq!(run(text, "dj").lines(), vec!["c", "d"]);
        assert_eq!(at(text, p(2, 0), "dk").lines(), vec!["a", "d"]);
        assert_eq!(at(text, p(1, 0), "dG").lines(), vec!["a"]);
        assert_eq!(at(text, p(2, 0), "dgg").lines(), vec!["d"]);
        assert_eq!(at(text, p(3, 0), "dj").lines(), vec!["a", "b", "c", "d"]);
        assert_eq!(run(text, "dj").register().kind(), RegisterKind::Line);
    }

    #[test]
    fn failed_motion_is_a_noop() {
        let s = run("abc", "dfz");
        assert_eq!(s.lines(), vec!["abc"]);
        assert!(!s.history().can_undo());
    }

    // -- Line operators -----------------------------------------------------

    #[test]
    fn dd_removes_one_of_three() {
        let s = at("one\n  two\nthree", p(0, 2), "dd");
        assert_eq!(s.lines(), vec!["  two", "three"]);
        assert_eq!(s.cursor(), p(0, 0));
        assert_eq!(s.register().content(), "one");
        assert_eq!(s.register().kind(), RegisterKind::Line);
    }

    #[test]
    fn dd_with_count_and_emptying() {
        assert_eq!(run("a\nb\nc", "2dd").lines(), vec!["c"]);
        assert_eq!(run("a\nb\nc", "9dd").lines(), vec![""]);
        assert_eq!(at("a\nb\nc", p(2, 0), "dd").cursor(), p(1, 0));
    }

    #[test]
    fn cc_replaces_lines() {
        let s = run("one\ntwo\nthree", "2ccnew<Esc>");
        assert_eq!(s.lines(), vec!["new", "three"]);
        assert_eq!(s.register().content(), "one\ntwo");
    }

    #[test]
    fn yy_and_put() {
        let s = run("one\ntwo", "yyjp");
        assert_eq!(s.lines(), vec!["one", "two", "one"]);
        assert_eq!(s.cursor(), p(2, 0));
        let s = run("one\ntwo", "jyyP");
        assert_eq!(s.lines(), vec!["one", "two", "two"]);
        assert_eq!(s.cursor(), p(1, 0));
        let s = run("one", "yy3p");
        assert_eq!(s.lines(), vec!["one", "one", "one", "one"]);
    }

    // -- c + motion ---------------------------------------------------------

    #[test]
    fn cw_acts_like_ce() {
        let s = run("one two", "cwnew<Esc>");
        assert_eq!(s.lines(), vec!["new two"]);
        assert_eq!(s.mode(), Mode::Normal);
    }

    #[test]
    fn cw_on_last_char_of_word() {
        let s = at("one two", p(0, 2), "cwX<Esc>");
        assert_eq!(s.lines(), vec!["onX two"]);
    }

    #[test]
    fn change_is_one_undo_step() {
        let s = run("one two", "cwnew<Esc>u");
        assert_eq!(s.lines(), vec!["one two"]);
    }

    // -- Text objects -------------------------------------------------------

    #[test]
    fn di_paren() {
        let s = at("function(old parameters)", p(0, 12), "di(");
        assert_eq!(s.lines(), vec!["function()"]);
        assert_eq!(s.cursor(), p(0, 9));
        assert!(s.usage().text_objects.contains(&ObjectKind::Parens));
    }

    #[test]
    fn ci_quote() {
        let s = at("console.log(\"old text\");", p(0, 15), "ci\"new text<Esc>");
        assert_eq!(s.lines(), vec!["console.log(\"new text\");"]);
    }

    #[test]
    fn ci_on_empty_pair_enters_insert() {
        let s = at("f()", p(0, 1), "ci(x<Esc>");
        assert_eq!(s.lines(), vec!["f(x)"]);
    }

    #[test]
    fn yiw_moves_to_object_start() {
        let s = at("say hello there", p(0, 7), "yiw");
        assert_eq!(s.register().content(), "hello");
        assert_eq!(s.cursor(), p(0, 4));
        assert!(!s.history().can_undo());
    }

    #[test]
    fn dap_is_linewise() {
        let s = run("one\ntwo\n\nthree", "dap");
        assert_eq!(s.lines(), vec!["three"]);
        assert_eq!(s.register().kind(), RegisterKind::Line);
    }

    #[test]
    fn missing_object_is_a_noop() {
        let s = run("no parens", "di(");
        assert_eq!(s.lines(), vec!["no parens"]);
        assert!(s.usage().text_objects.is_empty());
    }

    #[test]
    fn delete_around_paragraph_takes_one_blank_line() {
        let s = run("a\nb\n\n\nc", "dap");
        assert_eq!(s.lines(), vec!["", "c"]);
        assert_eq!(s.cursor(), p(0, 0));
    }

    // -- x, D, r ------------------------------------------------------------

    #[test]
    fn x_with_count_stays_on_line() {
        let s = at("abc\ndef", p(0, 1), "5x");
        assert_eq!(s.lines(), vec!["a", "def"]);
        assert_eq!(s.cursor(), p(0, 0));
        assert_eq!(s.register().content(), "bc");
    }

    #[test]
    fn x_on_empty_line_does_nothing() {
        let s = run("\nabc", "x");
        assert_eq!(s.lines(), vec!["", "abc"]);
        assert!(!s.history().can_undo());
    }

    #[test]
    fn d_capital_to_line_end() {
        let s = at("one two", p(0, 3), "D");
        assert_eq!(s.lines(), vec!["one"]);
        assert_eq!(s.cursor(), p(0, 2));
    }

    #[test]
    fn replace_chars() {
        assert_eq!(run("abcd", "3rx").lines(), vec!["xxxd"]);
        assert_eq!(run("abcd", "3rx").cursor(), p(0, 2));
        assert_eq!(run("ab", "3rx").lines(), vec!["ab"]);
        assert_eq!(run("", "rx").lines(), vec!["x"]);
    }

    // -- Put ----------------------------------------------------------------

    #[test]
    fn char_put_after_and_before() {
        let s = run("abc", "xp");
        assert_eq!(s.lines(), vec!["bac"]);
        assert_eq!(s.cursor(), p(0, 1));
        let s = run("abc", "x$P");
        assert_eq!(s.lines(), vec!["bac"]);
        let s = run("ab", "yl3p");
        assert_eq!(s.lines(), vec!["aaaab"]);
        assert_eq!(s.cursor(), p(0, 3));
    }

    #[test]
    fn put_with_empty_register_is_a_noop() {
        let s = run("abc", "p");
        assert_eq!(s.lines(), vec!["abc"]);
        assert!(!s.history().can_undo());
    }

    // -- Indent -------------------------------------------------------------

    #[test]
    fn visual_line_indent_and_outdent() {
        let s = run("a\n\nb", "Vjj>");
        assert_eq!(s.lines(), vec!["    a", "", "    b"]);
        let s = run("      a\n\tb\nc", "Vjj<");
        assert_eq!(s.lines(), vec!["  a", "b", "c"]);
    }

    #[test]
    fn outdent_with_nothing_to_remove_keeps_history() {
        let s = run("a\nb", "Vj<");
        assert!(!s.history().can_undo());
    }
}
