//! Text objects — regions of text selected by structure.
//!
//! Combined with an operator they form the composable grammar:
//!
//! ```text
//! operator + text object = action
//! d        + iw          = delete inner word
//! c        + i"          = change inside quotes
//! y        + ap          = yank a paragraph
//! ```
//!
//! [`resolve`] returns a [`TextObject`]: a half-open range plus whether the
//! object is line-wise. `None` means there is no such object at the cursor,
//! and the operator becomes a no-op.
//!
//! | Keys              | Object        | Scope                            |
//! |-------------------|---------------|----------------------------------|
//! | `w` `W`           | word          | cursor line                      |
//! | `s`               | sentence      | cursor line                      |
//! | `p`               | paragraph     | whole lines                      |
//! | `(` `)` `b`       | parentheses   | cursor line, nesting aware       |
//! | `[` `]`           | brackets      | cursor line, nesting aware       |
//! | `{` `}` `B`       | braces        | cursor line, nesting aware       |
//! | `"`               | double quotes | may span lines, skips `\"`       |
//! | `'`               | single quotes | may span lines, skips `\'`       |

use std::fmt;

use crate::buffer::Buffer;
use crate::position::{Position, Range};
use crate::word::is_word_char;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Word,
    Sentence,
    Paragraph,
    Parens,
    Brackets,
    Braces,
    DoubleQuote,
    SingleQuote,
}

impl ObjectKind {
    /// The object selected by the key after `i` / `a`.
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            'w' | 'W' => Self::Word,
            's' => Self::Sentence,
            'p' => Self::Paragraph,
            '(' | ')' | 'b' => Self::Parens,
            '[' | ']' => Self::Brackets,
            '{' | '}' | 'B' => Self::Braces,
            '"' => Self::DoubleQuote,
            '\'' => Self::SingleQuote,
            _ => return None,
        })
    }

    /// Stable name used by lesson goals and progress tracking.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Parens => "parentheses",
            Self::Brackets => "brackets",
            Self::Braces => "braces",
            Self::DoubleQuote => "quotes",
            Self::SingleQuote => "singleQuotes",
        }
    }

    const fn delimiters(self) -> Option<(char, char)> {
        match self {
            Self::Parens => Some(('(', ')')),
            Self::Brackets => Some(('[', ']')),
            Self::Braces => Some(('{', '}')),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextObject {
    /// Half-open range. For line-wise objects only the rows matter:
    /// `start.row..=end.row`.
    pub range: Range,
    pub linewise: bool,
}

impl TextObject {
    fn chars(range: Range) -> Self {
        Self {
            range,
            linewise: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Find the `kind` object at `pos`. `inner` selects `i…` over `a…`.
#[must_use]
pub fn resolve(buf: &Buffer, pos: Position, kind: ObjectKind, inner: bool) -> Option<TextObject> {
    match kind {
        ObjectKind::Word => word(buf, pos, inner),
        ObjectKind::Sentence => sentence(buf, pos, inner),
        ObjectKind::Paragraph => paragraph(buf, pos, inner),
        ObjectKind::DoubleQuote => quoted(buf, pos, '"', inner),
        ObjectKind::SingleQuote => quoted(buf, pos, '\'', inner),
        ObjectKind::Parens | ObjectKind::Brackets | ObjectKind::Braces => {
            let (open, close) = kind.delimiters()?;
            delimited(buf, pos, open, close, inner)
        }
    }
}

// ---------------------------------------------------------------------------
// Word
// ---------------------------------------------------------------------------

/// The run of word characters under the cursor. `aw` adds the trailing
/// blanks, or the leading ones when there are none after the word.
fn word(buf: &Buffer, pos: Position, inner: bool) -> Option<TextObject> {
    let line = buf.line_chars(pos.row);
    if !line.get(pos.col).copied().is_some_and(is_word_char) {
        return None;
    }

    let mut start = pos.col;
    while start > 0 && is_word_char(line[start - 1]) {
        start -= 1;
    }
    let mut end = pos.col + 1;
    while end < line.len() && is_word_char(line[end]) {
        end += 1;
    }

    if !inner {
        let blank = |c: char| c == ' ' || c == '\t';
        let word_end = end;
        while end < line.len() && blank(line[end]) {
            end += 1;
        }
        if end == word_end {
            while start > 0 && blank(line[start - 1]) {
                start -= 1;
            }
        }
    }

    Some(TextObject::chars(Range::on_row(pos.row, start, end)))
}

// ---------------------------------------------------------------------------
// Sentence
// ---------------------------------------------------------------------------

/// Sentences on one line: `(start, end)` half-open, where `end` is just past
/// the terminator (`.`, `!`, `?`) or the last non-blank character.
fn split_sentences(line: &[char]) -> Vec<(usize, usize)> {
    let is_term = |c: char| matches!(c, '.' | '!' | '?');
    let skip_ws = |mut i: usize| {
        while i < line.len() && line[i].is_whitespace() {
            i += 1;
        }
        i
    };

    let mut sentences = Vec::new();
    let mut start = skip_ws(0);
    let mut i = start;
    while i < line.len() {
        let ends_here = is_term(line[i]) && line.get(i + 1).is_none_or(|c| c.is_whitespace());
        if ends_here {
            sentences.push((start, i + 1));
            start = skip_ws(i + 1);
            i = start;
        } else {
            i += 1;
        }
    }
    if start < line.len() {
        let mut end = line.len();
        while end > start && line[end - 1].is_whitespace() {
            end -= 1;
        }
        sentences.push((start, end));
    }
    sentences
}

fn sentence(buf: &Buffer, pos: Position, inner: bool) -> Option<TextObject> {
    let line = buf.line_chars(pos.row);
    let sentences = split_sentences(&line);
    let (mut start, mut end) = sentences
        .iter()
        .rev()
        .find(|(s, _)| *s <= pos.col)
        .or_else(|| sentences.first())
        .copied()?;

    if !inner {
        let content_end = end;
        while end < line.len() && line[end].is_whitespace() {
            end += 1;
        }
        if end == content_end {
            while start > 0 && line[start - 1].is_whitespace() {
                start -= 1;
            }
        }
    }

    Some(TextObject::chars(Range::on_row(pos.row, start, end)))
}

// ---------------------------------------------------------------------------
// Paragraph
// ---------------------------------------------------------------------------

/// The run of lines sharing the cursor line's blankness. On text, `ap` adds
/// the one blank line after it, or the one before when nothing follows. A
/// blank run has no neighbouring blank line, so `ap` there equals `ip`.
fn paragraph(buf: &Buffer, pos: Position, inner: bool) -> Option<TextObject> {
    let blank = |row: usize| buf.line(row).trim().is_empty();
    let row = pos.row.min(buf.last_row());
    let kind = blank(row);

    let mut first = row;
    while first > 0 && blank(first - 1) == kind {
        first -= 1;
    }
    let mut last = row;
    while last < buf.last_row() && blank(last + 1) == kind {
        last += 1;
    }

    // Rows next to a text run are blank.
    if !inner && !kind {
        if last < buf.last_row() {
            last += 1;
        } else if first > 0 {
            first -= 1;
        }
    }

    Some(TextObject {
        range: Range::new(
            Position::new(first, 0),
            Position::new(last, buf.line_len(last)),
        ),
        linewise: true,
    })
}

// ---------------------------------------------------------------------------
// Brackets
// ---------------------------------------------------------------------------

/// A bracket pair on the cursor line: the nearest unmatched opener at or
/// before the cursor, else the first opener after it, then its matching
/// closer. A cursor on the closer counts as inside.
fn delimited(
    buf: &Buffer,
    pos: Position,
    open: char,
    close: char,
    inner: bool,
) -> Option<TextObject> {
    let line = buf.line_chars(pos.row);
    if line.is_empty() {
        return None;
    }
    let col = pos.col.min(line.len() - 1);

    let scan_from = if line[col] == close { col.checked_sub(1) } else { Some(col) };
    let opener = scan_from
        .and_then(|from| find_opening(&line, from, open, close))
        .or_else(|| (col + 1..line.len()).find(|&i| line[i] == open))?;
    let closer = find_closing(&line, opener, open, close)?;

    let range = if inner {
        Range::on_row(pos.row, opener + 1, closer)
    } else {
        Range::on_row(pos.row, opener, closer + 1)
    };
    Some(TextObject::chars(range))
}

/// Scan backward from `from` (inclusive) for an opener not closed before
/// `from`.
fn find_opening(line: &[char], from: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=from).rev() {
        if line[i] == close {
            depth += 1;
        } else if line[i] == open {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }
    None
}

/// Scan forward from the opener at `opener` for its matching closer.
fn find_closing(line: &[char], opener: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &ch) in line.iter().enumerate().skip(opener + 1) {
        if ch == open {
            depth += 1;
        } else if ch == close {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

/// Columns of unescaped `quote` characters on a line.
fn quote_cols(line: &[char], quote: char) -> Vec<usize> {
    (0..line.len())
        .filter(|&i| line[i] == quote && (i == 0 || line[i - 1] != '\\'))
        .collect()
}

/// A quoted string around or after the cursor; it may span lines.
fn quoted(buf: &Buffer, pos: Position, quote: char, inner: bool) -> Option<TextObject> {
    let opener = find_quote_opener(buf, pos, quote)?;
    let closer = next_quote_after(buf, opener, quote)?;

    let range = if inner {
        Range::new(opener.with_col(opener.col + 1), closer)
    } else {
        Range::new(opener, closer.with_col(closer.col + 1))
    };
    Some(TextObject::chars(range))
}

/// Decide which quote opens the string the cursor is in (or next to).
///
/// A cursor on a quote pairs it with the quotes before it on the line: after
/// an odd number it is a closer. Otherwise the opener is the nearest quote
/// at or before the cursor, scanning back across lines, and failing that the
/// first quote after it.
fn find_quote_opener(buf: &Buffer, pos: Position, quote: char) -> Option<Position> {
    let cols = quote_cols(&buf.line_chars(pos.row), quote);
    let before = cols.iter().filter(|&&c| c < pos.col).count();

    if cols.contains(&pos.col) {
        if before % 2 == 1 {
            return Some(Position::new(pos.row, cols[before - 1]));
        }
        return Some(pos);
    }

    if let Some(&col) = before.checked_sub(1).and_then(|i| cols.get(i)) {
        return Some(Position::new(pos.row, col));
    }
    (0..pos.row)
        .rev()
        .find_map(|row| {
            quote_cols(&buf.line_chars(row), quote)
                .last()
                .map(|&col| Position::new(row, col))
        })
        .or_else(|| cols.get(before).map(|&col| Position::new(pos.row, col)))
        .or_else(|| {
            (pos.row + 1..buf.line_count()).find_map(|row| {
                quote_cols(&buf.line_chars(row), quote)
                    .first()
                    .map(|&col| Position::new(row, col))
            })
        })
}

/// The first unescaped quote after `from`, searching across lines.
fn next_quote_after(buf: &Buffer, from: Position, quote: char) -> Option<Position> {
    (from.row..buf.line_count()).find_map(|row| {
        quote_cols(&buf.line_chars(row), quote)
            .into_iter()
            .find(|&col| row > from.row || col > from.col)
            .map(|col| Position::new(row, col))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn obj(lines: &[&str], pos: Position, kind: ObjectKind, inner: bool) -> Option<String> {
        let buf = Buffer::from_lines(lines);
        resolve(&buf, pos, kind, inner).map(|o| buf.text_in(o.range))
    }

    // -- Keys ---------------------------------------------------------------

    #[test]
    fn keys_map_to_kinds() {
        assert_eq!(ObjectKind::from_char('b'), Some(ObjectKind::Parens));
        assert_eq!(ObjectKind::from_char(')'), Some(ObjectKind::Parens));
        assert_eq!(ObjectKind::from_char('B'), Some(ObjectKind::Braces));
        assert_eq!(ObjectKind::from_char('W'), Some(ObjectKind::Word));
        assert_eq!(ObjectKind::from_char('t'), None);
        assert_eq!(ObjectKind::SingleQuote.to_string(), "singleQuotes");
    }

    // -- Word ---------------------------------------------------------------

    #[test]
    fn inner_word() {
        let got = obj(&["hello world"], p(0, 8), ObjectKind::Word, true);
        assert_eq!(got.as_deref(), Some("world"));
    }

    #[test]
    fn around_word_takes_trailing_spaces() {
        let got = obj(&["one  two"], p(0, 1), ObjectKind::Word, false);
        assert_eq!(got.as_deref(), Some("one  "));
    }

    #[test]
    fn around_last_word_takes_leading_spaces() {
        let got = obj(&["one two"], p(0, 5), ObjectKind::Word, false);
        assert_eq!(got.as_deref(), Some(" two"));
    }

    #[test]
    fn word_underscore_and_digits() {
        let got = obj(&["let my_var2 = 1"], p(0, 6), ObjectKind::Word, true);
        assert_eq!(got.as_deref(), Some("my_var2"));
    }

    #[test]
    fn word_on_punctuation_is_none() {
        assert_eq!(obj(&["a . b"], p(0, 2), ObjectKind::Word, true), None);
        assert_eq!(obj(&[""], p(0, 0), ObjectKind::Word, true), None);
    }

    // -- Brackets -----------------------------------------------------------

    #[test]
    fn inner_parens() {
        let got = obj(&["function(old parameters)"], p(0, 12), ObjectKind::Parens, true);
        assert_eq!(got.as_deref(), Some("old parameters"));
    }

    #[test]
    fn around_parens() {
        let got = obj(&["f(a, b)"], p(0, 3), ObjectKind::Parens, false);
        assert_eq!(got.as_deref(), Some("(a, b)"));
    }

    #[test]
    fn nested_picks_innermost() {
        let got = obj(&["f(a, g(b), c)"], p(0, 7), ObjectKind::Parens, true);
        assert_eq!(got.as_deref(), Some("b"));
        let got = obj(&["f(a, g(b), c)"], p(0, 11), ObjectKind::Parens, true);
        assert_eq!(got.as_deref(), Some("a, g(b), c"));
    }

    #[test]
    fn cursor_on_opener_or_closer() {
        let got = obj(&["x[1, 2]"], p(0, 1), ObjectKind::Brackets, true);
        assert_eq!(got.as_deref(), Some("1, 2"));
        let got = obj(&["x[1, 2]"], p(0, 6), ObjectKind::Brackets, true);
        assert_eq!(got.as_deref(), Some("1, 2"));
    }

    #[test]
    fn before_pair_searches_forward() {
        let got = obj(&["if x { y }"], p(0, 0), ObjectKind::Braces, true);
        assert_eq!(got.as_deref(), Some(" y "));
    }

    #[test]
    fn empty_pair_is_empty_range() {
        let buf = Buffer::from_text("f()");
        let o = resolve(&buf, p(0, 1), ObjectKind::Parens, true).unwrap();
        assert!(o.range.is_empty());
        assert_eq!(o.range.start, p(0, 2));
    }

    #[test]
    fn unbalanced_is_none() {
        assert_eq!(obj(&["f(a, b"], p(0, 3), ObjectKind::Parens, true), None);
        assert_eq!(obj(&["no parens"], p(0, 3), ObjectKind::Parens, true), None);
    }

    #[test]
    fn brackets_are_line_local() {
        assert_eq!(obj(&["f(", "x", ")"], p(1, 0), ObjectKind::Parens, true), None);
    }

    // -- Quotes -------------------------------------------------------------

    #[test]
    fn inner_double_quotes() {
        let got = obj(&["console.log(\"old text\");"], p(0, 15), ObjectKind::DoubleQuote, true);
        assert_eq!(got.as_deref(), Some("old text"));
    }

    #[test]
    fn around_single_quotes() {
        let got = obj(&["x = 'abc' + y"], p(0, 6), ObjectKind::SingleQuote, false);
        assert_eq!(got.as_deref(), Some("'abc'"));
    }

    #[test]
    fn cursor_on_opening_and_closing_quote() {
        let line = ["say \"hi\" now"];
        assert_eq!(obj(&line, p(0, 4), ObjectKind::DoubleQuote, true).as_deref(), Some("hi"));
        assert_eq!(obj(&line, p(0, 7), ObjectKind::DoubleQuote, true).as_deref(), Some("hi"));
    }

    #[test]
    fn between_strings_takes_nearest_quote_behind() {
        let got = obj(&["\"a\" x \"b\""], p(0, 4), ObjectKind::DoubleQuote, true);
        assert_eq!(got.as_deref(), Some(" x "));
    }

    #[test]
    fn no_quote_behind_scans_forward() {
        let got = obj(&["abc", "x = \"hi\""], p(0, 1), ObjectKind::DoubleQuote, true);
        assert_eq!(got.as_deref(), Some("hi"));
    }

    #[test]
    fn escaped_quotes_are_skipped() {
        let got = obj(&[r#"s = "a \"b\" c""#], p(0, 6), ObjectKind::DoubleQuote, true);
        assert_eq!(got.as_deref(), Some(r#"a \"b\" c"#));
    }

    #[test]
    fn quotes_span_lines() {
        let got = obj(&["x = \"first", "second\" y"], p(1, 2), ObjectKind::DoubleQuote, true);
        assert_eq!(got.as_deref(), Some("first\nsecond"));
    }

    #[test]
    fn unterminated_quote_is_none() {
        assert_eq!(obj(&["say \"hi"], p(0, 5), ObjectKind::DoubleQuote, true), None);
    }

    // -- Sentence -----------------------------------------------------------

    #[test]
    fn inner_sentence_includes_terminator() {
        let got = obj(&["One here. Two there! Three"], p(0, 12), ObjectKind::Sentence, true);
        assert_eq!(got.as_deref(), Some("Two there!"));
    }

    #[test]
    fn around_sentence_takes_trailing_space() {
        let got = obj(&["One here. Two there."], p(0, 2), ObjectKind::Sentence, false);
        assert_eq!(got.as_deref(), Some("One here. "));
    }

    #[test]
    fn around_last_sentence_takes_leading_space() {
        let got = obj(&["One here. Two there."], p(0, 12), ObjectKind::Sentence, false);
        assert_eq!(got.as_deref(), Some(" Two there."));
    }

    #[test]
    fn unterminated_sentence_runs_to_line_end() {
        let got = obj(&["First. second part"], p(0, 10), ObjectKind::Sentence, true);
        assert_eq!(got.as_deref(), Some("second part"));
    }

    #[test]
    fn decimal_point_does_not_split() {
        let got = obj(&["Pi is 3.14 roughly."], p(0, 0), ObjectKind::Sentence, true);
        assert_eq!(got.as_deref(), Some("Pi is 3.14 roughly."));
    }

    #[test]
    fn blank_line_has_no_sentence() {
        assert_eq!(obj(&["   "], p(0, 1), ObjectKind::Sentence, true), None);
    }

    // -- Paragraph ----------------------------------------------------------

    fn para_rows(lines: &[&str], row: usize, inner: bool) -> (usize, usize) {
        let buf = Buffer::from_lines(lines);
        let o = resolve(&buf, p(row, 0), ObjectKind::Paragraph, inner).unwrap();
        assert!(o.linewise);
        (o.range.start.row, o.range.end.row)
    }

    #[test]
    fn inner_paragraph_rows() {
        let lines = ["a", "b", "", "c", "d", "", "e"];
        assert_eq!(para_rows(&lines, 0, true), (0, 1));
        assert_eq!(para_rows(&lines, 4, true), (3, 4));
    }

    #[test]
    fn around_paragraph_takes_one_following_blank() {
        let lines = ["a", "b", "", "", "c"];
        assert_eq!(para_rows(&lines, 1, false), (0, 2));
    }

    #[test]
    fn around_last_paragraph_takes_one_preceding_blank() {
        let lines = ["a", "", "", "c", "d"];
        assert_eq!(para_rows(&lines, 4, false), (2, 4));
    }

    #[test]
    fn paragraph_on_blank_lines() {
        let lines = ["a", "", "  ", "b"];
        assert_eq!(para_rows(&lines, 1, true), (1, 2));
        assert_eq!(para_rows(&lines, 1, false), (1, 2));
    }
}
