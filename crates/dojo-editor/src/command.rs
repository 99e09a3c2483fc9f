//! Command line — prompt editing, Ex command parsing and substitution.
//!
//! The `:` prompt and the `/` `?` search prompt share one [`CommandLine`]
//! editor. When the `:` prompt is confirmed its text is parsed into an
//! [`ExCommand`] and the session executes it.
//!
//! # Supported commands
//!
//! | Command              | Effect                                        |
//! |----------------------|-----------------------------------------------|
//! | `:w`                 | Mark the buffer saved (there is no file)      |
//! | `:q`                 | Quit                                          |
//! | `:wq`                | Mark saved and quit                           |
//! | `:s/pat/rep/flags`   | Regex substitution on every line              |
//! | `:%s/pat/rep/flags`  | Same; `%` names the range that is already used |
//!
//! Anything else parses to [`ExCommand::Unknown`] and has no effect beyond
//! being remembered as the last Ex command.
//!
//! # Substitution
//!
//! - The first character after `s` is the delimiter. `\<delim>` inside the
//!   pattern or replacement is a literal delimiter. The trailing delimiter
//!   is optional.
//! - The pattern is a regular expression ([`regex`] syntax). It must not be
//!   empty.
//! - In the replacement `\1`..`\9` insert capture groups (a group that did
//!   not take part in the match inserts nothing). `&` and `$` are literal.
//! - Flags: `g` replaces every match on a line instead of the first, `i`
//!   ignores case, `c` is accepted and applies without asking. Any other
//!   flag is an error.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::buffer::Buffer;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Flags for the `:s` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubFlags {
    /// `g`: every match on the line.
    pub global: bool,
    /// `c`: confirm each replacement. Accepted, never prompts.
    pub confirm: bool,
    /// `i`: case-insensitive.
    pub ignore_case: bool,
}

/// A parsed `:s` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub pattern: String,
    pub replacement: String,
    pub flags: SubFlags,
}

/// A parsed Ex command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:w`
    Write,
    /// `:q`
    Quit,
    /// `:wq`
    WriteQuit,
    /// `:s/pat/rep/flags`, with or without a leading `%`.
    Substitute(Substitution),
    /// Anything else, kept verbatim.
    Unknown(String),
}

/// What executing a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Command succeeded. Optional message for the status line.
    Done(Option<String>),

    /// Command failed. Error message for the status line.
    Failed(String),

    /// The session should quit.
    Quit,
}

/// Why a substitution could not run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstituteError {
    #[error("incomplete substitution, expected s/pattern/replacement/flags")]
    Incomplete,

    #[error("empty search pattern")]
    EmptyPattern,

    #[error("invalid flag: {0}")]
    InvalidFlag(char),

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("pattern not found: {0}")]
    NotFound(String),
}

/// The effect of a substitution that changed something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstituteReport {
    /// Matches replaced.
    pub replacements: usize,
    /// Lines that changed.
    pub lines: usize,
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The text typed into the `:` or `/` prompt.
///
/// The prompt character itself is not stored; the renderer draws it from
/// the mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    input: String,

    /// Char offset within `input`.
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_char(&mut self, ch: char) {
        let byte_idx = self.byte_offset(self.cursor);
        self.input.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Delete the character before the cursor. Returns `false` at the start
    /// of the line.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let byte_idx = self.byte_offset(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    /// Delete the character under the cursor. Returns `false` at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.input.chars().count() {
            return false;
        }
        let byte_idx = self.byte_offset(self.cursor);
        self.input.remove(byte_idx);
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the line empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(byte_idx, _)| byte_idx)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a command (without the leading `:`).
///
/// # Errors
///
/// A command that starts like a substitution but is malformed (bad flag,
/// empty pattern, `s` alone) is an error. Unrecognized commands are not;
/// they parse to [`ExCommand::Unknown`].
pub fn parse_command(input: &str) -> Result<ExCommand, SubstituteError> {
    let trimmed = input.trim();
    let rest = trimmed.strip_prefix('%').unwrap_or(trimmed);

    if let Some(body) = rest.strip_prefix('s') {
        if body.is_empty() {
            return Err(SubstituteError::Incomplete);
        }
        // `:set` and friends are not substitutions.
        let delimited = body
            .chars()
            .next()
            .is_some_and(|d| !d.is_alphanumeric() && !d.is_whitespace() && d != '\\');
        if delimited {
            return parse_substitute(body).map(ExCommand::Substitute);
        }
    }

    Ok(match trimmed {
        "w" => ExCommand::Write,
        "q" => ExCommand::Quit,
        "wq" => ExCommand::WriteQuit,
        _ => ExCommand::Unknown(trimmed.to_owned()),
    })
}

/// Parse the part of `:s` after the `s`: `/pat/rep/flags`.
fn parse_substitute(body: &str) -> Result<Substitution, SubstituteError> {
    let mut chars = body.chars();
    let delim = chars.next().ok_or(SubstituteError::Incomplete)?;
    let after_delim = chars.as_str();

    let (pattern, rest) = split_at_unescaped(after_delim, delim).unwrap_or((after_delim, ""));
    let (replacement, flags) = split_at_unescaped(rest, delim).unwrap_or((rest, ""));

    let pattern = unescape_delim(pattern, delim);
    if pattern.is_empty() {
        return Err(SubstituteError::EmptyPattern);
    }

    Ok(Substitution {
        pattern,
        replacement: unescape_delim(replacement, delim),
        flags: parse_sub_flags(flags)?,
    })
}

/// Split at the first `delim` not preceded by a backslash.
fn split_at_unescaped(s: &str, delim: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (byte_idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == delim {
            return Some((&s[..byte_idx], &s[byte_idx + ch.len_utf8()..]));
        }
    }
    None
}

/// `\<delim>` becomes `<delim>`. Other escapes pass through for the regex
/// engine or the replacement.
fn unescape_delim(s: &str, delim: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&delim) {
            out.push(delim);
            chars.next();
        } else {
            out.push(ch);
        }
    }
    out
}

fn parse_sub_flags(s: &str) -> Result<SubFlags, SubstituteError> {
    let mut flags = SubFlags::default();
    for ch in s.trim().chars() {
        match ch {
            'g' => flags.global = true,
            'c' => flags.confirm = true,
            'i' => flags.ignore_case = true,
            other => return Err(SubstituteError::InvalidFlag(other)),
        }
    }
    Ok(flags)
}

/// Turn `\N` group references into the `regex` crate's `${N}` and make
/// every other character literal.
fn expand_template(replacement: &str) -> String {
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut chars = replacement.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek().is_some_and(char::is_ascii_digit) => {
                out.push_str("${");
                while let Some(d) = chars.next_if(char::is_ascii_digit) {
                    out.push(d);
                }
                out.push('}');
            }
            '$' => out.push_str("$$"),
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

impl Substitution {
    /// Compile the pattern.
    ///
    /// # Errors
    ///
    /// [`SubstituteError::InvalidPattern`] if the regex does not compile.
    pub fn compile(&self) -> Result<Regex, SubstituteError> {
        RegexBuilder::new(&self.pattern)
            .case_insensitive(self.flags.ignore_case)
            .build()
            .map_err(|e| SubstituteError::InvalidPattern(error_summary(&e.to_string())))
    }

    /// Run the substitution over every line of `buf`.
    ///
    /// The buffer is only touched when at least one line changes.
    ///
    /// # Errors
    ///
    /// An invalid pattern, or a pattern with no match anywhere. The buffer
    /// is unchanged in both cases.
    pub fn apply(&self, buf: &mut Buffer) -> Result<SubstituteReport, SubstituteError> {
        let regex = self.compile()?;
        let template = expand_template(&self.replacement);
        // `replacen` treats 0 as "no limit".
        let limit = usize::from(!self.flags.global);

        let mut report = SubstituteReport {
            replacements: 0,
            lines: 0,
        };
        let mut changed = Vec::new();
        for (row, line) in buf.lines().into_iter().enumerate() {
            let hits = if self.flags.global {
                regex.find_iter(&line).count()
            } else {
                usize::from(regex.is_match(&line))
            };
            if hits == 0 {
                continue;
            }
            let replaced = regex.replacen(&line, limit, template.as_str());
            report.replacements += hits;
            if replaced != line {
                report.lines += 1;
                changed.push((row, replaced.into_owned()));
            }
        }

        if report.replacements == 0 {
            return Err(SubstituteError::NotFound(self.pattern.clone()));
        }
        for (row, text) in &changed {
            buf.set_line(*row, text);
        }
        Ok(report)
    }
}

// regex errors span several lines; the last one says what went wrong.
fn error_summary(s: &str) -> String {
    s.lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .unwrap_or(s)
        .to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sub(input: &str) -> Substitution {
        match parse_command(input) {
            Ok(ExCommand::Substitute(s)) => s,
            other => panic!("expected substitution, got {other:?}"),
        }
    }

    fn run(lines: &[&str], cmd: &str) -> (Vec<String>, Result<SubstituteReport, SubstituteError>) {
        let mut buf = Buffer::from_lines(lines);
        let result = sub(cmd).apply(&mut buf);
        (buf.lines(), result)
    }

    // -- CommandLine ---------------------------------------------------------

    #[test]
    fn typing_and_editing() {
        let mut cl = CommandLine::new();
        for ch in "wq".chars() {
            cl.insert_char(ch);
        }
        assert_eq!(cl.input(), "wq");
        cl.move_home();
        cl.insert_char('%');
        assert_eq!(cl.input(), "%wq");
        assert_eq!(cl.cursor(), 1);
        assert!(cl.delete());
        assert_eq!(cl.input(), "%q");
        cl.move_end();
        assert!(!cl.delete());
        assert!(cl.backspace());
        assert_eq!(cl.input(), "%");
    }

    #[test]
    fn backspace_at_start_reports_false() {
        let mut cl = CommandLine::new();
        assert!(!cl.backspace());
        cl.insert_char('x');
        cl.move_left();
        assert!(!cl.backspace());
        cl.move_right();
        cl.move_right();
        assert_eq!(cl.cursor(), 1);
    }

    #[test]
    fn multibyte_input() {
        let mut cl = CommandLine::new();
        for ch in "héé".chars() {
            cl.insert_char(ch);
        }
        cl.move_left();
        assert!(cl.backspace());
        assert_eq!(cl.input(), "hé");
        assert_eq!(cl.take(), "hé");
        assert!(cl.is_empty());
    }

    // -- parse_command -------------------------------------------------------

    #[test]
    fn basic_commands() {
        assert_eq!(parse_command("w"), Ok(ExCommand::Write));
        assert_eq!(parse_command(" q "), Ok(ExCommand::Quit));
        assert_eq!(parse_command("wq"), Ok(ExCommand::WriteQuit));
        assert_eq!(
            parse_command("set number"),
            Ok(ExCommand::Unknown("set number".into()))
        );
        assert_eq!(parse_command(""), Ok(ExCommand::Unknown(String::new())));
    }

    #[test]
    fn substitute_forms() {
        let s = sub("s/old/new/g");
        assert_eq!(s.pattern, "old");
        assert_eq!(s.replacement, "new");
        assert!(s.flags.global);

        let s = sub("%s/a/b");
        assert_eq!((s.pattern.as_str(), s.replacement.as_str()), ("a", "b"));
        assert_eq!(s.flags, SubFlags::default());

        let s = sub("s/gone/");
        assert_eq!(s.replacement, "");

        let s = sub("s#a/b#c#gci");
        assert_eq!(s.pattern, "a/b");
        assert_eq!(
            s.flags,
            SubFlags {
                global: true,
                confirm: true,
                ignore_case: true
            }
        );
    }

    #[test]
    fn escaped_delimiter() {
        let s = sub(r"s/a\/b/c\/d/");
        assert_eq!(s.pattern, "a/b");
        assert_eq!(s.replacement, "c/d");
    }

    #[test]
    fn malformed_substitutions() {
        assert_eq!(parse_command("s"), Err(SubstituteError::Incomplete));
        assert_eq!(parse_command("s//x/"), Err(SubstituteError::EmptyPattern));
        assert_eq!(
            parse_command("s/a/b/gz"),
            Err(SubstituteError::InvalidFlag('z'))
        );
    }

    // -- Substitution --------------------------------------------------------

    #[test]
    fn global_replaces_every_match() {
        let (lines, report) = run(
            &["old text with old words", "more old content here"],
            "s/old/new/g",
        );
        assert_eq!(lines, vec!["new text with new words", "more new content here"]);
        assert_eq!(
            report,
            Ok(SubstituteReport {
                replacements: 3,
                lines: 2
            })
        );
    }

    #[test]
    fn without_g_replaces_first_per_line() {
        let (lines, _) = run(&["aa aa", "b aa"], "s/aa/x/");
        assert_eq!(lines, vec!["x aa", "b x"]);
    }

    #[test]
    fn ignore_case_flag() {
        let (lines, _) = run(&["Foo foo"], "s/foo/bar/gi");
        assert_eq!(lines, vec!["bar bar"]);
        let (lines, _) = run(&["Foo foo"], "s/foo/bar/g");
        assert_eq!(lines, vec!["Foo bar"]);
    }

    #[test]
    fn capture_groups() {
        let (lines, _) = run(&["john smith"], r"s/(\w+) (\w+)/\2, \1/");
        assert_eq!(lines, vec!["smith, john"]);
    }

    #[test]
    fn missing_group_is_empty_and_specials_are_literal() {
        let (lines, _) = run(&["abc"], r"s/b/[\3]&$1/");
        assert_eq!(lines, vec!["a[]&$1c"]);
    }

    #[test]
    fn invalid_regex_leaves_buffer() {
        let (lines, result) = run(&["keep (me"], "s/(me/x/");
        assert_eq!(lines, vec!["keep (me"]);
        assert!(matches!(result, Err(SubstituteError::InvalidPattern(_))));
    }

    #[test]
    fn no_match_is_not_found() {
        let mut buf = Buffer::from_lines(["abc"]);
        let result = sub("s/zzz/y/").apply(&mut buf);
        assert_eq!(result, Err(SubstituteError::NotFound("zzz".into())));
        assert!(!buf.is_modified());
    }
}
