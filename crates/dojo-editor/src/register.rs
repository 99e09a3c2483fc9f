//! Register — the unnamed slot for yanked and deleted text.
//!
//! Every yank (`y`) and delete (`d`, `x`, `D`, `c`) writes here; `p` and `P`
//! read from here. There is exactly one register. Named registers hold
//! macros instead (see [`crate::macros`]).
//!
//! The register remembers how its text was captured, because put behaves
//! differently for each kind:
//!
//! - **Char**: `p` inserts after the cursor, `P` before it.
//! - **Line**: `p` opens the lines below the cursor line, `P` above it.
//!
//! Line-wise text is stored as the lines joined by `\n`, with no trailing
//! newline.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisterKind {
    /// From `x`, `dw`, `yiw`, `v...y`.
    #[default]
    Char,
    /// From `dd`, `yy`, `dj`, `V...y`, `dap`.
    Line,
}

/// The unnamed register.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Register {
    content: String,
    kind: RegisterKind,
}

impl Register {
    /// Replace the register with char-wise text.
    pub fn set_chars(&mut self, text: String) {
        self.content = text;
        self.kind = RegisterKind::Char;
    }

    /// Replace the register with whole lines.
    pub fn set_lines(&mut self, lines: &[String]) {
        self.content = lines.join("\n");
        self.kind = RegisterKind::Line;
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> RegisterKind {
        self.kind
    }

    /// The content split into lines, for line-wise put.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.content.split('\n').map(str::to_owned).collect()
    }

    /// True when nothing has been yanked. A line-wise register holding one
    /// empty line is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.kind == RegisterKind::Char
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let reg = Register::default();
        assert!(reg.is_empty());
        assert_eq!(reg.kind(), RegisterKind::Char);
    }

    #[test]
    fn char_content() {
        let mut reg = Register::default();
        reg.set_chars("hello ".into());
        assert_eq!(reg.content(), "hello ");
        assert_eq!(reg.kind(), RegisterKind::Char);
    }

    #[test]
    fn line_content_round_trips() {
        let mut reg = Register::default();
        reg.set_lines(&["one".into(), "two".into()]);
        assert_eq!(reg.content(), "one\ntwo");
        assert_eq!(reg.kind(), RegisterKind::Line);
        assert_eq!(reg.lines(), vec!["one", "two"]);
    }

    #[test]
    fn single_empty_line_is_not_empty() {
        let mut reg = Register::default();
        reg.set_lines(&[String::new()]);
        assert!(!reg.is_empty());
        assert_eq!(reg.lines(), vec![""]);
    }

    #[test]
    fn overwrite_replaces_kind() {
        let mut reg = Register::default();
        reg.set_lines(&["a".into()]);
        reg.set_chars("b".into());
        assert_eq!(reg.kind(), RegisterKind::Char);
        assert_eq!(reg.content(), "b");
    }
}
