//! Modes of the interpreter.
//!
//! The session is always in exactly one [`Mode`]:
//!
//! | Mode            | Cursor limit        | Keys mean                        |
//! |-----------------|---------------------|----------------------------------|
//! | Normal          | `0..len-1`          | commands, motions, operators     |
//! | Insert          | `0..len`            | text                             |
//! | Visual(kind)    | `0..len-1`          | motions extend a selection       |
//! | Search(dir)     | (in the prompt)     | the `/` or `?` query             |
//! | Command         | (in the prompt)     | the `:` command line             |
//!
//! Pending sub-states (an operator waiting for its motion, `r` waiting for
//! its character, ...) are not modes; they live in the session's pending
//! state machine.

use std::fmt;

use crate::search::SearchDirection;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The flavor of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisualKind {
    /// `v`
    Char,
    /// `V`
    Line,
    /// `Ctrl-v`
    Block,
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Visual(VisualKind),
    /// Typing a `/` (forward) or `?` (backward) query.
    Search(SearchDirection),
    /// Typing a `:` command.
    Command,
}

impl Mode {
    /// Name shown in the status line.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Insert => "INSERT",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
            Self::Visual(VisualKind::Block) => "VISUAL BLOCK",
            Self::Search(SearchDirection::Forward) => "SEARCH",
            Self::Search(SearchDirection::Backward) => "SEARCH BACKWARD",
            Self::Command => "COMMAND",
        }
    }

    /// How a renderer should draw the cursor.
    #[must_use]
    pub const fn cursor_shape(self) -> CursorShape {
        match self {
            Self::Normal | Self::Visual(_) => CursorShape::Block,
            Self::Insert | Self::Search(_) | Self::Command => CursorShape::Bar,
        }
    }

    /// True if the cursor may sit one past the last character.
    #[inline]
    #[must_use]
    pub const fn cursor_past_end(self) -> bool {
        matches!(self, Self::Insert)
    }

    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    /// True while keys are typed into the `:` / `/` / `?` prompt.
    #[inline]
    #[must_use]
    pub const fn is_prompt(self) -> bool {
        matches!(self, Self::Search(_) | Self::Command)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// CursorShape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorShape {
    /// Sits on a character.
    Block,
    /// Sits between characters.
    Bar,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn display_names() {
        assert_eq!(Mode::Normal.to_string(), "NORMAL");
        assert_eq!(Mode::Visual(VisualKind::Line).to_string(), "VISUAL LINE");
        assert_eq!(Mode::Visual(VisualKind::Block).to_string(), "VISUAL BLOCK");
        assert_eq!(
            Mode::Search(SearchDirection::Backward).to_string(),
            "SEARCH BACKWARD"
        );
    }

    #[test]
    fn only_insert_goes_past_end() {
        assert!(Mode::Insert.cursor_past_end());
        assert!(!Mode::Normal.cursor_past_end());
        assert!(!Mode::Visual(VisualKind::Char).cursor_past_end());
        assert!(!Mode::Command.cursor_past_end());
    }

    #[test]
    fn shapes() {
        assert_eq!(Mode::Normal.cursor_shape(), CursorShape::Block);
        assert_eq!(Mode::Insert.cursor_shape(), CursorShape::Bar);
        assert_eq!(Mode::Command.cursor_shape(), CursorShape::Bar);
    }

    #[test]
    fn predicates() {
        assert!(Mode::Visual(VisualKind::Char).is_visual());
        assert!(!Mode::Insert.is_visual());
        assert!(Mode::Search(SearchDirection::Forward).is_prompt());
        assert!(Mode::Command.is_prompt());
        assert!(!Mode::Normal.is_prompt());
    }
}
