// SPDX-License-Identifier: MIT
//
// Key event types.
//
// A `KeyEvent` is the unit of input for the interpreter and the unit
// of storage for macro registers. It is `Copy` and carries no timing
// or press/release state: the interpreter only ever sees presses.

use std::fmt;

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

/// Identity of a key.
///
/// Printable characters use [`Char`](KeyCode::Char) and carry their case,
/// so `Shift+a` arrives as `Char('A')` without the SHIFT flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A Unicode character (printable).
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags! {
    /// Keyboard modifier flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Constructors & Queries ─────────────────────────────────────────────────

impl KeyEvent {
    /// A key event with explicit modifiers.
    #[inline]
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event without modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// A plain printable character.
    #[inline]
    #[must_use]
    pub const fn char(ch: char) -> Self {
        Self::plain(KeyCode::Char(ch))
    }

    /// `Ctrl` + character, e.g. `KeyEvent::ctrl('r')` for redo.
    #[inline]
    #[must_use]
    pub const fn ctrl(ch: char) -> Self {
        Self::new(KeyCode::Char(ch), Modifiers::CTRL)
    }

    /// True when Ctrl is held.
    #[inline]
    #[must_use]
    pub const fn is_ctrl(self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// True for `Escape` and for `Ctrl-[`, which terminals and Vim treat
    /// as the same key.
    #[must_use]
    pub const fn is_escape(self) -> bool {
        match self.code {
            KeyCode::Escape => true,
            KeyCode::Char('[') => self.is_ctrl(),
            _ => false,
        }
    }

    /// The character this key types, if it types one.
    ///
    /// Ctrl and Alt combinations are commands, not text, so they return
    /// `None`.
    #[must_use]
    pub const fn printable(self) -> Option<char> {
        match self.code {
            KeyCode::Char(ch)
                if !self.modifiers.intersects(Modifiers::CTRL.union(Modifiers::ALT)) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }

    /// True when this is exactly `Ctrl` + `ch` (case-insensitive).
    #[must_use]
    pub fn is_ctrl_char(self, ch: char) -> bool {
        self.is_ctrl()
            && matches!(self.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
    }
}

// ─── Notation Display ───────────────────────────────────────────────────────

impl KeyCode {
    /// The bracketed notation name for a named key (`Esc`, `CR`, ...).
    /// Characters return `None`.
    #[must_use]
    pub const fn notation_name(self) -> Option<&'static str> {
        Some(match self {
            Self::Char(_) => return None,
            Self::Enter => "CR",
            Self::Tab => "Tab",
            Self::Backspace => "BS",
            Self::Escape => "Esc",
            Self::Delete => "Del",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Home => "Home",
            Self::End => "End",
        })
    }
}

impl fmt::Display for KeyEvent {
    /// Writes the key in the same notation [`parse_keys`](crate::parse_keys)
    /// accepts, so a macro register can be shown and fed back verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prefix = String::new();
        if self.modifiers.contains(Modifiers::CTRL) {
            prefix.push_str("C-");
        }
        if self.modifiers.contains(Modifiers::ALT) {
            prefix.push_str("A-");
        }
        if self.modifiers.contains(Modifiers::SHIFT) {
            prefix.push_str("S-");
        }

        match (self.code, prefix.is_empty()) {
            (KeyCode::Char('<'), true) => f.write_str("<lt>"),
            (KeyCode::Char(' '), false) => write!(f, "<{prefix}Space>"),
            (KeyCode::Char(ch), true) => write!(f, "{ch}"),
            (KeyCode::Char(ch), false) => write!(f, "<{prefix}{ch}>"),
            (code, _) => {
                let name = code.notation_name().unwrap_or("?");
                write!(f, "<{prefix}{name}>")
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
