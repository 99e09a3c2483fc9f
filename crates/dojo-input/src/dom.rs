// SPDX-License-Identifier: MIT
//
// Browser keyboard event translation.
//
// Front ends that run in a browser receive `KeyboardEvent.key` strings
// ("a", "A", "Escape", "ArrowLeft", "Shift", ...) plus ctrl/shift/alt
// booleans. This module maps them to `KeyEvent`s so the interpreter
// never sees browser-specific shapes.

use crate::key::{KeyCode, KeyEvent, Modifiers};

/// Translate a browser `KeyboardEvent` into a key event.
///
/// Returns `None` for keys the interpreter never acts on: bare modifier
/// presses (`Shift`, `Control`, ...), dead keys, and function keys.
///
/// Shift is dropped for character keys because the browser has already
/// applied it to `key` (`"A"`, `"?"`). It is kept for named keys so that
/// `Shift+ArrowLeft` stays distinguishable.
#[must_use]
pub fn from_dom(key: &str, ctrl: bool, shift: bool, alt: bool) -> Option<KeyEvent> {
    let mut modifiers = Modifiers::empty();
    modifiers.set(Modifiers::CTRL, ctrl);
    modifiers.set(Modifiers::ALT, alt);

    let mut chars = key.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        let ch = if ctrl { ch.to_ascii_lowercase() } else { ch };
        return Some(KeyEvent::new(KeyCode::Char(ch), modifiers));
    }

    let code = match key {
        "Escape" | "Esc" => KeyCode::Escape,
        "Enter" => KeyCode::Enter,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Delete" | "Del" => KeyCode::Delete,
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Spacebar" => KeyCode::Char(' '),
        _ => return None,
    };
    modifiers.set(Modifiers::SHIFT, shift);
    Some(KeyEvent::new(code, modifiers))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_letter() {
        assert_eq!(from_dom("d", false, false, false), Some(KeyEvent::char('d')));
    }

    #[test]
    fn shifted_letter_keeps_case_without_flag() {
        assert_eq!(from_dom("G", false, true, false), Some(KeyEvent::char('G')));
    }

    #[test]
    fn ctrl_letter_is_lowercased() {
        assert_eq!(from_dom("V", true, true, false), Some(KeyEvent::ctrl('v')));
    }

    #[test]
    fn ctrl_bracket_is_escape() {
        let k = from_dom("[", true, false, false).unwrap();
        assert!(k.is_escape());
    }

    #[test]
    fn escape_key() {
        let k = from_dom("Escape", false, false, false).unwrap();
        assert!(k.is_escape());
    }

    #[test]
    fn arrows_map() {
        assert_eq!(
            from_dom("ArrowLeft", false, false, false),
            Some(KeyEvent::plain(KeyCode::Left))
        );
        assert_eq!(
            from_dom("ArrowDown", false, true, false),
            Some(KeyEvent::new(KeyCode::Down, Modifiers::SHIFT))
        );
    }

    #[test]
    fn alt_char() {
        assert_eq!(
            from_dom("x", false, false, true),
            Some(KeyEvent::new(KeyCode::Char('x'), Modifiers::ALT))
        );
    }

    #[test]
    fn pure_modifiers_are_ignored() {
        for name in ["Shift", "Control", "Alt", "Meta", "CapsLock"] {
            assert_eq!(from_dom(name, false, false, false), None, "{name}");
        }
    }

    #[test]
    fn function_keys_are_ignored() {
        assert_eq!(from_dom("F5", false, false, false), None);
    }

    #[test]
    fn space_is_a_char() {
        assert_eq!(from_dom(" ", false, false, false), Some(KeyEvent::char(' ')));
    }
}
