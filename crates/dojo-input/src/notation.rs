// SPDX-License-Identifier: MIT
//
// Key notation parser.
//
// Turns a Vim-style key script into key events:
//
//   dw            → 'd', 'w'
//   ci"new<Esc>   → 'c', 'i', '"', 'n', 'e', 'w', Escape
//   <C-v>jjd      → Ctrl+v, 'j', 'j', 'd'
//   >><lt><lt>    → '>', '>', '<', '<'
//
// Bracketed names are case-insensitive. A `<` that does not open a
// recognised name is a literal `<`, the same way Vim's mapping parser
// treats it. The one hard error is a modifier prefix (`C-`, `S-`, `A-`,
// `M-`) in front of a name we do not know: that is clearly an attempt
// at notation, and typing it literally would hide the mistake.

use thiserror::Error;

use crate::key::{KeyCode, KeyEvent, Modifiers};

/// Failure to parse a key script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyNotationError {
    /// A `<C-…>`-style token names a key we do not recognise.
    #[error("unknown key name in <{0}>")]
    UnknownKey(String),
}

/// Parse a key script into events.
///
/// # Errors
///
/// Returns [`KeyNotationError::UnknownKey`] for a modified bracket token
/// whose key name is not recognised (e.g. `<C-Foo>`).
pub fn parse_keys(script: &str) -> Result<Vec<KeyEvent>, KeyNotationError> {
    let mut keys = Vec::with_capacity(script.len());
    let mut rest = script;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some((key, consumed)) = parse_bracketed(rest)? {
                keys.push(key);
                rest = &rest[consumed..];
                continue;
            }
        }
        keys.push(KeyEvent::char(ch));
        rest = &rest[ch.len_utf8()..];
    }

    Ok(keys)
}

/// Try to read `<name>` at the start of `input`.
///
/// Returns the key and the byte length consumed, or `None` when the
/// text is not notation and the `<` should be taken literally.
fn parse_bracketed(input: &str) -> Result<Option<(KeyEvent, usize)>, KeyNotationError> {
    debug_assert!(input.starts_with('<'));

    let Some(close) = input[1..].find('>') else {
        return Ok(None);
    };
    let body = &input[1..=close];
    if body.is_empty() || body.contains(char::is_whitespace) || body.contains('<') {
        return Ok(None);
    }

    let (modifiers, name) = split_modifiers(body);
    let consumed = close + 2;

    match named_key(name, modifiers) {
        Some(key) => Ok(Some((key, consumed))),
        None if modifiers.is_empty() => Ok(None),
        None => Err(KeyNotationError::UnknownKey(body.to_string())),
    }
}

/// Strip leading `C-` / `S-` / `A-` / `M-` prefixes.
fn split_modifiers(body: &str) -> (Modifiers, &str) {
    let mut modifiers = Modifiers::empty();
    let mut name = body;

    // A bare "-" or "C--" must keep its final dash as the key name.
    while name.len() > 2 && name.as_bytes()[1] == b'-' {
        let flag = match name.as_bytes()[0].to_ascii_uppercase() {
            b'C' => Modifiers::CTRL,
            b'S' => Modifiers::SHIFT,
            b'A' | b'M' => Modifiers::ALT,
            _ => break,
        };
        modifiers |= flag;
        name = &name[2..];
    }

    (modifiers, name)
}

/// Resolve a bracket name (after modifiers) to an event.
fn named_key(name: &str, modifiers: Modifiers) -> Option<KeyEvent> {
    let code = match name.to_ascii_lowercase().as_str() {
        "esc" | "escape" => KeyCode::Escape,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "del" | "delete" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        "bar" => KeyCode::Char('|'),
        "bslash" => KeyCode::Char('\\'),
        _ => return single_char(name, modifiers),
    };
    Some(KeyEvent::new(code, modifiers))
}

/// `<C-v>`, `<A-x>`: a single character only makes sense with a modifier.
fn single_char(name: &str, modifiers: Modifiers) -> Option<KeyEvent> {
    if modifiers.is_empty() {
        return None;
    }
    let mut chars = name.chars();
    let ch = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    // Ctrl letters are case-insensitive in Vim; store them lowercase.
    let ch = if modifiers.contains(Modifiers::CTRL) {
        ch.to_ascii_lowercase()
    } else {
        ch
    };
    Some(KeyEvent::new(KeyCode::Char(ch), modifiers))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: parse a script that must be valid.
    fn keys(script: &str) -> Vec<KeyEvent> {
        parse_keys(script).unwrap()
    }

    fn chars(s: &str) -> Vec<KeyEvent> {
        s.chars().map(KeyEvent::char).collect()
    }

    fn esc() -> KeyEvent {
        KeyEvent::plain(KeyCode::Escape)
    }

    // ── Plain characters ────────────────────────────────────────────────

    #[test]
    fn plain_script() {
        assert_eq!(keys("d2w"), chars("d2w"));
    }

    #[test]
    fn empty_script() {
        assert!(keys("").is_empty());
    }

    #[test]
    fn unicode_chars() {
        assert_eq!(keys("iñ"), chars("iñ"));
    }

    // ── Named keys ──────────────────────────────────────────────────────

    #[test]
    fn escape_in_script() {
        let mut expected = chars("ci\"new");
        expected.push(esc());
        assert_eq!(keys("ci\"new<Esc>"), expected);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(keys("<ESC>"), vec![esc()]);
        assert_eq!(keys("<cr>"), vec![KeyEvent::plain(KeyCode::Enter)]);
        assert_eq!(keys("<Enter>"), vec![KeyEvent::plain(KeyCode::Enter)]);
    }

    #[test]
    fn lt_is_less_than() {
        assert_eq!(keys("<lt><lt>"), chars("<<"));
    }

    #[test]
    fn space_name() {
        assert_eq!(keys("<Space>"), chars(" "));
    }

    #[test]
    fn arrows() {
        assert_eq!(
            keys("<Left><Down>"),
            vec![KeyEvent::plain(KeyCode::Left), KeyEvent::plain(KeyCode::Down)]
        );
    }

    // ── Modifiers ───────────────────────────────────────────────────────

    #[test]
    fn ctrl_letter() {
        let mut expected = vec![KeyEvent::ctrl('v')];
        expected.extend(chars("jjd"));
        assert_eq!(keys("<C-v>jjd"), expected);
    }

    #[test]
    fn ctrl_letter_is_lowercased() {
        assert_eq!(keys("<C-R>"), vec![KeyEvent::ctrl('r')]);
    }

    #[test]
    fn ctrl_bracket() {
        let k = keys("<C-[>");
        assert_eq!(k.len(), 1);
        assert!(k[0].is_escape());
    }

    #[test]
    fn stacked_modifiers() {
        assert_eq!(
            keys("<C-S-Left>"),
            vec![KeyEvent::new(KeyCode::Left, Modifiers::CTRL | Modifiers::SHIFT)]
        );
    }

    #[test]
    fn ctrl_dash() {
        assert_eq!(
            keys("<C-->"),
            vec![KeyEvent::new(KeyCode::Char('-'), Modifiers::CTRL)]
        );
    }

    // ── Literal fallback ────────────────────────────────────────────────

    #[test]
    fn unclosed_angle_is_literal() {
        assert_eq!(keys("i<<Esc>"), {
            let mut v = chars("i<");
            v.push(esc());
            v
        });
    }

    #[test]
    fn unknown_plain_name_is_literal() {
        assert_eq!(keys("a<b>"), chars("a<b>"));
    }

    #[test]
    fn whitespace_inside_is_literal() {
        assert_eq!(keys("<a b>"), chars("<a b>"));
    }

    #[test]
    fn empty_brackets_are_literal() {
        assert_eq!(keys("<>"), chars("<>"));
    }

    // ── Errors ──────────────────────────────────────────────────────────

    #[test]
    fn unknown_modified_name_errors() {
        assert_eq!(
            parse_keys("<C-Nope>"),
            Err(KeyNotationError::UnknownKey("C-Nope".into()))
        );
    }

    #[test]
    fn error_message() {
        let err = parse_keys("<A-Whatever>").unwrap_err();
        assert_eq!(err.to_string(), "unknown key name in <A-Whatever>");
    }

    // ── Display round trip ──────────────────────────────────────────────

    #[test]
    fn display_feeds_back_into_parser() {
        let script = "qa<C-v>jd<lt>i<Tab>x<Esc>q";
        let parsed = keys(script);
        let shown: String = parsed.iter().map(ToString::to_string).collect();
        assert_eq!(keys(&shown), parsed);
    }
}
