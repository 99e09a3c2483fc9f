// SPDX-License-Identifier: MIT
//
// dojo-input — Key events for the vimdojo interpreter.
//
// Everything the interpreter consumes is a `KeyEvent`: a key identity
// plus modifier flags. Events arrive from two places:
//
// - Key notation scripts (`d2w`, `ci"new<Esc>`, `<C-v>jjd`) parsed by
//   [`notation`], used by tests, the CLI driver, and lesson fixtures.
// - Browser-style key names (`"ArrowLeft"`, `"Escape"`, `"v"` + ctrl)
//   translated by [`dom`], used by any front end that forwards DOM
//   keyboard events.
//
// Pure modifier presses never become events. The interpreter can rely
// on every event it sees being an actionable key.

pub mod dom;
pub mod key;
pub mod notation;

pub use key::{KeyCode, KeyEvent, Modifiers};
pub use notation::{parse_keys, KeyNotationError};
