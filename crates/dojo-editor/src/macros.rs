//! Macro recording and register storage.
//!
//! `q{a-z}` starts recording, `q` stops, `@{a-z}` plays, `@@` replays the
//! last played register. Each recorded [`Keystroke`] carries the mode it was
//! interpreted in, and playback re-applies it through the same entry point
//! as live input. Keys typed into insert mode during a recording replay as
//! text, not as commands.
//!
//! This module only stores keystrokes. Deciding which keystrokes to record
//! and replaying them belongs to the session.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use dojo_input::KeyEvent;

use crate::mode::Mode;

/// One recorded key and the mode that interpreted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: KeyEvent,
    pub mode: Mode,
}

#[derive(Debug, Clone, Default)]
pub struct MacroState {
    recording: Option<char>,
    keystrokes: Vec<Keystroke>,
    saved: BTreeMap<char, Vec<Keystroke>>,
    last_played: Option<char>,
    depth: usize,
}

impl MacroState {
    // -- Recording ----------------------------------------------------------

    /// Start recording into `register`. Returns `false` for anything but
    /// `a-z`.
    pub fn start(&mut self, register: char) -> bool {
        if !register.is_ascii_lowercase() {
            return false;
        }
        self.recording = Some(register);
        self.keystrokes.clear();
        true
    }

    /// Stop recording and save the keystrokes. Returns the register written.
    pub fn stop(&mut self) -> Option<char> {
        let register = self.recording.take()?;
        self.saved
            .insert(register, std::mem::take(&mut self.keystrokes));
        Some(register)
    }

    #[inline]
    #[must_use]
    pub const fn recording(&self) -> Option<char> {
        self.recording
    }

    /// Append a keystroke if recording.
    pub fn record(&mut self, key: KeyEvent, mode: Mode) {
        if self.recording.is_some() {
            self.keystrokes.push(Keystroke { key, mode });
        }
    }

    // -- Playback bookkeeping -----------------------------------------------

    /// The keystrokes saved under `register`, if any.
    #[must_use]
    pub fn get(&self, register: char) -> Option<&[Keystroke]> {
        self.saved.get(&register).map(Vec::as_slice)
    }

    #[must_use]
    pub const fn last_played(&self) -> Option<char> {
        self.last_played
    }

    pub const fn set_last_played(&mut self, register: char) {
        self.last_played = Some(register);
    }

    /// Current playback nesting. Zero when no macro is playing.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.depth > 0
    }

    pub const fn enter_playback(&mut self) {
        self.depth += 1;
    }

    pub const fn leave_playback(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// A register's keys in key notation, e.g. `dw` or `ciwnew<Esc>`.
    #[must_use]
    pub fn describe(&self, register: char) -> Option<String> {
        self.get(register).map(|keys| {
            keys.iter().fold(String::new(), |mut out, k| {
                let _ = write!(out, "{}", k.key);
                out
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
