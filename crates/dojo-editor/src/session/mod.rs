//! Session — one learner's editor and the keystroke interpreter driving it.
//!
//! A [`Session`] owns every piece of interpreter state: buffer, cursor,
//! mode, the pending-key state machine, register, undo history, search,
//! marks, macros, options and usage counters. Nothing is global, so any
//! number of sessions can run side by side.
//!
//! Every key enters through [`Session::apply_keystroke`], which routes it to
//! the handler for a mode. Live input calls it with the current mode (via
//! [`Session::feed`]); macro playback calls it with the mode each keystroke
//! was recorded in. After each key the cursor is clamped, the search
//! matches are recompiled if the buffer changed, and the visual selection
//! cells are recomputed.
//!
//! Handlers are split by mode:
//!
//! - `normal`: counts, pending keys, single-key commands, shared motions
//! - `operator`: `d`/`c`/`y` spans and the other editing commands
//! - `visual`: selections and visual operators
//! - `insert`: typing
//! - `prompt`: the `/`, `?` and `:` lines, and Ex commands

mod insert;
mod normal;
mod operator;
mod prompt;
mod visual;

use std::fmt::Write as _;

use dojo_input::{KeyEvent, KeyNotationError, parse_keys};
use tracing::{debug, trace, warn};

use crate::buffer::Buffer;
use crate::command::CommandLine;
use crate::cursor::{Cursor, FindKind};
use crate::history::{History, Snapshot};
use crate::macros::MacroState;
use crate::marks::Marks;
use crate::mode::Mode;
use crate::options::Options;
use crate::position::Position;
use crate::register::Register;
use crate::search::{Match, SearchState};
use crate::usage::Usage;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// The three operators that take a motion or text object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Change,
    Yank,
}

impl Operator {
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'd' => Some(Self::Delete),
            'c' => Some(Self::Change),
            'y' => Some(Self::Yank),
            _ => None,
        }
    }

    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Delete => 'd',
            Self::Change => 'c',
            Self::Yank => 'y',
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Change => "change",
            Self::Yank => "yank",
        }
    }
}

// ---------------------------------------------------------------------------
// Pending state
// ---------------------------------------------------------------------------

/// A partially typed command, waiting for its next key.
///
/// Grammar: `[count] operator [count] (motion | text-object)`. Counts typed
/// on both sides of an operator multiply (`2d3w` deletes six words). The
/// count typed before the pending key is stored in the variant; a count
/// typed after it lives in the session's count accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// `d`, `c`, `y`: waiting for a motion, `i`/`a`, or the same key again.
    Operator { op: Operator, count: Option<usize> },
    /// `di`, `ca`, ...: waiting for the object key.
    TextObject { op: Operator, inner: bool },
    /// `g`: waiting for the second `g`.
    G { count: Option<usize> },
    /// `dg`: waiting for the second `g` of `dgg`.
    OperatorG { op: Operator, count: Option<usize> },
    /// `r`: waiting for the replacement character.
    Replace { count: usize },
    /// `f`, `F`, `t`, `T`: waiting for the target character.
    CharFind { kind: FindKind, count: usize },
    /// `df`, `ct`, ...: waiting for the target character.
    OperatorCharFind {
        op: Operator,
        kind: FindKind,
        count: Option<usize>,
    },
    /// `m`: waiting for the mark letter.
    SetMark,
    /// `'` or `` ` ``: waiting for the mark letter (or a second quote).
    GotoMark { exact: bool },
    /// `q`: waiting for the register to record into.
    MacroRecord,
    /// `@`: waiting for the register to play (or a second `@`).
    MacroPlay { count: usize },
}

impl Pending {
    /// The keys typed so far, for the status line (`2d`, `ci`, `f`).
    #[must_use]
    pub fn keys(self) -> String {
        let mut out = String::new();
        let mut count = |n: Option<usize>| {
            if let Some(n) = n {
                let _ = write!(out, "{n}");
            }
        };
        match self {
            Self::Operator { op, count: n } => {
                count(n);
                out.push(op.key());
            }
            Self::TextObject { op, inner } => {
                out.push(op.key());
                out.push(if inner { 'i' } else { 'a' });
            }
            Self::G { count: n } => {
                count(n);
                out.push('g');
            }
            Self::OperatorG { op, count: n } => {
                count(n);
                out.push(op.key());
                out.push('g');
            }
            Self::Replace { count: n } => {
                count((n > 1).then_some(n));
                out.push('r');
            }
            Self::CharFind { kind, count: n } => {
                count((n > 1).then_some(n));
                out.push(kind.key());
            }
            Self::OperatorCharFind { op, kind, count: n } => {
                count(n);
                out.push(op.key());
                out.push(kind.key());
            }
            Self::SetMark => out.push('m'),
            Self::GotoMark { exact } => out.push(if exact { '`' } else { '\'' }),
            Self::MacroRecord => out.push('q'),
            Self::MacroPlay { count: n } => {
                count((n > 1).then_some(n));
                out.push('@');
            }
        }
        out
    }
}

/// Multiply two optional counts. `None` only when neither was typed.
const fn merge_counts(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (Some(x), Some(y)) => Some(x.saturating_mul(y)),
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Session {
    buffer: Buffer,
    cursor: Cursor,
    mode: Mode,
    pending: Option<Pending>,
    count: Option<usize>,
    register: Register,
    history: History,
    search: SearchState,
    /// The `/`, `?` or `:` line being typed.
    prompt: CommandLine,
    marks: Marks,
    macros: MacroState,
    options: Options,
    usage: Usage,
    /// Last `f`/`F`/`t`/`T`, for `;` and `,`.
    last_find: Option<(char, FindKind)>,
    message: Option<String>,
    message_is_error: bool,
    selection: Vec<Position>,
    quit_requested: bool,
}

impl Session {
    /// A session on `text` with default options.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::with_options(text, Options::default())
    }

    /// A session on `text`. `options.undo_levels` bounds the history from
    /// the start; the other options are read on every use.
    #[must_use]
    pub fn with_options(text: &str, options: Options) -> Self {
        Self::from_buffer(Buffer::from_text(text), options)
    }

    /// A session on the given lines with default options.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_buffer(Buffer::from_lines(lines), Options::default())
    }

    fn from_buffer(buffer: Buffer, options: Options) -> Self {
        Self {
            buffer,
            cursor: Cursor::default(),
            mode: Mode::Normal,
            pending: None,
            count: None,
            register: Register::default(),
            history: History::new(options.undo_levels),
            search: SearchState::default(),
            prompt: CommandLine::new(),
            marks: Marks::default(),
            macros: MacroState::default(),
            options,
            usage: Usage::default(),
            last_find: None,
            message: None,
            message_is_error: false,
            selection: Vec::new(),
            quit_requested: false,
        }
    }

    /// Place the cursor (clamped), e.g. at a lesson's start position.
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor
            .set_position(pos, &self.buffer, self.mode.cursor_past_end());
    }

    // -- Read-only state ----------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// The buffer's lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Position {
        self.cursor.position()
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Pending keys plus any count being typed, e.g. `2d3`.
    #[must_use]
    pub fn pending_keys(&self) -> String {
        let mut out = self.pending.map(Pending::keys).unwrap_or_default();
        if let Some(count) = self.count {
            let _ = write!(out, "{count}");
        }
        out
    }

    /// Cells covered by the visual selection. Empty outside visual mode.
    #[must_use]
    pub fn selection(&self) -> &[Position] {
        &self.selection
    }

    #[must_use]
    pub fn matches(&self) -> &[Match] {
        &self.search.matches
    }

    #[inline]
    #[must_use]
    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    /// The text typed into the `/`, `?` or `:` prompt.
    #[must_use]
    pub fn prompt(&self) -> &CommandLine {
        &self.prompt
    }

    #[inline]
    #[must_use]
    pub const fn register(&self) -> &Register {
        &self.register
    }

    #[inline]
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    #[must_use]
    pub const fn marks(&self) -> &Marks {
        &self.marks
    }

    #[inline]
    #[must_use]
    pub const fn macros(&self) -> &MacroState {
        &self.macros
    }

    #[inline]
    #[must_use]
    pub const fn usage(&self) -> &Usage {
        &self.usage
    }

    #[inline]
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    pub const fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// The status-line message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[inline]
    #[must_use]
    pub const fn message_is_error(&self) -> bool {
        self.message_is_error
    }

    /// True after `:q` or `:wq`.
    #[inline]
    #[must_use]
    pub const fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    // -- Input --------------------------------------------------------------

    /// Live input: one key in the current mode.
    pub fn feed(&mut self, key: KeyEvent) {
        self.apply_keystroke(key, self.mode);
    }

    pub fn feed_keys(&mut self, keys: &[KeyEvent]) {
        for &key in keys {
            self.feed(key);
        }
    }

    /// Parse a key-notation script (`d2w`, `ci"new<Esc>`) and feed it.
    ///
    /// # Errors
    ///
    /// Returns the parse error; no key is fed when the script is malformed.
    pub fn feed_notation(&mut self, script: &str) -> Result<(), KeyNotationError> {
        let keys = parse_keys(script)?;
        self.feed_keys(&keys);
        Ok(())
    }

    /// Interpret `key` as if typed in `mode`.
    ///
    /// Live input and macro playback share this entry point. When `mode`
    /// differs from the current mode (a replayed keystroke after a step
    /// that failed during playback), the session switches to it first.
    pub fn apply_keystroke(&mut self, key: KeyEvent, mode: Mode) {
        if mode != self.mode {
            self.sync_mode(mode);
        }
        if self.should_record(key) {
            self.macros.record(key, mode);
        }
        trace!(%key, mode = mode.display_name(), "keystroke");

        let before = self.buffer.clone();
        match mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::Visual(kind) => self.handle_visual(key, kind),
            Mode::Search(direction) => self.handle_search(key, direction),
            Mode::Command => self.handle_command(key),
        }
        self.settle(&before);
    }

    /// Recording takes every key except the `q` that stops it and keys
    /// coming from playback.
    fn should_record(&self, key: KeyEvent) -> bool {
        if self.macros.recording().is_none() || self.macros.is_playing() {
            return false;
        }
        let stops = self.mode == Mode::Normal
            && self.pending.is_none()
            && key.printable() == Some('q');
        !stops
    }

    fn sync_mode(&mut self, mode: Mode) {
        debug!(
            from = self.mode.display_name(),
            to = mode.display_name(),
            "keystroke switches mode"
        );
        self.pending = None;
        self.count = None;
        match mode {
            Mode::Insert => {
                let snapshot = self.snapshot();
                self.history.begin(snapshot);
            }
            Mode::Visual(_) if self.cursor.anchor().is_none() => self.cursor.set_anchor(),
            Mode::Search(_) | Mode::Command => self.prompt.clear(),
            _ => {}
        }
        if !mode.is_visual() {
            self.cursor.clear_anchor();
        }
        self.mode = mode;
    }

    /// Post-key invariants.
    fn settle(&mut self, before: &Buffer) {
        self.cursor
            .clamp(&self.buffer, self.mode.cursor_past_end());
        if self.buffer != *before {
            self.search
                .recompile(&self.buffer, self.options.ignorecase);
        }
        self.selection = match self.mode {
            Mode::Visual(kind) => self.selection_cells(kind),
            _ => Vec::new(),
        };
    }

    // -- Messages -----------------------------------------------------------

    fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_is_error = false;
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_is_error = true;
    }

    fn clear_message(&mut self) {
        self.message = None;
        self.message_is_error = false;
    }

    // -- Counts -------------------------------------------------------------

    fn take_count(&mut self) -> usize {
        self.count.take().unwrap_or(1)
    }

    fn push_count_digit(&mut self, ch: char) {
        let digit = ch.to_digit(10).map_or(0, |d| d as usize);
        let current = self.count.unwrap_or(0);
        self.count = Some(current.saturating_mul(10).saturating_add(digit));
    }

    // -- Undo ---------------------------------------------------------------

    /// The state an undo step restores.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            buffer: self.buffer.clone(),
            cursor: self.cursor,
            mode: self.mode,
            register: self.register.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.buffer = snapshot.buffer;
        self.cursor = snapshot.cursor;
        self.mode = snapshot.mode;
        self.register = snapshot.register;
        if !self.mode.is_visual() {
            self.cursor.clear_anchor();
        }
        self.cursor
            .clamp(&self.buffer, self.mode.cursor_past_end());
    }

    /// Record the current state before a mutation.
    fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Hold a snapshot for the first edit of an insert session.
    fn begin_insert(&mut self) {
        let snapshot = self.snapshot();
        self.history.begin(snapshot);
        self.mode = Mode::Insert;
    }

    /// Enter insert at `pos` after a change already recorded its snapshot.
    fn enter_insert_at(&mut self, pos: Position) {
        self.mode = Mode::Insert;
        self.cursor.set_position(pos, &self.buffer, true);
    }

    fn undo(&mut self, count: usize) {
        let mut undone = 0;
        for _ in 0..count {
            let current = self.snapshot();
            let Some(prev) = self.history.undo(current) else {
                break;
            };
            self.restore(prev);
            undone += 1;
        }
        if undone == 0 {
            debug!("nothing to undo");
            self.set_message("Already at oldest change");
            return;
        }
        self.usage.undone = true;
        self.usage.practice("u_undo");
    }

    fn redo(&mut self, count: usize) {
        let mut redone = 0;
        for _ in 0..count {
            let current = self.snapshot();
            let Some(next) = self.history.redo(current) else {
                break;
            };
            self.restore(next);
            redone += 1;
        }
        if redone == 0 {
            debug!("nothing to redo");
            self.set_message("Already at newest change");
            return;
        }
        if self.usage.undone {
            self.usage.redo_after_undo = true;
        }
        self.usage.practice("ctrl_r_redo");
    }

    // -- Macros -------------------------------------------------------------

    /// Replay register `reg` `count` times through [`apply_keystroke`].
    ///
    /// [`apply_keystroke`]: Self::apply_keystroke
    fn play_macro(&mut self, reg: char, count: usize) {
        if self.macros.depth() >= self.options.max_macro_depth {
            warn!(
                register = %reg,
                depth = self.macros.depth(),
                "macro nesting limit reached"
            );
            return;
        }
        let Some(keys) = self.macros.get(reg).map(<[_]>::to_vec) else {
            debug!(register = %reg, "no macro in register");
            return;
        };
        self.macros.set_last_played(reg);
        self.usage.macro_played = true;
        self.usage.practice(&format!("@{reg}_play_macro"));

        self.macros.enter_playback();
        'outer: for _ in 0..count {
            for stroke in &keys {
                self.apply_keystroke(stroke.key, stroke.mode);
                if self.quit_requested {
                    break 'outer;
                }
            }
        }
        self.macros.leave_playback();
    }

    // -- Jumps --------------------------------------------------------------

    /// Move to `target`, remembering where we came from for `''`.
    fn jump_to(&mut self, target: Position) {
        self.marks.record_jump(self.cursor.position());
        self.cursor.set_position(target, &self.buffer, false);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// A session on `text` after feeding `keys`.
#[cfg(test)]
fn run(text: &str, keys: &str) -> Session {
    let mut session = Session::new(text);
    session.feed_notation(keys).unwrap();
    session
}
