//! # dojo-editor — Modal command interpreter for vimdojo
//!
//! A headless vim-style editing core. Keys go in, buffer and cursor state
//! come out; nothing here draws or reads a terminal.
//!
//! - **[`position`]** — `Position` (row, col) and `Range`, 0-indexed
//! - **[`buffer`]** — `Buffer`, a rope of lines with the edits the interpreter needs
//! - **[`cursor`]** — cursor motions, character finds, bracket matching
//! - **[`word`]** — word and WORD boundaries for `w`/`b`/`e`
//! - **[`text_object`]** — `iw`, `a(`, `i"`, `ap` and friends
//! - **[`mode`]** — Normal, Insert, Visual (char/line/block), Search, Command
//! - **[`register`]** — the single unnamed register
//! - **[`history`]** — snapshot undo/redo
//! - **[`search`]** — literal match lists and wrap-around navigation
//! - **[`marks`]** — `a`-`z` marks and the last jump
//! - **[`macros`]** — recording and replay state
//! - **[`command`]** — the `:` line, `:w`/`:q`/`:s`
//! - **[`options`]** — `:set`-style options
//! - **[`usage`]** — which techniques the learner has used
//! - **[`session`]** — `Session`, which ties all of the above to key input

pub mod buffer;
pub mod command;
pub mod cursor;
pub mod history;
pub mod macros;
pub mod marks;
pub mod mode;
pub mod options;
pub mod position;
pub mod register;
pub mod search;
pub mod session;
pub mod text_object;
pub mod usage;
pub mod word;

pub use buffer::Buffer;
pub use command::{CommandOutcome, ExCommand, SubstituteError};
pub use mode::{Mode, VisualKind};
pub use options::{OptionError, Options};
pub use position::{Position, Range};
pub use search::SearchDirection;
pub use session::{Operator, Pending, Session};
pub use text_object::ObjectKind;
pub use usage::Usage;
