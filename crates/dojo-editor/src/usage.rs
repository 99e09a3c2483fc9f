//! Usage — what the learner has done so far in a session.
//!
//! The interpreter updates these counters as commands resolve; lesson goals
//! read them to decide whether a technique was actually practiced (a
//! buffer can often be reached by several key sequences, and some lessons
//! insist on one of them).
//!
//! Every command that resolves also adds a stable name such as
//! `"w_word_forward"` or `"dd_delete_line"` to [`Usage::practiced`]. Those
//! names end up in the persisted progress snapshot.

use std::collections::BTreeSet;

use crate::mode::VisualKind;
use crate::search::SearchDirection;
use crate::text_object::ObjectKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    /// Visual modes entered.
    pub visual_kinds: BTreeSet<VisualKind>,
    /// Text objects an operator was applied to.
    pub text_objects: BTreeSet<ObjectKind>,
    /// Macros whose recording was finished with `q`.
    pub macros_recorded: usize,
    /// A macro was played back at least once.
    pub macro_played: bool,
    /// `m{a-z}` presses.
    pub marks_set: usize,
    /// Jumps with `'`, `` ` ``, `''`.
    pub mark_jumps: usize,
    /// `%`, `f`, `F`, `t`, `T`, `;`, `,` motions that found their target.
    pub advanced_motions: usize,
    /// Patterns of substitutions that ran.
    pub substitutions: BTreeSet<String>,
    /// The last confirmed search.
    pub last_search: Option<(String, SearchDirection)>,
    /// `n`/`N` presses since the last confirmed search.
    pub navigations_since_search: usize,
    /// An undo took place and was later redone.
    pub redo_after_undo: bool,
    /// Set by undo, consumed by the next redo.
    pub(crate) undone: bool,
    /// The text of the last `:` command, whatever it was.
    pub last_ex_command: Option<String>,
    /// Stable names of commands that resolved.
    pub practiced: BTreeSet<String>,
}

impl Usage {
    /// Note a resolved command under its stable name.
    pub fn practice(&mut self, name: &str) {
        if !self.practiced.contains(name) {
            self.practiced.insert(name.to_owned());
        }
    }

    #[must_use]
    pub fn has_practiced(&self, name: &str) -> bool {
        self.practiced.contains(name)
    }

    pub(crate) fn confirm_search(&mut self, query: &str, direction: SearchDirection) {
        self.last_search = Some((query.to_owned(), direction));
        self.navigations_since_search = 0;
    }
}
