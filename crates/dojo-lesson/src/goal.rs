//! Goal — what a lesson or challenge task counts as done.
//!
//! A goal is a plain value. [`Goal::is_met`] reads the session after each
//! keystroke and never changes it. Goals that care about *how* the learner
//! got there (search levels, visual mode levels, macros) look at the
//! session's [`Usage`] as well as the buffer.

use dojo_editor::mode::Mode;
use dojo_editor::{ObjectKind, Position, SearchDirection, Session, Usage, VisualKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goal {
    /// The last `:` command is one of these, verbatim.
    ExCommand { accepted: Vec<String> },

    /// The cursor sits exactly on `target`.
    CursorAt { target: Position },

    /// The cursor reached `target` by searching for `query` in `direction`
    /// and pressing `n`/`N` at least `min_navigations` times afterwards.
    /// The query compares case-insensitively.
    SearchLanding {
        target: Position,
        query: String,
        direction: SearchDirection,
        min_navigations: usize,
    },

    /// Line `row` reads `text` and the session is back in Normal mode.
    LineEquals { row: usize, text: String },

    /// The buffer matches `lines`, ignoring trailing whitespace on each line
    /// and trailing blank lines.
    ContentEquals { lines: Vec<String> },

    LineContains { row: usize, needle: String },

    LineLacks { row: usize, needle: String },

    LineCount { count: usize },

    /// The unnamed register holds `text`.
    Register { text: String },

    /// A technique was used.
    Used(Requirement),

    /// Every goal holds.
    All(Vec<Goal>),
}

/// Techniques a goal can insist on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    VisualMode(VisualKind),
    TextObject(ObjectKind),
    DistinctTextObjects(usize),
    MacroRecorded,
    MacroPlayed,
    MarkSet,
    MarkJump,
    AdvancedMotions(usize),
    Substitution,
    RedoAfterUndo,
}

impl Requirement {
    #[must_use]
    pub fn is_met(self, usage: &Usage) -> bool {
        match self {
            Self::VisualMode(kind) => usage.visual_kinds.contains(&kind),
            Self::TextObject(kind) => usage.text_objects.contains(&kind),
            Self::DistinctTextObjects(n) => usage.text_objects.len() >= n,
            Self::MacroRecorded => usage.macros_recorded > 0,
            Self::MacroPlayed => usage.macro_played,
            Self::MarkSet => usage.marks_set > 0,
            Self::MarkJump => usage.mark_jumps > 0,
            Self::AdvancedMotions(n) => usage.advanced_motions >= n,
            Self::Substitution => !usage.substitutions.is_empty(),
            Self::RedoAfterUndo => usage.redo_after_undo,
        }
    }
}

impl Goal {
    /// `ContentEquals` from string literals.
    #[must_use]
    pub fn content(lines: &[&str]) -> Self {
        Self::ContentEquals {
            lines: lines.iter().map(|&l| l.to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn is_met(&self, session: &Session) -> bool {
        let buf = session.buffer();
        match self {
            Self::ExCommand { accepted } => session
                .usage()
                .last_ex_command
                .as_ref()
                .is_some_and(|cmd| accepted.iter().any(|a| a == cmd)),
            Self::CursorAt { target } => session.cursor() == *target,
            Self::SearchLanding {
                target,
                query,
                direction,
                min_navigations,
            } => {
                let usage = session.usage();
                session.cursor() == *target
                    && usage.navigations_since_search >= *min_navigations
                    && usage.last_search.as_ref().is_some_and(|(q, d)| {
                        d == direction && q.to_lowercase() == query.to_lowercase()
                    })
            }
            Self::LineEquals { row, text } => {
                session.mode() == Mode::Normal
                    && *row < buf.line_count()
                    && buf.line(*row) == *text
            }
            Self::ContentEquals { lines } => content_matches(&session.lines(), lines),
            Self::LineContains { row, needle } => {
                *row < buf.line_count() && buf.line(*row).contains(needle.as_str())
            }
            Self::LineLacks { row, needle } => {
                *row < buf.line_count() && !buf.line(*row).contains(needle.as_str())
            }
            Self::LineCount { count } => buf.line_count() == *count,
            Self::Register { text } => session.register().content() == text,
            Self::Used(req) => req.is_met(session.usage()),
            Self::All(goals) => goals.iter().all(|g| g.is_met(session)),
        }
    }
}

/// Line-by-line comparison that ignores trailing whitespace and trailing
/// blank lines on both sides.
fn content_matches(actual: &[String], expected: &[String]) -> bool {
    fn normalize(lines: &[String]) -> Vec<&str> {
        let mut out: Vec<&str> = lines.iter().map(|l| l.trim_end()).collect();
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        out
    }
    normalize(actual) == normalize(expected)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str, keys: &str) -> Session {
        let mut s = Session::new(text);
        s.feed_notation(keys).unwrap();
        s
    }

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|&l| l.to_owned()).collect()
    }

    // -- Content ------------------------------------------------------------

    #[test]
    fn content_ignores_trailing_space_and_blank_lines() {
        assert!(content_matches(
            &strings(&["Keep this → ", "Replace this !", ""]),
            &strings(&["Keep this →", "Replace this !"]),
        ));
        assert!(!content_matches(
            &strings(&["a", "", "b"]),
            &strings(&["a", "b"]),
        ));
        assert!(!content_matches(&strings(&[" a"]), &strings(&["a"])));
    }

    #[test]
    fn content_goal_after_deletes() {
        let goal = Goal::content(&["Keep this line.", "Fix this here."]);
        let s = session(
            "Keep this line.\nDelete this entire line.\nFix this mistake here.",
            "jdd",
        );
        assert!(!goal.is_met(&s));
        let s = session(
            "Keep this line.\nDelete this entire line.\nFix this mistake here.",
            "jddwwdw",
        );
        assert!(goal.is_met(&s));
    }

    #[test]
    fn line_equals_requires_normal_mode() {
        let goal = Goal::LineEquals {
            row: 0,
            text: "This is a good example.".into(),
        };
        let mut s = session("This is a bad example.", "wwwcwgood");
        assert!(!goal.is_met(&s));
        s.feed_notation("<Esc>").unwrap();
        assert!(goal.is_met(&s));
    }

    #[test]
    fn out_of_range_rows_never_match() {
        let s = Session::new("abc");
        assert!(!Goal::LineContains { row: 3, needle: "a".into() }.is_met(&s));
        assert!(!Goal::LineLacks { row: 3, needle: "z".into() }.is_met(&s));
    }

    #[test]
    fn register_and_line_count() {
        let s = session("first line to copy\nreplace this x\n", "yy");
        assert!(Goal::Register { text: "first line to copy".into() }.is_met(&s));
        assert!(Goal::LineCount { count: 3 }.is_met(&s));
    }

    // -- Cursor and search --------------------------------------------------

    #[test]
    fn cursor_at() {
        let s = session("one two three target here", "3w");
        assert!(Goal::CursorAt { target: Position::new(0, 14) }.is_met(&s));
    }

    #[test]
    fn search_landing_needs_navigation() {
        let text = "find the target here\nanother target and another target\nno match on this line";
        let goal = Goal::SearchLanding {
            target: Position::new(1, 27),
            query: "target".into(),
            direction: SearchDirection::Forward,
            min_navigations: 1,
        };
        let mut s = Session::new(text);
        s.set_cursor(Position::new(2, 0));
        s.feed_notation("/target<CR>").unwrap();
        assert_eq!(s.cursor(), Position::new(0, 9));
        s.feed_notation("n").unwrap();
        assert_eq!(s.cursor(), Position::new(1, 8));
        assert!(!goal.is_met(&s));
        s.feed_notation("n").unwrap();
        assert!(goal.is_met(&s));
    }

    #[test]
    fn search_landing_checks_direction() {
        let text = "alpha beta gamma\ndelta epsilon alpha\nzeta eta theta";
        let goal = Goal::SearchLanding {
            target: Position::new(0, 0),
            query: "ALPHA".into(),
            direction: SearchDirection::Backward,
            min_navigations: 1,
        };

        let mut s = Session::new(text);
        s.set_cursor(Position::new(2, 5));
        s.feed_notation("?alpha<CR>").unwrap();
        assert_eq!(s.cursor(), Position::new(1, 14));
        s.feed_notation("N").unwrap();
        assert_eq!(s.cursor(), Position::new(0, 0));
        assert!(goal.is_met(&s));

        let mut s = Session::new(text);
        s.set_cursor(Position::new(2, 5));
        s.feed_notation("/alpha<CR>nn").unwrap();
        assert_eq!(s.cursor(), Position::new(0, 0));
        assert!(!goal.is_met(&s));
    }

    // -- Usage --------------------------------------------------------------

    #[test]
    fn ex_command_goal() {
        let goal = Goal::ExCommand {
            accepted: vec!["q".into(), "wq".into()],
        };
        assert!(!goal.is_met(&session("x", ":w<CR>")));
        assert!(goal.is_met(&session("x", ":wq<CR>")));
    }

    #[test]
    fn requirements() {
        let s = session("a (b) \"c\"", "vd");
        assert!(Requirement::VisualMode(VisualKind::Char).is_met(s.usage()));
        assert!(!Requirement::VisualMode(VisualKind::Line).is_met(s.usage()));

        let s = session("a (b) \"c\"", "fbdi(f\"di\"");
        assert!(Requirement::TextObject(ObjectKind::Parens).is_met(s.usage()));
        assert!(Requirement::DistinctTextObjects(2).is_met(s.usage()));
        assert!(Requirement::AdvancedMotions(2).is_met(s.usage()));

        let s = session("a\nb", "ddu<C-r>");
        assert!(Requirement::RedoAfterUndo.is_met(s.usage()));
        let s = session("a\nb", "ddu");
        assert!(!Requirement::RedoAfterUndo.is_met(s.usage()));
    }

    #[test]
    fn all_goal() {
        let goal = Goal::All(vec![
            Goal::LineLacks { row: 0, needle: "TARGET".into() },
            Goal::Used(Requirement::VisualMode(VisualKind::Char)),
        ]);
        assert!(!goal.is_met(&session("word TARGET", "wdw")));
        assert!(goal.is_met(&session("word TARGET", "wvllllld")));
    }
}
