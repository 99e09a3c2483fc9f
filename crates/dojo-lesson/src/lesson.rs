//! Lesson — one guided exercise and a run of it.

use dojo_editor::{Options, Position, Session};
use dojo_input::{KeyEvent, KeyNotationError, parse_keys};
use tracing::info;

use crate::goal::Goal;

/// A guided exercise: starting text, starting cursor, and what counts as
/// done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub name: String,
    pub instructions: String,
    pub initial_content: Vec<String>,
    pub start: Position,
    pub goal: Goal,
}

impl Lesson {
    #[must_use]
    pub fn new(name: &str, instructions: &str, initial_content: &[&str], goal: Goal) -> Self {
        Self {
            name: name.to_owned(),
            instructions: instructions.to_owned(),
            initial_content: initial_content.iter().map(|&l| l.to_owned()).collect(),
            start: Position::default(),
            goal,
        }
    }

    #[must_use]
    pub fn starting_at(mut self, row: usize, col: usize) -> Self {
        self.start = Position::new(row, col);
        self
    }

    /// A fresh session on the lesson's text with the cursor placed.
    #[must_use]
    pub fn session(&self, options: Options) -> Session {
        let mut session = Session::with_options(&self.initial_content.join("\n"), options);
        session.set_cursor(self.start);
        session
    }
}

/// A lesson in progress.
///
/// The goal is checked after every key. Once met, the run stays complete
/// whatever the learner types next.
#[derive(Debug, Clone)]
pub struct LessonRun {
    lesson: Lesson,
    options: Options,
    session: Session,
    keys_fed: usize,
    complete: bool,
}

impl LessonRun {
    #[must_use]
    pub fn new(lesson: Lesson) -> Self {
        Self::with_options(lesson, Options::default())
    }

    #[must_use]
    pub fn with_options(lesson: Lesson, options: Options) -> Self {
        let session = lesson.session(options.clone());
        Self {
            lesson,
            options,
            session,
            keys_fed: 0,
            complete: false,
        }
    }

    /// Feed one key. Returns true when this key completed the lesson.
    pub fn feed(&mut self, key: KeyEvent) -> bool {
        self.session.feed(key);
        self.keys_fed += 1;
        if self.complete || !self.lesson.goal.is_met(&self.session) {
            return false;
        }
        self.complete = true;
        info!(lesson = %self.lesson.name, keys = self.keys_fed, "lesson complete");
        true
    }

    /// Feed a key-notation script.
    ///
    /// # Errors
    ///
    /// Malformed notation. Nothing is fed in that case.
    pub fn feed_notation(&mut self, script: &str) -> Result<bool, KeyNotationError> {
        let keys = parse_keys(script)?;
        Ok(keys.into_iter().fold(false, |done, key| self.feed(key) || done))
    }

    /// Back to the starting text and cursor.
    pub fn restart(&mut self) {
        self.session = self.lesson.session(self.options.clone());
        self.keys_fed = 0;
        self.complete = false;
    }

    #[inline]
    #[must_use]
    pub const fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[inline]
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    #[must_use]
    pub const fn keys_fed(&self) -> usize {
        self.keys_fed
    }

    #[inline]
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::Requirement;
    use dojo_editor::VisualKind;
    use pretty_assertions::assert_eq;

    fn insert_lesson() -> Lesson {
        Lesson::new(
            "Insert Mode",
            "Append ' is awesome!' and press Esc.",
            &["Your task: complete the sentence below.", "Learning VIM"],
            Goal::LineEquals {
                row: 1,
                text: "Learning VIM is awesome!".into(),
            },
        )
        .starting_at(1, 11)
    }

    #[test]
    fn session_starts_at_lesson_cursor() {
        let run = LessonRun::new(insert_lesson());
        assert_eq!(run.session().cursor(), Position::new(1, 11));
        assert!(!run.is_complete());
    }

    #[test]
    fn completes_on_the_finishing_key() {
        let mut run = LessonRun::new(insert_lesson());
        assert!(!run.feed_notation("a is awesome!").unwrap());
        assert!(run.feed_notation("<Esc>").unwrap());
        assert!(run.is_complete());
        assert_eq!(run.keys_fed(), 14);
    }

    #[test]
    fn completion_latches() {
        let mut run = LessonRun::new(insert_lesson());
        run.feed_notation("a is awesome!<Esc>").unwrap();
        assert!(!run.feed_notation("dd").unwrap());
        assert!(run.is_complete());
    }

    #[test]
    fn restart_resets_text_and_state() {
        let mut run = LessonRun::new(insert_lesson());
        run.feed_notation("a is awesome!<Esc>").unwrap();
        run.restart();
        assert_eq!(run.session().lines()[1], "Learning VIM");
        assert_eq!(run.session().cursor(), Position::new(1, 11));
        assert!(!run.is_complete());
        assert_eq!(run.keys_fed(), 0);
    }

    #[test]
    fn bad_notation_feeds_nothing() {
        let mut run = LessonRun::new(insert_lesson());
        assert!(run.feed_notation("x<C-Nope>").is_err());
        assert_eq!(run.keys_fed(), 0);
    }

    #[test]
    fn visual_line_lesson() {
        let lesson = Lesson::new(
            "Visual Mode: Line Selection",
            "Select the middle line with V and delete it.",
            &["Keep this line.", "Delete this entire line.", "Keep this line too."],
            Goal::All(vec![
                Goal::content(&["Keep this line.", "Keep this line too."]),
                Goal::Used(Requirement::VisualMode(VisualKind::Line)),
            ]),
        )
        .starting_at(1, 0);

        let mut run = LessonRun::new(lesson.clone());
        run.feed_notation("dd").unwrap();
        assert!(!run.is_complete());

        let mut run = LessonRun::new(lesson);
        assert!(run.feed_notation("Vd").unwrap());
    }
}
