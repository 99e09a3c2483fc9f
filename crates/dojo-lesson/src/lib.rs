//! # dojo-lesson — Lessons, challenges and progress for vimdojo
//!
//! Everything here sits on top of a [`dojo_editor::Session`] and only
//! reads it between keys:
//!
//! - **[`goal`]** — `Goal`, the tagged union of success predicates
//! - **[`lesson`]** — `Lesson` and `LessonRun`
//! - **[`challenge`]** — timed task sequences and their scoring
//! - **[`progress`]** — the persisted snapshot and its export codes
//! - **[`catalog`]** — a small built-in set of lessons and challenges

pub mod catalog;
pub mod challenge;
pub mod goal;
pub mod lesson;
pub mod progress;

pub use challenge::{Challenge, ChallengeEvent, ChallengeRun, ChallengeState, Task, time_remaining};
pub use goal::{Goal, Requirement};
pub use lesson::{Lesson, LessonRun};
pub use progress::{ProgressError, ProgressSnapshot};
