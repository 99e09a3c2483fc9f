//! Challenge — a timed sequence of tasks on one buffer.
//!
//! Time is always passed in. The run never reads a clock, so the countdown
//! is whatever the caller's timer says it is and tests can step time by
//! hand.
//!
//! Scoring: a task finished with `r` seconds left is worth `100 + r`.
//! Finishing the last task adds a bonus of `10 * r`. An expired run keeps
//! what it earned.

use std::time::{Duration, Instant};

use dojo_editor::{Options, Session};
use dojo_input::KeyEvent;
use tracing::{debug, info};

use crate::goal::Goal;

const TASK_POINTS: u64 = 100;
const FINISH_BONUS_PER_SECOND: u64 = 10;

/// Time left of `limit` at `now` for a run that began at `started`. Never
/// negative; a clock that went backwards counts as no time elapsed.
#[must_use]
pub fn time_remaining(limit: Duration, started: Instant, now: Instant) -> Duration {
    limit.saturating_sub(now.saturating_duration_since(started))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub instruction: String,
    pub hint: String,
    pub goal: Goal,
}

impl Task {
    #[must_use]
    pub fn new(instruction: &str, hint: &str, goal: Goal) -> Self {
        Self {
            instruction: instruction.to_owned(),
            hint: hint.to_owned(),
            goal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub name: String,
    pub description: String,
    pub time_limit: Duration,
    pub initial_content: Vec<String>,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeState {
    Running,
    Completed,
    Expired,
}

/// What one key did to a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeEvent {
    /// The key was applied; the current task is still open.
    Continue,
    /// Task `index` was finished; more remain.
    TaskCompleted { index: usize, points: u64 },
    /// The last task was finished.
    Completed { points: u64, bonus: u64 },
    /// Time ran out before the key; it was not applied.
    Expired,
    /// The run is already over.
    Ignored,
}

/// Final tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeResult {
    pub success: bool,
    pub score: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct ChallengeRun {
    challenge: Challenge,
    session: Session,
    started: Instant,
    finished: Option<Instant>,
    task_index: usize,
    score: u64,
    state: ChallengeState,
}

impl ChallengeRun {
    #[must_use]
    pub fn start(challenge: Challenge, options: Options, now: Instant) -> Self {
        let session = Session::with_options(&challenge.initial_content.join("\n"), options);
        // Nothing to do counts as done.
        let state = if challenge.tasks.is_empty() {
            ChallengeState::Completed
        } else {
            ChallengeState::Running
        };
        Self {
            challenge,
            session,
            started: now,
            finished: None,
            task_index: 0,
            score: 0,
            state,
        }
    }

    /// Apply `key` at time `now` and check the current task.
    pub fn feed(&mut self, key: KeyEvent, now: Instant) -> ChallengeEvent {
        if self.state != ChallengeState::Running {
            return ChallengeEvent::Ignored;
        }
        let remaining = self.time_remaining(now);
        if remaining.is_zero() {
            self.finish(ChallengeState::Expired, now);
            return ChallengeEvent::Expired;
        }

        self.session.feed(key);
        let Some(task) = self.challenge.tasks.get(self.task_index) else {
            return ChallengeEvent::Ignored;
        };
        if !task.goal.is_met(&self.session) {
            return ChallengeEvent::Continue;
        }

        let secs = remaining.as_secs();
        let points = TASK_POINTS + secs;
        self.score += points;
        let index = self.task_index;
        self.task_index += 1;
        debug!(index, points, "challenge task done");

        if self.task_index < self.challenge.tasks.len() {
            return ChallengeEvent::TaskCompleted { index, points };
        }
        let bonus = secs * FINISH_BONUS_PER_SECOND;
        self.score += bonus;
        self.finish(ChallengeState::Completed, now);
        ChallengeEvent::Completed { points, bonus }
    }

    /// Mark the run expired if its time is up. For callers polling a timer
    /// between keys.
    pub fn tick(&mut self, now: Instant) -> ChallengeState {
        if self.state == ChallengeState::Running && self.time_remaining(now).is_zero() {
            self.finish(ChallengeState::Expired, now);
        }
        self.state
    }

    fn finish(&mut self, state: ChallengeState, now: Instant) {
        self.state = state;
        self.finished = Some(now);
        info!(
            challenge = %self.challenge.name,
            ?state,
            score = self.score,
            "challenge over"
        );
    }

    #[must_use]
    pub fn time_remaining(&self, now: Instant) -> Duration {
        time_remaining(self.challenge.time_limit, self.started, now)
    }

    /// The task being worked on, if the run is still going.
    #[must_use]
    pub fn current_task(&self) -> Option<&Task> {
        match self.state {
            ChallengeState::Running => self.challenge.tasks.get(self.task_index),
            _ => None,
        }
    }

    /// Tasks done and total.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        (self.task_index, self.challenge.tasks.len())
    }

    #[must_use]
    pub fn result(&self, now: Instant) -> ChallengeResult {
        let end = self.finished.unwrap_or(now);
        ChallengeResult {
            success: self.state == ChallengeState::Completed,
            score: self.score,
            elapsed: end.saturating_duration_since(self.started),
        }
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> ChallengeState {
        self.state
    }

    #[inline]
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    #[must_use]
    pub const fn challenge(&self) -> &Challenge {
        &self.challenge
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
