//! Search — literal match compilation and wrap-around navigation.
//!
//! Searching is split in two steps:
//!
//! 1. [`compile_matches`] scans the whole buffer once and produces every
//!    match, left to right, top to bottom. Matches never overlap.
//! 2. [`navigate`] and [`step`] pick an index into that list. `n` and `N`
//!    only step the index; they never rescan.
//!
//! The match list is rebuilt when a query is confirmed and after any edit,
//! so indexes never point at stale text.
//!
//! Matching is literal and case-insensitive by default. Case folding is per
//! character (each char folds to the first char of its lowercase form), so
//! match columns always line up with buffer columns.

use crate::buffer::Buffer;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchDirection {
    /// `/`
    #[default]
    Forward,
    /// `?`
    Backward,
}

impl SearchDirection {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// The prompt character: `/` or `?`.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Forward => '/',
            Self::Backward => '?',
        }
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// One occurrence of the query: columns `[start, end)` on `row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

impl Match {
    #[inline]
    #[must_use]
    pub const fn position(self) -> Position {
        Position::new(self.row, self.start)
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        pos.row == self.row && pos.col >= self.start && pos.col < self.end
    }
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// What the session remembers about searching between keystrokes.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// The last confirmed query, reused by `n`/`N` and an empty `/<CR>`.
    pub last_query: Option<String>,
    /// Direction of the last confirmed search.
    pub direction: SearchDirection,
    /// Compiled matches for `last_query`.
    pub matches: Vec<Match>,
    /// Index of the match the cursor was last sent to.
    pub current: Option<usize>,
}

impl SearchState {
    /// Rebuild the match list for the current query. The current index is
    /// dropped because it may no longer point at the same text.
    pub fn recompile(&mut self, buf: &Buffer, ignore_case: bool) {
        self.current = None;
        self.matches = match &self.last_query {
            Some(query) => compile_matches(buf, query, ignore_case),
            None => Vec::new(),
        };
    }

    /// The match the cursor currently sits on, if it was put there by a
    /// search.
    #[must_use]
    pub fn current_match(&self) -> Option<Match> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Every non-overlapping occurrence of `query`, in buffer order.
///
/// An empty query matches nothing.
#[must_use]
pub fn compile_matches(buf: &Buffer, query: &str, ignore_case: bool) -> Vec<Match> {
    let fold = |c: char| {
        if ignore_case {
            c.to_lowercase().next().unwrap_or(c)
        } else {
            c
        }
    };
    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for row in 0..buf.line_count() {
        let hay: Vec<char> = buf.line(row).chars().map(fold).collect();
        let mut col = 0;
        while col + needle.len() <= hay.len() {
            if hay[col..col + needle.len()] == needle[..] {
                matches.push(Match {
                    row,
                    start: col,
                    end: col + needle.len(),
                });
                col += needle.len().max(1);
            } else {
                col += 1;
            }
        }
    }
    matches
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Pick the match to jump to from `cursor`.
///
/// Forward takes the first match at or after the cursor, wrapping to the
/// first match. Backward takes the last match at or before the cursor,
/// wrapping to the last. With `skip_cursor` a match starting exactly at the
/// cursor is passed over, which is what `n` does when it has no current
/// index to step from.
#[must_use]
pub fn navigate(
    matches: &[Match],
    cursor: Position,
    direction: SearchDirection,
    skip_cursor: bool,
) -> Option<usize> {
    if matches.is_empty() {
        return None;
    }
    let found = match direction {
        SearchDirection::Forward => matches.iter().position(|m| {
            let p = m.position();
            if skip_cursor { p > cursor } else { p >= cursor }
        }),
        SearchDirection::Backward => matches.iter().rposition(|m| {
            let p = m.position();
            if skip_cursor { p < cursor } else { p <= cursor }
        }),
    };
    Some(found.unwrap_or(match direction {
        SearchDirection::Forward => 0,
        SearchDirection::Backward => matches.len() - 1,
    }))
}

/// Move an index one step through `len` matches, wrapping at both ends.
#[must_use]
pub const fn step(current: usize, len: usize, direction: SearchDirection) -> usize {
    if len == 0 {
        return 0;
    }
    match direction {
        SearchDirection::Forward => (current + 1) % len,
        SearchDirection::Backward => (current + len - 1) % len,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
