//! Buffer coordinates.
//!
//! All coordinates are **0-indexed**: row 0 is the first line, column 0 the
//! first character. Columns count chars (Unicode scalar values), which is how
//! `ropey` indexes text.
//!
//! Lesson targets, marks, search matches and undo snapshots all speak in
//! these types. Conversion to 1-indexed `row:col` happens only in `Display`.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A `(row, col)` position in a buffer.
///
/// Ordered row first, then column, so `Position::new(0, 99) < Position::new(1, 0)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    /// Row 0, column 0.
    pub const ZERO: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The same row with a different column.
    #[inline]
    #[must_use]
    pub const fn with_col(self, col: usize) -> Self {
        Self { row: self.row, col }
    }
}

impl Ord for Position {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl PartialOrd for Position {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.row, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed, like the ruler.
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Range
// ---------------------------------------------------------------------------

/// A half-open range `[start, end)`.
///
/// Always normalized so that `start <= end`; build from arbitrary endpoints
/// with [`Range::ordered`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range. Panics in debug if `start > end`.
    #[inline]
    #[must_use]
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(start <= end, "Range::new requires start <= end");
        Self { start, end }
    }

    /// Create a range from two positions in either order.
    #[inline]
    #[must_use]
    pub fn ordered(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A range on a single row: columns `[start_col, end_col)`.
    #[inline]
    #[must_use]
    pub fn on_row(row: usize, start_col: usize, end_col: usize) -> Self {
        Self::ordered(Position::new(row, start_col), Position::new(row, end_col))
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True when `pos` falls within `[start, end)`.
    #[inline]
    #[must_use]
    pub fn contains(self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Number of rows touched. An empty range still sits on one row.
    #[inline]
    #[must_use]
    pub const fn row_span(self) -> usize {
        self.end.row - self.start.row + 1
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Range({}:{} .. {}:{})",
            self.start.row, self.start.col, self.end.row, self.end.col
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
