//! Source positions, ranges and locations.
//!
//! ## Notes
//! - All coordinates are zero-indexed. `column` counts UTF-16 code units (the unit editors report cursor columns
//!   in); `index` is the byte offset into the source text, so it can slice the text directly.
//! - Positions are ordered and compared by `(line, column)` only. `index` is carried along for slicing and for
//!   rendering diagnostics.
//! - Ranges are half-open: `start <= p < end`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use mtots_core::lang::conventions::BUILTIN_SOURCE;
use serde::Serialize;

// ============================================================================
// Source identity
// ============================================================================

/// Identifies the document a location points into (a file path or an editor buffer URI).
///
/// Cloning is cheap; equality compares the identifier text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SourceId(Arc<str>);

impl SourceId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// Source of compiler-provided definitions, which have no navigable text.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_SOURCE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_builtin(&self) -> bool {
        &*self.0 == BUILTIN_SOURCE
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Position
// ============================================================================

/// A point in a source text.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub index: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32, index: u32) -> Self {
        Self { line, column, index }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.line == other.line && self.column == other.column
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.column).cmp(&(other.line, other.column))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

// ============================================================================
// Range
// ============================================================================

/// A half-open `[start, end)` span between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Smallest range covering both `self` and `other`.
    pub fn merge(&self, other: &Range) -> Range {
        Range::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Half-open containment.
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    /// Closed containment; used where a cursor sitting just after the range still counts.
    pub fn contains_inclusive(&self, position: Position) -> bool {
        self.start <= position && position <= self.end
    }
}

// ============================================================================
// Location
// ============================================================================

/// A range within a specific source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub source: SourceId,
    pub range: Range,
}

impl Location {
    pub fn new(source: SourceId, range: Range) -> Self {
        Self { source, range }
    }

    /// Zero-width location at the very start of `source`.
    pub fn start_of(source: SourceId) -> Self {
        Self::new(source, Range::default())
    }

    /// Location attached to compiler-provided definitions.
    pub fn builtin() -> Self {
        Self::start_of(SourceId::builtin())
    }

    /// Smallest location covering both locations.
    ///
    /// ## Panics
    /// - In debug builds, if the locations belong to different sources. Merging across sources is a programming
    ///   error; release builds keep `self`'s source.
    pub fn merge(&self, other: &Location) -> Location {
        debug_assert_eq!(
            self.source, other.source,
            "INVARIANT: merged locations must share a source"
        );
        Location::new(self.source.clone(), self.range.merge(&other.range))
    }

    /// Merge with an optional location; `None` leaves `self` unchanged.
    pub fn merge_opt(&self, other: Option<&Location>) -> Location {
        match other {
            Some(other) => self.merge(other),
            None => self.clone(),
        }
    }

    pub fn overlaps(&self, other: &Location) -> bool {
        self.source == other.source && self.range.overlaps(&other.range)
    }

    pub fn is_builtin(&self) -> bool {
        self.source.is_builtin()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.range.start)
    }
}
