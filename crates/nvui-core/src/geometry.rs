#![forbid(unsafe_code)]

//! Integer cell-coordinate primitives.
//!
//! Grid coordinates are 0-indexed with the origin at the top-left. All
//! components are signed so that scroll offsets and rectangle shifting
//! compose without casts; negative coordinates only ever appear as
//! intermediate values of that math, never in stored state.

use std::ops::Range;

/// A point in grid cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    pub column: i64,
    pub row: i64,
}

impl GridPoint {
    /// Create a new point.
    #[inline]
    pub const fn new(column: i64, row: i64) -> Self {
        Self { column, row }
    }
}

/// A size in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridSize {
    pub columns: i64,
    pub rows: i64,
}

impl GridSize {
    /// Create a new size.
    #[inline]
    pub const fn new(columns: i64, rows: i64) -> Self {
        Self { columns, rows }
    }

    /// Area in cells. Negative components clamp to zero.
    #[inline]
    pub const fn area(&self) -> i64 {
        if self.columns <= 0 || self.rows <= 0 {
            0
        } else {
            self.columns * self.rows
        }
    }

    /// Check if the size covers no cells.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.columns <= 0 || self.rows <= 0
    }
}

/// A rectangle in grid cell coordinates (origin + size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridRect {
    pub origin: GridPoint,
    pub size: GridSize,
}

impl GridRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(origin: GridPoint, size: GridSize) -> Self {
        Self { origin, size }
    }

    /// Create a rectangle from origin with the given size.
    #[inline]
    pub const fn from_size(size: GridSize) -> Self {
        Self {
            origin: GridPoint::new(0, 0),
            size,
        }
    }

    /// A one-cell rectangle at `point`.
    #[inline]
    pub const fn cell(point: GridPoint) -> Self {
        Self {
            origin: point,
            size: GridSize::new(1, 1),
        }
    }

    /// Left edge (inclusive).
    #[inline]
    pub const fn min_column(&self) -> i64 {
        self.origin.column
    }

    /// Top edge (inclusive).
    #[inline]
    pub const fn min_row(&self) -> i64 {
        self.origin.row
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn max_column(&self) -> i64 {
        self.origin.column + self.size.columns
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn max_row(&self) -> i64 {
        self.origin.row + self.size.rows
    }

    /// Column range covered by this rectangle.
    #[inline]
    pub fn columns(&self) -> Range<i64> {
        self.min_column()..self.max_column()
    }

    /// Row range covered by this rectangle.
    #[inline]
    pub fn rows(&self) -> Range<i64> {
        self.min_row()..self.max_row()
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: GridPoint) -> bool {
        point.column >= self.min_column()
            && point.column < self.max_column()
            && point.row >= self.min_row()
            && point.row < self.max_row()
    }

    /// The rectangle translated by `(columns, rows)`.
    #[inline]
    pub const fn shifted_by(&self, columns: i64, rows: i64) -> Self {
        Self {
            origin: GridPoint::new(self.origin.column + columns, self.origin.row + rows),
            size: self.size,
        }
    }

    /// Intersection with another rectangle. Empty if they don't overlap.
    pub fn intersection(&self, other: &GridRect) -> GridRect {
        let min_column = self.min_column().max(other.min_column());
        let min_row = self.min_row().max(other.min_row());
        let max_column = self.max_column().min(other.max_column());
        let max_row = self.max_row().min(other.max_row());

        if min_column < max_column && min_row < max_row {
            GridRect {
                origin: GridPoint::new(min_column, min_row),
                size: GridSize::new(max_column - min_column, max_row - min_row),
            }
        } else {
            GridRect::default()
        }
    }

    /// Smallest rectangle containing both rectangles.
    pub fn union(&self, other: &GridRect) -> GridRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let min_column = self.min_column().min(other.min_column());
        let min_row = self.min_row().min(other.min_row());
        let max_column = self.max_column().max(other.max_column());
        let max_row = self.max_row().max(other.max_row());
        GridRect {
            origin: GridPoint::new(min_column, min_row),
            size: GridSize::new(max_column - min_column, max_row - min_row),
        }
    }
}
