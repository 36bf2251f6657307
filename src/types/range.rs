//! Rectangular cell ranges.
//!
//! A range stores its two endpoints exactly as the user produced them (a drag
//! from bottom-right to top-left leaves `from` south-east of `to`). Every corner
//! accessor min/max-es the axes independently, so nothing downstream may assume
//! `from <= to`.

use serde::{Deserialize, Serialize};

use super::CellCoords;

/// Normalised corners of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corners {
    pub top: i64,
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
}

impl Corners {
    /// `(top, left, bottom, right)` tuple form.
    pub fn as_tuple(&self) -> (i64, i64, i64, i64) {
        (self.top, self.left, self.bottom, self.right)
    }

    pub fn contains_row(&self, row: i64) -> bool {
        row >= self.top && row <= self.bottom
    }

    pub fn contains_col(&self, col: i64) -> bool {
        col >= self.left && col <= self.right
    }
}

/// A selection rectangle with an active (highlight) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub highlight: CellCoords,
    pub from: CellCoords,
    pub to: CellCoords,
}

impl CellRange {
    pub fn new(highlight: CellCoords, from: CellCoords, to: CellCoords) -> Self {
        Self {
            highlight,
            from,
            to,
        }
    }

    /// Single-cell range anchored at `coords`.
    pub fn single(coords: CellCoords) -> Self {
        Self::new(coords, coords, coords)
    }

    pub fn top_left_corner(&self) -> CellCoords {
        CellCoords::new(self.from.row.min(self.to.row), self.from.col.min(self.to.col))
    }

    pub fn bottom_right_corner(&self) -> CellCoords {
        CellCoords::new(self.from.row.max(self.to.row), self.from.col.max(self.to.col))
    }

    pub fn top_right_corner(&self) -> CellCoords {
        CellCoords::new(self.from.row.min(self.to.row), self.from.col.max(self.to.col))
    }

    pub fn bottom_left_corner(&self) -> CellCoords {
        CellCoords::new(self.from.row.max(self.to.row), self.from.col.min(self.to.col))
    }

    pub fn corners(&self) -> Corners {
        let tl = self.top_left_corner();
        let br = self.bottom_right_corner();
        Corners {
            top: tl.row,
            left: tl.col,
            bottom: br.row,
            right: br.col,
        }
    }

    pub fn width(&self) -> u64 {
        self.from.col.abs_diff(self.to.col) + 1
    }

    pub fn height(&self) -> u64 {
        self.from.row.abs_diff(self.to.row) + 1
    }

    pub fn cells_count(&self) -> u64 {
        self.width().saturating_mul(self.height())
    }

    pub fn is_single(&self) -> bool {
        self.from == self.to
    }

    /// True when every coordinate of the range addresses a body cell.
    pub fn is_valid(&self, total_rows: usize, total_columns: usize) -> bool {
        self.from.is_valid(total_rows, total_columns)
            && self.to.is_valid(total_rows, total_columns)
            && self.highlight.is_valid(total_rows, total_columns)
    }

    pub fn includes(&self, coords: CellCoords) -> bool {
        let c = self.corners();
        c.contains_row(coords.row) && c.contains_col(coords.col)
    }

    pub fn includes_range(&self, other: &CellRange) -> bool {
        self.includes(other.top_left_corner()) && self.includes(other.bottom_right_corner())
    }

    pub fn overlaps(&self, other: &CellRange) -> bool {
        let a = self.corners();
        let b = other.corners();
        a.left <= b.right && b.left <= a.right && a.top <= b.bottom && b.top <= a.bottom
    }

    /// Grow the range so it covers `coords`. Returns whether the range changed.
    ///
    /// The stored endpoints are replaced by the normalised bounding box.
    pub fn expand(&mut self, coords: CellCoords) -> bool {
        let tl = self.top_left_corner();
        let br = self.bottom_right_corner();
        if coords.row < tl.row || coords.col < tl.col || coords.row > br.row || coords.col > br.col
        {
            self.from = CellCoords::new(tl.row.min(coords.row), tl.col.min(coords.col));
            self.to = CellCoords::new(br.row.max(coords.row), br.col.max(coords.col));
            return true;
        }
        false
    }

    /// Visit every coordinate row-major. The callback returns `false` to stop.
    pub fn for_all(&self, mut callback: impl FnMut(CellCoords) -> bool) {
        let c = self.corners();
        for row in c.top..=c.bottom {
            for col in c.left..=c.right {
                if !callback(CellCoords::new(row, col)) {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn range(from: (i64, i64), to: (i64, i64)) -> CellRange {
        let from = CellCoords::new(from.0, from.1);
        CellRange::new(from, from, CellCoords::new(to.0, to.1))
    }

    #[test]
    fn corners_ignore_storage_order() {
        let r = range((5, 5), (2, 2));
        assert_eq!(r.corners().as_tuple(), (2, 2, 5, 5));
        assert_eq!(r.top_left_corner(), CellCoords::new(2, 2));
        assert_eq!(r.bottom_right_corner(), CellCoords::new(5, 5));
    }

    #[test]
    fn mixed_diagonal_corners() {
        let r = range((1, 7), (6, 3));
        assert_eq!(r.top_left_corner(), CellCoords::new(1, 3));
        assert_eq!(r.top_right_corner(), CellCoords::new(1, 7));
        assert_eq!(r.bottom_left_corner(), CellCoords::new(6, 3));
        assert_eq!(r.bottom_right_corner(), CellCoords::new(6, 7));
        assert_eq!(r.width(), 5);
        assert_eq!(r.height(), 6);
        assert_eq!(r.cells_count(), 30);
    }

    #[test]
    fn expand_grows_bounding_box() {
        let mut r = CellRange::single(CellCoords::new(3, 3));
        assert!(r.expand(CellCoords::new(1, 5)));
        assert_eq!(r.corners().as_tuple(), (1, 3, 3, 5));
        assert!(!r.expand(CellCoords::new(2, 4)));
        assert_eq!(r.highlight, CellCoords::new(3, 3));
    }

    #[test]
    fn includes_and_overlaps() {
        let a = range((4, 4), (0, 0));
        let b = range((2, 2), (6, 6));
        let c = range((1, 1), (3, 3));
        assert!(a.includes(CellCoords::new(4, 0)));
        assert!(!a.includes(CellCoords::new(5, 0)));
        assert!(a.overlaps(&b));
        assert!(a.includes_range(&c));
        assert!(!c.includes_range(&a));
        assert!(!range((0, 0), (1, 1)).overlaps(&range((2, 2), (3, 3))));
    }

    #[test]
    fn for_all_stops_early() {
        let r = range((0, 0), (2, 2));
        let mut seen = Vec::new();
        r.for_all(|c| {
            seen.push(c);
            seen.len() < 4
        });
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[3], CellCoords::new(1, 0));
    }
}
