use serde::{Deserialize, Serialize};

/// A row/column pair addressing a rendered position.
///
/// Negative values address headers: row `-1` is the column-header row nearest to
/// the body, column `-1` is the row-header column nearest to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellCoords {
    pub row: i64,
    pub col: i64,
}

impl CellCoords {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Coordinates of a body cell given source indices.
    pub fn from_source(row: usize, col: usize) -> Self {
        Self {
            row: index_to_coord(row),
            col: index_to_coord(col),
        }
    }

    /// True for header positions on either axis.
    pub fn is_header(&self) -> bool {
        self.row < 0 || self.col < 0
    }

    /// True when the coordinates address a body cell of a grid this size.
    pub fn is_valid(&self, total_rows: usize, total_columns: usize) -> bool {
        matches!(self.source_row(), Some(r) if r < total_rows)
            && matches!(self.source_col(), Some(c) if c < total_columns)
    }

    /// Row as a source index, `None` for header rows.
    pub fn source_row(&self) -> Option<usize> {
        usize::try_from(self.row).ok()
    }

    /// Column as a source index, `None` for header columns.
    pub fn source_col(&self) -> Option<usize> {
        usize::try_from(self.col).ok()
    }

    pub fn is_northwest_of(&self, other: &CellCoords) -> bool {
        self.row <= other.row && self.col <= other.col
    }

    pub fn is_southeast_of(&self, other: &CellCoords) -> bool {
        self.row >= other.row && self.col >= other.col
    }
}

/// Convert a source index into a coordinate component.
pub(crate) fn index_to_coord(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_negative() {
        assert!(CellCoords::new(-1, 3).is_header());
        assert!(CellCoords::new(3, -2).is_header());
        assert!(!CellCoords::new(0, 0).is_header());
    }

    #[test]
    fn validity_respects_totals() {
        let c = CellCoords::new(4, 2);
        assert!(c.is_valid(5, 3));
        assert!(!c.is_valid(4, 3));
        assert!(!c.is_valid(5, 2));
        assert!(!CellCoords::new(-1, 0).is_valid(5, 5));
    }

    #[test]
    fn value_equality() {
        assert_eq!(CellCoords::new(1, 2), CellCoords::from_source(1, 2));
        assert_ne!(CellCoords::new(1, 2), CellCoords::new(2, 1));
    }
}
