//! Pre-computed unit positions along both axes.
//!
//! Positions are summed once per settings change, so a draw or a scroll reads
//! window offsets and extents in O(1) or O(log n) instead of summing from the
//! first row or column every frame.

use super::Axis;
use crate::settings::Settings;

/// Cumulative positions along one axis (`edges[i]` = leading edge of unit i,
/// the last entry is the trailing edge of the last unit).
#[derive(Debug, Clone, PartialEq)]
pub struct AxisPositions {
    edges: Vec<f32>,
}

impl Default for AxisPositions {
    fn default() -> Self {
        Self { edges: vec![0.0] }
    }
}

impl AxisPositions {
    pub fn build(count: usize, size_of: impl Fn(usize) -> f32) -> Self {
        let mut edges = Vec::with_capacity(count + 1);
        let mut edge = 0.0;
        edges.push(edge);
        for i in 0..count {
            edge += size_of(i);
            edges.push(edge);
        }
        Self { edges }
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Leading edge of unit `index`, the trailing edge of the axis past the end.
    pub fn position(&self, index: usize) -> f32 {
        self.edges
            .get(index)
            .or_else(|| self.edges.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Trailing edge of the last unit
    pub fn extent(&self) -> f32 {
        self.edges.last().copied().unwrap_or(0.0)
    }

    /// Sum of sizes over `from..to`.
    pub fn span(&self, from: usize, to: usize) -> f32 {
        if to <= from {
            return 0.0;
        }
        self.position(to) - self.position(from)
    }

    /// First unit at or after `from` whose trailing edge lies more than `px`
    /// past the leading edge of `from`. `len()` when the axis ends first.
    pub fn index_after(&self, from: usize, px: f32) -> usize {
        let limit = self.position(from) + px;
        let trailing = self.edges.get(from + 1..).unwrap_or(&[]);
        (from + trailing.partition_point(|&edge| edge <= limit)).min(self.len())
    }
}

/// Positions of rows and columns, rebuilt whenever the settings change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridPositions {
    pub rows: AxisPositions,
    pub columns: AxisPositions,
}

impl GridPositions {
    pub fn build(settings: &Settings) -> Self {
        Self {
            rows: AxisPositions::build(settings.total_rows, |i| settings.row_height(i)),
            columns: AxisPositions::build(settings.total_columns, |i| settings.column_width(i)),
        }
    }

    pub fn axis(&self, axis: Axis) -> &AxisPositions {
        match axis {
            Axis::Vertical => &self.rows,
            Axis::Horizontal => &self.columns,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::sum_sizes;

    fn uneven(i: usize) -> f32 {
        if i % 3 == 0 {
            40.0
        } else {
            20.0
        }
    }

    #[test]
    fn positions_match_summed_sizes() {
        let positions = AxisPositions::build(10, uneven);
        assert_eq!(positions.len(), 10);
        for i in 0..=10 {
            assert_eq!(positions.position(i), sum_sizes(0, i, uneven), "edge {i}");
        }
        assert_eq!(positions.extent(), 280.0);
        assert_eq!(positions.position(50), 280.0);
        assert_eq!(positions.span(3, 5), 60.0);
        assert_eq!(positions.span(5, 3), 0.0);
    }

    #[test]
    fn index_after_finds_first_crossing_unit() {
        let positions = AxisPositions::build(10, uneven);
        // Units from 1: 20, 20, 40, 20
        assert_eq!(positions.index_after(1, 0.0), 1);
        assert_eq!(positions.index_after(1, 19.0), 1);
        assert_eq!(positions.index_after(1, 20.0), 2);
        assert_eq!(positions.index_after(1, 70.0), 3);
        assert_eq!(positions.index_after(1, 80.0), 4);
        assert_eq!(positions.index_after(1, 10_000.0), 10);
        assert_eq!(positions.index_after(12, 5.0), 10);
    }

    #[test]
    fn empty_axis() {
        let positions = AxisPositions::build(0, uneven);
        assert!(positions.is_empty());
        assert_eq!(positions.extent(), 0.0);
        assert_eq!(positions.index_after(0, 100.0), 0);
        assert_eq!(AxisPositions::default(), positions);
    }

    #[test]
    fn grid_positions_follow_settings() {
        let mut settings = Settings::new(4, 3);
        settings.default_row_height = 25.0;
        settings.default_column_width = 60.0;
        let positions = GridPositions::build(&settings);
        assert_eq!(positions.axis(Axis::Vertical).extent(), 100.0);
        assert_eq!(positions.axis(Axis::Horizontal).extent(), 180.0);
    }
}
