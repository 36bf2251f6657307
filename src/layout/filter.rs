//! Mapping between source indices and rendered (0-based, materialised) indices.

use super::RenderWindow;

/// Bidirectional index mapping for one axis of one pane.
///
/// Rendered indices `0..fixed_count` are the leading fixed pane and map to
/// themselves. The remaining rendered indices walk the render window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndexFilter {
    fixed_count: usize,
    window: RenderWindow,
}

/// Row filter of a pane.
pub type RowFilter = IndexFilter;

/// Column filter of a pane.
pub type ColumnFilter = IndexFilter;

impl IndexFilter {
    /// `fixed_count` is clipped to `total` so an oversized pane cannot render
    /// indices that do not exist.
    pub fn new(fixed_count: usize, window: RenderWindow, total: usize) -> Self {
        Self {
            fixed_count: fixed_count.min(total),
            window,
        }
    }

    /// Filter over the leading fixed pane only.
    pub fn fixed_only(fixed_count: usize, total: usize) -> Self {
        Self::new(fixed_count, RenderWindow::empty(), total)
    }

    /// Filter over an explicit source span (used for the bottom pane).
    pub fn span(start: usize, count: usize) -> Self {
        Self {
            fixed_count: 0,
            window: RenderWindow {
                start_index: start,
                count,
                start_position_px: 0.0,
                reverse: false,
            },
        }
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn rendered_count(&self) -> usize {
        self.fixed_count + self.window.count
    }

    /// Number of rendered units outside the fixed pane.
    pub fn scrollable_count(&self) -> usize {
        self.window.count
    }

    pub fn rendered_to_source(&self, rendered: usize) -> Option<usize> {
        if rendered < self.fixed_count {
            return Some(rendered);
        }
        let within = rendered - self.fixed_count;
        (within < self.window.count).then(|| self.window.start_index + within)
    }

    /// `None` when the source index is not materialised in this pane.
    pub fn source_to_rendered(&self, source: usize) -> Option<usize> {
        if source < self.fixed_count {
            return Some(source);
        }
        self.window
            .contains(source)
            .then(|| self.fixed_count + (source - self.window.start_index))
    }

    /// Source indices in rendered order.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.rendered_count()).filter_map(move |i| self.rendered_to_source(i))
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
    use crate::layout::RenderCalculator;

    fn window(total: usize, fixed: usize, offset: usize, reverse: bool) -> RenderWindow {
        RenderCalculator::new(total, fixed, offset, 100.0, reverse).compute(|_| 20.0)
    }

    #[test]
    fn forward_maps_offset_plus_index() {
        let filter = IndexFilter::new(0, window(100, 0, 30, false), 100);
        assert_eq!(filter.rendered_to_source(0), Some(30));
        assert_eq!(filter.rendered_to_source(4), Some(34));
        assert_eq!(filter.rendered_to_source(5), None);
        assert_eq!(filter.source_to_rendered(32), Some(2));
        assert_eq!(filter.source_to_rendered(29), None);
        assert_eq!(filter.source_to_rendered(35), None);
    }

    #[test]
    fn fixed_pane_is_identity() {
        let filter = IndexFilter::new(3, window(100, 3, 10, false), 100);
        assert_eq!(filter.rendered_to_source(0), Some(0));
        assert_eq!(filter.rendered_to_source(2), Some(2));
        // offset + rendered index
        assert_eq!(filter.rendered_to_source(3), Some(13));
        assert_eq!(filter.source_to_rendered(1), Some(1));
        assert_eq!(filter.source_to_rendered(13), Some(3));
        assert_eq!(filter.source_to_rendered(5), None);
    }

    #[test]
    fn reverse_maps_from_last_index() {
        let w = window(100, 0, 99, true);
        let filter = IndexFilter::new(0, w, 100);
        let count = filter.rendered_count();
        for i in 0..count {
            assert_eq!(filter.rendered_to_source(i), Some(99 - (count - 1 - i)));
        }
    }

    #[test]
    fn inverse_law_holds() {
        for (fixed, offset, reverse) in [(0, 0, false), (2, 17, false), (4, 95, true)] {
            let filter = IndexFilter::new(fixed, window(100, fixed, offset, reverse), 100);
            for i in 0..filter.rendered_count() {
                let source = filter.rendered_to_source(i).unwrap();
                assert_eq!(filter.source_to_rendered(source), Some(i));
            }
        }
    }

    #[test]
    fn fixed_count_clipped_to_total() {
        let filter = IndexFilter::fixed_only(5, 2);
        assert_eq!(filter.rendered_count(), 2);
        assert_eq!(filter.sources().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn span_covers_bottom_pane() {
        let filter = IndexFilter::span(97, 3);
        assert_eq!(filter.sources().collect::<Vec<_>>(), vec![97, 98, 99]);
        assert_eq!(filter.source_to_rendered(98), Some(1));
        assert_eq!(filter.source_to_rendered(2), None);
    }
}
