//! Render calculator: which contiguous units of an axis get materialised.
//!
//! Sizes are never assumed uniform; every size comes from the `size_of` lookup.
//! The calculator is a pure function of its inputs.

/// The contiguous window of scrollable units rendered on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderWindow {
    /// First rendered source index
    pub start_index: usize,
    /// Number of rendered units
    pub count: usize,
    /// Absolute pixel position of `start_index` on the axis
    pub start_position_px: f32,
    /// Window was filled backward from the last index
    pub reverse: bool,
}

impl RenderWindow {
    /// Window of an empty axis.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// One past the last rendered source index.
    pub fn end_index(&self) -> usize {
        self.start_index + self.count
    }

    /// Last rendered source index.
    pub fn last_index(&self) -> Option<usize> {
        self.end_index().checked_sub(1).filter(|_| self.count > 0)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index()
    }
}

/// Inputs of one render window computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCalculator {
    pub total: usize,
    pub fixed_count: usize,
    pub offset: usize,
    /// Pixels available to the scrollable region, `f32::INFINITY` when unclipped
    pub viewport_size_px: f32,
    pub reverse: bool,
}

impl RenderCalculator {
    pub fn new(
        total: usize,
        fixed_count: usize,
        offset: usize,
        viewport_size_px: f32,
        reverse: bool,
    ) -> Self {
        Self {
            total,
            fixed_count,
            offset,
            viewport_size_px,
            reverse,
        }
    }

    pub fn compute(&self, size_of: impl Fn(usize) -> f32) -> RenderWindow {
        self.compute_positioned(&size_of, |index| sum_sizes(0, index, &size_of))
    }

    /// Same as [`compute`](Self::compute), with the leading edge of a unit
    /// read from `position_of` instead of summed from the first unit.
    pub fn compute_positioned(
        &self,
        size_of: impl Fn(usize) -> f32,
        position_of: impl Fn(usize) -> f32,
    ) -> RenderWindow {
        if self.total == 0 {
            return RenderWindow::empty();
        }
        if self.fixed_count >= self.total {
            return RenderWindow {
                start_index: self.total,
                count: 0,
                start_position_px: position_of(self.total),
                reverse: false,
            };
        }

        let mut window = if self.reverse {
            self.compute_reverse(&size_of)
        } else {
            self.compute_forward(&size_of)
        };
        window.start_position_px = position_of(window.start_index);
        window
    }

    fn compute_forward(&self, size_of: &impl Fn(usize) -> f32) -> RenderWindow {
        let start = (self.fixed_count + self.offset).min(self.total - 1);
        let mut filled = 0.0;
        let mut i = start;
        // Includes the unit that crosses the viewport edge
        while i < self.total && filled < self.viewport_size_px {
            filled += size_of(i);
            i += 1;
        }
        RenderWindow {
            start_index: start,
            count: i - start,
            start_position_px: 0.0,
            reverse: false,
        }
    }

    fn compute_reverse(&self, size_of: &impl Fn(usize) -> f32) -> RenderWindow {
        let end = self.total;
        let mut filled = 0.0;
        let mut i = end;
        while i > self.fixed_count && filled < self.viewport_size_px {
            i -= 1;
            filled += size_of(i);
        }
        RenderWindow {
            start_index: i,
            count: end - i,
            start_position_px: 0.0,
            reverse: true,
        }
    }
}

/// Sum of sizes over `from..to`.
pub fn sum_sizes(from: usize, to: usize, size_of: impl Fn(usize) -> f32) -> f32 {
    (from..to).map(size_of).sum()
}

/// Rendered units that are completely inside the viewport.
///
/// A forward window is clipped at its trailing end, a reverse window at its
/// leading end, so the partially visible unit is excluded from that side.
pub fn fully_visible_count(
    window: &RenderWindow,
    viewport_size_px: f32,
    size_of: impl Fn(usize) -> f32,
) -> usize {
    let mut filled = 0.0;
    let mut visible = 0;
    let indices: Box<dyn Iterator<Item = usize>> = if window.reverse {
        Box::new((window.start_index..window.end_index()).rev())
    } else {
        Box::new(window.start_index..window.end_index())
    };
    for i in indices {
        filled += size_of(i);
        if filled > viewport_size_px {
            break;
        }
        visible += 1;
    }
    visible
}

/// Smallest start index `>= floor` from which `target` is fully visible at the
/// trailing edge of the viewport. A unit larger than the viewport starts itself.
pub fn trailing_start(
    target: usize,
    floor: usize,
    viewport_size_px: f32,
    size_of: impl Fn(usize) -> f32,
) -> usize {
    let mut start = target;
    let mut filled = size_of(target);
    while start > floor {
        let next = filled + size_of(start - 1);
        if next > viewport_size_px {
            break;
        }
        filled = next;
        start -= 1;
    }
    start
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
    use test_case::test_case;

    fn uniform(size: f32) -> impl Fn(usize) -> f32 {
        move |_| size
    }

    #[test]
    fn empty_axis_collapses() {
        let window = RenderCalculator::new(0, 0, 0, 500.0, false).compute(uniform(20.0));
        assert_eq!(window, RenderWindow::empty());
        let window = RenderCalculator::new(0, 0, 0, 500.0, true).compute(uniform(20.0));
        assert_eq!(window.count, 0);
        assert_eq!(window.start_position_px, 0.0);
    }

    #[test]
    fn forward_over_renders_partial_unit() {
        // 50px viewport, 20px rows: two full rows and a partial third
        let window = RenderCalculator::new(100, 0, 10, 50.0, false).compute(uniform(20.0));
        assert_eq!(window.start_index, 10);
        assert_eq!(window.count, 3);
        assert_eq!(window.start_position_px, 200.0);
    }

    #[test]
    fn forward_exact_fit_does_not_add_extra() {
        let window = RenderCalculator::new(100, 0, 0, 60.0, false).compute(uniform(20.0));
        assert_eq!(window.count, 3);
    }

    #[test]
    fn forward_respects_fixed_pane() {
        let window = RenderCalculator::new(100, 2, 5, 40.0, false).compute(uniform(10.0));
        assert_eq!(window.start_index, 7);
        assert_eq!(window.count, 4);
        assert_eq!(window.start_position_px, 70.0);
    }

    #[test]
    fn forward_stops_at_total() {
        let window = RenderCalculator::new(10, 0, 8, 500.0, false).compute(uniform(20.0));
        assert_eq!(window.start_index, 8);
        assert_eq!(window.count, 2);
        assert_eq!(window.end_index(), 10);
    }

    #[test]
    fn reverse_pins_end_to_last_index() {
        let window = RenderCalculator::new(100, 0, 99, 200.0, true).compute(uniform(20.0));
        assert!(window.reverse);
        assert_eq!(window.start_index, 90);
        assert_eq!(window.count, 10);
        assert_eq!(window.last_index(), Some(99));
        assert_eq!(window.start_position_px, 1800.0);
    }

    #[test]
    fn reverse_stops_at_fixed_boundary() {
        let window = RenderCalculator::new(6, 2, 3, 1000.0, true).compute(uniform(20.0));
        assert_eq!(window.start_index, 2);
        assert_eq!(window.count, 4);
    }

    #[test]
    fn unbounded_viewport_renders_everything() {
        let window =
            RenderCalculator::new(1000, 0, 0, f32::INFINITY, false).compute(uniform(23.0));
        assert_eq!(window.count, 1000);
    }

    #[test]
    fn all_fixed_leaves_empty_window() {
        let window = RenderCalculator::new(4, 4, 0, 100.0, false).compute(uniform(10.0));
        assert_eq!(window.start_index, 4);
        assert_eq!(window.count, 0);
        assert_eq!(window.start_position_px, 40.0);
    }

    #[test]
    fn non_uniform_sizes() {
        let sizes = [10.0, 100.0, 5.0, 5.0, 5.0, 50.0];
        let size_of = |i: usize| sizes[i];
        let window = RenderCalculator::new(6, 0, 1, 104.0, false).compute(size_of);
        assert_eq!(window.start_index, 1);
        assert_eq!(window.count, 2);
        assert_eq!(window.start_position_px, 10.0);
    }

    #[test]
    fn non_finite_size_surfaces_in_start_position() {
        let size_of = |i: usize| if i == 0 { f32::NAN } else { 20.0 };
        let window = RenderCalculator::new(10, 0, 3, 100.0, false).compute(size_of);
        assert!(!window.start_position_px.is_finite());
    }

    #[test_case(1, 0, 0, 10.0; "single unit")]
    #[test_case(100, 0, 0, 333.0; "top")]
    #[test_case(100, 0, 95, 333.0; "near end")]
    #[test_case(100, 5, 40, 1.0; "tiny viewport")]
    #[test_case(100, 5, 94, 10_000.0; "huge viewport")]
    #[test_case(37, 3, 20, 120.5; "fractional viewport")]
    fn coverage_property(total: usize, fixed: usize, offset: usize, viewport: f32) {
        let size_of = |i: usize| 7.0 + (i % 5) as f32 * 3.0;
        let calc = RenderCalculator::new(total, fixed, offset, viewport, false);
        let window = calc.compute(size_of);
        let start = fixed + offset;
        let remaining = sum_sizes(start, total, size_of);
        let filled = sum_sizes(window.start_index, window.end_index(), size_of);
        assert!(filled >= viewport.min(remaining));
        assert!(window.start_index + window.count <= total);
        // Identical inputs, identical output
        assert_eq!(calc.compute(size_of), window);
    }

    #[test]
    fn fully_visible_excludes_clipped_unit() {
        let window = RenderCalculator::new(100, 0, 0, 50.0, false).compute(uniform(20.0));
        assert_eq!(fully_visible_count(&window, 50.0, uniform(20.0)), 2);
        let window = RenderCalculator::new(100, 0, 99, 50.0, true).compute(uniform(20.0));
        assert_eq!(window.start_index, 97);
        assert_eq!(fully_visible_count(&window, 50.0, uniform(20.0)), 2);
    }

    #[test]
    fn trailing_start_fits_target() {
        assert_eq!(trailing_start(4, 0, 120.0, uniform(50.0)), 3);
        assert_eq!(trailing_start(1, 0, 500.0, uniform(50.0)), 0);
        assert_eq!(trailing_start(9, 6, 500.0, uniform(50.0)), 6);
        assert_eq!(trailing_start(5, 0, 10.0, uniform(50.0)), 5);
    }
}
