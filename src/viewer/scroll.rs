//! Scroll-related logic for `GridView`.
//!
//! Includes the per-axis scroll controller, scroll-to-cell, native scroll
//! synchronisation and wheel-style pixel scrolling.

use crate::error::{GridpaneError, Result};
use crate::layout::{trailing_start, Axis, RenderCalculator};
use crate::overlay::{scroll_target, OverlayContext, PaneKind};
use crate::render::DomBackend;
use crate::types::CellCoords;

use super::GridView;

impl<B: DomBackend> GridView<B> {
    /// Scroll rows by `delta` units.
    ///
    /// # Errors
    /// `GridpaneError::ScrollBeforeRender` before the first draw.
    pub fn scroll_vertical(&mut self, delta: i64) -> Result<bool> {
        self.scroll_axis(Axis::Vertical, delta)
    }

    /// Scroll columns by `delta` units.
    ///
    /// # Errors
    /// `GridpaneError::ScrollBeforeRender` before the first draw.
    pub fn scroll_horizontal(&mut self, delta: i64) -> Result<bool> {
        self.scroll_axis(Axis::Horizontal, delta)
    }

    /// Move the offset of `axis` by `delta`. Reaching or passing the end of the
    /// axis pins the offset to the last unit and switches to reverse rendering;
    /// scrolling back leaves it. Returns whether the axis state changed.
    ///
    /// # Errors
    /// `GridpaneError::ScrollBeforeRender` before the first draw.
    pub fn scroll_axis(&mut self, axis: Axis, delta: i64) -> Result<bool> {
        if !self.drawn {
            return Err(GridpaneError::ScrollBeforeRender);
        }
        let window_start = self.window(axis).start_index;
        let state = *self.axis(axis);

        let mut offset = state.offset();
        if delta < 0 && state.is_reverse() {
            // Continue from what is on screen, not from the pinned offset
            offset = window_start.saturating_sub(state.fixed_count());
        }
        let scrollable = i64::try_from(state.scrollable_count()).unwrap_or(i64::MAX);
        let target = i64::try_from(offset).unwrap_or(i64::MAX).saturating_add(delta);

        let (offset, reverse) = if scrollable > 0 && target >= scrollable {
            (state.max_offset(), true)
        } else {
            let offset = usize::try_from(target.max(0)).unwrap_or(0);
            (offset, state.is_reverse() && delta >= 0)
        };
        Ok(self.apply_scroll(axis, offset, reverse))
    }

    /// Bring `coords` fully into view, moving each axis as little as possible.
    ///
    /// # Errors
    /// `GridpaneError::RowOutOfRange` / `ColumnOutOfRange` for coordinates
    /// outside the grid, `ScrollBeforeRender` before the first draw.
    pub fn scroll_to_cell(&mut self, coords: CellCoords) -> Result<bool> {
        let row = coords
            .source_row()
            .filter(|&r| r < self.settings.total_rows)
            .ok_or(GridpaneError::RowOutOfRange {
                row: coords.row,
                total: self.settings.total_rows,
            })?;
        let col = coords
            .source_col()
            .filter(|&c| c < self.settings.total_columns)
            .ok_or(GridpaneError::ColumnOutOfRange {
                col: coords.col,
                total: self.settings.total_columns,
            })?;
        if !self.drawn {
            return Err(GridpaneError::ScrollBeforeRender);
        }
        let vertical = self.scroll_axis_to(Axis::Vertical, row)?;
        let horizontal = self.scroll_axis_to(Axis::Horizontal, col)?;
        Ok(vertical || horizontal)
    }

    /// Scroll to `coords`, redraw, and move the native scrollbars to match.
    ///
    /// # Errors
    /// See [`GridView::scroll_to_cell`] and [`GridView::draw`].
    pub fn scroll_viewport_to(&mut self, coords: CellCoords) -> Result<bool> {
        let changed = self.scroll_to_cell(coords)?;
        self.draw(false)?;
        self.sync_native_scroll(Axis::Vertical);
        self.sync_native_scroll(Axis::Horizontal);
        Ok(changed)
    }

    /// Scroll `axis` by a pixel delta, as produced by a wheel event. The delta
    /// is converted into the number of units it crosses, at least one.
    ///
    /// # Errors
    /// `GridpaneError::ScrollBeforeRender` before the first draw.
    pub fn scroll_by_pixels(&mut self, axis: Axis, px: f32) -> Result<bool> {
        if !self.drawn {
            return Err(GridpaneError::ScrollBeforeRender);
        }
        if px.abs() < f32::EPSILON || !px.is_finite() {
            return Ok(false);
        }
        let state = self.axis(axis);
        let fixed = state.fixed_count();
        let total = state.total();
        let start = self.window(axis).start_index.max(fixed);

        let mut remaining = px.abs();
        let mut units: i64 = 0;
        if px > 0.0 {
            let mut i = start;
            while i < total {
                let size = self.settings.size_of(axis, i);
                if remaining < size {
                    break;
                }
                remaining -= size;
                units += 1;
                i += 1;
            }
        } else {
            let mut i = start;
            while i > fixed {
                let size = self.settings.size_of(axis, i - 1);
                if remaining < size {
                    break;
                }
                remaining -= size;
                units += 1;
                i -= 1;
            }
        }
        let delta = units.max(1);
        self.scroll_axis(axis, if px > 0.0 { delta } else { -delta })
    }

    /// Adopt the native scroll position of the trimming container, as after a
    /// scrollbar drag, then redraw. Returns whether either axis moved.
    ///
    /// # Errors
    /// Any error raised by the redraw.
    pub fn on_native_scroll(&mut self) -> Result<bool> {
        if !self.drawn {
            return Ok(false);
        }
        let vertical = self.adopt_native_scroll(Axis::Vertical);
        let horizontal = self.adopt_native_scroll(Axis::Horizontal);
        self.draw(true)?;
        Ok(vertical || horizontal)
    }

    fn adopt_native_scroll(&mut self, axis: Axis) -> bool {
        let px = self.backend.measure().table_scroll(axis);
        let state = *self.axis(axis);
        let fixed = state.fixed_count();
        let total = state.total();
        let positions = self.positions.axis(axis);

        let extent = positions.span(fixed, total);
        let max_scroll = (extent - self.viewport.scrollable_size(axis)).max(0.0);
        if max_scroll > 0.0 && px >= max_scroll - 0.5 {
            return self.apply_scroll(axis, state.max_offset(), true);
        }

        let index = positions.index_after(fixed, px).min(total).max(fixed);
        self.apply_scroll(axis, index - fixed, false)
    }

    /// Write the native scroll position that matches the axis state. Returns
    /// whether the position moved.
    fn sync_native_scroll(&mut self, axis: Axis) -> bool {
        let state = *self.axis(axis);
        if state.scrollable_count() == 0 {
            return false;
        }
        let (source, to_edge) = if state.is_reverse() {
            (state.total() - 1, true)
        } else {
            (state.first_scrollable_index(), false)
        };

        let ctx = OverlayContext {
            settings: &self.settings,
            positions: &self.positions,
            geometry: &self.geometry,
            viewport: &self.viewport,
            rows: &self.rows,
            columns: &self.columns,
            row_window: self.row_window,
            column_window: self.column_window,
            attached: true,
            left_width: None,
            top_height: None,
            bottom_height: None,
        };
        let pane = match axis {
            Axis::Vertical => PaneKind::Top,
            Axis::Horizontal => PaneKind::Left,
        };
        if let Some(overlay) = self.overlays.get(pane) {
            return overlay.scroll_to(&ctx, &mut self.backend, source, to_edge);
        }
        let px = scroll_target(&ctx, axis, source, to_edge);
        self.backend
            .set_scroll_position(self.master.base().container(), axis, px)
    }

    /// Move `axis` the least needed to show `target` fully.
    fn scroll_axis_to(&mut self, axis: Axis, target: usize) -> Result<bool> {
        let state = *self.axis(axis);
        let fixed = state.fixed_count();
        let total = state.total();
        if target < fixed || target >= total {
            // Fixed panes are always visible
            return self.scroll_axis(axis, 0);
        }

        let window = *self.window(axis);
        let viewport_size = self.viewport.scrollable_size(axis);
        let current_start = if state.is_reverse() {
            window.start_index
        } else {
            state.first_scrollable_index()
        };
        let last_fully_visible = self.fully_visible(axis).map(|(_, last)| last);

        if target < current_start {
            return Ok(self.apply_scroll(axis, target - fixed, false));
        }
        if last_fully_visible.is_some_and(|last| target <= last) {
            return self.scroll_axis(axis, 0);
        }

        let size_of = |i| self.settings.size_of(axis, i);
        let positions = self.positions.axis(axis);
        let mut start = trailing_start(target, fixed, viewport_size, size_of).max(current_start);
        if axis == Axis::Horizontal {
            while start > fixed && positions.span(start, target + 1) < viewport_size {
                start -= 1;
            }
        }
        let offset = start - fixed;
        let reaches_end = RenderCalculator::new(total, fixed, offset, viewport_size, false)
            .compute_positioned(size_of, |i| positions.position(i))
            .end_index()
            >= total;
        // A window pinned to the end must still hold the whole target
        let reverse = reaches_end && positions.span(target, total) <= viewport_size;
        Ok(self.apply_scroll(axis, offset, reverse))
    }

    /// Set offset and reverse flag of `axis`, firing the scroll hook on change.
    fn apply_scroll(&mut self, axis: Axis, offset: usize, reverse: bool) -> bool {
        let state = self.axis_mut(axis);
        let before = *state;
        state.set_offset(offset);
        state.set_reverse(reverse);
        let after = *state;
        if before == after {
            return false;
        }
        log::debug!(
            "{axis} scroll: offset {} -> {}, reverse {} -> {}",
            before.offset(),
            after.offset(),
            before.is_reverse(),
            after.is_reverse()
        );
        self.hooks.scrolled(axis);
        true
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
    use crate::render::MemoryDom;
    use crate::settings::Settings;

    fn drawn(rows: usize, cols: usize, width: f32, height: f32) -> GridView<MemoryDom> {
        let mut settings = Settings::new(rows, cols);
        settings.default_row_height = 20.0;
        settings.default_column_width = 50.0;
        let mut grid = GridView::new(settings, MemoryDom::with_workspace(width, height)).unwrap();
        grid.draw(false).unwrap();
        grid
    }

    #[test]
    fn scroll_before_draw_is_rejected() {
        let settings = Settings::new(10, 10);
        let mut grid = GridView::new(settings, MemoryDom::with_workspace(100.0, 100.0)).unwrap();
        assert!(matches!(
            grid.scroll_vertical(1),
            Err(GridpaneError::ScrollBeforeRender)
        ));
    }

    #[test]
    fn backward_from_reverse_starts_at_window() {
        let mut grid = drawn(100, 5, 265.0, 200.0);
        grid.scroll_vertical(500).unwrap();
        grid.draw(false).unwrap();
        assert!(grid.row_axis().is_reverse());
        assert_eq!(grid.row_window().start_index, 90);

        grid.scroll_vertical(-1).unwrap();
        assert!(!grid.row_axis().is_reverse());
        assert_eq!(grid.row_axis().offset(), 89);
    }

    #[test]
    fn pixel_scroll_counts_crossed_units() {
        let mut grid = drawn(100, 5, 265.0, 200.0);
        grid.scroll_by_pixels(Axis::Vertical, 65.0).unwrap();
        assert_eq!(grid.row_axis().offset(), 3);
        grid.draw(true).unwrap();
        grid.scroll_by_pixels(Axis::Vertical, -5.0).unwrap();
        assert_eq!(grid.row_axis().offset(), 2);
        assert!(!grid.scroll_by_pixels(Axis::Vertical, 0.0).unwrap());
    }

    #[test]
    fn native_scroll_is_adopted() {
        let mut grid = drawn(100, 5, 265.0, 200.0);
        grid.backend_mut().geometry_mut().scroll_top = 410.0;
        assert!(grid.on_native_scroll().unwrap());
        assert_eq!(grid.row_axis().offset(), 20);
        assert_eq!(grid.row_window().start_index, 20);

        // 2000px of rows, 200px body
        grid.backend_mut().geometry_mut().scroll_top = 1800.0;
        grid.on_native_scroll().unwrap();
        assert!(grid.row_axis().is_reverse());
        assert_eq!(grid.row_window().last_index(), Some(99));
    }

    #[test]
    fn viewport_scroll_moves_native_scrollbar() {
        let mut grid = drawn(100, 5, 265.0, 200.0);
        grid.scroll_viewport_to(CellCoords::new(30, 0)).unwrap();
        // Row 30 at the bottom edge: rows 21..=30 fill the body
        assert_eq!(grid.row_axis().offset(), 21);
        assert_eq!(grid.backend().geometry().scroll_top, 420.0);
    }
}
