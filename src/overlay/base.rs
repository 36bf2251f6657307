//! State and positioning math shared by every overlay variant.

use crate::error::{GridpaneError, Result};
use crate::layout::Axis;
use crate::render::{PaneChanges, TableFragment, TrimmingContainer};
use crate::settings::Settings;

use super::{CloneElement, OverlayContext, PaneKind};

/// Clone element, fragment and trimming container of one pane.
#[derive(Debug, Clone)]
pub struct OverlayBase {
    kind: PaneKind,
    container: TrimmingContainer,
    element: CloneElement,
    fragment: TableFragment,
    committed: Option<TableFragment>,
}

impl OverlayBase {
    pub fn new(kind: PaneKind, container: TrimmingContainer) -> Self {
        Self {
            kind,
            container,
            element: CloneElement::default(),
            fragment: TableFragment::default(),
            committed: None,
        }
    }

    pub fn kind(&self) -> PaneKind {
        self.kind
    }

    /// Trimming container recorded when the clone was created.
    pub fn container(&self) -> TrimmingContainer {
        self.container
    }

    pub fn element(&self) -> &CloneElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut CloneElement {
        &mut self.element
    }

    pub fn fragment(&self) -> &TableFragment {
        &self.fragment
    }

    pub fn fragment_mut(&mut self) -> &mut TableFragment {
        &mut self.fragment
    }

    /// Rebuild the fragment from the pane's filters. A fast refresh keeps the
    /// existing fragment when the filters did not move.
    pub fn refresh_fragment(&mut self, ctx: &OverlayContext<'_>, fast: bool) {
        let (rows, columns) = ctx.filters(self.kind);
        let unchanged = *self.fragment.row_filter() == rows
            && *self.fragment.column_filter() == columns
            && self.committed.is_some();
        if fast && unchanged {
            self.fragment.clear_classes();
            return;
        }
        log::trace!(
            "{} fragment: {} rows x {} columns",
            self.kind,
            rows.rendered_count(),
            columns.rendered_count()
        );
        self.fragment = TableFragment::build(ctx.settings, rows, columns, self.kind.headers());
    }

    /// Whether the window strategy positions this clone along `axis`.
    pub fn uses_window_strategy(&self, ctx: &OverlayContext<'_>, axis: Axis) -> bool {
        self.container == TrimmingContainer::Window && !ctx.settings.prevent_overflow.blocks(axis)
    }

    /// Offset that keeps a clone pinned to the leading edge of `axis`.
    ///
    /// Window strategy: how far the table's leading edge has scrolled past the
    /// window edge, 0 until it has, and 0 once the table's trailing edge no
    /// longer has room for the clone. Element strategy: the scroll position.
    pub fn leading_offset(&self, ctx: &OverlayContext<'_>, axis: Axis, extent: f32) -> f32 {
        if !self.uses_window_strategy(ctx, axis) {
            return ctx.geometry.scroll_position(axis);
        }
        let rect = ctx.geometry.table_rect;
        let (start, end) = match axis {
            Axis::Vertical => (rect.top(), rect.bottom()),
            Axis::Horizontal => (rect.left(), rect.right()),
        };
        if start < 0.0 && end - extent > 0.0 {
            -start
        } else {
            0.0
        }
    }

    /// Top offset that pins a clone of `height` to the bottom of the visible area,
    /// clamped into `[0, natural]`, with `natural` the offset of the clone when the
    /// table is fully shown. Returns `(offset, natural)`.
    pub fn bottom_offset(&self, ctx: &OverlayContext<'_>, height: f32) -> (f32, f32) {
        let natural = (ctx.viewport.total_height - height).max(0.0);
        let offset = if self.uses_window_strategy(ctx, Axis::Vertical) {
            ctx.geometry.window_height - ctx.geometry.table_rect.top() - height
        } else {
            ctx.geometry.scroll_top + ctx.viewport.workspace_height
                - ctx.viewport.scrollbar_across(Axis::Vertical)
                - height
        };
        (offset.clamp(0.0, natural), natural)
    }

    /// Content origin on `axis`: the window's start position minus the leading
    /// fixed extent, 0 on an empty axis.
    ///
    /// # Errors
    /// `GridpaneError::NonNumericStartPosition` when the window start position is
    /// not finite on a non-empty axis.
    pub fn content_origin(ctx: &OverlayContext<'_>, axis: Axis) -> Result<f32> {
        if ctx.state(axis).total() == 0 {
            return Ok(0.0);
        }
        let start = ctx.window(axis).start_position_px;
        if !start.is_finite() {
            return Err(GridpaneError::NonNumericStartPosition { axis });
        }
        Ok(start - ctx.viewport.leading_fixed_extent(axis))
    }

    /// Changes since the last commit. The fragment is compared with the
    /// committed one, so reapplied classes do not count as a change.
    pub fn pending_changes(&self) -> PaneChanges {
        PaneChanges {
            element: self.element.is_dirty(),
            fragment: self.committed.as_ref() != Some(&self.fragment),
        }
    }

    /// Record the current state as written to the DOM.
    pub fn mark_committed(&mut self, changes: PaneChanges) {
        if changes.fragment {
            self.committed = Some(self.fragment.clone());
        }
        self.element.take_dirty();
    }

    /// Forget the committed state so the next commit rewrites everything.
    pub fn invalidate(&mut self) {
        self.committed = None;
        self.element.mark_dirty();
    }
}

/// Whether a clone on the leading edge of `axis` should mark its inner border.
///
/// The marker belongs to a bare header strip: no fixed units separate the
/// header from the scrolled body, so once the clone is pulled over the body
/// (`offset > 0`) or the axis is empty, its edge doubles the body's border.
pub fn header_inner_border(ctx: &OverlayContext<'_>, axis: Axis, offset: f32) -> bool {
    let settings = ctx.settings;
    let (fixed, has_headers, crossing) = match axis {
        Axis::Vertical => (
            settings.fixed_rows_top,
            settings.has_column_headers(),
            settings.total_rows,
        ),
        Axis::Horizontal => (
            settings.fixed_columns_left,
            settings.has_row_headers(),
            settings.total_columns,
        ),
    };
    fixed == 0 && has_headers && (offset > 0.0 || crossing == 0)
}

/// Native scroll position that brings `source` to the leading edge of `axis`,
/// or to the trailing edge with `to_edge`. Clamped at 0.
pub fn scroll_target(ctx: &OverlayContext<'_>, axis: Axis, source: usize, to_edge: bool) -> f32 {
    let fixed = ctx.settings.fixed_leading(axis);
    let positions = ctx.positions.axis(axis);
    let px = if to_edge {
        let scrollbar = ctx.viewport.scrollbar_across(axis);
        let visible = ctx.viewport.scrollable_size(axis) + scrollbar;
        positions.span(fixed, source + 1) - visible + scrollbar
    } else {
        positions.span(fixed, source)
    };
    ctx.geometry.native_scroll_for(axis, px.max(0.0)).max(0.0)
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
    use crate::layout::{AxisState, GridPositions, RenderWindow, Viewport};
    use crate::render::{Geometry, Rect};

    fn context<'a>(
        settings: &'a Settings,
        positions: &'a GridPositions,
        geometry: &'a Geometry,
        viewport: &'a Viewport,
        rows: &'a AxisState,
        columns: &'a AxisState,
    ) -> OverlayContext<'a> {
        OverlayContext {
            settings,
            positions,
            geometry,
            viewport,
            rows,
            columns,
            row_window: viewport.row_window(settings, positions, rows),
            column_window: viewport.column_window(settings, positions, columns),
            attached: true,
            left_width: None,
            top_height: None,
            bottom_height: None,
        }
    }

    fn geometry(container: TrimmingContainer, table_top: f32) -> Geometry {
        Geometry {
            container,
            workspace_width: 400.0,
            workspace_height: 300.0,
            scrollbar_width: 15.0,
            window_width: 1000.0,
            window_height: 700.0,
            table_rect: Rect::new(0.0, table_top, 400.0, 2300.0),
            scroll_left: 0.0,
            scroll_top: 140.0,
        }
    }

    #[test]
    fn window_strategy_offsets_from_table_rect() {
        let settings = Settings::new(100, 5);
        let geo = geometry(TrimmingContainer::Window, -250.0);
        let positions = GridPositions::build(&settings);
        let viewport = Viewport::measure(&settings, &positions, &geo);
        let rows = AxisState::new(100, 0);
        let cols = AxisState::new(5, 0);
        let ctx = context(&settings, &positions, &geo, &viewport, &rows, &cols);
        let base = OverlayBase::new(PaneKind::Top, TrimmingContainer::Window);
        assert_eq!(base.leading_offset(&ctx, Axis::Vertical, 23.0), 250.0);
        // Trailing edge leaves no room for the clone
        assert_eq!(base.leading_offset(&ctx, Axis::Vertical, 2100.0), 0.0);

        let geo = geometry(TrimmingContainer::Window, 50.0);
        let ctx = context(&settings, &positions, &geo, &viewport, &rows, &cols);
        assert_eq!(base.leading_offset(&ctx, Axis::Vertical, 23.0), 0.0);
    }

    #[test]
    fn prevent_overflow_forces_element_strategy() {
        let mut settings = Settings::new(100, 5);
        settings.prevent_overflow = crate::settings::PreventOverflow::Vertical;
        let geo = geometry(TrimmingContainer::Window, -250.0);
        let positions = GridPositions::build(&settings);
        let viewport = Viewport::measure(&settings, &positions, &geo);
        let rows = AxisState::new(100, 0);
        let cols = AxisState::new(5, 0);
        let ctx = context(&settings, &positions, &geo, &viewport, &rows, &cols);
        let base = OverlayBase::new(PaneKind::Top, TrimmingContainer::Window);
        assert!(!base.uses_window_strategy(&ctx, Axis::Vertical));
        assert!(base.uses_window_strategy(&ctx, Axis::Horizontal));
        assert_eq!(base.leading_offset(&ctx, Axis::Vertical, 23.0), 140.0);
    }

    #[test]
    fn content_origin_rejects_non_finite_start() {
        let settings = Settings::new(100, 5);
        let geo = geometry(TrimmingContainer::Element, 0.0);
        let positions = GridPositions::build(&settings);
        let viewport = Viewport::measure(&settings, &positions, &geo);
        let rows = AxisState::new(100, 0);
        let cols = AxisState::new(5, 0);
        let mut ctx = context(&settings, &positions, &geo, &viewport, &rows, &cols);
        ctx.row_window.start_position_px = f32::NAN;
        assert!(matches!(
            OverlayBase::content_origin(&ctx, Axis::Vertical),
            Err(GridpaneError::NonNumericStartPosition {
                axis: Axis::Vertical
            })
        ));

        let empty_rows = AxisState::new(0, 0);
        let mut ctx = context(&settings, &positions, &geo, &viewport, &empty_rows, &cols);
        ctx.row_window = RenderWindow {
            start_position_px: f32::NAN,
            ..RenderWindow::empty()
        };
        assert_eq!(OverlayBase::content_origin(&ctx, Axis::Vertical).unwrap(), 0.0);
    }

    #[test]
    fn scroll_target_edges() {
        let mut settings = Settings::new(100, 5);
        settings.fixed_rows_top = 2;
        settings.default_row_height = 20.0;
        let geo = geometry(TrimmingContainer::Element, 0.0);
        let positions = GridPositions::build(&settings);
        let viewport = Viewport::measure(&settings, &positions, &geo);
        let rows = AxisState::new(100, 2);
        let cols = AxisState::new(5, 0);
        let ctx = context(&settings, &positions, &geo, &viewport, &rows, &cols);
        assert_eq!(scroll_target(&ctx, Axis::Vertical, 12, false), 200.0);
        // Trailing: rows 2..=12 are 220px, body is 300 - 40 fixed
        let expected = (220.0 - viewport.body_height).max(0.0);
        assert_eq!(scroll_target(&ctx, Axis::Vertical, 12, true), expected);
        assert_eq!(scroll_target(&ctx, Axis::Vertical, 1, false), 0.0);
    }

    #[test]
    fn window_scroll_target_includes_table_page_offset() {
        let mut settings = Settings::new(100, 5);
        settings.default_row_height = 20.0;
        // Table 300px down the page, page not scrolled yet
        let mut geo = geometry(TrimmingContainer::Window, 300.0);
        geo.scroll_top = 0.0;
        let positions = GridPositions::build(&settings);
        let viewport = Viewport::measure(&settings, &positions, &geo);
        let rows = AxisState::new(100, 0);
        let cols = AxisState::new(5, 0);
        let ctx = context(&settings, &positions, &geo, &viewport, &rows, &cols);
        assert_eq!(scroll_target(&ctx, Axis::Vertical, 41, false), 1120.0);
    }
}
