//! Viewport measurement: workspace size to per-axis render windows.

use super::{Axis, AxisState, GridPositions, RenderCalculator, RenderWindow};
use crate::render::{Geometry, TrimmingContainer};
use crate::settings::Settings;

/// Derived sizes of the visible area for one draw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Size of the trimming container's client area
    pub workspace_width: f32,
    pub workspace_height: f32,
    pub scrollbar_width: f32,
    pub has_vertical_scrollbar: bool,
    pub has_horizontal_scrollbar: bool,
    pub row_headers_width: f32,
    pub column_headers_height: f32,
    pub fixed_top_height: f32,
    pub fixed_bottom_height: f32,
    pub fixed_left_width: f32,
    /// Full table size including headers
    pub total_width: f32,
    pub total_height: f32,
    /// Space left for the scrollable region after headers, fixed panes and scrollbars
    pub body_width: f32,
    pub body_height: f32,
}

impl Viewport {
    pub fn measure(settings: &Settings, positions: &GridPositions, geometry: &Geometry) -> Self {
        let row_headers_width = settings.row_headers_width();
        let column_headers_height = settings.column_headers_height();
        let rows = &positions.rows;
        let columns = &positions.columns;

        let fixed_top_height = rows.position(settings.fixed_rows_top);
        let fixed_bottom_height = rows.span(
            settings.total_rows.saturating_sub(settings.fixed_rows_bottom),
            settings.total_rows,
        );
        let fixed_left_width = columns.position(settings.fixed_columns_left);
        let total_height = column_headers_height + rows.extent();
        let total_width = row_headers_width + columns.extent();

        let (has_vertical_scrollbar, has_horizontal_scrollbar) =
            if geometry.container == TrimmingContainer::Element && settings.total_rows > 0 {
                scrollbars(
                    total_width,
                    total_height,
                    geometry.workspace_width,
                    geometry.workspace_height,
                    geometry.scrollbar_width,
                )
            } else {
                (false, false)
            };

        let vertical_bar = if has_vertical_scrollbar {
            geometry.scrollbar_width
        } else {
            0.0
        };
        let horizontal_bar = if has_horizontal_scrollbar {
            geometry.scrollbar_width
        } else {
            0.0
        };

        let body_height = (geometry.workspace_height
            - column_headers_height
            - fixed_top_height
            - fixed_bottom_height
            - horizontal_bar)
            .max(0.0);
        let body_width =
            (geometry.workspace_width - row_headers_width - fixed_left_width - vertical_bar)
                .max(0.0);

        Self {
            workspace_width: geometry.workspace_width,
            workspace_height: geometry.workspace_height,
            scrollbar_width: geometry.scrollbar_width,
            has_vertical_scrollbar,
            has_horizontal_scrollbar,
            row_headers_width,
            column_headers_height,
            fixed_top_height,
            fixed_bottom_height,
            fixed_left_width,
            total_width,
            total_height,
            body_width,
            body_height,
        }
    }

    /// Pixels available to the scrollable region along `axis`.
    pub fn scrollable_size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.body_height,
            Axis::Horizontal => self.body_width,
        }
    }

    /// Thickness of the scrollbar that runs along `axis`' far edge and eats into it:
    /// the horizontal scrollbar for rows, the vertical one for columns.
    pub fn scrollbar_across(&self, axis: Axis) -> f32 {
        let present = match axis {
            Axis::Vertical => self.has_horizontal_scrollbar,
            Axis::Horizontal => self.has_vertical_scrollbar,
        };
        if present {
            self.scrollbar_width
        } else {
            0.0
        }
    }

    /// Pixel extent of the leading fixed pane along `axis`.
    pub fn leading_fixed_extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.fixed_top_height,
            Axis::Horizontal => self.fixed_left_width,
        }
    }

    /// Length available to a clone that spans `axis`, e.g. the width of the top
    /// pane: the workspace minus the scrollbar crossing it, never longer than
    /// the table itself.
    pub fn clone_span(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => {
                (self.workspace_width - self.scrollbar_across(Axis::Horizontal))
                    .min(self.total_width)
                    .max(0.0)
            }
            Axis::Vertical => {
                (self.workspace_height - self.scrollbar_across(Axis::Vertical))
                    .min(self.total_height)
                    .max(0.0)
            }
        }
    }

    /// Render calculator for `axis` given its scroll state.
    pub fn calculator(&self, axis: Axis, state: &AxisState) -> RenderCalculator {
        RenderCalculator::new(
            state.total(),
            state.fixed_count(),
            state.offset(),
            self.scrollable_size(axis),
            state.is_reverse(),
        )
    }

    pub fn window(
        &self,
        axis: Axis,
        settings: &Settings,
        positions: &GridPositions,
        state: &AxisState,
    ) -> RenderWindow {
        let positions = positions.axis(axis);
        self.calculator(axis, state)
            .compute_positioned(|i| settings.size_of(axis, i), |i| positions.position(i))
    }

    pub fn row_window(
        &self,
        settings: &Settings,
        positions: &GridPositions,
        state: &AxisState,
    ) -> RenderWindow {
        self.window(Axis::Vertical, settings, positions, state)
    }

    pub fn column_window(
        &self,
        settings: &Settings,
        positions: &GridPositions,
        state: &AxisState,
    ) -> RenderWindow {
        self.window(Axis::Horizontal, settings, positions, state)
    }
}

/// Which scrollbars a clipped container shows. A vertical scrollbar narrows the
/// workspace and can force a horizontal one, and vice versa.
fn scrollbars(
    content_width: f32,
    content_height: f32,
    workspace_width: f32,
    workspace_height: f32,
    scrollbar: f32,
) -> (bool, bool) {
    let mut vertical = content_height > workspace_height;
    let horizontal = content_width > workspace_width - if vertical { scrollbar } else { 0.0 };
    if horizontal && !vertical {
        vertical = content_height > workspace_height - scrollbar;
    }
    (vertical, horizontal)
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
    use crate::render::Rect;

    fn measure(settings: &Settings, geometry: &Geometry) -> Viewport {
        Viewport::measure(settings, &GridPositions::build(settings), geometry)
    }

    fn geometry(width: f32, height: f32) -> Geometry {
        Geometry {
            container: TrimmingContainer::Element,
            workspace_width: width,
            workspace_height: height,
            scrollbar_width: 15.0,
            window_width: 1024.0,
            window_height: 768.0,
            table_rect: Rect::new(0.0, 0.0, width, height),
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }

    #[test]
    fn body_excludes_headers_fixed_and_scrollbars() {
        let mut settings = Settings::new(100, 20);
        settings.default_row_height = 20.0;
        settings.default_column_width = 50.0;
        settings.fixed_rows_top = 2;
        settings.fixed_rows_bottom = 1;
        settings.fixed_columns_left = 1;
        settings.row_headers = vec!["#".to_string().into()];
        settings.column_headers = vec!["H".to_string().into()];

        let viewport = measure(&settings, &geometry(500.0, 400.0));
        assert!(viewport.has_vertical_scrollbar);
        assert!(viewport.has_horizontal_scrollbar);
        assert_eq!(viewport.fixed_top_height, 40.0);
        assert_eq!(viewport.fixed_bottom_height, 20.0);
        assert_eq!(viewport.body_height, 400.0 - 23.0 - 40.0 - 20.0 - 15.0);
        assert_eq!(viewport.body_width, 500.0 - 50.0 - 50.0 - 15.0);
        assert_eq!(viewport.clone_span(Axis::Horizontal), 485.0);
    }

    #[test]
    fn window_container_has_no_scrollbar_compensation() {
        let settings = Settings::new(1000, 1000);
        let mut geo = geometry(800.0, 600.0);
        geo.container = TrimmingContainer::Window;
        let viewport = measure(&settings, &geo);
        assert!(!viewport.has_vertical_scrollbar);
        assert_eq!(viewport.scrollbar_across(Axis::Horizontal), 0.0);
    }

    #[test]
    fn small_table_clone_span_is_table_size() {
        let settings = Settings::new(3, 2);
        let viewport = measure(&settings, &geometry(800.0, 600.0));
        assert!(!viewport.has_vertical_scrollbar);
        assert_eq!(viewport.clone_span(Axis::Horizontal), 100.0);
        assert_eq!(viewport.clone_span(Axis::Vertical), 69.0);
    }

    #[test]
    fn horizontal_scrollbar_can_force_vertical() {
        // Rows fit exactly until the horizontal bar takes 15px
        assert_eq!(scrollbars(1000.0, 590.0, 800.0, 600.0, 15.0), (true, true));
        assert_eq!(scrollbars(700.0, 590.0, 800.0, 600.0, 15.0), (false, false));
    }

    #[test]
    fn windows_follow_axis_state() {
        let settings = Settings::new(100, 10);
        let positions = GridPositions::build(&settings);
        let viewport = Viewport::measure(&settings, &positions, &geometry(200.0, 230.0));
        let mut rows = AxisState::new(100, 0);
        rows.set_offset(10);
        let window = viewport.row_window(&settings, &positions, &rows);
        assert_eq!(window.start_position_px, 230.0);
        assert_eq!(window.start_index, 10);
        assert!(window.count >= 9);
    }
}
