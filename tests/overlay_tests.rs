//! Frozen-pane overlay tests
//!
//! Clone lifecycle, pane filters, positioning strategies, corner sizing and
//! change tracking of committed clones.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{assert_overlays, rendered_columns, rendered_rows, GridBuilder};
use gridpane::render::{DomEvent, MemoryDom, Rect};
use gridpane::{GridView, PaneKind, PreventOverflow};

/// 100 x 20 grid with frozen rows/columns and one header level on each axis.
fn frozen_grid() -> GridBuilder {
    GridBuilder::new(100, 20)
        .fixed(2, 1, 1)
        .row_headers(1)
        .column_headers(1)
}

fn element(grid: &GridView<MemoryDom>, pane: PaneKind) -> gridpane::overlay::CloneElement {
    grid.backend().pane(pane).unwrap().element
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn overlays_follow_settings() {
    let mut grid = GridBuilder::new(100, 20).drawn();
    assert_overlays(&grid, &[]);

    let mut settings = grid.settings().clone();
    settings.fixed_rows_top = 1;
    grid.update_settings(settings.clone()).unwrap();
    grid.draw(false).unwrap();
    assert_overlays(&grid, &[PaneKind::Top]);

    settings.fixed_columns_left = 1;
    settings.fixed_rows_bottom = 2;
    grid.update_settings(settings.clone()).unwrap();
    grid.draw(false).unwrap();
    assert_overlays(
        &grid,
        &[
            PaneKind::Left,
            PaneKind::Top,
            PaneKind::Bottom,
            PaneKind::TopLeftCorner,
            PaneKind::BottomLeftCorner,
        ],
    );

    settings.fixed_rows_top = 0;
    grid.update_settings(settings).unwrap();
    grid.draw(false).unwrap();
    assert_overlays(
        &grid,
        &[PaneKind::Left, PaneKind::Bottom, PaneKind::BottomLeftCorner],
    );
    assert!(!grid.backend().has_clone(PaneKind::Top));
    let events = grid.backend().events();
    assert!(events.contains(&DomEvent::Destroyed(PaneKind::Top)));
    assert!(events.contains(&DomEvent::Destroyed(PaneKind::TopLeftCorner)));
}

#[test]
fn row_headers_alone_create_left_overlay() {
    let grid = GridBuilder::new(100, 20).row_headers(1).drawn();
    assert_overlays(&grid, &[PaneKind::Left]);
    let left = grid.backend().pane(PaneKind::Left).unwrap();
    assert!(!left.fragment.has_body_columns());
    assert_eq!(left.fragment.row_header_levels(), 1);
}

// ============================================================================
// Pane contents
// ============================================================================

#[test]
fn panes_render_their_filters() {
    let grid = frozen_grid().drawn();
    let master_rows = rendered_rows(&grid, PaneKind::Master);
    assert_eq!(master_rows[..3], [0, 1, 2]);
    assert_eq!(rendered_columns(&grid, PaneKind::Master)[0], 0);

    assert_eq!(rendered_rows(&grid, PaneKind::Top), [0, 1]);
    assert_eq!(
        rendered_columns(&grid, PaneKind::Top),
        rendered_columns(&grid, PaneKind::Master)
    );
    assert_eq!(rendered_rows(&grid, PaneKind::Bottom), [99]);
    assert_eq!(rendered_rows(&grid, PaneKind::Left), master_rows);
    assert_eq!(rendered_columns(&grid, PaneKind::Left), [0]);
    assert_eq!(rendered_rows(&grid, PaneKind::TopLeftCorner), [0, 1]);
    assert_eq!(rendered_columns(&grid, PaneKind::TopLeftCorner), [0]);
    assert_eq!(rendered_rows(&grid, PaneKind::BottomLeftCorner), [99]);

    // Bottom panes carry row headers only
    let bottom = &grid.backend().pane(PaneKind::Bottom).unwrap().fragment;
    assert_eq!(bottom.column_header_levels(), 0);
    let top = &grid.backend().pane(PaneKind::Top).unwrap().fragment;
    assert_eq!(top.column_header_levels(), 1);
}

#[test]
fn headers_use_negative_coordinates() {
    let grid = frozen_grid().data().drawn();
    let top = &grid.backend().pane(PaneKind::Top).unwrap().fragment;
    assert_eq!(top.cell(gridpane::CellCoords::new(-1, 0)).unwrap().value, "A");
    assert_eq!(top.cell(gridpane::CellCoords::new(1, -1)).unwrap().value, "2");
    assert_eq!(top.cell(gridpane::CellCoords::new(1, 0)).unwrap().value, "1:0");
}

#[test]
fn get_cell_prefers_corners() {
    let grid = frozen_grid().data().drawn();
    let coords = gridpane::CellCoords::new(0, 0);
    assert_eq!(grid.pane_of_cell(coords), Some(PaneKind::TopLeftCorner));
    assert_eq!(
        grid.pane_of_cell(gridpane::CellCoords::new(99, 0)),
        Some(PaneKind::BottomLeftCorner)
    );
    assert_eq!(
        grid.pane_of_cell(gridpane::CellCoords::new(99, 4)),
        Some(PaneKind::Bottom)
    );
    assert_eq!(grid.get_cell(coords).unwrap().value, "0:0");
}

// ============================================================================
// Sizes
// ============================================================================

#[test]
fn clone_sizes_and_corner_ordering() {
    let grid = frozen_grid().drawn();
    // Row header 40 + one 50px column; column header 20 + two 20px rows
    let left = element(&grid, PaneKind::Left);
    let top = element(&grid, PaneKind::Top);
    let bottom = element(&grid, PaneKind::Bottom);
    assert_eq!(left.width, 90.0);
    assert_eq!(top.height, 60.0);
    assert_eq!(bottom.height, 20.0);
    // Workspace 515 minus the vertical scrollbar
    assert_eq!(top.width, 500.0);
    assert_eq!(top.holder_width, top.width);

    let corner = element(&grid, PaneKind::TopLeftCorner);
    assert_eq!((corner.width, corner.height), (left.width, top.height));
    let bottom_corner = element(&grid, PaneKind::BottomLeftCorner);
    assert_eq!(
        (bottom_corner.width, bottom_corner.height),
        (left.width, bottom.height)
    );
}

#[test]
fn content_origin_tracks_window() {
    let mut grid = frozen_grid().drawn();
    grid.scroll_vertical(5).unwrap();
    grid.scroll_horizontal(3).unwrap();
    grid.draw(true).unwrap();

    // Rows 2..7 scrolled past: 5 x 20px; columns 1..4: 3 x 50px
    let master = element(&grid, PaneKind::Master);
    assert_eq!((master.content_left, master.content_top), (150.0, 100.0));
    assert_eq!(element(&grid, PaneKind::Left).content_top, 100.0);
    assert_eq!(element(&grid, PaneKind::Top).content_left, 150.0);
    assert_eq!(element(&grid, PaneKind::Bottom).content_left, 150.0);
}

// ============================================================================
// Positioning strategies
// ============================================================================

#[test]
fn element_strategy_follows_scroll_position() {
    let mut grid = frozen_grid().drawn();
    assert!(!element(&grid, PaneKind::Top).inner_border);

    let geometry = grid.backend_mut().geometry_mut();
    geometry.scroll_top = 140.0;
    geometry.scroll_left = 75.0;
    grid.draw(true).unwrap();

    // Frozen units sit between the headers and the body
    let top = element(&grid, PaneKind::Top);
    assert_eq!(top.top, 140.0);
    assert!(!top.inner_border);
    let left = element(&grid, PaneKind::Left);
    assert_eq!(left.left, 75.0);
    assert!(!left.inner_border);
    let corner = element(&grid, PaneKind::TopLeftCorner);
    assert_eq!((corner.left, corner.top), (75.0, 140.0));
}

#[test]
fn header_only_clones_mark_inner_border_once_scrolled() {
    let mut grid = GridBuilder::new(100, 20)
        .row_headers(1)
        .column_headers(1)
        .drawn();
    assert!(!element(&grid, PaneKind::Top).inner_border);
    assert!(!element(&grid, PaneKind::Left).inner_border);

    grid.backend_mut().geometry_mut().scroll_top = 140.0;
    grid.draw(true).unwrap();
    assert!(element(&grid, PaneKind::Top).inner_border);
    assert!(!element(&grid, PaneKind::Left).inner_border);

    grid.backend_mut().geometry_mut().scroll_left = 75.0;
    grid.draw(true).unwrap();
    assert!(element(&grid, PaneKind::Left).inner_border);
}

#[test]
fn bottom_clone_pins_to_visible_bottom() {
    let mut grid = frozen_grid().drawn();
    // 215px workspace, 15px scrollbar, 20px clone
    let bottom = element(&grid, PaneKind::Bottom);
    assert_eq!(bottom.top, 180.0);
    assert!(bottom.inner_border);

    // Table is 20 + 2000px tall, so the natural position is 2000
    grid.backend_mut().geometry_mut().scroll_top = 1820.0;
    grid.draw(true).unwrap();
    let bottom = element(&grid, PaneKind::Bottom);
    assert_eq!(bottom.top, 2000.0);
    assert!(!bottom.inner_border);
    assert_eq!(element(&grid, PaneKind::BottomLeftCorner).top, 2000.0);
}

#[test]
fn window_strategy_reads_table_rect() {
    let mut grid = frozen_grid().window_container().build();
    grid.backend_mut().geometry_mut().table_rect = Rect::new(0.0, -300.0, 1040.0, 2020.0);
    grid.draw(false).unwrap();

    let top = element(&grid, PaneKind::Top);
    assert_eq!(top.top, 300.0);
    assert!(!top.inner_border);
    assert_eq!(element(&grid, PaneKind::Left).left, 0.0);
    // Window height 215 + 300 scrolled - 20px clone
    assert_eq!(element(&grid, PaneKind::Bottom).top, 495.0);

    // Table scrolled almost out: no room left for the clone
    grid.backend_mut().geometry_mut().table_rect = Rect::new(0.0, -1990.0, 1040.0, 2020.0);
    grid.draw(true).unwrap();
    assert_eq!(element(&grid, PaneKind::Top).top, 0.0);
}

#[test]
fn prevent_overflow_switches_pinned_axis_to_element_strategy() {
    let mut grid = frozen_grid()
        .window_container()
        .settings(|s| s.prevent_overflow = PreventOverflow::Vertical)
        .build();
    let geometry = grid.backend_mut().geometry_mut();
    geometry.table_rect = Rect::new(-120.0, -300.0, 1040.0, 2020.0);
    geometry.scroll_top = 40.0;
    grid.draw(false).unwrap();

    assert_eq!(element(&grid, PaneKind::Top).top, 40.0);
    // Horizontal pinning still uses the window
    assert_eq!(element(&grid, PaneKind::Left).left, 120.0);
}

// ============================================================================
// Change tracking
// ============================================================================

#[test]
fn redraw_without_changes_writes_nothing() {
    let mut grid = frozen_grid().drawn();
    grid.draw(false).unwrap();
    grid.draw(true).unwrap();
    for pane in grid.backend().panes() {
        let committed = grid.backend().pane(pane).unwrap();
        assert_eq!(committed.element_writes, 1, "{pane} element rewritten");
        assert_eq!(committed.fragment_writes, 1, "{pane} fragment rewritten");
    }
}

#[test]
fn scroll_rewrites_only_affected_fragments() {
    let mut grid = frozen_grid().drawn();
    grid.scroll_vertical(5).unwrap();
    grid.draw(true).unwrap();

    let writes = |pane| grid.backend().pane(pane).unwrap().fragment_writes;
    assert_eq!(writes(PaneKind::Master), 2);
    assert_eq!(writes(PaneKind::Left), 2);
    assert_eq!(writes(PaneKind::Top), 1);
    assert_eq!(writes(PaneKind::Bottom), 1);
    assert_eq!(writes(PaneKind::TopLeftCorner), 1);
}

#[test]
fn resize_forces_element_writes() {
    let mut grid = frozen_grid().drawn();
    grid.resize().unwrap();
    assert_eq!(
        grid.backend().pane(PaneKind::Top).unwrap().element_writes,
        2
    );

    grid.backend_mut().geometry_mut().workspace_width = 300.0;
    grid.resize().unwrap();
    assert_eq!(element(&grid, PaneKind::Top).width, 285.0);
}
