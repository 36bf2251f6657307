//! Scroll controller tests
//!
//! Delta scrolling, reverse-render boundaries, scroll-to-cell movement and the
//! native scroll position sync.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{GridBuilder, ScrollLog};
use gridpane::render::{MemoryDom, Rect};
use gridpane::{Axis, CellCoords, GridView, GridpaneError, PaneKind};
use test_case::test_case;

/// 100 rows of 20px over a 200px body, 5 columns that fit without scrolling.
fn tall_grid() -> GridBuilder {
    GridBuilder::new(100, 5).workspace(265.0, 200.0)
}

// ============================================================================
// Delta scrolling
// ============================================================================

#[test]
fn overshoot_pins_last_offset_and_reverses() {
    let mut grid = tall_grid().drawn();
    grid.scroll_vertical(95).unwrap();
    assert_eq!(grid.row_axis().offset(), 95);
    assert!(!grid.row_axis().is_reverse());

    assert!(grid.scroll_vertical(50).unwrap());
    assert_eq!(grid.row_axis().offset(), 99);
    assert!(grid.row_axis().is_reverse());

    grid.draw(true).unwrap();
    let window = grid.row_window();
    assert_eq!(window.last_index(), Some(99));
    assert_eq!(window.start_index, 90);
    assert_eq!(window.start_position_px, 1800.0);
}

#[test_case(100, 0, 0, 100 => (99, true) ; "exact end")]
#[test_case(100, 3, 0, 97 => (96, true) ; "end past fixed rows")]
#[test_case(100, 3, 0, 96 => (96, false) ; "one short of end")]
#[test_case(10, 0, 5, -20 => (0, false) ; "clamped at zero")]
#[test_case(10, 0, 0, 3 => (3, false) ; "plain forward")]
fn scroll_axis_boundaries(total: usize, fixed: usize, start: i64, delta: i64) -> (usize, bool) {
    let mut grid = GridBuilder::new(total, 5)
        .workspace(265.0, 200.0)
        .fixed(fixed, 0, 0)
        .drawn();
    grid.scroll_vertical(start).unwrap();
    grid.scroll_vertical(delta).unwrap();
    (grid.row_axis().offset(), grid.row_axis().is_reverse())
}

#[test]
fn scrolling_back_from_reverse_moves_from_visible_start() {
    let mut grid = tall_grid().drawn();
    grid.scroll_vertical(1000).unwrap();
    grid.draw(true).unwrap();

    grid.scroll_vertical(-3).unwrap();
    assert!(!grid.row_axis().is_reverse());
    assert_eq!(grid.row_axis().offset(), 87);
}

#[test]
fn forward_delta_keeps_reverse_flag_at_end() {
    let mut grid = tall_grid().drawn();
    grid.scroll_vertical(1000).unwrap();
    assert!(!grid.scroll_vertical(0).unwrap());
    assert!(grid.row_axis().is_reverse());
}

#[test]
fn scroll_hooks_fire_only_on_change() {
    let mut grid = tall_grid().drawn();
    let log = ScrollLog::attach(&mut grid);
    grid.scroll_vertical(3).unwrap();
    grid.scroll_vertical(0).unwrap();
    grid.scroll_horizontal(-1).unwrap();
    grid.scroll_horizontal(2).unwrap();
    assert_eq!(log.calls(), vec![Axis::Vertical, Axis::Horizontal]);
}

#[test]
fn scroll_requires_first_draw() {
    let mut grid = tall_grid().build();
    assert!(matches!(
        grid.scroll_horizontal(1),
        Err(GridpaneError::ScrollBeforeRender)
    ));
    assert!(matches!(
        grid.scroll_to_cell(CellCoords::new(3, 3)),
        Err(GridpaneError::ScrollBeforeRender)
    ));
}

// ============================================================================
// Scroll to cell
// ============================================================================

#[test]
fn scroll_to_cell_validates_coordinates() {
    let mut grid = tall_grid().drawn();
    assert!(matches!(
        grid.scroll_to_cell(CellCoords::new(100, 0)),
        Err(GridpaneError::RowOutOfRange { row: 100, total: 100 })
    ));
    assert!(matches!(
        grid.scroll_to_cell(CellCoords::new(0, -1)),
        Err(GridpaneError::ColumnOutOfRange { col: -1, total: 5 })
    ));
    assert!(matches!(
        grid.scroll_to_cell(CellCoords::new(0, 5)),
        Err(GridpaneError::ColumnOutOfRange { col: 5, total: 5 })
    ));
}

#[test]
fn horizontal_scroll_to_cell_settles_left() {
    // Five 50px columns over a 120px body
    let mut grid = GridBuilder::new(3, 5)
        .workspace(120.0, 200.0)
        .column_widths(vec![50.0; 5])
        .drawn();
    assert_eq!(grid.last_fully_visible_column(), Some(1));

    assert!(grid.scroll_to_cell(CellCoords::new(0, 4)).unwrap());
    assert_eq!(grid.column_axis().offset(), 2);

    grid.draw(true).unwrap();
    assert_eq!(grid.column_window().start_index, 2);
    assert_eq!(grid.last_fully_visible_column(), Some(4));
}

#[test]
fn vertical_scroll_to_cell_has_no_settle_pass() {
    // 50px body: two full rows and a partial third
    let mut grid = tall_grid().workspace(265.0, 50.0).drawn();
    assert_eq!(grid.last_fully_visible_row(), Some(1));

    grid.scroll_to_cell(CellCoords::new(10, 0)).unwrap();
    assert_eq!(grid.row_axis().offset(), 9);
    assert!(!grid.row_axis().is_reverse());
}

#[test]
fn partially_visible_target_scrolls_into_view() {
    let mut grid = tall_grid().workspace(265.0, 50.0).drawn();
    assert_eq!(grid.last_visible_row(), Some(2));

    assert!(grid.scroll_to_cell(CellCoords::new(2, 0)).unwrap());
    assert_eq!(grid.row_axis().offset(), 1);
}

#[test]
fn target_before_window_becomes_offset() {
    let mut grid = tall_grid().drawn();
    grid.scroll_vertical(40).unwrap();
    grid.draw(true).unwrap();

    assert!(grid.scroll_to_cell(CellCoords::new(12, 0)).unwrap());
    assert_eq!(grid.row_axis().offset(), 12);
}

#[test]
fn visible_and_fixed_targets_do_not_move() {
    let mut grid = tall_grid().fixed(2, 1, 0).drawn();
    grid.scroll_vertical(10).unwrap();
    grid.draw(true).unwrap();
    let log = ScrollLog::attach(&mut grid);

    // Fixed top, fixed bottom, and a fully visible body row
    assert!(!grid.scroll_to_cell(CellCoords::new(1, 0)).unwrap());
    assert!(!grid.scroll_to_cell(CellCoords::new(99, 0)).unwrap());
    assert!(!grid.scroll_to_cell(CellCoords::new(13, 0)).unwrap());
    assert_eq!(grid.row_axis().offset(), 10);
    assert!(log.calls().is_empty());
}

#[test]
fn scroll_to_last_row_marks_reverse() {
    let mut grid = tall_grid().drawn();
    grid.scroll_to_cell(CellCoords::new(99, 0)).unwrap();
    assert!(grid.row_axis().is_reverse());
    grid.draw(true).unwrap();
    assert_eq!(grid.row_window().start_index, 90);
    assert_eq!(grid.last_fully_visible_row(), Some(99));
}

#[test]
fn tall_last_row_keeps_target_in_forward_window() {
    // Row 99 alone is taller than the 210px body
    let mut heights = vec![20.0; 99];
    heights.push(500.0);
    let mut grid = tall_grid().workspace(265.0, 210.0).row_heights(heights).drawn();

    grid.scroll_to_cell(CellCoords::new(98, 0)).unwrap();
    assert_eq!(grid.row_axis().offset(), 89);
    assert!(!grid.row_axis().is_reverse());

    grid.draw(true).unwrap();
    let window = grid.row_window();
    assert_eq!(window.start_index, 89);
    assert!(window.contains(98));
    assert_eq!(grid.last_fully_visible_row(), Some(98));
}

// ============================================================================
// Native scroll position
// ============================================================================

#[test]
fn viewport_scroll_writes_native_position() {
    let mut grid = tall_grid().drawn();
    grid.scroll_viewport_to(CellCoords::new(99, 0)).unwrap();
    // 2000px of rows, 200px visible
    assert_eq!(grid.backend().geometry().scroll_top, 1800.0);

    grid.scroll_viewport_to(CellCoords::new(5, 0)).unwrap();
    assert_eq!(grid.row_axis().offset(), 5);
    assert_eq!(grid.backend().geometry().scroll_top, 100.0);
}

#[test]
fn viewport_scroll_goes_through_top_overlay() {
    let mut grid = tall_grid().fixed(1, 0, 0).drawn();
    assert!(grid.overlay(PaneKind::Top).is_some());
    grid.scroll_viewport_to(CellCoords::new(50, 0)).unwrap();
    let offset = grid.row_axis().offset();
    // Scroll position counts from the end of the fixed pane
    assert_eq!(grid.backend().geometry().scroll_top, offset as f32 * 20.0);
}

#[test]
fn native_scroll_round_trips() {
    let mut grid = tall_grid().drawn();
    grid.scroll_viewport_to(CellCoords::new(40, 0)).unwrap();
    let offset = grid.row_axis().offset();

    // Re-reading the position that was just written changes nothing
    assert!(!grid.on_native_scroll().unwrap());
    assert_eq!(grid.row_axis().offset(), offset);
}

#[test]
fn native_scroll_before_draw_is_ignored() {
    let mut grid = tall_grid().build();
    assert!(!grid.on_native_scroll().unwrap());
}

// ============================================================================
// Window container
// ============================================================================

/// Page-scrolled grid whose table starts 300px down the page.
fn page_grid() -> GridView<MemoryDom> {
    let mut grid = tall_grid().window_container().build();
    grid.backend_mut().geometry_mut().table_rect = Rect::new(0.0, 300.0, 250.0, 2000.0);
    grid.draw(false).unwrap();
    grid
}

#[test]
fn window_scroll_is_read_from_the_table_box() {
    let mut grid = page_grid();
    let geometry = grid.backend_mut().geometry_mut();
    geometry.scroll_top = 400.0;
    geometry.table_rect = Rect::new(0.0, -100.0, 250.0, 2000.0);

    assert!(grid.on_native_scroll().unwrap());
    assert_eq!(grid.row_axis().offset(), 5);
    assert_eq!(grid.row_window().start_index, 5);
}

#[test]
fn window_above_the_table_keeps_the_first_row() {
    let mut grid = page_grid();
    grid.backend_mut().geometry_mut().scroll_top = 250.0;
    grid.backend_mut().geometry_mut().table_rect = Rect::new(0.0, 50.0, 250.0, 2000.0);

    assert!(!grid.on_native_scroll().unwrap());
    assert_eq!(grid.row_axis().offset(), 0);
}

#[test]
fn window_scroll_write_adds_the_table_page_offset() {
    let mut grid = page_grid();
    grid.scroll_viewport_to(CellCoords::new(50, 0)).unwrap();
    assert_eq!(grid.row_axis().offset(), 41);
    // 41 rows of 20px below a table at page y=300
    assert_eq!(grid.backend().geometry().scroll_top, 1120.0);
    assert_eq!(grid.backend().geometry().table_rect.top(), -820.0);

    // Reading back the written position is stable
    assert!(!grid.on_native_scroll().unwrap());
    assert_eq!(grid.row_axis().offset(), 41);
}
