//! Selection drawing tests
//!
//! Range normalisation, cell and header classes across panes, and border
//! pieces that join into one outline over frozen panes.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::GridBuilder;
use gridpane::render::{BorderRect, MemoryDom};
use gridpane::{CellCoords, CellRange, Corners, GridView, PaneKind, Selection, SelectionStyle};

fn select(grid: &mut GridView<MemoryDom>, style: SelectionStyle, from: (i64, i64), to: (i64, i64)) -> usize {
    let from = CellCoords::new(from.0, from.1);
    let to = CellCoords::new(to.0, to.1);
    let mut selection = Selection::new(style);
    selection.set_range(CellRange::new(from, from, to));
    grid.selections_mut().push(selection)
}

fn has_class(grid: &GridView<MemoryDom>, pane: PaneKind, row: i64, col: i64, class: &str) -> bool {
    grid.backend()
        .pane(pane)
        .unwrap()
        .fragment
        .cell(CellCoords::new(row, col))
        .is_some_and(|cell| cell.has_class(class))
}

fn border_rect(grid: &GridView<MemoryDom>, pane: PaneKind, index: usize) -> Option<BorderRect> {
    grid.backend()
        .border(pane, index)
        .and_then(|border| border.rect().copied())
}

fn edges(rect: &BorderRect) -> (bool, bool, bool, bool) {
    (rect.draw_top, rect.draw_bottom, rect.draw_left, rect.draw_right)
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn inverted_range_uses_normalised_corners() {
    let mut grid = GridBuilder::new(20, 10).build();
    let index = select(&mut grid, SelectionStyle::current(), (5, 5), (2, 2));

    let selection = grid.selections().get(index).unwrap();
    assert_eq!(selection.corners().unwrap().as_tuple(), (2, 2, 5, 5));
    let range = selection.range().unwrap();
    assert_eq!(range.top_left_corner(), CellCoords::new(2, 2));
    assert_eq!(range.bottom_right_corner(), CellCoords::new(5, 5));

    grid.draw(false).unwrap();
    for row in 2..=5 {
        for col in 2..=5 {
            assert!(has_class(&grid, PaneKind::Master, row, col, "current"));
        }
    }
    assert!(!has_class(&grid, PaneKind::Master, 1, 2, "current"));
    assert!(!has_class(&grid, PaneKind::Master, 5, 6, "current"));

    let rect = border_rect(&grid, PaneKind::Master, index).unwrap();
    assert_eq!((rect.x, rect.y, rect.w, rect.h), (100.0, 40.0, 200.0, 80.0));
    assert_eq!(rect.corner, Some((300.0, 120.0)));
}

#[test]
fn empty_grid_draws_selection_without_error() {
    let mut grid = GridBuilder::new(0, 0).build();
    select(&mut grid, SelectionStyle::current(), (0, 0), (0, 0));
    grid.draw(false).unwrap();

    let window = grid.row_window();
    assert_eq!((window.start_index, window.count), (0, 0));
    assert_eq!(window.start_position_px, 0.0);
    assert!(grid.column_window().is_empty());
    assert!(grid.get_cell(CellCoords::new(0, 0)).is_none());
    assert!(border_rect(&grid, PaneKind::Master, 0).is_none());
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn header_highlight_reaches_every_pane() {
    let mut grid = GridBuilder::new(100, 20)
        .fixed(0, 0, 1)
        .row_headers(1)
        .column_headers(1)
        .build();
    select(&mut grid, SelectionStyle::current(), (3, 2), (3, 2));
    grid.draw(false).unwrap();

    assert!(has_class(&grid, PaneKind::Master, -1, 2, "ht__highlight"));
    assert!(has_class(&grid, PaneKind::Left, 3, -1, "ht__highlight"));
    assert!(!has_class(&grid, PaneKind::Left, 4, -1, "ht__highlight"));
    assert!(has_class(&grid, PaneKind::Master, 3, 2, "current"));
    // Column 0 lies outside the range
    assert!(!has_class(&grid, PaneKind::Left, 3, 0, "current"));
    assert!(grid
        .get_cell(CellCoords::new(3, -1))
        .unwrap()
        .has_class("ht__highlight"));
}

#[test]
fn row_highlight_reaches_frozen_columns() {
    let mut grid = GridBuilder::new(100, 20).fixed(0, 0, 1).build();
    let style = SelectionStyle {
        class_name: Some("area".to_string()),
        highlight_row_class: Some("row".to_string()),
        highlight_column_class: Some("col".to_string()),
        ..SelectionStyle::default()
    };
    select(&mut grid, style, (3, 4), (4, 4));
    grid.draw(false).unwrap();

    assert!(has_class(&grid, PaneKind::Left, 3, 0, "row"));
    assert!(has_class(&grid, PaneKind::Left, 4, 0, "row"));
    assert!(has_class(&grid, PaneKind::Master, 0, 4, "col"));
    assert!(has_class(&grid, PaneKind::Master, 4, 4, "area"));
    assert!(!has_class(&grid, PaneKind::Master, 0, 3, "col"));
}

#[test]
fn row_headers_alone_hide_the_left_border() {
    let mut grid = GridBuilder::new(100, 20).row_headers(1).build();
    let index = select(&mut grid, SelectionStyle::current(), (4, 4), (4, 4));
    grid.draw(false).unwrap();

    assert!(has_class(&grid, PaneKind::Left, 4, -1, "ht__highlight"));
    assert!(!grid.borders().get(PaneKind::Left, index).unwrap().is_visible());
    assert!(border_rect(&grid, PaneKind::Left, index).is_none());
    assert!(border_rect(&grid, PaneKind::Master, index).is_some());
}

#[test]
fn clearing_selection_removes_classes_and_border() {
    let mut grid = GridBuilder::new(100, 20).build();
    let index = select(&mut grid, SelectionStyle::current(), (2, 2), (3, 3));
    grid.draw(false).unwrap();
    assert!(border_rect(&grid, PaneKind::Master, index).is_some());

    grid.selections_mut().get_mut(index).unwrap().clear();
    grid.draw(true).unwrap();
    assert!(!has_class(&grid, PaneKind::Master, 2, 2, "current"));
    assert!(border_rect(&grid, PaneKind::Master, index).is_none());
    assert_eq!(
        grid.backend().pane(PaneKind::Master).unwrap().fragment_writes,
        2
    );
}

// ============================================================================
// Borders
// ============================================================================

#[test]
fn border_edges_join_across_frozen_panes() {
    let mut grid = GridBuilder::new(100, 20).fixed(2, 0, 1).build();
    let index = select(&mut grid, SelectionStyle::current(), (1, 0), (3, 2));
    grid.draw(false).unwrap();

    let corner = border_rect(&grid, PaneKind::TopLeftCorner, index).unwrap();
    assert_eq!(edges(&corner), (true, false, true, false));
    assert_eq!(corner.corner, None);

    let top = border_rect(&grid, PaneKind::Top, index).unwrap();
    assert_eq!(edges(&top), (true, false, true, true));

    let left = border_rect(&grid, PaneKind::Left, index).unwrap();
    assert_eq!(edges(&left), (true, true, true, false));

    let master = border_rect(&grid, PaneKind::Master, index).unwrap();
    assert_eq!(edges(&master), (true, true, true, true));
    assert!(master.corner.is_some());
}

#[test]
fn border_hides_when_range_scrolls_out() {
    let mut grid = GridBuilder::new(100, 20).build();
    let index = select(&mut grid, SelectionStyle::current(), (2, 2), (2, 2));
    grid.draw(false).unwrap();
    assert!(border_rect(&grid, PaneKind::Master, index).is_some());

    grid.scroll_vertical(50).unwrap();
    grid.draw(true).unwrap();
    assert!(border_rect(&grid, PaneKind::Master, index).is_none());
    assert!(!has_class(&grid, PaneKind::Master, 2, 2, "current"));

    grid.scroll_vertical(-50).unwrap();
    grid.draw(true).unwrap();
    assert!(border_rect(&grid, PaneKind::Master, index).is_some());
}

#[test]
fn layers_get_separate_borders() {
    let mut grid = GridBuilder::new(100, 20).build();
    let current = select(&mut grid, SelectionStyle::current(), (1, 1), (1, 1));
    let area = select(&mut grid, SelectionStyle::area(), (1, 1), (3, 3));
    grid.draw(false).unwrap();

    let current_border = grid.backend().border(PaneKind::Master, current).unwrap();
    let area_border = grid.backend().border(PaneKind::Master, area).unwrap();
    assert_eq!(current_border.spec().width, 2.0);
    assert_eq!(area_border.spec().width, 1.0);
    assert!(area_border.rect().unwrap().corner.is_none());
    assert!(has_class(&grid, PaneKind::Master, 1, 1, "current"));
    assert!(has_class(&grid, PaneKind::Master, 1, 1, "area"));
}

#[test]
fn before_draw_borders_hook_sees_each_drawn_pane() {
    let mut grid = GridBuilder::new(100, 20).fixed(1, 0, 0).build();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    grid.hooks_mut().on_before_draw_borders = Some(Box::new(move |corners: Corners, class: &str| {
        sink.borrow_mut().push((corners.as_tuple(), class.to_string()));
    }));
    select(&mut grid, SelectionStyle::area(), (3, 3), (0, 1));
    grid.draw(false).unwrap();

    // Master and the top clone both render part of the range
    let expected = ((0, 1, 3, 3), "area".to_string());
    assert_eq!(*seen.borrow(), vec![expected.clone(), expected]);
}
