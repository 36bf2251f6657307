//! Configuration tests
//!
//! JSON decoding of `SettingsConfig`, conversion to `Settings`, and the
//! validation applied when a grid is created or reconfigured.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::GridBuilder;
use gridpane::settings::{DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};
use gridpane::{
    CellCoords, GridView, GridpaneError, MemoryDom, PaneKind, PreventOverflow, Settings,
    SettingsConfig,
};
use test_case::test_case;

fn grid_from_json(json: &str) -> GridView<MemoryDom> {
    let config = SettingsConfig::from_json(json).unwrap();
    let settings = Settings::from_config(&config);
    GridView::new(settings, MemoryDom::with_workspace(515.0, 215.0)).unwrap()
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn empty_object_uses_defaults() {
    let config = SettingsConfig::from_json("{}").unwrap();
    assert_eq!(config, SettingsConfig::default());
    assert_eq!(config.default_row_height, DEFAULT_ROW_HEIGHT);
    assert_eq!(config.default_column_width, DEFAULT_COLUMN_WIDTH);
    assert_eq!(config.prevent_overflow, PreventOverflow::None);
}

#[test_case("false" => PreventOverflow::None ; "disabled")]
#[test_case("\"horizontal\"" => PreventOverflow::Horizontal ; "horizontal")]
#[test_case("\"vertical\"" => PreventOverflow::Vertical ; "vertical")]
fn prevent_overflow_values(value: &str) -> PreventOverflow {
    let json = format!(r#"{{"preventOverflow": {value}}}"#);
    SettingsConfig::from_json(&json).unwrap().prevent_overflow
}

#[test_case(r#"{"preventOverflow": true}"# ; "true is not an axis")]
#[test_case(r#"{"preventOverflow": "diagonal"}"# ; "unknown axis")]
#[test_case(r#"{"totalRows": -1}"# ; "negative count")]
#[test_case(r#"{"rowHeaders": 3}"# ; "headers not a list")]
#[test_case("{" ; "truncated")]
fn malformed_config_is_rejected(json: &str) {
    assert!(matches!(
        SettingsConfig::from_json(json),
        Err(GridpaneError::Config(_))
    ));
}

#[test]
fn config_serializes_in_camel_case() {
    let config = SettingsConfig {
        total_rows: 10,
        fixed_rows_top: 1,
        prevent_overflow: PreventOverflow::Vertical,
        ..SettingsConfig::default()
    };
    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["totalRows"], 10);
    assert_eq!(json["fixedRowsTop"], 1);
    assert_eq!(json["preventOverflow"], "vertical");

    let back: SettingsConfig = serde_json::from_value(json).unwrap();
    assert_eq!(back, config);
}

// ============================================================================
// Conversion
// ============================================================================

#[test]
fn null_header_labels_generate_numbers_and_letters() {
    let mut grid = grid_from_json(
        r#"{"totalRows": 50, "totalColumns": 30, "rowHeaders": [null], "columnHeaders": [null, "Q1"]}"#,
    );
    grid.draw(false).unwrap();

    let settings = grid.settings();
    assert_eq!(settings.row_header(0, 0).as_deref(), Some("1"));
    assert_eq!(settings.column_header(0, 27).as_deref(), Some("AB"));
    assert_eq!(settings.column_header(1, 27).as_deref(), Some("Q1"));

    // Outer header level sits furthest from the body
    assert_eq!(grid.get_cell(CellCoords::new(-2, 1)).unwrap().value, "B");
    assert_eq!(grid.get_cell(CellCoords::new(-1, 1)).unwrap().value, "Q1");
    assert_eq!(grid.get_cell(CellCoords::new(4, -1)).unwrap().value, "5");
}

#[test]
fn explicit_sizes_shape_the_render_window() {
    let mut grid = grid_from_json(
        r#"{"totalRows": 100, "totalColumns": 10, "rowHeights": [100, 100], "columnWidths": [300, 300]}"#,
    );
    grid.draw(false).unwrap();
    // 200px body holds exactly the two tall rows
    assert_eq!(grid.row_window().count, 2);
    assert_eq!(grid.last_fully_visible_row(), Some(1));
    assert_eq!(grid.column_window().count, 2);
}

#[test]
fn fixed_panes_from_config_create_overlays() {
    let mut grid = grid_from_json(
        r#"{"totalRows": 100, "totalColumns": 10, "fixedRowsTop": 1, "fixedRowsBottom": 1, "fixedColumnsLeft": 2}"#,
    );
    grid.draw(false).unwrap();
    assert_eq!(grid.overlays().len(), 5);
    assert!(grid.overlay(PaneKind::BottomLeftCorner).is_some());
    assert_eq!(grid.row_axis().total(), 99);
    assert_eq!(grid.row_axis().fixed_count(), 1);
}

// ============================================================================
// Validation
// ============================================================================

#[test_case(3, 0, 0 ; "top exceeds rows")]
#[test_case(2, 2, 0 ; "top and bottom exceed rows")]
#[test_case(0, 0, 6 ; "left exceeds columns")]
fn oversized_fixed_panes_are_rejected(top: usize, bottom: usize, left: usize) {
    let mut settings = Settings::new(3, 5);
    settings.fixed_rows_top = top;
    settings.fixed_rows_bottom = bottom;
    settings.fixed_columns_left = left;
    let result = GridView::new(settings, MemoryDom::with_workspace(100.0, 100.0));
    assert!(matches!(result, Err(GridpaneError::Settings(_))));
}

#[test]
fn negative_sizes_are_rejected() {
    let mut settings = Settings::new(10, 10);
    settings.default_column_width = -1.0;
    let err = settings.validate().unwrap_err();
    assert!(err.to_string().contains("defaultColumnWidth"));
}

#[test]
fn rejected_update_keeps_previous_settings() {
    let mut grid = GridBuilder::new(100, 20).fixed(2, 0, 0).drawn();
    let mut settings = grid.settings().clone();
    settings.fixed_rows_top = 200;
    assert!(grid.update_settings(settings).is_err());
    assert_eq!(grid.settings().fixed_rows_top, 2);
    grid.draw(false).unwrap();
    assert!(grid.overlay(PaneKind::Top).is_some());
}

#[test]
fn shrinking_the_grid_reclamps_offsets() {
    let mut grid = GridBuilder::new(100, 20).drawn();
    grid.scroll_horizontal(15).unwrap();
    let mut settings = grid.settings().clone();
    settings.total_columns = 10;
    grid.update_settings(settings).unwrap();
    assert_eq!(grid.column_axis().offset(), 9);
    grid.draw(false).unwrap();
    assert_eq!(grid.column_window().last_index(), Some(9));
}

#[test]
fn updated_sizes_move_the_render_window() {
    let mut grid = GridBuilder::new(100, 20).drawn();
    grid.scroll_vertical(10).unwrap();
    grid.draw(true).unwrap();
    assert_eq!(grid.row_window().start_position_px, 200.0);

    let mut settings = grid.settings().clone();
    settings.default_row_height = 30.0;
    grid.update_settings(settings).unwrap();
    grid.draw(false).unwrap();
    assert_eq!(grid.row_window().start_index, 10);
    assert_eq!(grid.row_window().start_position_px, 300.0);
}
