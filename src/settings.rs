//! Settings resolver: the single source of truth consulted by every component.
//!
//! Values that may be either a constant or a per-index callback are modelled with
//! [`IndexValue`] instead of duck typing. `SettingsConfig` is the serde-facing
//! constant subset used to build `Settings` from JSON or a JavaScript object.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{GridpaneError, Result};
use crate::layout::Axis;
use crate::types::Corners;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 23.0;

/// Default column width in pixels.
pub const DEFAULT_COLUMN_WIDTH: f32 = 50.0;

/// Default width of one row-header column in pixels.
pub const DEFAULT_ROW_HEADER_WIDTH: f32 = 50.0;

/// Default height of one column-header row in pixels.
pub const DEFAULT_COLUMN_HEADER_HEIGHT: f32 = 23.0;

/// Either a constant or a callback resolved per index.
pub enum IndexValue<T> {
    Value(T),
    Fn(Rc<dyn Fn(usize) -> T>),
}

impl<T: Clone> IndexValue<T> {
    pub fn from_fn(f: impl Fn(usize) -> T + 'static) -> Self {
        Self::Fn(Rc::new(f))
    }

    pub fn resolve(&self, index: usize) -> T {
        match self {
            Self::Value(v) => v.clone(),
            Self::Fn(f) => f(index),
        }
    }
}

impl<T: Clone> Clone for IndexValue<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Fn(f) => Self::Fn(Rc::clone(f)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IndexValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

impl<T> From<T> for IndexValue<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

/// Which axis, if any, must never overflow into the window's own scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "PreventOverflowRaw", into = "PreventOverflowRaw")]
pub enum PreventOverflow {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl PreventOverflow {
    /// True when overlays scrolling along `axis` must not use the window strategy.
    pub fn blocks(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Self::Horizontal, Axis::Horizontal) | (Self::Vertical, Axis::Vertical)
        )
    }
}

/// Wire form: `false`, `"horizontal"` or `"vertical"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PreventOverflowRaw {
    Flag(bool),
    Axis(String),
}

impl TryFrom<PreventOverflowRaw> for PreventOverflow {
    type Error = String;

    fn try_from(raw: PreventOverflowRaw) -> std::result::Result<Self, Self::Error> {
        match raw {
            PreventOverflowRaw::Flag(false) => Ok(Self::None),
            PreventOverflowRaw::Flag(true) => {
                Err("preventOverflow must be false, \"horizontal\" or \"vertical\"".to_string())
            }
            PreventOverflowRaw::Axis(s) => match s.as_str() {
                "horizontal" => Ok(Self::Horizontal),
                "vertical" => Ok(Self::Vertical),
                other => Err(format!("unknown preventOverflow value: {other}")),
            },
        }
    }
}

impl From<PreventOverflow> for PreventOverflowRaw {
    fn from(value: PreventOverflow) -> Self {
        match value {
            PreventOverflow::None => Self::Flag(false),
            PreventOverflow::Horizontal => Self::Axis("horizontal".to_string()),
            PreventOverflow::Vertical => Self::Axis("vertical".to_string()),
        }
    }
}

/// Convert a 0-based column index to spreadsheet letters (A, B, ..., Z, AA, AB, ...)
pub fn col_to_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col + 1;
    while n > 0 {
        n -= 1;
        let digit = u8::try_from(n % 26).unwrap_or(0);
        result.insert(0, char::from(b'A' + digit));
        n /= 26;
    }
    result
}

/// Read accessors over the grid configuration.
#[derive(Clone)]
pub struct Settings {
    pub total_rows: usize,
    pub total_columns: usize,
    pub fixed_rows_top: usize,
    pub fixed_rows_bottom: usize,
    pub fixed_columns_left: usize,
    /// One entry per row-header column, outermost first
    pub row_headers: Vec<IndexValue<String>>,
    /// One entry per column-header row, outermost first
    pub column_headers: Vec<IndexValue<String>>,
    pub row_height: Option<IndexValue<f32>>,
    pub column_width: Option<IndexValue<f32>>,
    pub default_row_height: f32,
    pub default_column_width: f32,
    pub row_header_width: f32,
    pub column_header_height: f32,
    pub prevent_overflow: PreventOverflow,
    /// Data access, `None` renders empty cells
    pub cell_value: Option<Rc<dyn Fn(usize, usize) -> String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_rows: 0,
            total_columns: 0,
            fixed_rows_top: 0,
            fixed_rows_bottom: 0,
            fixed_columns_left: 0,
            row_headers: Vec::new(),
            column_headers: Vec::new(),
            row_height: None,
            column_width: None,
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            row_header_width: DEFAULT_ROW_HEADER_WIDTH,
            column_header_height: DEFAULT_COLUMN_HEADER_HEIGHT,
            prevent_overflow: PreventOverflow::None,
            cell_value: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("total_rows", &self.total_rows)
            .field("total_columns", &self.total_columns)
            .field("fixed_rows_top", &self.fixed_rows_top)
            .field("fixed_rows_bottom", &self.fixed_rows_bottom)
            .field("fixed_columns_left", &self.fixed_columns_left)
            .field("row_headers", &self.row_headers.len())
            .field("column_headers", &self.column_headers.len())
            .field("row_height", &self.row_height)
            .field("column_width", &self.column_width)
            .field("prevent_overflow", &self.prevent_overflow)
            .finish_non_exhaustive()
    }
}

impl Settings {
    pub fn new(total_rows: usize, total_columns: usize) -> Self {
        Self {
            total_rows,
            total_columns,
            ..Self::default()
        }
    }

    /// Build from the serde configuration.
    pub fn from_config(config: &SettingsConfig) -> Self {
        let row_height = (!config.row_heights.is_empty()).then(|| {
            let heights = Rc::new(config.row_heights.clone());
            let fallback = config.default_row_height;
            IndexValue::from_fn(move |i| heights.get(i).copied().unwrap_or(fallback))
        });
        let column_width = (!config.column_widths.is_empty()).then(|| {
            let widths = Rc::new(config.column_widths.clone());
            let fallback = config.default_column_width;
            IndexValue::from_fn(move |i| widths.get(i).copied().unwrap_or(fallback))
        });

        Self {
            total_rows: config.total_rows,
            total_columns: config.total_columns,
            fixed_rows_top: config.fixed_rows_top,
            fixed_rows_bottom: config.fixed_rows_bottom,
            fixed_columns_left: config.fixed_columns_left,
            row_headers: config
                .row_headers
                .iter()
                .map(|label| match label {
                    Some(text) => IndexValue::Value(text.clone()),
                    None => IndexValue::from_fn(|i| (i + 1).to_string()),
                })
                .collect(),
            column_headers: config
                .column_headers
                .iter()
                .map(|label| match label {
                    Some(text) => IndexValue::Value(text.clone()),
                    None => IndexValue::from_fn(col_to_letter),
                })
                .collect(),
            row_height,
            column_width,
            default_row_height: config.default_row_height,
            default_column_width: config.default_column_width,
            row_header_width: config.row_header_width,
            column_header_height: config.column_header_height,
            prevent_overflow: config.prevent_overflow,
            cell_value: None,
        }
    }

    /// Reject configurations no grid can satisfy.
    ///
    /// # Errors
    /// Returns `GridpaneError::Settings` when fixed panes exceed the grid or sizes
    /// are negative.
    pub fn validate(&self) -> Result<()> {
        if self.fixed_columns_left > self.total_columns {
            return Err(GridpaneError::Settings(format!(
                "fixedColumnsLeft ({}) exceeds totalColumns ({})",
                self.fixed_columns_left, self.total_columns
            )));
        }
        if self.fixed_rows_top + self.fixed_rows_bottom > self.total_rows {
            return Err(GridpaneError::Settings(format!(
                "fixedRowsTop + fixedRowsBottom ({}) exceeds totalRows ({})",
                self.fixed_rows_top + self.fixed_rows_bottom,
                self.total_rows
            )));
        }
        for (name, value) in [
            ("defaultRowHeight", self.default_row_height),
            ("defaultColumnWidth", self.default_column_width),
            ("rowHeaderWidth", self.row_header_width),
            ("columnHeaderHeight", self.column_header_height),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(GridpaneError::Settings(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn row_height(&self, row: usize) -> f32 {
        self.row_height
            .as_ref()
            .map_or(self.default_row_height, |h| h.resolve(row))
    }

    pub fn column_width(&self, col: usize) -> f32 {
        self.column_width
            .as_ref()
            .map_or(self.default_column_width, |w| w.resolve(col))
    }

    /// Size of unit `index` along `axis` (row height or column width).
    pub fn size_of(&self, axis: Axis, index: usize) -> f32 {
        match axis {
            Axis::Vertical => self.row_height(index),
            Axis::Horizontal => self.column_width(index),
        }
    }

    pub fn total(&self, axis: Axis) -> usize {
        match axis {
            Axis::Vertical => self.total_rows,
            Axis::Horizontal => self.total_columns,
        }
    }

    /// Leading fixed count along `axis` (fixed top rows or fixed left columns).
    pub fn fixed_leading(&self, axis: Axis) -> usize {
        match axis {
            Axis::Vertical => self.fixed_rows_top,
            Axis::Horizontal => self.fixed_columns_left,
        }
    }

    /// Trailing fixed count along `axis`; only rows have a trailing pane.
    pub fn fixed_trailing(&self, axis: Axis) -> usize {
        match axis {
            Axis::Vertical => self.fixed_rows_bottom,
            Axis::Horizontal => 0,
        }
    }

    pub fn row_header_count(&self) -> usize {
        self.row_headers.len()
    }

    pub fn column_header_count(&self) -> usize {
        self.column_headers.len()
    }

    pub fn has_row_headers(&self) -> bool {
        !self.row_headers.is_empty()
    }

    pub fn has_column_headers(&self) -> bool {
        !self.column_headers.is_empty()
    }

    /// Label of row-header column `level` for `row`.
    pub fn row_header(&self, level: usize, row: usize) -> Option<String> {
        self.row_headers.get(level).map(|h| h.resolve(row))
    }

    /// Label of column-header row `level` for `col`.
    pub fn column_header(&self, level: usize, col: usize) -> Option<String> {
        self.column_headers.get(level).map(|h| h.resolve(col))
    }

    /// Total width of the row-header band.
    pub fn row_headers_width(&self) -> f32 {
        header_band(self.row_header_count(), self.row_header_width)
    }

    /// Total height of the column-header band.
    pub fn column_headers_height(&self) -> f32 {
        header_band(self.column_header_count(), self.column_header_height)
    }

    pub fn cell_value(&self, row: usize, col: usize) -> String {
        self.cell_value
            .as_ref()
            .map(|f| f(row, col))
            .unwrap_or_default()
    }
}

fn header_band(count: usize, size: f32) -> f32 {
    size * count as f32
}

/// Constant configuration, deserialisable from JSON or a JavaScript object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsConfig {
    pub total_rows: usize,
    pub total_columns: usize,
    pub fixed_rows_top: usize,
    pub fixed_rows_bottom: usize,
    pub fixed_columns_left: usize,
    /// One entry per header column; `null` means row numbers
    pub row_headers: Vec<Option<String>>,
    /// One entry per header row; `null` means spreadsheet letters
    pub column_headers: Vec<Option<String>>,
    /// Explicit heights by row index, rows past the end use the default
    pub row_heights: Vec<f32>,
    /// Explicit widths by column index, columns past the end use the default
    pub column_widths: Vec<f32>,
    pub default_row_height: f32,
    pub default_column_width: f32,
    pub row_header_width: f32,
    pub column_header_height: f32,
    pub prevent_overflow: PreventOverflow,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            total_rows: 0,
            total_columns: 0,
            fixed_rows_top: 0,
            fixed_rows_bottom: 0,
            fixed_columns_left: 0,
            row_headers: Vec::new(),
            column_headers: Vec::new(),
            row_heights: Vec::new(),
            column_widths: Vec::new(),
            default_row_height: DEFAULT_ROW_HEIGHT,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            row_header_width: DEFAULT_ROW_HEADER_WIDTH,
            column_header_height: DEFAULT_COLUMN_HEADER_HEIGHT,
            prevent_overflow: PreventOverflow::None,
        }
    }
}

impl SettingsConfig {
    /// Decode a JSON configuration.
    ///
    /// # Errors
    /// Returns `GridpaneError::Config` on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Kind of draw that just completed, passed to `Hooks::on_draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// Fragments were rebuilt
    Full,
    /// Only positions and classes were refreshed
    Fast,
}

/// Callbacks fired synchronously during draw and scroll. Return values are ignored.
#[derive(Default)]
pub struct Hooks {
    pub on_before_draw_borders: Option<Box<dyn FnMut(Corners, &str)>>,
    pub on_scroll_horizontally: Option<Box<dyn FnMut()>>,
    pub on_scroll_vertically: Option<Box<dyn FnMut()>>,
    pub on_draw: Option<Box<dyn FnMut(DrawKind)>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field(
                "on_before_draw_borders",
                &self.on_before_draw_borders.is_some(),
            )
            .field(
                "on_scroll_horizontally",
                &self.on_scroll_horizontally.is_some(),
            )
            .field("on_scroll_vertically", &self.on_scroll_vertically.is_some())
            .field("on_draw", &self.on_draw.is_some())
            .finish()
    }
}

impl Hooks {
    pub(crate) fn before_draw_borders(&mut self, corners: Corners, class_name: &str) {
        if let Some(hook) = self.on_before_draw_borders.as_mut() {
            hook(corners, class_name);
        }
    }

    pub(crate) fn scrolled(&mut self, axis: Axis) {
        let hook = match axis {
            Axis::Vertical => self.on_scroll_vertically.as_mut(),
            Axis::Horizontal => self.on_scroll_horizontally.as_mut(),
        };
        if let Some(hook) = hook {
            hook();
        }
    }

    pub(crate) fn drawn(&mut self, kind: DrawKind) {
        if let Some(hook) = self.on_draw.as_mut() {
            hook(kind);
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

    #[test]
    fn index_value_resolves_both_forms() {
        let constant: IndexValue<f32> = IndexValue::Value(30.0);
        let callback = IndexValue::from_fn(|i| if i % 2 == 0 { 10.0 } else { 20.0 });
        assert_eq!(constant.resolve(7), 30.0);
        assert_eq!(callback.resolve(2), 10.0);
        assert_eq!(callback.resolve(3), 20.0);
    }

    #[test]
    fn sizes_fall_back_to_defaults() {
        let mut settings = Settings::new(10, 10);
        assert_eq!(settings.row_height(3), DEFAULT_ROW_HEIGHT);
        assert_eq!(settings.column_width(3), DEFAULT_COLUMN_WIDTH);
        settings.column_width = Some(IndexValue::from_fn(|c| 10.0 * (c as f32 + 1.0)));
        assert_eq!(settings.size_of(Axis::Horizontal, 2), 30.0);
        assert_eq!(settings.size_of(Axis::Vertical, 2), DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn column_letters() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
    }

    #[test]
    fn config_from_json() {
        let config = SettingsConfig::from_json(
            r#"{
                "totalRows": 100,
                "totalColumns": 5,
                "fixedRowsTop": 2,
                "rowHeaders": [null],
                "columnHeaders": [null, "Group"],
                "columnWidths": [80, 40],
                "preventOverflow": "horizontal"
            }"#,
        )
        .unwrap();
        assert_eq!(config.prevent_overflow, PreventOverflow::Horizontal);

        let settings = Settings::from_config(&config);
        assert_eq!(settings.total_rows, 100);
        assert_eq!(settings.fixed_rows_top, 2);
        assert_eq!(settings.row_header(0, 4).as_deref(), Some("5"));
        assert_eq!(settings.column_header(0, 27).as_deref(), Some("AB"));
        assert_eq!(settings.column_header(1, 3).as_deref(), Some("Group"));
        assert_eq!(settings.column_width(0), 80.0);
        assert_eq!(settings.column_width(1), 40.0);
        assert_eq!(settings.column_width(4), DEFAULT_COLUMN_WIDTH);
        assert_eq!(settings.column_headers_height(), 2.0 * DEFAULT_COLUMN_HEADER_HEIGHT);
    }

    #[test]
    fn prevent_overflow_wire_forms() {
        let parsed: PreventOverflow = serde_json::from_str("false").unwrap();
        assert_eq!(parsed, PreventOverflow::None);
        assert!(serde_json::from_str::<PreventOverflow>("\"diagonal\"").is_err());
        assert!(serde_json::from_str::<PreventOverflow>("true").is_err());
        assert!(PreventOverflow::Vertical.blocks(Axis::Vertical));
        assert!(!PreventOverflow::Vertical.blocks(Axis::Horizontal));
        assert_eq!(
            serde_json::to_string(&PreventOverflow::Vertical).unwrap(),
            "\"vertical\""
        );
    }

    #[test]
    fn validate_rejects_oversized_panes() {
        let mut settings = Settings::new(5, 3);
        settings.fixed_rows_top = 3;
        settings.fixed_rows_bottom = 3;
        assert!(matches!(
            settings.validate(),
            Err(GridpaneError::Settings(_))
        ));
        settings.fixed_rows_bottom = 2;
        assert!(settings.validate().is_ok());
        settings.fixed_columns_left = 4;
        assert!(settings.validate().is_err());
        settings.fixed_columns_left = 0;
        settings.default_row_height = f32::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn hooks_fire_per_axis() {
        use std::cell::Cell;
        let vertical = Rc::new(Cell::new(0));
        let v = Rc::clone(&vertical);
        let mut hooks = Hooks {
            on_scroll_vertically: Some(Box::new(move || v.set(v.get() + 1))),
            ..Hooks::default()
        };
        hooks.scrolled(Axis::Vertical);
        hooks.scrolled(Axis::Horizontal);
        assert_eq!(vertical.get(), 1);
    }
}
