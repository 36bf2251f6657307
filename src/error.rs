//! Structured error types for gridpane.
//!
//! Only precondition violations are errors. Degenerate inputs (empty grids,
//! unchanged scroll targets, detached roots) are handled silently by the
//! components that meet them.

use crate::layout::Axis;

/// All errors that can abort a gridpane draw or scroll cycle.
#[derive(Debug, thiserror::Error)]
pub enum GridpaneError {
    /// A scroll was requested before the first draw established the render windows.
    #[error("scroll requested before initial render")]
    ScrollBeforeRender,

    /// A row coordinate outside `[0, total_rows - 1]`.
    #[error("row {row} does not exist (total rows: {total})")]
    RowOutOfRange { row: i64, total: usize },

    /// A column coordinate outside `[0, total_columns - 1]`.
    #[error("column {col} does not exist (total columns: {total})")]
    ColumnOutOfRange { col: i64, total: usize },

    /// The render calculator produced a start position that is not a finite number
    /// while the axis is not empty.
    #[error("render calculator produced a non-numeric start position on the {axis} axis")]
    NonNumericStartPosition { axis: Axis },

    /// A draw was started from inside another draw.
    #[error("draw requested while a draw is in progress")]
    ReentrantDraw,

    /// Settings that cannot describe a grid (fixed panes larger than the grid, ...).
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// Configuration JSON could not be decoded.
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),

    /// DOM operation failure reported by a backend.
    #[error("DOM error: {0}")]
    Dom(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridpaneError>;

#[cfg(target_arch = "wasm32")]
impl From<GridpaneError> for wasm_bindgen::JsValue {
    fn from(e: GridpaneError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for GridpaneError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn precondition_messages() {
        assert_eq!(
            GridpaneError::ScrollBeforeRender.to_string(),
            "scroll requested before initial render"
        );
        assert_eq!(
            GridpaneError::RowOutOfRange { row: 12, total: 10 }.to_string(),
            "row 12 does not exist (total rows: 10)"
        );
        assert_eq!(
            GridpaneError::NonNumericStartPosition {
                axis: Axis::Horizontal
            }
            .to_string(),
            "render calculator produced a non-numeric start position on the horizontal axis"
        );
    }

    #[test]
    fn config_errors_convert() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: GridpaneError = err.into();
        assert!(matches!(err, GridpaneError::Config(_)));
    }
}
