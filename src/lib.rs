//! gridpane - virtualised viewport engine for spreadsheet grids
//!
//! Renders only the rows and columns that fit the visible area and keeps
//! frozen panes pinned while the body scrolls:
//! - Forward and end-pinned render windows over non-uniform sizes
//! - Top, bottom and left frozen panes plus their corner intersections
//! - Scroll-to-cell with minimal movement, native scrollbar sync
//! - Selection classes and borders reconciled in every pane
//! - DOM access behind a backend trait (in-memory or `web-sys`)
//!
//! # Usage (Rust)
//!
//! ```
//! use gridpane::{CellCoords, GridView, MemoryDom, Settings};
//!
//! let mut settings = Settings::new(1000, 50);
//! settings.fixed_rows_top = 1;
//! let mut grid = GridView::new(settings, MemoryDom::with_workspace(800.0, 600.0))?;
//! grid.draw(false)?;
//! grid.scroll_viewport_to(CellCoords::new(500, 20))?;
//! assert!(grid.last_fully_visible_row() >= Some(500));
//! # Ok::<(), gridpane::GridpaneError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WebGrid } from 'gridpane';
//! await init();
//! const grid = new WebGrid(root, { totalRows: 1000, totalColumns: 50, fixedRowsTop: 1 });
//! grid.set_data_source((row, col) => `${row}:${col}`);
//! grid.draw(false);
//! ```

pub mod error;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod settings;
pub mod types;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use error::{GridpaneError, Result};
pub use layout::{Axis, AxisState, GridPositions, RenderCalculator, RenderWindow, Viewport};
pub use overlay::PaneKind;
pub use render::{DomBackend, Geometry, MemoryDom, Rect, TrimmingContainer};
pub use settings::{DrawKind, Hooks, IndexValue, PreventOverflow, Settings, SettingsConfig};
pub use types::*;
pub use viewer::GridView;

#[cfg(target_arch = "wasm32")]
pub use web::WebGrid;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
