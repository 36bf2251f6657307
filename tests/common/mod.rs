//! Common test utilities for gridpane integration tests.
//!
//! Provides a `GridBuilder` that assembles `Settings` and a `MemoryDom` and
//! returns a drawn `GridView`, plus small assertion helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use gridpane::render::{MemoryDom, TrimmingContainer};
use gridpane::{Axis, GridView, IndexValue, PaneKind, Settings};

// ============================================================================
// Grid Builder
// ============================================================================

/// Builder for a grid over an in-memory DOM.
pub struct GridBuilder {
    settings: Settings,
    dom: MemoryDom,
}

impl GridBuilder {
    /// `rows` x `cols` grid of 20px rows and 50px columns in a 515x215
    /// element container.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut settings = Settings::new(rows, cols);
        settings.default_row_height = 20.0;
        settings.default_column_width = 50.0;
        settings.row_header_width = 40.0;
        settings.column_header_height = 20.0;
        Self {
            settings,
            dom: MemoryDom::with_workspace(515.0, 215.0),
        }
    }

    pub fn workspace(mut self, width: f32, height: f32) -> Self {
        let container = self.dom.geometry().container;
        self.dom = MemoryDom::with_workspace(width, height);
        self.dom.geometry_mut().container = container;
        self
    }

    /// Scroll inside the window instead of a clipping element.
    pub fn window_container(mut self) -> Self {
        let geometry = self.dom.geometry_mut();
        geometry.container = TrimmingContainer::Window;
        geometry.window_width = geometry.workspace_width;
        geometry.window_height = geometry.workspace_height;
        self
    }

    pub fn fixed(mut self, top: usize, bottom: usize, left: usize) -> Self {
        self.settings.fixed_rows_top = top;
        self.settings.fixed_rows_bottom = bottom;
        self.settings.fixed_columns_left = left;
        self
    }

    pub fn row_headers(mut self, levels: usize) -> Self {
        self.settings.row_headers = (0..levels)
            .map(|_| IndexValue::from_fn(|r| (r + 1).to_string()))
            .collect();
        self
    }

    pub fn column_headers(mut self, levels: usize) -> Self {
        self.settings.column_headers = (0..levels)
            .map(|_| IndexValue::from_fn(gridpane::settings::col_to_letter))
            .collect();
        self
    }

    pub fn column_widths(mut self, widths: Vec<f32>) -> Self {
        let fallback = self.settings.default_column_width;
        self.settings.column_width =
            Some(IndexValue::from_fn(move |c| widths.get(c).copied().unwrap_or(fallback)));
        self
    }

    pub fn row_heights(mut self, heights: Vec<f32>) -> Self {
        let fallback = self.settings.default_row_height;
        self.settings.row_height =
            Some(IndexValue::from_fn(move |r| heights.get(r).copied().unwrap_or(fallback)));
        self
    }

    pub fn data(mut self) -> Self {
        self.settings.cell_value = Some(Rc::new(|r: usize, c: usize| format!("{r}:{c}")));
        self
    }

    pub fn settings(mut self, f: impl FnOnce(&mut Settings)) -> Self {
        f(&mut self.settings);
        self
    }

    /// Grid that has not been drawn yet.
    pub fn build(self) -> GridView<MemoryDom> {
        GridView::new(self.settings, self.dom).unwrap()
    }

    /// Grid after its first full draw.
    pub fn drawn(self) -> GridView<MemoryDom> {
        let mut grid = self.build();
        grid.draw(false).unwrap();
        grid
    }
}

// ============================================================================
// Hook Recorders
// ============================================================================

/// Records scroll hook calls per axis.
#[derive(Clone, Default)]
pub struct ScrollLog(Rc<RefCell<Vec<Axis>>>);

impl ScrollLog {
    pub fn attach(grid: &mut GridView<MemoryDom>) -> Self {
        let log = Self::default();
        let vertical = Rc::clone(&log.0);
        let horizontal = Rc::clone(&log.0);
        let hooks = grid.hooks_mut();
        hooks.on_scroll_vertically = Some(Box::new(move || {
            vertical.borrow_mut().push(Axis::Vertical);
        }));
        hooks.on_scroll_horizontally = Some(Box::new(move || {
            horizontal.borrow_mut().push(Axis::Horizontal);
        }));
        log
    }

    pub fn calls(&self) -> Vec<Axis> {
        self.0.borrow().clone()
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert the overlays that exist, in draw order.
pub fn assert_overlays(grid: &GridView<MemoryDom>, expected: &[PaneKind]) {
    assert_eq!(grid.overlays().kinds(), expected, "active overlays");
    for kind in expected {
        assert!(grid.backend().has_clone(*kind), "{kind} clone missing in DOM");
    }
}

/// Source rows rendered by `pane`, headers excluded.
pub fn rendered_rows(grid: &GridView<MemoryDom>, pane: PaneKind) -> Vec<usize> {
    grid.backend()
        .pane(pane)
        .unwrap()
        .fragment
        .rows()
        .iter()
        .map(|line| line.source)
        .collect()
}

/// Source columns rendered by `pane`, headers excluded.
pub fn rendered_columns(grid: &GridView<MemoryDom>, pane: PaneKind) -> Vec<usize> {
    grid.backend()
        .pane(pane)
        .unwrap()
        .fragment
        .columns()
        .iter()
        .map(|line| line.source)
        .collect()
}
