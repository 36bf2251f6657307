//! Main `GridView` struct - the orchestrator of one virtualised grid.
//!
//! This module provides the backend-generic `GridView` that handles:
//! - Measuring the workspace and computing both render windows
//! - Creating, positioning and filling the master table and its overlays
//! - Reconciling selection classes and borders in every pane
//! - Committing changed panes to the DOM backend
//!
//! Scroll handling lives in the `scroll` submodule.

mod scroll;

use crate::error::{GridpaneError, Result};
use crate::layout::{
    fully_visible_count, Axis, AxisState, GridPositions, RenderWindow, Viewport,
};
use crate::overlay::{MasterTable, Overlay, OverlayBase, OverlayContext, OverlaySet, PaneKind};
use crate::render::{draw_selection, BorderRegistry, DomBackend, Geometry, RenderedCell};
use crate::settings::{DrawKind, Hooks, Settings};
use crate::types::{CellCoords, Selections};

/// Lookup order of `get_cell`: the pane drawn on top wins.
const LOOKUP_ORDER: [PaneKind; 6] = [
    PaneKind::TopLeftCorner,
    PaneKind::BottomLeftCorner,
    PaneKind::Top,
    PaneKind::Bottom,
    PaneKind::Left,
    PaneKind::Master,
];

pub struct GridView<B: DomBackend> {
    settings: Settings,
    /// Row and column edges of `settings`
    positions: GridPositions,
    hooks: Hooks,
    backend: B,
    rows: AxisState,
    columns: AxisState,
    geometry: Geometry,
    viewport: Viewport,
    row_window: RenderWindow,
    column_window: RenderWindow,
    master: MasterTable,
    overlays: OverlaySet,
    selections: Selections,
    borders: BorderRegistry,
    drawn: bool,
    drawing: bool,
    force_next: bool,
}

impl<B: DomBackend> std::fmt::Debug for GridView<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridView")
            .field("settings", &self.settings)
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("row_window", &self.row_window)
            .field("column_window", &self.column_window)
            .field("overlays", &self.overlays)
            .field("drawn", &self.drawn)
            .finish_non_exhaustive()
    }
}

impl<B: DomBackend> GridView<B> {
    /// Create a view over `backend`. Nothing is measured or committed until
    /// the first `draw`.
    ///
    /// # Errors
    /// Returns `GridpaneError::Settings` when the settings cannot describe a grid.
    pub fn new(settings: Settings, backend: B) -> Result<Self> {
        settings.validate()?;
        let geometry = backend.measure();
        Ok(Self {
            rows: row_state(&settings),
            columns: column_state(&settings),
            master: MasterTable::new(geometry.container),
            positions: GridPositions::build(&settings),
            settings,
            hooks: Hooks::default(),
            backend,
            geometry,
            viewport: Viewport::default(),
            row_window: RenderWindow::empty(),
            column_window: RenderWindow::empty(),
            overlays: OverlaySet::new(),
            selections: Selections::new(),
            borders: BorderRegistry::new(),
            drawn: false,
            drawing: false,
            force_next: true,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. Axis state is re-clamped; overlays are created or
    /// destroyed on the next draw.
    ///
    /// # Errors
    /// Returns `GridpaneError::Settings` and keeps the old settings when the new
    /// ones cannot describe a grid.
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        settings.validate()?;
        self.rows.reconfigure(
            settings.total_rows - settings.fixed_rows_bottom,
            settings.fixed_rows_top,
        );
        self.columns
            .reconfigure(settings.total_columns, settings.fixed_columns_left);
        self.positions = GridPositions::build(&settings);
        self.settings = settings;
        self.force_next = true;
        log::debug!("settings updated: {:?}", self.settings);
        Ok(())
    }

    pub fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Selection layers; changes show on the next draw.
    pub fn selections_mut(&mut self) -> &mut Selections {
        &mut self.selections
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn row_axis(&self) -> &AxisState {
        &self.rows
    }

    pub fn column_axis(&self) -> &AxisState {
        &self.columns
    }

    pub fn axis(&self, axis: Axis) -> &AxisState {
        match axis {
            Axis::Vertical => &self.rows,
            Axis::Horizontal => &self.columns,
        }
    }

    pub(crate) fn axis_mut(&mut self, axis: Axis) -> &mut AxisState {
        match axis {
            Axis::Vertical => &mut self.rows,
            Axis::Horizontal => &mut self.columns,
        }
    }

    /// Row window of the last draw.
    pub fn row_window(&self) -> &RenderWindow {
        &self.row_window
    }

    /// Column window of the last draw.
    pub fn column_window(&self) -> &RenderWindow {
        &self.column_window
    }

    pub fn window(&self, axis: Axis) -> &RenderWindow {
        match axis {
            Axis::Vertical => &self.row_window,
            Axis::Horizontal => &self.column_window,
        }
    }

    /// Viewport measured by the last draw.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn master(&self) -> &MasterTable {
        &self.master
    }

    pub fn overlay(&self, kind: PaneKind) -> Option<&dyn Overlay> {
        self.overlays.get(kind)
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn borders(&self) -> &BorderRegistry {
        &self.borders
    }

    /// Whether a draw has completed.
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }

    /// Run a draw cycle. A fast draw keeps fragments whose filters did not
    /// move and only refreshes positions and classes.
    ///
    /// # Errors
    /// `GridpaneError::ReentrantDraw` when called from inside a draw, and any
    /// error raised while laying out or committing a pane. A failed draw leaves
    /// the last committed state in the DOM.
    pub fn draw(&mut self, fast: bool) -> Result<()> {
        if self.drawing {
            return Err(GridpaneError::ReentrantDraw);
        }
        self.drawing = true;
        let result = self.draw_cycle(fast);
        self.drawing = false;
        result
    }

    /// Re-measure and redraw everything.
    ///
    /// # Errors
    /// See [`GridView::draw`].
    pub fn resize(&mut self) -> Result<()> {
        self.force_next = true;
        self.draw(false)
    }

    fn draw_cycle(&mut self, fast: bool) -> Result<()> {
        if !self.backend.is_attached() {
            log::warn!("root element is detached, draw skipped");
            return Ok(());
        }
        let force = std::mem::take(&mut self.force_next);
        let fast = fast && self.drawn && !force;

        let geometry = self.backend.measure();
        let viewport = Viewport::measure(&self.settings, &self.positions, &geometry);
        if !self.drawn {
            self.backend.create_clone(PaneKind::Master)?;
        }
        for pane in self
            .overlays
            .refresh(&self.settings, &mut self.backend, geometry.container)?
        {
            self.borders.remove_pane(pane);
        }

        let row_window = viewport.row_window(&self.settings, &self.positions, &self.rows);
        let column_window =
            viewport.column_window(&self.settings, &self.positions, &self.columns);
        log::trace!("row window {row_window:?}, column window {column_window:?}");

        let ctx = OverlayContext {
            settings: &self.settings,
            positions: &self.positions,
            geometry: &geometry,
            viewport: &viewport,
            rows: &self.rows,
            columns: &self.columns,
            row_window,
            column_window,
            attached: true,
            left_width: None,
            top_height: None,
            bottom_height: None,
        };
        self.master.draw(&ctx, fast)?;
        if force {
            self.master.base_mut().element_mut().mark_dirty();
        }
        self.overlays.draw(ctx, fast, force)?;

        self.reconcile_selections();
        self.commit()?;

        self.geometry = geometry;
        self.viewport = viewport;
        self.row_window = row_window;
        self.column_window = column_window;
        self.drawn = true;

        let kind = if fast { DrawKind::Fast } else { DrawKind::Full };
        log::debug!(
            "{kind:?} draw: rows {}+{} columns {}+{}, overlays {:?}",
            row_window.start_index,
            row_window.count,
            column_window.start_index,
            column_window.count,
            self.overlays.kinds()
        );
        self.hooks.drawn(kind);
        Ok(())
    }

    fn reconcile_selections(&mut self) {
        let panes = std::iter::once(self.master.base_mut())
            .chain(self.overlays.iter_mut().map(|o| o.base_mut()));
        for base in panes {
            let kind = base.kind();
            for (index, selection) in self.selections.iter().enumerate() {
                draw_selection(
                    selection,
                    index,
                    kind,
                    base.fragment_mut(),
                    &mut self.borders,
                    &mut self.hooks,
                );
            }
        }
    }

    fn commit(&mut self) -> Result<()> {
        commit_pane(&mut self.backend, &mut self.borders, self.master.base_mut())?;
        for overlay in self.overlays.iter_mut() {
            commit_pane(&mut self.backend, &mut self.borders, overlay.base_mut())?;
        }
        Ok(())
    }

    /// The rendered cell at `coords`, looked up in the top-most pane rendering it.
    pub fn get_cell(&self, coords: CellCoords) -> Option<&RenderedCell> {
        self.pane_of_cell(coords)
            .and_then(|pane| self.pane_base(pane))
            .and_then(|base| base.fragment().cell(coords))
    }

    /// The top-most pane that renders `coords`.
    pub fn pane_of_cell(&self, coords: CellCoords) -> Option<PaneKind> {
        LOOKUP_ORDER.into_iter().find(|&pane| {
            self.pane_base(pane)
                .is_some_and(|base| base.fragment().cell(coords).is_some())
        })
    }

    fn pane_base(&self, pane: PaneKind) -> Option<&OverlayBase> {
        match pane {
            PaneKind::Master => Some(self.master.base()),
            kind => self.overlays.get(kind).map(|o| o.base()),
        }
    }

    /// First rendered scrollable row, partially visible or not.
    pub fn first_visible_row(&self) -> Option<usize> {
        first_rendered(&self.row_window)
    }

    pub fn last_visible_row(&self) -> Option<usize> {
        self.row_window.last_index()
    }

    pub fn first_visible_column(&self) -> Option<usize> {
        first_rendered(&self.column_window)
    }

    pub fn last_visible_column(&self) -> Option<usize> {
        self.column_window.last_index()
    }

    pub fn first_fully_visible_row(&self) -> Option<usize> {
        self.fully_visible(Axis::Vertical).map(|(first, _)| first)
    }

    pub fn last_fully_visible_row(&self) -> Option<usize> {
        self.fully_visible(Axis::Vertical).map(|(_, last)| last)
    }

    pub fn first_fully_visible_column(&self) -> Option<usize> {
        self.fully_visible(Axis::Horizontal).map(|(first, _)| first)
    }

    pub fn last_fully_visible_column(&self) -> Option<usize> {
        self.fully_visible(Axis::Horizontal).map(|(_, last)| last)
    }

    /// First and last fully visible source index of the window on `axis`.
    pub(crate) fn fully_visible(&self, axis: Axis) -> Option<(usize, usize)> {
        let window = self.window(axis);
        let count = fully_visible_count(window, self.viewport.scrollable_size(axis), |i| {
            self.settings.size_of(axis, i)
        });
        if count == 0 {
            return None;
        }
        if window.reverse {
            let last = window.last_index()?;
            Some((last + 1 - count, last))
        } else {
            Some((window.start_index, window.start_index + count - 1))
        }
    }
}

fn row_state(settings: &Settings) -> AxisState {
    AxisState::new(
        settings.total_rows - settings.fixed_rows_bottom,
        settings.fixed_rows_top,
    )
}

fn column_state(settings: &Settings) -> AxisState {
    AxisState::new(settings.total_columns, settings.fixed_columns_left)
}

fn first_rendered(window: &RenderWindow) -> Option<usize> {
    (!window.is_empty()).then_some(window.start_index)
}

fn commit_pane<B: DomBackend>(
    backend: &mut B,
    borders: &mut BorderRegistry,
    base: &mut OverlayBase,
) -> Result<()> {
    let kind = base.kind();
    let changes = base.pending_changes();
    if changes.any() {
        backend.commit_pane(kind, base.element(), base.fragment(), changes)?;
        base.mark_committed(changes);
        log::trace!("{kind} committed: {changes:?}");
    }
    for (index, border) in borders.pane_borders_mut(kind) {
        if border.take_dirty() {
            backend.commit_border(kind, index, border)?;
        }
    }
    Ok(())
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
    use crate::render::MemoryDom;
    use crate::settings::IndexValue;
    use crate::types::{Selection, SelectionStyle};

    fn view(rows: usize, cols: usize) -> GridView<MemoryDom> {
        let mut settings = Settings::new(rows, cols);
        settings.default_row_height = 20.0;
        settings.default_column_width = 50.0;
        GridView::new(settings, MemoryDom::with_workspace(515.0, 215.0)).unwrap()
    }

    #[test]
    fn first_draw_creates_master_and_commits() {
        let mut grid = view(100, 20);
        grid.draw(false).unwrap();
        let master = grid.backend().pane(PaneKind::Master).unwrap();
        assert_eq!(master.fragment_writes, 1);
        assert_eq!(grid.row_window().start_index, 0);
        // 215px minus the horizontal scrollbar
        assert_eq!(grid.row_window().count, 10);
        assert_eq!(grid.first_fully_visible_row(), Some(0));
        assert_eq!(grid.last_fully_visible_row(), Some(9));
    }

    #[test]
    fn invalid_settings_rejected() {
        let mut settings = Settings::new(3, 3);
        settings.fixed_rows_top = 4;
        let result = GridView::new(settings, MemoryDom::with_workspace(100.0, 100.0));
        assert!(matches!(result, Err(GridpaneError::Settings(_))));
    }

    #[test]
    fn detached_root_skips_draw() {
        let mut grid = view(10, 10);
        grid.backend_mut().set_attached(false);
        grid.draw(false).unwrap();
        assert!(!grid.is_drawn());
        assert!(grid.backend().panes().is_empty());
    }

    #[test]
    fn update_settings_reclamps_axes() {
        let mut grid = view(100, 20);
        grid.draw(false).unwrap();
        grid.scroll_vertical(80).unwrap();
        let mut settings = grid.settings().clone();
        settings.total_rows = 30;
        grid.update_settings(settings).unwrap();
        assert_eq!(grid.row_axis().offset(), 29);
    }

    #[test]
    fn get_cell_prefers_top_most_pane() {
        let mut settings = Settings::new(50, 10);
        settings.fixed_rows_top = 1;
        settings.fixed_columns_left = 1;
        settings.row_headers = vec![IndexValue::from_fn(|r| (r + 1).to_string())];
        let mut grid =
            GridView::new(settings, MemoryDom::with_workspace(400.0, 300.0)).unwrap();
        grid.draw(false).unwrap();
        assert_eq!(
            grid.pane_of_cell(CellCoords::new(0, 0)),
            Some(PaneKind::TopLeftCorner)
        );
        assert_eq!(grid.pane_of_cell(CellCoords::new(0, 3)), Some(PaneKind::Top));
        assert_eq!(grid.pane_of_cell(CellCoords::new(5, 0)), Some(PaneKind::Left));
        assert_eq!(grid.pane_of_cell(CellCoords::new(5, 3)), Some(PaneKind::Master));
        assert_eq!(grid.get_cell(CellCoords::new(5, -1)).unwrap().value, "6");
        assert!(grid.get_cell(CellCoords::new(49, 3)).is_none());
    }

    #[test]
    fn selection_commits_border_once() {
        let mut grid = view(100, 20);
        let index = grid
            .selections_mut()
            .push(Selection::new(SelectionStyle::current()));
        grid.selections_mut()
            .get_mut(index)
            .unwrap()
            .add(CellCoords::new(2, 3));
        grid.draw(false).unwrap();
        assert!(grid
            .get_cell(CellCoords::new(2, 3))
            .unwrap()
            .has_class("current"));
        assert!(grid.backend().border(PaneKind::Master, index).unwrap().is_visible());

        grid.draw(true).unwrap();
        assert_eq!(grid.backend().pane(PaneKind::Master).unwrap().fragment_writes, 1);
    }
}
