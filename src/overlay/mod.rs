//! Frozen-pane overlays.
//!
//! Each overlay owns one clone of the master table rendering a subset of rows
//! and columns, kept visually pinned while the master scrolls:
//! - `Top`: fixed top rows, pinned vertically
//! - `Left`: fixed left columns and row headers, pinned horizontally
//! - `Bottom`: fixed bottom rows, pinned to the bottom edge
//! - `TopLeftCorner` / `BottomLeftCorner`: where two pinned panes meet
//!
//! Variants share an [`OverlayBase`] by composition and are driven through the
//! [`Overlay`] trait.

mod base;
mod bottom;
mod corner;
mod left;
mod master;
mod top;

use std::fmt;

use crate::error::Result;
use crate::layout::{
    Axis, AxisState, ColumnFilter, GridPositions, IndexFilter, RenderWindow, RowFilter, Viewport,
};
use crate::render::{DomBackend, Geometry, HeaderBands, TableFragment, TrimmingContainer};
use crate::settings::Settings;

pub use base::{header_inner_border, scroll_target, OverlayBase};
pub use bottom::BottomOverlay;
pub use corner::CornerOverlay;
pub use left::LeftOverlay;
pub use master::MasterTable;
pub use top::TopOverlay;

/// A rendered pane. Declaration order is draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneKind {
    Master,
    Left,
    Top,
    Bottom,
    TopLeftCorner,
    BottomLeftCorner,
}

impl PaneKind {
    /// Every overlay pane in draw order.
    pub const OVERLAYS: [PaneKind; 5] = [
        PaneKind::Left,
        PaneKind::Top,
        PaneKind::Bottom,
        PaneKind::TopLeftCorner,
        PaneKind::BottomLeftCorner,
    ];

    /// Whether the pane has a clone under `settings`. The master always renders.
    pub fn should_be_rendered(self, settings: &Settings) -> bool {
        let top = settings.fixed_rows_top > 0;
        let bottom = settings.fixed_rows_bottom > 0;
        let left = settings.fixed_columns_left > 0 || settings.has_row_headers();
        match self {
            Self::Master => true,
            Self::Top => top,
            Self::Left => left,
            Self::Bottom => bottom,
            Self::TopLeftCorner => left && top,
            Self::BottomLeftCorner => left && bottom,
        }
    }

    /// Axis whose native scroll position the pane's `scroll_to` writes.
    pub fn scroll_axis(self) -> Option<Axis> {
        match self {
            Self::Top | Self::Bottom => Some(Axis::Vertical),
            Self::Left => Some(Axis::Horizontal),
            Self::Master | Self::TopLeftCorner | Self::BottomLeftCorner => None,
        }
    }

    /// Header bands rendered in the pane. Bottom panes carry no column headers.
    pub fn headers(self) -> HeaderBands {
        match self {
            Self::Bottom | Self::BottomLeftCorner => HeaderBands {
                rows: true,
                columns: false,
            },
            _ => HeaderBands {
                rows: true,
                columns: true,
            },
        }
    }

    /// CSS class of the pane's root element.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Master => "ht_master",
            Self::Top => "ht_clone_top",
            Self::Left => "ht_clone_left",
            Self::Bottom => "ht_clone_bottom",
            Self::TopLeftCorner => "ht_clone_top_left_corner",
            Self::BottomLeftCorner => "ht_clone_bottom_left_corner",
        }
    }

    /// CSS class rendered from the pane's inner-border flag.
    pub fn inner_border_class(self) -> Option<&'static str> {
        match self {
            Self::Top => Some("innerBorderTop"),
            Self::Left => Some("innerBorderLeft"),
            Self::Bottom => Some("innerBorderBottom"),
            Self::Master | Self::TopLeftCorner | Self::BottomLeftCorner => None,
        }
    }
}

impl fmt::Display for PaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Master => "master",
            Self::Top => "top",
            Self::Left => "left",
            Self::Bottom => "bottom",
            Self::TopLeftCorner => "top-left corner",
            Self::BottomLeftCorner => "bottom-left corner",
        };
        f.write_str(name)
    }
}

/// DOM-facing state of a pane's root element.
///
/// Setters only mark the element dirty when a value actually changes, so
/// unchanged inputs never cause a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CloneElement {
    /// Offset of the root inside the scroll holder
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// Size of the inner scroll container
    pub holder_width: f32,
    pub holder_height: f32,
    /// Offset of the table inside the holder
    pub content_left: f32,
    pub content_top: f32,
    /// The pane is detached from its natural position and draws an inner border
    pub inner_border: bool,
    dirty: bool,
}

impl CloneElement {
    pub fn set_position(&mut self, left: f32, top: f32) {
        self.dirty |= update(&mut self.left, left) | update(&mut self.top, top);
    }

    /// Root and holder receive the same size.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.dirty |= update(&mut self.width, width)
            | update(&mut self.height, height)
            | update(&mut self.holder_width, width)
            | update(&mut self.holder_height, height);
    }

    pub fn set_content_origin(&mut self, left: f32, top: f32) {
        self.dirty |= update(&mut self.content_left, left) | update(&mut self.content_top, top);
    }

    pub fn set_inner_border(&mut self, inner_border: bool) {
        if self.inner_border != inner_border {
            self.inner_border = inner_border;
            self.dirty = true;
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether anything changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

fn update(slot: &mut f32, value: f32) -> bool {
    let same = (*slot - value).abs() <= f32::EPSILON || (slot.is_nan() && value.is_nan());
    if !same {
        *slot = value;
    }
    !same
}

/// Everything an overlay reads during one draw.
#[derive(Debug, Clone, Copy)]
pub struct OverlayContext<'a> {
    pub settings: &'a Settings,
    pub positions: &'a GridPositions,
    pub geometry: &'a Geometry,
    pub viewport: &'a Viewport,
    pub rows: &'a AxisState,
    pub columns: &'a AxisState,
    pub row_window: RenderWindow,
    pub column_window: RenderWindow,
    /// The root element is in the document
    pub attached: bool,
    /// Committed sizes of the edge clones, filled in draw order for the corners
    pub left_width: Option<f32>,
    pub top_height: Option<f32>,
    pub bottom_height: Option<f32>,
}

impl<'a> OverlayContext<'a> {
    pub fn state(&self, axis: Axis) -> &'a AxisState {
        match axis {
            Axis::Vertical => self.rows,
            Axis::Horizontal => self.columns,
        }
    }

    pub fn window(&self, axis: Axis) -> &RenderWindow {
        match axis {
            Axis::Vertical => &self.row_window,
            Axis::Horizontal => &self.column_window,
        }
    }

    /// Row filter of the master: fixed top rows followed by the row window.
    pub fn master_rows(&self) -> RowFilter {
        IndexFilter::new(self.rows.fixed_count(), self.row_window, self.rows.total())
    }

    /// Column filter of the master: fixed left columns followed by the column window.
    pub fn master_columns(&self) -> ColumnFilter {
        IndexFilter::new(
            self.columns.fixed_count(),
            self.column_window,
            self.columns.total(),
        )
    }

    /// Row and column filters of `pane`.
    pub fn filters(&self, pane: PaneKind) -> (RowFilter, ColumnFilter) {
        let settings = self.settings;
        let top = IndexFilter::fixed_only(settings.fixed_rows_top, settings.total_rows);
        let bottom_count = settings.fixed_rows_bottom.min(settings.total_rows);
        let bottom = IndexFilter::span(settings.total_rows - bottom_count, bottom_count);
        let left = IndexFilter::fixed_only(settings.fixed_columns_left, settings.total_columns);
        match pane {
            PaneKind::Master => (self.master_rows(), self.master_columns()),
            PaneKind::Top => (top, self.master_columns()),
            PaneKind::Bottom => (bottom, self.master_columns()),
            PaneKind::Left => (self.master_rows(), left),
            PaneKind::TopLeftCorner => (top, left),
            PaneKind::BottomLeftCorner => (bottom, left),
        }
    }
}

/// Polymorphic interface of the frozen-pane clones.
pub trait Overlay {
    fn base(&self) -> &OverlayBase;

    fn base_mut(&mut self) -> &mut OverlayBase;

    /// Recompute the clone's offset so it stays pinned.
    fn reset_fixed_position(&mut self, ctx: &OverlayContext<'_>);

    /// Recompute the clone and holder size; `force` rewrites unchanged values.
    fn adjust_elements_size(&mut self, ctx: &OverlayContext<'_>, force: bool);

    /// Position the content origin from the render window of the scrolling axis.
    fn apply_to_dom(&mut self, ctx: &OverlayContext<'_>) -> Result<()>;

    /// Scroll the real scroll owner so `source_index` is at the leading edge, or
    /// at the trailing edge with `to_edge`. Returns whether the position changed.
    fn scroll_to(
        &self,
        ctx: &OverlayContext<'_>,
        backend: &mut dyn DomBackend,
        source_index: usize,
        to_edge: bool,
    ) -> bool;

    fn kind(&self) -> PaneKind {
        self.base().kind()
    }

    fn should_be_rendered(&self, settings: &Settings) -> bool {
        self.kind().should_be_rendered(settings)
    }

    fn element(&self) -> &CloneElement {
        self.base().element()
    }

    fn fragment(&self) -> &TableFragment {
        self.base().fragment()
    }

    fn fragment_mut(&mut self) -> &mut TableFragment {
        self.base_mut().fragment_mut()
    }

    fn trimming_container(&self) -> TrimmingContainer {
        self.base().container()
    }
}

fn create_overlay(kind: PaneKind, container: TrimmingContainer) -> Option<Box<dyn Overlay>> {
    match kind {
        PaneKind::Master => None,
        PaneKind::Top => Some(Box::new(TopOverlay::new(container))),
        PaneKind::Left => Some(Box::new(LeftOverlay::new(container))),
        PaneKind::Bottom => Some(Box::new(BottomOverlay::new(container))),
        PaneKind::TopLeftCorner | PaneKind::BottomLeftCorner => {
            Some(Box::new(CornerOverlay::new(kind, container)))
        }
    }
}

/// The active overlays, kept in draw order.
#[derive(Default)]
pub struct OverlaySet {
    overlays: Vec<Box<dyn Overlay>>,
}

impl fmt::Debug for OverlaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and tear down clones so exactly the panes that should render exist.
    /// Returns the panes that were destroyed.
    pub fn refresh(
        &mut self,
        settings: &Settings,
        backend: &mut dyn DomBackend,
        container: TrimmingContainer,
    ) -> Result<Vec<PaneKind>> {
        let mut destroyed = Vec::new();
        for kind in PaneKind::OVERLAYS {
            let wanted = kind.should_be_rendered(settings);
            let present = self.get(kind).is_some();
            if wanted && !present {
                if let Some(overlay) = create_overlay(kind, container) {
                    backend.create_clone(kind)?;
                    log::debug!("{kind} overlay attached");
                    self.overlays.push(overlay);
                }
            } else if !wanted && present {
                backend.destroy_clone(kind);
                self.overlays.retain(|o| o.kind() != kind);
                log::debug!("{kind} overlay destroyed");
                destroyed.push(kind);
            }
        }
        self.overlays.sort_by_key(|o| o.kind());
        Ok(destroyed)
    }

    /// Size, position and fill every overlay. Corners read the sizes the edge
    /// clones committed earlier in the same pass.
    pub fn draw(&mut self, ctx: OverlayContext<'_>, fast: bool, force: bool) -> Result<()> {
        let mut ctx = ctx;
        for overlay in &mut self.overlays {
            overlay.adjust_elements_size(&ctx, force);
            overlay.reset_fixed_position(&ctx);
            overlay.apply_to_dom(&ctx)?;
            overlay.base_mut().refresh_fragment(&ctx, fast);

            let element = overlay.element();
            match overlay.kind() {
                PaneKind::Left => ctx.left_width = Some(element.width),
                PaneKind::Top => ctx.top_height = Some(element.height),
                PaneKind::Bottom => ctx.bottom_height = Some(element.height),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn get(&self, kind: PaneKind) -> Option<&dyn Overlay> {
        self.overlays
            .iter()
            .find(|o| o.kind() == kind)
            .map(|o| o.as_ref())
    }

    pub fn get_mut(&mut self, kind: PaneKind) -> Option<&mut (dyn Overlay + 'static)> {
        self.overlays
            .iter_mut()
            .find(|o| o.kind() == kind)
            .map(|o| o.as_mut())
    }

    pub fn kinds(&self) -> Vec<PaneKind> {
        self.overlays.iter().map(|o| o.kind()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Overlay> {
        self.overlays.iter().map(|o| o.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Overlay + 'static)> {
        self.overlays.iter_mut().map(|o| o.as_mut())
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Destroy every clone (root detached or grid torn down).
    pub fn clear(&mut self, backend: &mut dyn DomBackend) {
        for overlay in self.overlays.drain(..) {
            backend.destroy_clone(overlay.kind());
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
    use crate::render::MemoryDom;
    use crate::settings::IndexValue;

    #[test]
    fn rendering_rules() {
        let mut settings = Settings::new(50, 10);
        assert!(PaneKind::OVERLAYS
            .iter()
            .all(|k| !k.should_be_rendered(&settings)));

        settings.row_headers = vec![IndexValue::Value(String::new())];
        assert!(PaneKind::Left.should_be_rendered(&settings));
        assert!(!PaneKind::TopLeftCorner.should_be_rendered(&settings));

        settings.fixed_rows_top = 1;
        settings.fixed_rows_bottom = 2;
        assert!(PaneKind::TopLeftCorner.should_be_rendered(&settings));
        assert!(PaneKind::BottomLeftCorner.should_be_rendered(&settings));
        assert!(PaneKind::Master.should_be_rendered(&settings));
    }

    #[test]
    fn clone_element_tracks_changes() {
        let mut element = CloneElement::default();
        element.set_size(100.0, 40.0);
        assert!(element.take_dirty());
        element.set_size(100.0, 40.0);
        element.set_position(0.0, 0.0);
        element.set_inner_border(false);
        assert!(!element.take_dirty());
        element.set_content_origin(0.0, 12.0);
        assert!(element.take_dirty());
        assert_eq!(element.holder_height, 40.0);
    }

    #[test]
    fn refresh_creates_and_destroys_in_draw_order() {
        let mut dom = MemoryDom::with_workspace(800.0, 600.0);
        let mut set = OverlaySet::new();
        let mut settings = Settings::new(50, 10);
        settings.fixed_rows_bottom = 1;
        settings.fixed_rows_top = 1;
        settings.fixed_columns_left = 1;

        let destroyed = set
            .refresh(&settings, &mut dom, TrimmingContainer::Element)
            .unwrap();
        assert!(destroyed.is_empty());
        assert_eq!(
            set.kinds(),
            vec![
                PaneKind::Left,
                PaneKind::Top,
                PaneKind::Bottom,
                PaneKind::TopLeftCorner,
                PaneKind::BottomLeftCorner
            ]
        );

        settings.fixed_rows_top = 0;
        let destroyed = set
            .refresh(&settings, &mut dom, TrimmingContainer::Element)
            .unwrap();
        assert_eq!(destroyed, vec![PaneKind::Top, PaneKind::TopLeftCorner]);
        assert!(!dom.has_clone(PaneKind::Top));
        assert!(set.get(PaneKind::Top).is_none());
    }
}
