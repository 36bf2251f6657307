//! DOM backend trait for pluggable measurement and mutation.
//!
//! This module defines the `DomBackend` trait that abstracts every DOM
//! read and write the engine performs, allowing the in-memory backend and
//! the `web-sys` backend to be used interchangeably.

use crate::error::Result;
use crate::layout::Axis;
use crate::overlay::{CloneElement, PaneKind};

use super::{Border, TableFragment};

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// The element whose scrolling clips the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrimmingContainer {
    /// The browser window scrolls the page that holds the grid
    Window,
    /// An inner scrollable element wraps the grid
    #[default]
    Element,
}

/// Everything measured from the DOM before a draw.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Geometry {
    pub container: TrimmingContainer,
    /// Client size of the trimming container, `f32::INFINITY` when it does not clip
    pub workspace_width: f32,
    pub workspace_height: f32,
    /// Native scrollbar thickness
    pub scrollbar_width: f32,
    pub window_width: f32,
    pub window_height: f32,
    /// Root table bounding box relative to the window viewport
    pub table_rect: Rect,
    /// Scroll position of the trimming container
    pub scroll_left: f32,
    pub scroll_top: f32,
}

impl Geometry {
    pub fn scroll_position(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.scroll_top,
            Axis::Horizontal => self.scroll_left,
        }
    }

    fn table_leading_edge(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.table_rect.top(),
            Axis::Horizontal => self.table_rect.left(),
        }
    }

    /// How far the root table has scrolled on `axis`, measured from its own
    /// leading edge. A window container scrolls the whole page, so the table's
    /// bounding box is used instead of the raw page scroll.
    pub fn table_scroll(&self, axis: Axis) -> f32 {
        match self.container {
            TrimmingContainer::Element => self.scroll_position(axis),
            TrimmingContainer::Window => (-self.table_leading_edge(axis)).max(0.0),
        }
    }

    /// Native scroll position of the container that scrolls the table by `px`.
    pub fn native_scroll_for(&self, axis: Axis, px: f32) -> f32 {
        match self.container {
            TrimmingContainer::Element => px,
            TrimmingContainer::Window => {
                // Page offset of the table
                px + self.table_leading_edge(axis) + self.scroll_position(axis)
            }
        }
    }
}

/// What changed in a pane since its last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaneChanges {
    /// Position, size or content origin of the clone element
    pub element: bool,
    /// Rendered rows, columns, values or classes
    pub fragment: bool,
}

impl PaneChanges {
    pub fn any(&self) -> bool {
        self.element || self.fragment
    }
}

/// Trait for DOM backends
///
/// Implementations own the real (or simulated) elements: the master table,
/// one clone per active overlay, and one border element per selection layer
/// and pane.
pub trait DomBackend {
    /// Whether the root element is still in the document
    fn is_attached(&self) -> bool;

    /// Measure the trimming container, scrollbars and root table
    fn measure(&self) -> Geometry;

    /// Current scroll position of the trimming container on `axis`
    fn scroll_position(&self, axis: Axis) -> f32 {
        self.measure().scroll_position(axis)
    }

    /// Write a scroll position. Returns whether the position actually changed.
    fn set_scroll_position(&mut self, container: TrimmingContainer, axis: Axis, px: f32) -> bool;

    /// Create the clone element for `pane`
    fn create_clone(&mut self, pane: PaneKind) -> Result<()>;

    /// Remove the clone element of `pane` and its borders
    fn destroy_clone(&mut self, pane: PaneKind);

    /// Write the element state and fragment of `pane`
    fn commit_pane(
        &mut self,
        pane: PaneKind,
        element: &CloneElement,
        fragment: &TableFragment,
        changes: PaneChanges,
    ) -> Result<()>;

    /// Write the border of selection layer `index` inside `pane`
    fn commit_border(&mut self, pane: PaneKind, index: usize, border: &Border) -> Result<()>;
}
