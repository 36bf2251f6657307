//! In-memory DOM backend.
//!
//! Holds a measured `Geometry` and records every committed pane and border.
//! Used by native consumers and by the test suite.

use std::collections::BTreeMap;

use crate::error::{GridpaneError, Result};
use crate::layout::Axis;
use crate::overlay::{CloneElement, PaneKind};

use super::{Border, DomBackend, Geometry, PaneChanges, Rect, TableFragment, TrimmingContainer};

/// Last committed state of one pane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommittedPane {
    pub element: CloneElement,
    pub fragment: TableFragment,
    /// Number of commits that rewrote the element
    pub element_writes: usize,
    /// Number of commits that rewrote the fragment
    pub fragment_writes: usize,
}

/// Clone lifecycle event, in order of occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Created(PaneKind),
    Destroyed(PaneKind),
}

#[derive(Debug, Clone)]
pub struct MemoryDom {
    geometry: Geometry,
    attached: bool,
    panes: BTreeMap<PaneKind, CommittedPane>,
    borders: BTreeMap<(PaneKind, usize), Border>,
    events: Vec<DomEvent>,
    scroll_writes: usize,
}

impl MemoryDom {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            attached: true,
            panes: BTreeMap::new(),
            borders: BTreeMap::new(),
            events: Vec::new(),
            scroll_writes: 0,
        }
    }

    /// Element container of the given client size with 15px scrollbars.
    pub fn with_workspace(width: f32, height: f32) -> Self {
        Self::new(Geometry {
            container: TrimmingContainer::Element,
            workspace_width: width,
            workspace_height: height,
            scrollbar_width: 15.0,
            window_width: width,
            window_height: height,
            table_rect: Rect::new(0.0, 0.0, width, height),
            scroll_left: 0.0,
            scroll_top: 0.0,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Change what the next `measure` reports (resize, window scroll).
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    pub fn pane(&self, pane: PaneKind) -> Option<&CommittedPane> {
        self.panes.get(&pane)
    }

    pub fn has_clone(&self, pane: PaneKind) -> bool {
        self.panes.contains_key(&pane)
    }

    /// Panes that currently exist, in draw order.
    pub fn panes(&self) -> Vec<PaneKind> {
        self.panes.keys().copied().collect()
    }

    pub fn border(&self, pane: PaneKind, index: usize) -> Option<&Border> {
        self.borders.get(&(pane, index))
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    /// Number of scroll writes that moved the position.
    pub fn scroll_writes(&self) -> usize {
        self.scroll_writes
    }
}

impl DomBackend for MemoryDom {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn measure(&self) -> Geometry {
        self.geometry
    }

    fn set_scroll_position(&mut self, container: TrimmingContainer, axis: Axis, px: f32) -> bool {
        if container != self.geometry.container {
            log::warn!("scroll write for {container:?} ignored, root scrolls in {:?}", self.geometry.container);
            return false;
        }
        let px = px.max(0.0);
        let previous = self.geometry.scroll_position(axis);
        if (previous - px).abs() < f32::EPSILON {
            return false;
        }
        match axis {
            Axis::Vertical => self.geometry.scroll_top = px,
            Axis::Horizontal => self.geometry.scroll_left = px,
        }
        if container == TrimmingContainer::Window {
            // The table moves with the page
            let rect = &mut self.geometry.table_rect;
            match axis {
                Axis::Vertical => rect.y -= px - previous,
                Axis::Horizontal => rect.x -= px - previous,
            }
        }
        self.scroll_writes += 1;
        true
    }

    fn create_clone(&mut self, pane: PaneKind) -> Result<()> {
        self.panes.insert(pane, CommittedPane::default());
        self.events.push(DomEvent::Created(pane));
        Ok(())
    }

    fn destroy_clone(&mut self, pane: PaneKind) {
        if self.panes.remove(&pane).is_some() {
            self.borders.retain(|(p, _), _| *p != pane);
            self.events.push(DomEvent::Destroyed(pane));
        }
    }

    fn commit_pane(
        &mut self,
        pane: PaneKind,
        element: &CloneElement,
        fragment: &TableFragment,
        changes: PaneChanges,
    ) -> Result<()> {
        let committed = self
            .panes
            .get_mut(&pane)
            .ok_or_else(|| GridpaneError::Dom(format!("{pane} clone was never created")))?;
        if changes.element {
            committed.element = element.clone();
            committed.element_writes += 1;
        }
        if changes.fragment {
            committed.fragment = fragment.clone();
            committed.fragment_writes += 1;
        }
        Ok(())
    }

    fn commit_border(&mut self, pane: PaneKind, index: usize, border: &Border) -> Result<()> {
        if !self.panes.contains_key(&pane) {
            return Err(GridpaneError::Dom(format!("{pane} clone was never created")));
        }
        self.borders.insert((pane, index), border.clone());
        Ok(())
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
    fn unchanged_scroll_write_reports_false() {
        let mut dom = MemoryDom::with_workspace(400.0, 300.0);
        assert!(dom.set_scroll_position(TrimmingContainer::Element, Axis::Vertical, 120.0));
        assert!(!dom.set_scroll_position(TrimmingContainer::Element, Axis::Vertical, 120.0));
        assert_eq!(dom.scroll_position(Axis::Vertical), 120.0);
        assert!(!dom.set_scroll_position(TrimmingContainer::Element, Axis::Horizontal, -5.0));
        assert_eq!(dom.scroll_writes(), 1);
    }

    #[test]
    fn window_scroll_moves_the_table() {
        let mut dom = MemoryDom::with_workspace(400.0, 300.0);
        dom.geometry_mut().container = TrimmingContainer::Window;
        dom.geometry_mut().table_rect = Rect::new(0.0, 300.0, 400.0, 2000.0);
        assert!(dom.set_scroll_position(TrimmingContainer::Window, Axis::Vertical, 400.0));
        assert_eq!(dom.geometry().table_rect.top(), -100.0);
        assert_eq!(dom.geometry().table_scroll(Axis::Vertical), 100.0);
    }

    #[test]
    fn commit_requires_created_clone() {
        let mut dom = MemoryDom::with_workspace(400.0, 300.0);
        let changes = PaneChanges {
            element: true,
            fragment: true,
        };
        let result = dom.commit_pane(
            PaneKind::Top,
            &CloneElement::default(),
            &TableFragment::default(),
            changes,
        );
        assert!(matches!(result, Err(GridpaneError::Dom(_))));

        dom.create_clone(PaneKind::Top).unwrap();
        dom.commit_pane(
            PaneKind::Top,
            &CloneElement::default(),
            &TableFragment::default(),
            changes,
        )
        .unwrap();
        assert_eq!(dom.pane(PaneKind::Top).unwrap().element_writes, 1);
        dom.destroy_clone(PaneKind::Top);
        assert_eq!(
            dom.events(),
            [DomEvent::Created(PaneKind::Top), DomEvent::Destroyed(PaneKind::Top)]
        );
    }
}
