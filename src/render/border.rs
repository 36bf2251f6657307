//! Selection borders.
//!
//! A border is computed against one pane's fragment. Edges of the range that
//! continue outside the pane's rendered window are not drawn, so the borders of
//! adjacent panes join into a single outline.

use std::collections::HashMap;

use crate::overlay::PaneKind;
use crate::types::{index_to_coord, BorderSpec, Corners};

use super::TableFragment;

/// Border rectangle in fragment coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub draw_top: bool,
    pub draw_bottom: bool,
    pub draw_left: bool,
    pub draw_right: bool,
    /// Center of the fill handle square, when shown
    pub corner: Option<(f32, f32)>,
}

/// Border of one selection layer inside one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    spec: BorderSpec,
    rect: Option<BorderRect>,
    dirty: bool,
}

impl Border {
    pub fn new(spec: BorderSpec) -> Self {
        Self {
            spec,
            rect: None,
            dirty: false,
        }
    }

    pub fn spec(&self) -> &BorderSpec {
        &self.spec
    }

    pub fn rect(&self) -> Option<&BorderRect> {
        self.rect.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.rect.is_some()
    }

    /// Show the border around the part of `corners` rendered in `fragment`.
    pub fn appear(&mut self, corners: Corners, fragment: &TableFragment) {
        let rect = border_rect(corners, fragment, self.spec.corner_visible);
        if rect.is_none() {
            log::trace!("border range {:?} not rendered in pane", corners.as_tuple());
        }
        self.set_rect(rect);
    }

    pub fn disappear(&mut self) {
        self.set_rect(None);
    }

    pub fn set_spec(&mut self, spec: &BorderSpec) {
        if self.spec != *spec {
            self.spec = spec.clone();
            self.dirty = true;
        }
    }

    /// Whether the border changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn set_rect(&mut self, rect: Option<BorderRect>) {
        if self.rect != rect {
            self.rect = rect;
            self.dirty = true;
        }
    }
}

fn border_rect(corners: Corners, fragment: &TableFragment, corner_visible: bool) -> Option<BorderRect> {
    let in_rows = |source: usize| corners.contains_row(index_to_coord(source));
    let in_cols = |source: usize| corners.contains_col(index_to_coord(source));

    let first_row = fragment.rows().iter().find(|l| in_rows(l.source))?;
    let last_row = fragment.rows().iter().rev().find(|l| in_rows(l.source))?;
    let first_col = fragment.columns().iter().find(|l| in_cols(l.source))?;
    let last_col = fragment.columns().iter().rev().find(|l| in_cols(l.source))?;

    let draw_top = index_to_coord(first_row.source) == corners.top;
    let draw_bottom = index_to_coord(last_row.source) == corners.bottom;
    let draw_left = index_to_coord(first_col.source) == corners.left;
    let draw_right = index_to_coord(last_col.source) == corners.right;

    let x = first_col.position;
    let y = first_row.position;
    let w = last_col.end() - x;
    let h = last_row.end() - y;

    Some(BorderRect {
        x,
        y,
        w,
        h,
        draw_top,
        draw_bottom,
        draw_left,
        draw_right,
        corner: (corner_visible && draw_bottom && draw_right).then_some((x + w, y + h)),
    })
}

/// Borders keyed by pane and selection layer, created on first use.
#[derive(Debug, Clone, Default)]
pub struct BorderRegistry {
    borders: HashMap<(PaneKind, usize), Border>,
}

impl BorderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Border of layer `index` in `pane`, created with `spec` if missing.
    pub fn border_mut(&mut self, pane: PaneKind, index: usize, spec: &BorderSpec) -> &mut Border {
        let border = self
            .borders
            .entry((pane, index))
            .or_insert_with(|| Border::new(spec.clone()));
        border.set_spec(spec);
        border
    }

    pub fn get(&self, pane: PaneKind, index: usize) -> Option<&Border> {
        self.borders.get(&(pane, index))
    }

    pub fn get_mut(&mut self, pane: PaneKind, index: usize) -> Option<&mut Border> {
        self.borders.get_mut(&(pane, index))
    }

    /// Drop every border of a destroyed pane.
    pub fn remove_pane(&mut self, pane: PaneKind) {
        self.borders.retain(|(p, _), _| *p != pane);
    }

    /// Borders of `pane` ordered by selection layer.
    pub fn pane_borders_mut(&mut self, pane: PaneKind) -> Vec<(usize, &mut Border)> {
        let mut borders: Vec<_> = self
            .borders
            .iter_mut()
            .filter(|((p, _), _)| *p == pane)
            .map(|((_, index), border)| (*index, border))
            .collect();
        borders.sort_by_key(|(index, _)| *index);
        borders
    }

    pub fn len(&self) -> usize {
        self.borders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.borders.is_empty()
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
    use crate::layout::{IndexFilter, RenderCalculator};
    use crate::render::HeaderBands;
    use crate::settings::Settings;

    fn fragment(row_offset: usize) -> TableFragment {
        let mut settings = Settings::new(100, 10);
        settings.default_row_height = 20.0;
        settings.default_column_width = 50.0;
        let rows = RenderCalculator::new(100, 0, row_offset, 100.0, false).compute(|_| 20.0);
        let cols = RenderCalculator::new(10, 0, 0, 200.0, false).compute(|_| 50.0);
        TableFragment::build(
            &settings,
            IndexFilter::new(0, rows, 100),
            IndexFilter::new(0, cols, 10),
            HeaderBands::default(),
        )
    }

    fn corners(top: i64, left: i64, bottom: i64, right: i64) -> Corners {
        Corners {
            top,
            left,
            bottom,
            right,
        }
    }

    #[test]
    fn fully_rendered_range_draws_all_edges() {
        let mut border = Border::new(BorderSpec::default());
        border.appear(corners(1, 1, 2, 2), &fragment(0));
        let rect = *border.rect().unwrap();
        assert_eq!((rect.x, rect.y, rect.w, rect.h), (50.0, 20.0, 100.0, 40.0));
        assert!(rect.draw_top && rect.draw_bottom && rect.draw_left && rect.draw_right);
        assert_eq!(rect.corner, Some((150.0, 60.0)));
        assert!(border.take_dirty());
        assert!(!border.take_dirty());
    }

    #[test]
    fn range_continuing_above_window_hides_top_edge() {
        let mut border = Border::new(BorderSpec::default());
        // Window starts at row 10
        border.appear(corners(5, 0, 12, 0), &fragment(10));
        let rect = *border.rect().unwrap();
        assert!(!rect.draw_top);
        assert!(rect.draw_bottom);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.h, 60.0);
    }

    #[test]
    fn unrendered_range_disappears() {
        let mut border = Border::new(BorderSpec::default());
        border.appear(corners(1, 1, 1, 1), &fragment(0));
        assert!(border.is_visible());
        border.appear(corners(50, 1, 60, 1), &fragment(0));
        assert!(!border.is_visible());
    }

    #[test]
    fn corner_hidden_when_not_configured() {
        let spec = BorderSpec {
            corner_visible: false,
            ..BorderSpec::default()
        };
        let mut border = Border::new(spec);
        border.appear(corners(0, 0, 0, 0), &fragment(0));
        assert_eq!(border.rect().unwrap().corner, None);
    }

    #[test]
    fn registry_creates_lazily_and_reuses() {
        let mut registry = BorderRegistry::new();
        assert!(registry.get(PaneKind::Master, 0).is_none());
        registry
            .border_mut(PaneKind::Master, 0, &BorderSpec::default())
            .appear(corners(0, 0, 0, 0), &fragment(0));
        registry.border_mut(PaneKind::Top, 0, &BorderSpec::default());
        registry.border_mut(PaneKind::Master, 0, &BorderSpec::default());
        assert_eq!(registry.len(), 2);
        assert!(registry.get(PaneKind::Master, 0).unwrap().is_visible());
        registry.remove_pane(PaneKind::Top);
        assert_eq!(registry.len(), 1);
    }
}
