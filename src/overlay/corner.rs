//! Corner overlays where the left pane meets the top or bottom pane.
//!
//! A corner never scrolls. Its size is taken from the clones committed before
//! it in the same draw, so it must be drawn after them.

use crate::error::Result;
use crate::layout::Axis;
use crate::render::{DomBackend, TrimmingContainer};

use super::{Overlay, OverlayBase, OverlayContext, PaneKind};

#[derive(Debug, Clone)]
pub struct CornerOverlay {
    base: OverlayBase,
}

impl CornerOverlay {
    /// `kind` is `TopLeftCorner` or `BottomLeftCorner`.
    pub fn new(kind: PaneKind, container: TrimmingContainer) -> Self {
        Self {
            base: OverlayBase::new(kind, container),
        }
    }

    fn is_bottom(&self) -> bool {
        self.base.kind() == PaneKind::BottomLeftCorner
    }
}

impl Overlay for CornerOverlay {
    fn base(&self) -> &OverlayBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OverlayBase {
        &mut self.base
    }

    fn reset_fixed_position(&mut self, ctx: &OverlayContext<'_>) {
        if !ctx.attached {
            return;
        }
        let element = *self.base.element();
        let left = self.base.leading_offset(ctx, Axis::Horizontal, element.width);
        let top = if self.is_bottom() {
            self.base.bottom_offset(ctx, element.height).0
        } else {
            self.base.leading_offset(ctx, Axis::Vertical, element.height)
        };
        self.base.element_mut().set_position(left, top);
    }

    fn adjust_elements_size(&mut self, ctx: &OverlayContext<'_>, force: bool) {
        let viewport = ctx.viewport;
        let width = ctx
            .left_width
            .unwrap_or(viewport.row_headers_width + viewport.fixed_left_width);
        let height = if self.is_bottom() {
            ctx.bottom_height.unwrap_or(viewport.fixed_bottom_height)
        } else {
            ctx.top_height
                .unwrap_or(viewport.column_headers_height + viewport.fixed_top_height)
        };
        let element = self.base.element_mut();
        element.set_size(width, height);
        if force {
            element.mark_dirty();
        }
    }

    fn apply_to_dom(&mut self, _ctx: &OverlayContext<'_>) -> Result<()> {
        self.base.element_mut().set_content_origin(0.0, 0.0);
        Ok(())
    }

    fn scroll_to(
        &self,
        _ctx: &OverlayContext<'_>,
        _backend: &mut dyn DomBackend,
        _source_index: usize,
        _to_edge: bool,
    ) -> bool {
        false
    }
}
