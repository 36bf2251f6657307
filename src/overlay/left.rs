//! Left overlay: row headers and fixed left columns.

use crate::error::Result;
use crate::layout::Axis;
use crate::render::{DomBackend, TrimmingContainer};

use super::{header_inner_border, scroll_target, Overlay, OverlayBase, OverlayContext, PaneKind};

#[derive(Debug, Clone)]
pub struct LeftOverlay {
    base: OverlayBase,
}

impl LeftOverlay {
    pub fn new(container: TrimmingContainer) -> Self {
        Self {
            base: OverlayBase::new(PaneKind::Left, container),
        }
    }
}

impl Overlay for LeftOverlay {
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
        let width = self.base.element().width;
        let left = self.base.leading_offset(ctx, Axis::Horizontal, width);
        let inner_border = header_inner_border(ctx, Axis::Horizontal, left);
        let element = self.base.element_mut();
        element.set_position(left, 0.0);
        element.set_inner_border(inner_border);
    }

    fn adjust_elements_size(&mut self, ctx: &OverlayContext<'_>, force: bool) {
        let width = ctx.viewport.row_headers_width + ctx.viewport.fixed_left_width;
        let height = ctx.viewport.clone_span(Axis::Vertical);
        let element = self.base.element_mut();
        element.set_size(width, height);
        if force {
            element.mark_dirty();
        }
    }

    fn apply_to_dom(&mut self, ctx: &OverlayContext<'_>) -> Result<()> {
        let top = OverlayBase::content_origin(ctx, Axis::Vertical)?;
        self.base.element_mut().set_content_origin(0.0, top);
        Ok(())
    }

    fn scroll_to(
        &self,
        ctx: &OverlayContext<'_>,
        backend: &mut dyn DomBackend,
        source_index: usize,
        to_edge: bool,
    ) -> bool {
        let px = scroll_target(ctx, Axis::Horizontal, source_index, to_edge);
        backend.set_scroll_position(self.base.container(), Axis::Horizontal, px)
    }
}
