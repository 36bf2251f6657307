//! Top overlay: fixed top rows and the column headers above them.

use crate::error::Result;
use crate::layout::Axis;
use crate::render::{DomBackend, TrimmingContainer};

use super::{header_inner_border, scroll_target, Overlay, OverlayBase, OverlayContext, PaneKind};

#[derive(Debug, Clone)]
pub struct TopOverlay {
    base: OverlayBase,
}

impl TopOverlay {
    pub fn new(container: TrimmingContainer) -> Self {
        Self {
            base: OverlayBase::new(PaneKind::Top, container),
        }
    }
}

impl Overlay for TopOverlay {
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
        let height = self.base.element().height;
        let top = self.base.leading_offset(ctx, Axis::Vertical, height);
        let inner_border = header_inner_border(ctx, Axis::Vertical, top);
        let element = self.base.element_mut();
        element.set_position(0.0, top);
        element.set_inner_border(inner_border);
    }

    fn adjust_elements_size(&mut self, ctx: &OverlayContext<'_>, force: bool) {
        let width = ctx.viewport.clone_span(Axis::Horizontal);
        let height = ctx.viewport.column_headers_height + ctx.viewport.fixed_top_height;
        let element = self.base.element_mut();
        element.set_size(width, height);
        if force {
            element.mark_dirty();
        }
    }

    fn apply_to_dom(&mut self, ctx: &OverlayContext<'_>) -> Result<()> {
        let left = OverlayBase::content_origin(ctx, Axis::Horizontal)?;
        self.base.element_mut().set_content_origin(left, 0.0);
        Ok(())
    }

    fn scroll_to(
        &self,
        ctx: &OverlayContext<'_>,
        backend: &mut dyn DomBackend,
        source_index: usize,
        to_edge: bool,
    ) -> bool {
        let px = scroll_target(ctx, Axis::Vertical, source_index, to_edge);
        backend.set_scroll_position(self.base.container(), Axis::Vertical, px)
    }
}
