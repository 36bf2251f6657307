//! The master table: scrolls on both axes and sits beneath every clone.

use crate::error::Result;
use crate::layout::Axis;
use crate::render::TrimmingContainer;

use super::{OverlayBase, OverlayContext, PaneKind};

#[derive(Debug, Clone)]
pub struct MasterTable {
    base: OverlayBase,
}

impl MasterTable {
    pub fn new(container: TrimmingContainer) -> Self {
        Self {
            base: OverlayBase::new(PaneKind::Master, container),
        }
    }

    pub fn base(&self) -> &OverlayBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut OverlayBase {
        &mut self.base
    }

    /// Size the master to the visible table and place both content origins.
    pub fn draw(&mut self, ctx: &OverlayContext<'_>, fast: bool) -> Result<()> {
        let viewport = ctx.viewport;
        let left = OverlayBase::content_origin(ctx, Axis::Horizontal)?;
        let top = OverlayBase::content_origin(ctx, Axis::Vertical)?;
        let element = self.base.element_mut();
        element.set_size(
            viewport.workspace_width.min(viewport.total_width),
            viewport.workspace_height.min(viewport.total_height),
        );
        element.set_content_origin(left, top);
        self.base.refresh_fragment(ctx, fast);
        Ok(())
    }
}
