//! Per-axis scroll state.

use std::fmt;

/// Scroll axis. Rows scroll vertically, columns horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertical => f.write_str("vertical"),
            Self::Horizontal => f.write_str("horizontal"),
        }
    }
}

/// Scroll state of one axis.
///
/// `offset` counts from the end of the leading fixed pane: the first scrollable
/// source index is `fixed_count + offset`. `total` is the end of the scrollable
/// universe, so for rows it excludes the bottom fixed pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisState {
    offset: usize,
    fixed_count: usize,
    total: usize,
    reverse_render: bool,
}

impl AxisState {
    pub fn new(total: usize, fixed_count: usize) -> Self {
        Self {
            offset: 0,
            fixed_count,
            total,
            reverse_render: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed_count
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse_render
    }

    /// Number of units outside the leading fixed pane.
    pub fn scrollable_count(&self) -> usize {
        self.total.saturating_sub(self.fixed_count)
    }

    /// Largest valid offset: `total - fixed_count - 1`, or 0 with nothing to scroll.
    pub fn max_offset(&self) -> usize {
        self.scrollable_count().saturating_sub(1)
    }

    /// First scrollable source index for a forward-anchored window.
    pub fn first_scrollable_index(&self) -> usize {
        self.fixed_count + self.offset
    }

    /// Set the offset, clamped into `[0, max_offset]`.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse_render = reverse && self.scrollable_count() > 0;
    }

    /// Apply new counts (settings change, row deletion) and re-clamp.
    pub fn reconfigure(&mut self, total: usize, fixed_count: usize) {
        self.total = total;
        self.fixed_count = fixed_count;
        self.offset = self.offset.min(self.max_offset());
        if self.scrollable_count() == 0 {
            self.reverse_render = false;
        }
    }
}
