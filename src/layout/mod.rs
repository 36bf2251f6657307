//! Layout engine: per-axis scroll state and render window computation.
//!
//! This module handles:
//! - Deciding which rows and columns are materialised for a scroll offset
//! - Mapping rendered indices back to source indices
//! - Measuring the viewport left to the scrollable region
//! - Caching row and column positions between settings changes

mod axis;
mod calculator;
mod filter;
mod positions;
mod viewport;

pub use axis::{Axis, AxisState};
pub use calculator::{fully_visible_count, sum_sizes, trailing_start, RenderCalculator, RenderWindow};
pub use filter::{ColumnFilter, IndexFilter, RowFilter};
pub use positions::{AxisPositions, GridPositions};
pub use viewport::Viewport;
