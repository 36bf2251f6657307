//! Coordinate, range and selection types shared by every component.

mod cell;
mod range;
mod selection;

pub use cell::*;
pub use range::*;
pub use selection::*;
