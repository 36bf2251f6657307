//! Rendering layer with pluggable DOM backends.
//!
//! This module provides:
//! - The `DomBackend` trait and the geometry it measures
//! - Table fragments built from row and column filters
//! - The selection reconciler and border objects
//! - An in-memory backend, and a `web-sys` backend on wasm32

pub mod backend;
pub mod border;
pub mod memory;
pub mod selection;
pub mod table;

#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-export commonly used types
pub use backend::{DomBackend, Geometry, PaneChanges, Rect, TrimmingContainer};
pub use border::{Border, BorderRect, BorderRegistry};
pub use memory::{CommittedPane, DomEvent, MemoryDom};
pub use selection::draw_selection;
pub use table::{HeaderBands, RenderedCell, RenderedLine, TableFragment};

#[cfg(target_arch = "wasm32")]
pub use web::WebDom;
