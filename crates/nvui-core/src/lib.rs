#![forbid(unsafe_code)]

//! Core: protocol value model, decoded UI events, grid geometry, and errors.

pub mod error;
pub mod event;
pub mod geometry;
pub mod value;

/// Identifier of a grid. Grid `1` is the outer (root) grid.
pub type GridId = i64;

/// Identifier of a highlight attribute definition. Id `0` is the default
/// highlight and is never stored explicitly.
pub type HighlightId = i64;

/// The id of the outer (root) grid.
pub const OUTER_GRID_ID: GridId = 1;

/// The default highlight id.
pub const DEFAULT_HIGHLIGHT_ID: HighlightId = 0;
