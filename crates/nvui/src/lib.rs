#![forbid(unsafe_code)]

//! Public facade crate.
//!
//! Re-exports the common types from the internal crates and offers a
//! lightweight prelude for day-to-day usage.

// --- Core re-exports -------------------------------------------------------

pub use nvui_core::error::UiError;
pub use nvui_core::event::{UiEvent, decode_batch};
pub use nvui_core::geometry::{GridPoint, GridRect, GridSize};
pub use nvui_core::value::{ExtHandle, Value};
pub use nvui_core::{DEFAULT_HIGHLIGHT_ID, GridId, HighlightId, OUTER_GRID_ID};

// --- State re-exports ------------------------------------------------------

pub use nvui_state::appearance::{Appearance, Decorations, Highlight, ObservedHighlightName};
pub use nvui_state::apply::apply_events;
pub use nvui_state::cmdline::{Cmdline, Cmdlines};
pub use nvui_state::color::Color;
pub use nvui_state::content::ContentPart;
pub use nvui_state::cursor::{Cursor, CursorShape, CursorStyle, Mode, ModeInfo};
pub use nvui_state::draw_runs::{DrawRun, RowDrawRun, ShapeContext, SharedRunCache};
pub use nvui_state::font::{FontId, FontMetrics, FontTable};
pub use nvui_state::grid::{Anchor, AssociatedWindow, Grid, Row};
pub use nvui_state::layout::{Cell, RowLayout, RowPart};
pub use nvui_state::message::{Message, MessageKind, Messages};
pub use nvui_state::popupmenu::{Popupmenu, PopupmenuAnchor, PopupmenuItem};
pub use nvui_state::shaper::{MonoShaper, ShapedGlyph, ShapedRun, TextShaper};
pub use nvui_state::state::UiState;
pub use nvui_state::tabline::{Buffer, Tabline, Tabpage};
pub use nvui_state::updates::{GridUpdate, TablineUpdates, Updates};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Cell, Cursor, FontMetrics, Grid, GridId, GridPoint, GridRect, GridSize, GridUpdate,
        MonoShaper, TextShaper, UiError, UiEvent, UiState, Updates, Value, apply_events,
        decode_batch,
    };
}
