#![forbid(unsafe_code)]

//! Incremental reconciliation of server UI events into renderable state.
//!
//! [`UiState`] holds everything a front-end draws from: the grid store with
//! shaped draw runs, the highlight table, cursor and mode tracking, and the
//! auxiliary surfaces (command line, popup menu, tabline, messages).
//! [`apply_events`] folds one decoded batch into it and returns an
//! [`Updates`] descriptor telling the presentation layer what to refresh.

pub mod appearance;
pub mod apply;
pub mod cmdline;
pub mod color;
pub mod content;
pub mod cursor;
pub mod draw_runs;
pub mod font;
pub mod grid;
pub mod layout;
pub mod message;
pub mod popupmenu;
pub mod shaper;
pub mod state;
pub mod tabline;
pub mod updates;

pub use apply::apply_events;
pub use state::UiState;
pub use updates::{GridUpdate, TablineUpdates, Updates};
