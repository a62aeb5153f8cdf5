#![forbid(unsafe_code)]

//! The aggregate engine state.

use ahash::AHashMap;
use nvui_core::value::Value;
use nvui_core::{GridId, OUTER_GRID_ID};

use crate::appearance::Appearance;
use crate::cmdline::Cmdlines;
use crate::cursor::{Cursor, CursorStyle, Mode, ModeInfo};
use crate::draw_runs::{ShapeContext, SharedRunCache};
use crate::font::{FontId, FontMetrics, FontTable};
use crate::grid::Grid;
use crate::message::Messages;
use crate::popupmenu::Popupmenu;
use crate::shaper::TextShaper;
use crate::tabline::Tabline;
use crate::updates::Updates;

/// Everything the presentation layer renders from.
///
/// Mutated only by the event applier and by [`UiState::set_font`]; reads
/// between flushes observe a consistent snapshot.
#[derive(Debug)]
pub struct UiState {
    pub grids: AHashMap<GridId, Grid>,
    pub appearance: Appearance,
    pub fonts: FontTable,
    /// The font used for shaping.
    pub font: FontId,
    pub shared_runs: SharedRunCache,
    pub cursor: Option<Cursor>,
    pub mode: Mode,
    pub mode_info: ModeInfo,
    pub cmdlines: Cmdlines,
    pub popupmenu: Option<Popupmenu>,
    pub tabline: Tabline,
    pub messages: Messages,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub busy: bool,
    pub mouse_enabled: bool,
    /// UI options as last sent, stored verbatim.
    pub options: AHashMap<String, Value>,
    pub(crate) next_window_ordinal: u64,
}

impl UiState {
    /// Create a state shaping with the given font.
    pub fn new(font: FontMetrics) -> UiState {
        let mut fonts = FontTable::default();
        let font = fonts.intern(font);
        UiState {
            grids: AHashMap::new(),
            appearance: Appearance::default(),
            fonts,
            font,
            shared_runs: SharedRunCache::default(),
            cursor: None,
            mode: Mode::default(),
            mode_info: ModeInfo::default(),
            cmdlines: Cmdlines::default(),
            popupmenu: None,
            tabline: Tabline::default(),
            messages: Messages::default(),
            title: None,
            icon: None,
            busy: false,
            mouse_enabled: true,
            options: AHashMap::new(),
            next_window_ordinal: 0,
        }
    }

    /// The outer (root) grid, once the server has created it.
    pub fn outer_grid(&self) -> Option<&Grid> {
        self.grids.get(&OUTER_GRID_ID)
    }

    /// The cursor style of the active mode.
    ///
    /// `None` when mode styling is disabled, no styles were published, or
    /// the engine is busy; the cursor is not drawn then.
    pub fn current_cursor_style(&self) -> Option<&CursorStyle> {
        if self.busy || !self.mode_info.cursor_style_enabled {
            return None;
        }
        self.mode_info.styles.get(self.mode.style_index)
    }

    /// Switch the shaping font, reshaping every grid. All grids need a
    /// full redraw afterwards.
    pub fn set_font(&mut self, metrics: FontMetrics, shaper: &dyn TextShaper) -> Updates {
        self.font = self.fonts.intern(metrics);
        self.shared_runs.clear();
        let ctx = ShapeContext {
            shaper,
            fonts: &self.fonts,
            font: self.font,
            appearance: &self.appearance,
        };
        let mut updates = Updates {
            font: true,
            ..Updates::default()
        };
        for grid in self.grids.values_mut() {
            grid.reshape_all(&mut self.shared_runs, &ctx);
            updates.needs_display(grid.id);
        }
        updates
    }

    pub(crate) fn next_ordinal(&mut self) -> u64 {
        self.next_window_ordinal += 1;
        self.next_window_ordinal
    }
}
