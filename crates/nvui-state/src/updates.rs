#![forbid(unsafe_code)]

//! The change descriptor produced by applying a batch.
//!
//! An `Updates` value tells the presentation layer exactly what to refresh.
//! Values merge associatively, so a caller may accumulate several batches
//! before acting on them.

use ahash::{AHashMap, AHashSet};
use nvui_core::GridId;
use nvui_core::geometry::GridRect;
use smallvec::SmallVec;

/// How much of one grid needs redrawing.
#[derive(Debug, Clone, PartialEq)]
pub enum GridUpdate {
    /// Only these rectangles changed.
    Dirty(SmallVec<[GridRect; 4]>),
    /// The whole grid changed (resize, clear, destroy-and-recreate).
    NeedsDisplay,
}

impl GridUpdate {
    fn push_rect(&mut self, rect: GridRect) {
        if let GridUpdate::Dirty(rects) = self {
            if !rect.is_empty() {
                rects.push(rect);
            }
        }
    }

    fn merge(&mut self, other: GridUpdate) {
        match (self, other) {
            (this @ GridUpdate::Dirty(_), GridUpdate::NeedsDisplay) => {
                *this = GridUpdate::NeedsDisplay;
            }
            (GridUpdate::Dirty(rects), GridUpdate::Dirty(other)) => rects.extend(other),
            (GridUpdate::NeedsDisplay, _) => {}
        }
    }
}

/// Which parts of the tabline changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TablineUpdates {
    /// The tabpage list itself changed (entries added or removed).
    pub tabpages_set: bool,
    /// Only tabpage names changed.
    pub tabpages_content: bool,
    pub selected_tabpage: bool,
    /// The buffer list itself changed.
    pub buffers_set: bool,
    pub selected_buffer: bool,
}

impl TablineUpdates {
    fn merge(&mut self, other: TablineUpdates) {
        self.tabpages_set |= other.tabpages_set;
        self.tabpages_content |= other.tabpages_content;
        self.selected_tabpage |= other.selected_tabpage;
        self.buffers_set |= other.buffers_set;
        self.selected_buffer |= other.selected_buffer;
    }

    /// Whether any part changed.
    pub fn any(&self) -> bool {
        self.tabpages_set
            || self.tabpages_content
            || self.selected_tabpage
            || self.buffers_set
            || self.selected_buffer
    }
}

/// Everything that changed while applying one or more batches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Updates {
    pub appearance: bool,
    pub font: bool,
    pub title: bool,
    pub icon: bool,
    pub busy: bool,
    pub mouse: bool,
    pub mode: bool,
    pub mode_info: bool,
    pub cursor: bool,
    pub cmdlines: bool,
    pub popupmenu: bool,
    pub messages: bool,
    pub bell: bool,
    pub visual_bell: bool,
    pub tabline: TablineUpdates,
    /// Grids whose size, window binding, or placement changed. These need
    /// repositioning and a full repaint.
    pub layout_grids: AHashSet<GridId>,
    /// Per-grid redraw requirements. Membership in `layout_grids`
    /// supersedes this map: a grid listed there needs a full repaint even
    /// when its entry here carries only rectangles, or is absent.
    pub grids: AHashMap<GridId, GridUpdate>,
    /// Grids destroyed during the batch.
    pub destroyed_grids: AHashSet<GridId>,
    /// True when the batch ended with a flush, i.e. the state is
    /// presentable.
    pub needs_flush: bool,
}

impl Updates {
    /// Record a dirty rectangle for one grid.
    pub fn dirty(&mut self, grid: GridId, rect: GridRect) {
        if rect.is_empty() {
            return;
        }
        self.grids
            .entry(grid)
            .or_insert_with(|| GridUpdate::Dirty(SmallVec::new()))
            .push_rect(rect);
    }

    /// Record that one grid needs a full redraw.
    pub fn needs_display(&mut self, grid: GridId) {
        self.grids.insert(grid, GridUpdate::NeedsDisplay);
    }

    /// Record that a grid's size, window binding, or placement changed.
    pub fn layout_changed(&mut self, grid: GridId) {
        self.layout_grids.insert(grid);
    }

    /// Record a destroyed grid, discarding its pending redraws.
    pub fn destroyed(&mut self, grid: GridId) {
        self.grids.remove(&grid);
        self.layout_grids.remove(&grid);
        self.destroyed_grids.insert(grid);
    }

    /// Fold `other` into `self`, preserving the meaning both had.
    pub fn merge(&mut self, other: Updates) {
        self.appearance |= other.appearance;
        self.font |= other.font;
        self.title |= other.title;
        self.icon |= other.icon;
        self.busy |= other.busy;
        self.mouse |= other.mouse;
        self.mode |= other.mode;
        self.mode_info |= other.mode_info;
        self.cursor |= other.cursor;
        self.cmdlines |= other.cmdlines;
        self.popupmenu |= other.popupmenu;
        self.messages |= other.messages;
        self.bell |= other.bell;
        self.visual_bell |= other.visual_bell;
        self.tabline.merge(other.tabline);
        self.layout_grids.extend(other.layout_grids);
        for (grid, update) in other.grids {
            match self.grids.get_mut(&grid) {
                Some(existing) => existing.merge(update),
                None => {
                    self.grids.insert(grid, update);
                }
            }
        }
        for grid in other.destroyed_grids {
            self.destroyed(grid);
        }
        self.needs_flush |= other.needs_flush;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nvui_core::geometry::{GridPoint, GridSize};

    fn rect(column: i64, row: i64, columns: i64, rows: i64) -> GridRect {
        GridRect::new(GridPoint::new(column, row), GridSize::new(columns, rows))
    }

    #[test]
    fn dirty_rects_accumulate() {
        let mut updates = Updates::default();
        updates.dirty(1, rect(0, 0, 2, 1));
        updates.dirty(1, rect(4, 0, 2, 1));
        match updates.grids.get(&1).unwrap() {
            GridUpdate::Dirty(rects) => assert_eq!(rects.len(), 2),
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[test]
    fn needs_display_absorbs_rects() {
        let mut updates = Updates::default();
        updates.dirty(1, rect(0, 0, 2, 1));
        updates.needs_display(1);
        updates.dirty(1, rect(3, 3, 1, 1));
        assert_eq!(updates.grids.get(&1), Some(&GridUpdate::NeedsDisplay));
    }

    #[test]
    fn empty_rects_are_dropped() {
        let mut updates = Updates::default();
        updates.dirty(1, rect(0, 0, 0, 1));
        assert!(updates.grids.is_empty());
    }

    #[test]
    fn destroy_discards_pending_redraws() {
        let mut updates = Updates::default();
        updates.dirty(3, rect(0, 0, 2, 1));
        updates.layout_changed(3);
        updates.destroyed(3);
        assert!(updates.grids.is_empty());
        assert!(updates.layout_grids.is_empty());
        assert!(updates.destroyed_grids.contains(&3));
    }

    #[test]
    fn merge_destroy_wins_over_earlier_dirt() {
        let mut first = Updates::default();
        first.dirty(2, rect(0, 0, 1, 1));
        let mut second = Updates::default();
        second.destroyed(2);
        first.merge(second);
        assert!(first.grids.is_empty());
        assert!(first.destroyed_grids.contains(&2));
    }

    #[test]
    fn merge_unions_flags_and_grids() {
        let mut first = Updates::default();
        first.title = true;
        first.dirty(1, rect(0, 0, 1, 1));
        let mut second = Updates::default();
        second.needs_flush = true;
        second.tabline.selected_tabpage = true;
        second.needs_display(1);
        first.merge(second);
        assert!(first.title);
        assert!(first.needs_flush);
        assert!(first.tabline.any());
        assert_eq!(first.grids.get(&1), Some(&GridUpdate::NeedsDisplay));
    }
}
