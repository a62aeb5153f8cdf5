#![forbid(unsafe_code)]

//! Per-grid cell store and its derived layouts and draw runs.
//!
//! Each row keeps its cells, the highlight-uniform layout chunked from
//! them, and the shaped draw runs, updated together so a grid is always
//! renderable. Vertical scrolls of a full-width region move whole rows
//! without reshaping; everything else reshapes only the rows it touches.

use nvui_core::GridId;
use nvui_core::geometry::{GridPoint, GridRect, GridSize};
use nvui_core::value::ExtHandle;

use crate::draw_runs::{RowDrawRun, ShapeContext, SharedRunCache};
use crate::layout::{Cell, RowLayout};

/// Placement of a floating window relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Anchor {
    /// Parse the protocol's anchor string.
    pub fn parse(value: &str) -> Option<Anchor> {
        Some(match value {
            "NW" => Anchor::NorthWest,
            "NE" => Anchor::NorthEast,
            "SW" => Anchor::SouthWest,
            "SE" => Anchor::SouthEast,
            _ => return None,
        })
    }
}

/// The window a grid is bound to, with its placement.
///
/// `ordinal` increases monotonically across every placement event, so a
/// later placement always stacks above an earlier one within the same
/// z-index band.
#[derive(Debug, Clone, PartialEq)]
pub enum AssociatedWindow {
    Plain {
        window: ExtHandle,
        frame: GridRect,
        ordinal: u64,
    },
    Floating {
        window: ExtHandle,
        anchor: Anchor,
        anchor_grid: GridId,
        anchor_row: f64,
        anchor_column: f64,
        focusable: bool,
        z_index: i64,
        ordinal: u64,
    },
    External {
        window: ExtHandle,
    },
}

/// One grid row: cells plus everything derived from them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<Cell>,
    pub layout: RowLayout,
    pub runs: RowDrawRun,
}

impl Row {
    fn blank(columns: usize, shared: &mut SharedRunCache, ctx: &ShapeContext<'_>) -> Row {
        let mut row = Row {
            cells: vec![Cell::whitespace(); columns],
            ..Row::default()
        };
        row.reshape(shared, ctx);
        row
    }

    fn reshape(&mut self, shared: &mut SharedRunCache, ctx: &ShapeContext<'_>) {
        let layout = RowLayout::build(&self.cells);
        let previous = std::mem::take(&mut self.runs);
        self.runs = RowDrawRun::build(&layout, Some(&previous), shared, ctx);
        self.layout = layout;
    }
}

/// One grid: a rectangle of cells bound to at most one window.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub id: GridId,
    size: GridSize,
    rows: Vec<Row>,
    pub window: Option<AssociatedWindow>,
    pub hidden: bool,
}

impl Grid {
    /// Create a grid filled with default-highlight whitespace.
    pub fn new(
        id: GridId,
        size: GridSize,
        shared: &mut SharedRunCache,
        ctx: &ShapeContext<'_>,
    ) -> Grid {
        let columns = size.columns.max(0) as usize;
        let row_count = size.rows.max(0) as usize;
        Grid {
            id,
            size: GridSize::new(columns as i64, row_count as i64),
            rows: (0..row_count).map(|_| Row::blank(columns, shared, ctx)).collect(),
            window: None,
            hidden: false,
        }
    }

    /// Current size in cells.
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// The grid's full rectangle at the origin.
    #[inline]
    pub fn frame(&self) -> GridRect {
        GridRect::from_size(self.size)
    }

    /// The rows in top-to-bottom order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The cell at `point`, if in bounds.
    pub fn cell(&self, point: GridPoint) -> Option<&Cell> {
        if point.row < 0 || point.column < 0 {
            return None;
        }
        self.rows
            .get(point.row as usize)?
            .cells
            .get(point.column as usize)
    }

    /// Resize, preserving content in the top-left intersection. New cells
    /// are default-highlight whitespace.
    pub fn resize(&mut self, size: GridSize, shared: &mut SharedRunCache, ctx: &ShapeContext<'_>) {
        let columns = size.columns.max(0) as usize;
        let row_count = size.rows.max(0) as usize;
        self.rows.truncate(row_count);
        for row in &mut self.rows {
            if row.cells.len() != columns {
                row.cells.resize_with(columns, Cell::whitespace);
                row.reshape(shared, ctx);
            }
        }
        while self.rows.len() < row_count {
            self.rows.push(Row::blank(columns, shared, ctx));
        }
        self.size = GridSize::new(columns as i64, row_count as i64);
    }

    /// Reset every cell to default-highlight whitespace.
    pub fn clear(&mut self, shared: &mut SharedRunCache, ctx: &ShapeContext<'_>) {
        for row in &mut self.rows {
            row.cells.fill(Cell::whitespace());
            row.reshape(shared, ctx);
        }
    }

    /// Rebuild every row's runs from scratch. Used after a font change,
    /// when old runs must not be reused.
    pub fn reshape_all(&mut self, shared: &mut SharedRunCache, ctx: &ShapeContext<'_>) {
        for row in &mut self.rows {
            row.layout = RowLayout::build(&row.cells);
            row.runs = RowDrawRun::build(&row.layout, None, shared, ctx);
        }
    }

    /// Splice `cells` into one row starting at `col_start` and reshape it.
    ///
    /// Returns the dirty rectangle, or `None` when the target is entirely
    /// out of bounds. A span overrunning the right edge is truncated.
    pub fn update_row(
        &mut self,
        row_index: i64,
        col_start: i64,
        cells: &[Cell],
        shared: &mut SharedRunCache,
        ctx: &ShapeContext<'_>,
    ) -> Option<GridRect> {
        if row_index < 0 || col_start < 0 {
            return None;
        }
        let row = self.rows.get_mut(row_index as usize)?;
        let start = col_start as usize;
        if start >= row.cells.len() {
            return None;
        }
        let len = cells.len().min(row.cells.len() - start);
        if len == 0 {
            return Some(GridRect::new(
                GridPoint::new(col_start, row_index),
                GridSize::new(0, 1),
            ));
        }
        row.cells[start..start + len].clone_from_slice(&cells[..len]);
        row.reshape(shared, ctx);
        Some(GridRect::new(
            GridPoint::new(col_start, row_index),
            GridSize::new(len as i64, 1),
        ))
    }

    /// Scroll `region` vertically by `offset_rows` (positive moves content
    /// up). Returns the destination rectangle that now needs redisplay.
    ///
    /// Rows vacated at the region edge keep stale content; the server
    /// always follows with line updates for them.
    pub fn scroll(
        &mut self,
        region: GridRect,
        offset_rows: i64,
        shared: &mut SharedRunCache,
        ctx: &ShapeContext<'_>,
    ) -> GridRect {
        let region = region.intersection(&self.frame());
        let dest = region.shifted_by(0, -offset_rows).intersection(&region);
        if region.is_empty() || offset_rows == 0 || dest.is_empty() {
            return dest;
        }

        let full_width = region.min_column() == 0 && region.max_column() == self.size.columns;
        if full_width {
            // Whole rows move; layouts and runs travel with them.
            if offset_rows > 0 {
                for row in region.min_row()..region.max_row() - offset_rows {
                    self.rows.swap(row as usize, (row + offset_rows) as usize);
                }
            } else {
                for row in (region.min_row() - offset_rows..region.max_row()).rev() {
                    self.rows.swap(row as usize, (row + offset_rows) as usize);
                }
            }
        } else {
            let start = region.min_column() as usize;
            let end = region.max_column() as usize;
            let mut copy = |dest_row: i64| {
                let source_row = (dest_row + offset_rows) as usize;
                let span = self.rows[source_row].cells[start..end].to_vec();
                let row = &mut self.rows[dest_row as usize];
                row.cells[start..end].clone_from_slice(&span);
                row.reshape(shared, ctx);
            };
            if offset_rows > 0 {
                for row in region.min_row()..region.max_row() - offset_rows {
                    copy(row);
                }
            } else {
                for row in (region.min_row() - offset_rows..region.max_row()).rev() {
                    copy(row);
                }
            }
        }
        dest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appearance::Appearance;
    use crate::font::{FontId, FontMetrics, FontTable};
    use crate::shaper::MonoShaper;

    struct Fixture {
        fonts: FontTable,
        font: FontId,
        appearance: Appearance,
        shaper: MonoShaper,
        shared: SharedRunCache,
    }

    impl Fixture {
        fn new() -> Fixture {
            let mut fonts = FontTable::default();
            let font = fonts.intern(FontMetrics {
                family: "Test".to_string(),
                size: 10.0,
                cell_width: 10.0,
                cell_height: 20.0,
                ascent: 15.0,
            });
            Fixture {
                fonts,
                font,
                appearance: Appearance::default(),
                shaper: MonoShaper,
                shared: SharedRunCache::default(),
            }
        }

        fn with_ctx<R>(&mut self, f: impl FnOnce(&mut SharedRunCache, &ShapeContext<'_>) -> R) -> R {
            let ctx = ShapeContext {
                shaper: &self.shaper,
                fonts: &self.fonts,
                font: self.font,
                appearance: &self.appearance,
            };
            f(&mut self.shared, &ctx)
        }
    }

    fn text_cells(text: &str) -> Vec<Cell> {
        text.chars()
            .map(|c| Cell {
                text: c.to_string(),
                highlight: 0,
            })
            .collect()
    }

    fn row_text(grid: &Grid, row: usize) -> String {
        grid.rows()[row].cells.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn new_grid_is_whitespace() {
        let mut fx = Fixture::new();
        let grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(4, 2), shared, ctx));
        assert_eq!(grid.size(), GridSize::new(4, 2));
        assert_eq!(row_text(&grid, 0), "    ");
        assert_eq!(grid.rows()[1].layout.parts.len(), 1);
    }

    #[test]
    fn update_row_splices_and_reports_dirty_rect() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(6, 2), shared, ctx));
        let dirty = fx.with_ctx(|shared, ctx| {
            grid.update_row(1, 2, &text_cells("ab"), shared, ctx)
        });
        assert_eq!(
            dirty,
            Some(GridRect::new(GridPoint::new(2, 1), GridSize::new(2, 1)))
        );
        assert_eq!(row_text(&grid, 1), "  ab  ");
    }

    #[test]
    fn update_row_truncates_at_right_edge() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(4, 1), shared, ctx));
        let dirty = fx.with_ctx(|shared, ctx| {
            grid.update_row(0, 2, &text_cells("abcd"), shared, ctx)
        });
        assert_eq!(
            dirty,
            Some(GridRect::new(GridPoint::new(2, 0), GridSize::new(2, 1)))
        );
        assert_eq!(row_text(&grid, 0), "  ab");
    }

    #[test]
    fn update_row_out_of_bounds_is_none() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(4, 1), shared, ctx));
        let dirty = fx.with_ctx(|shared, ctx| {
            grid.update_row(5, 0, &text_cells("a"), shared, ctx)
        });
        assert_eq!(dirty, None);
    }

    #[test]
    fn resize_preserves_top_left() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(4, 2), shared, ctx));
        fx.with_ctx(|shared, ctx| {
            grid.update_row(0, 0, &text_cells("abcd"), shared, ctx);
        });
        fx.with_ctx(|shared, ctx| grid.resize(GridSize::new(2, 3), shared, ctx));
        assert_eq!(grid.size(), GridSize::new(2, 3));
        assert_eq!(row_text(&grid, 0), "ab");
        assert_eq!(row_text(&grid, 2), "  ");
    }

    #[test]
    fn clear_resets_to_whitespace() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(3, 1), shared, ctx));
        fx.with_ctx(|shared, ctx| {
            grid.update_row(0, 0, &text_cells("xyz"), shared, ctx);
        });
        fx.with_ctx(|shared, ctx| grid.clear(shared, ctx));
        assert_eq!(row_text(&grid, 0), "   ");
    }

    #[test]
    fn full_width_scroll_up_moves_rows() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(3, 4), shared, ctx));
        for (row, text) in ["aaa", "bbb", "ccc", "ddd"].iter().enumerate() {
            fx.with_ctx(|shared, ctx| {
                grid.update_row(row as i64, 0, &text_cells(text), shared, ctx);
            });
        }
        let region = GridRect::from_size(GridSize::new(3, 4));
        let dest = fx.with_ctx(|shared, ctx| grid.scroll(region, 1, shared, ctx));
        assert_eq!(row_text(&grid, 0), "bbb");
        assert_eq!(row_text(&grid, 1), "ccc");
        assert_eq!(row_text(&grid, 2), "ddd");
        assert_eq!(dest.rows(), 0..3);
    }

    #[test]
    fn full_width_scroll_down_moves_rows() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(3, 3), shared, ctx));
        for (row, text) in ["aaa", "bbb", "ccc"].iter().enumerate() {
            fx.with_ctx(|shared, ctx| {
                grid.update_row(row as i64, 0, &text_cells(text), shared, ctx);
            });
        }
        let region = GridRect::from_size(GridSize::new(3, 3));
        let dest = fx.with_ctx(|shared, ctx| grid.scroll(region, -1, shared, ctx));
        assert_eq!(row_text(&grid, 1), "aaa");
        assert_eq!(row_text(&grid, 2), "bbb");
        assert_eq!(dest.rows(), 1..3);
    }

    #[test]
    fn full_width_scroll_keeps_runs_without_reshaping() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(5, 3), shared, ctx));
        fx.with_ctx(|shared, ctx| {
            grid.update_row(1, 0, &text_cells("hello"), shared, ctx);
        });
        let before = grid.rows()[1].runs.clone();
        let region = GridRect::from_size(GridSize::new(5, 3));
        fx.with_ctx(|shared, ctx| {
            grid.scroll(region, 1, shared, ctx);
        });
        assert_eq!(grid.rows()[0].runs, before);
    }

    #[test]
    fn partial_width_scroll_copies_sub_range() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(6, 2), shared, ctx));
        fx.with_ctx(|shared, ctx| {
            grid.update_row(0, 0, &text_cells("aaaXXa"), shared, ctx);
            grid.update_row(1, 0, &text_cells("bbbYYb"), shared, ctx);
        });
        // Scroll only columns 3..5 up by one row.
        let region = GridRect::new(GridPoint::new(3, 0), GridSize::new(2, 2));
        fx.with_ctx(|shared, ctx| {
            grid.scroll(region, 1, shared, ctx);
        });
        assert_eq!(row_text(&grid, 0), "aaaYYa");
        assert_eq!(row_text(&grid, 1), "bbbYYb");
    }

    #[test]
    fn scroll_region_clamped_to_grid() {
        let mut fx = Fixture::new();
        let mut grid = fx.with_ctx(|shared, ctx| Grid::new(2, GridSize::new(3, 2), shared, ctx));
        let region = GridRect::from_size(GridSize::new(10, 10));
        let dest = fx.with_ctx(|shared, ctx| grid.scroll(region, 1, shared, ctx));
        assert_eq!(dest.rows(), 0..1);
        assert_eq!(dest.columns(), 0..3);
    }
}
