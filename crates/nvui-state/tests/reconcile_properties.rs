//! Property tests for the reconciliation invariants.
//!
//! - a row layout partitions its row exactly,
//! - draw-run reuse never changes the shaped output,
//! - a full-width scroll conserves the moved rows,
//! - a resize preserves the top-left intersection,
//! - cursor movement dirties the cells it leaves and enters.

use nvui_core::OUTER_GRID_ID;
use nvui_core::event::UiEvent;
use nvui_core::geometry::{GridPoint, GridRect, GridSize};
use proptest::prelude::*;

use nvui_state::apply_events;
use nvui_state::draw_runs::{RowDrawRun, ShapeContext, SharedRunCache};
use nvui_state::appearance::Appearance;
use nvui_state::font::{FontId, FontMetrics, FontTable};
use nvui_state::layout::{Cell, RowLayout};
use nvui_state::shaper::MonoShaper;
use nvui_state::state::UiState;
use nvui_state::updates::GridUpdate;

// ============================================================================
// Strategies and fixtures
// ============================================================================

fn fixture_fonts() -> (FontTable, FontId) {
    let mut fonts = FontTable::default();
    let font = fonts.intern(FontMetrics {
        family: "Test".to_string(),
        size: 10.0,
        cell_width: 10.0,
        cell_height: 20.0,
        ascent: 15.0,
    });
    (fonts, font)
}

fn new_state() -> UiState {
    UiState::new(FontMetrics {
        family: "Test".to_string(),
        size: 10.0,
        cell_width: 10.0,
        cell_height: 20.0,
        ascent: 15.0,
    })
}

/// Rows of narrow cells with a few highlight ids.
fn cells_strategy(max_len: usize) -> impl Strategy<Value = Vec<Cell>> {
    proptest::collection::vec(("[a-f ]", 0i64..4), 0..max_len).prop_map(|cells| {
        cells
            .into_iter()
            .map(|(text, highlight)| Cell { text, highlight })
            .collect()
    })
}

/// Rows that may also contain double-width heads and their continuations.
fn wide_cells_strategy(max_len: usize) -> impl Strategy<Value = Vec<Cell>> {
    proptest::collection::vec((0u8..3, 0i64..3), 1..max_len).prop_map(|spans| {
        let mut cells = Vec::new();
        for (kind, highlight) in spans {
            match kind {
                0 => cells.push(Cell {
                    text: "a".to_string(),
                    highlight,
                }),
                1 => {
                    cells.push(Cell {
                        text: "你".to_string(),
                        highlight,
                    });
                    cells.push(Cell {
                        text: String::new(),
                        highlight,
                    });
                }
                _ => cells.push(Cell {
                    text: " ".to_string(),
                    highlight,
                }),
            }
        }
        cells
    })
}

fn row_text(cells: &[Cell]) -> String {
    cells.iter().map(|cell| cell.text.as_str()).collect()
}

// ============================================================================
// Row layout
// ============================================================================

proptest! {
    #[test]
    fn layout_partitions_the_row(cells in wide_cells_strategy(24)) {
        let layout = RowLayout::build(&cells);

        let total: usize = layout.parts.iter().map(|part| part.columns).sum();
        prop_assert_eq!(total, cells.len());

        let mut next = 0;
        for part in &layout.parts {
            prop_assert_eq!(part.origin_column, next);
            next += part.columns;
        }

        // Concatenated part text equals the row text.
        let joined: String = layout.parts.iter().map(|part| part.text.as_str()).collect();
        prop_assert_eq!(joined, row_text(&cells));
    }
}

// ============================================================================
// Draw-run reuse fidelity
// ============================================================================

proptest! {
    #[test]
    fn reuse_is_invisible_in_the_output(
        old_cells in cells_strategy(20),
        new_cells in cells_strategy(20),
    ) {
        let (fonts, font) = fixture_fonts();
        let appearance = Appearance::default();
        let shaper = MonoShaper;
        let ctx = ShapeContext {
            shaper: &shaper,
            fonts: &fonts,
            font,
            appearance: &appearance,
        };

        let mut shared = SharedRunCache::default();
        let old_layout = RowLayout::build(&old_cells);
        let old = RowDrawRun::build(&old_layout, None, &mut shared, &ctx);

        let new_layout = RowLayout::build(&new_cells);
        let reused = RowDrawRun::build(&new_layout, Some(&old), &mut shared, &ctx);
        let fresh = RowDrawRun::build(&new_layout, None, &mut SharedRunCache::default(), &ctx);

        prop_assert_eq!(reused.runs.len(), fresh.runs.len());
        for (a, b) in reused.runs.iter().zip(&fresh.runs) {
            prop_assert_eq!(&a.shaped, &b.shaped);
            prop_assert_eq!(a.origin_column, b.origin_column);
            prop_assert_eq!(a.columns, b.columns);
            prop_assert_eq!(&a.text, &b.text);
        }
    }
}

// ============================================================================
// Scroll conservation
// ============================================================================

proptest! {
    #[test]
    fn full_width_scroll_matches_reference_model(
        rows in proptest::collection::vec("[a-d]{6}", 3..8),
        offset in -3i64..4,
    ) {
        let mut state = new_state();
        let height = rows.len() as i64;
        let mut events = vec![UiEvent::GridResize {
            grid: OUTER_GRID_ID,
            width: 6,
            height,
        }];
        for (row, text) in rows.iter().enumerate() {
            events.push(UiEvent::GridLine {
                grid: OUTER_GRID_ID,
                row: row as i64,
                col_start: 0,
                data: text
                    .chars()
                    .map(|c| {
                        nvui_core::value::Value::Array(vec![
                            nvui_core::value::Value::from(c.to_string()),
                            nvui_core::value::Value::Integer(0),
                        ])
                    })
                    .collect(),
                wrap: false,
            });
        }
        events.push(UiEvent::GridScroll {
            grid: OUTER_GRID_ID,
            top: 0,
            bottom: height,
            left: 0,
            right: 6,
            rows: offset,
            columns: 0,
        });
        let mut errors = Vec::new();
        apply_events(&mut state, &events, &MonoShaper, &mut |error| errors.push(error));
        prop_assert!(errors.is_empty());

        // Reference: every destination row inside the region receives the
        // source row's text.
        let grid = state.outer_grid().unwrap();
        for dest in 0..height {
            let src = dest + offset;
            if src < 0 || src >= height {
                continue;
            }
            let actual: String = (0..6)
                .map(|col| grid.cell(GridPoint::new(col, dest)).unwrap().text.clone())
                .collect();
            prop_assert_eq!(&actual, &rows[src as usize]);
        }
    }
}

proptest! {
    /// Scrolling a region by `r` and then by `-r` restores every row that
    /// stayed inside the region through both moves. Rows vacated by the
    /// first scroll keep stale content, so only the surviving band is
    /// asserted; cells outside the region must never change at all.
    #[test]
    fn scroll_then_reverse_scroll_restores_surviving_rows(
        rows in proptest::collection::vec("[a-f]{6}", 3..8),
        offset in -3i64..4,
        left in 0i64..2,
        right in 5i64..7,
    ) {
        let mut state = new_state();
        let height = rows.len() as i64;
        let mut events = vec![UiEvent::GridResize {
            grid: OUTER_GRID_ID,
            width: 6,
            height,
        }];
        for (row, text) in rows.iter().enumerate() {
            events.push(UiEvent::GridLine {
                grid: OUTER_GRID_ID,
                row: row as i64,
                col_start: 0,
                data: text
                    .chars()
                    .map(|c| {
                        nvui_core::value::Value::Array(vec![
                            nvui_core::value::Value::from(c.to_string()),
                            nvui_core::value::Value::Integer(0),
                        ])
                    })
                    .collect(),
                wrap: false,
            });
        }
        let scroll = |rows_offset: i64| UiEvent::GridScroll {
            grid: OUTER_GRID_ID,
            top: 0,
            bottom: height,
            left,
            right,
            rows: rows_offset,
            columns: 0,
        };
        events.push(scroll(offset));
        events.push(scroll(-offset));
        let mut errors = Vec::new();
        apply_events(&mut state, &events, &MonoShaper, &mut |error| errors.push(error));
        prop_assert!(errors.is_empty());

        let grid = state.outer_grid().unwrap();
        let original = |col: i64, row: i64| {
            rows[row as usize]
                .chars()
                .nth(col as usize)
                .unwrap()
                .to_string()
        };
        for row in 0..height {
            for col in (0..left).chain(right..6) {
                prop_assert_eq!(
                    &grid.cell(GridPoint::new(col, row)).unwrap().text,
                    &original(col, row)
                );
            }
        }
        for row in offset.max(0)..height + offset.min(0) {
            for col in 0..6 {
                prop_assert_eq!(
                    &grid.cell(GridPoint::new(col, row)).unwrap().text,
                    &original(col, row)
                );
            }
        }
    }
}

// ============================================================================
// Resize preservation
// ============================================================================

proptest! {
    #[test]
    fn resize_preserves_top_left_intersection(
        rows in proptest::collection::vec("[a-d]{8}", 2..6),
        new_width in 1i64..12,
        new_height in 1i64..8,
    ) {
        let mut state = new_state();
        let height = rows.len() as i64;
        let mut events = vec![UiEvent::GridResize {
            grid: OUTER_GRID_ID,
            width: 8,
            height,
        }];
        for (row, text) in rows.iter().enumerate() {
            events.push(UiEvent::GridLine {
                grid: OUTER_GRID_ID,
                row: row as i64,
                col_start: 0,
                data: text
                    .chars()
                    .map(|c| {
                        nvui_core::value::Value::Array(vec![
                            nvui_core::value::Value::from(c.to_string()),
                            nvui_core::value::Value::Integer(0),
                        ])
                    })
                    .collect(),
                wrap: false,
            });
        }
        events.push(UiEvent::GridResize {
            grid: OUTER_GRID_ID,
            width: new_width,
            height: new_height,
        });
        let mut errors = Vec::new();
        apply_events(&mut state, &events, &MonoShaper, &mut |error| errors.push(error));
        prop_assert!(errors.is_empty());

        let grid = state.outer_grid().unwrap();
        prop_assert_eq!(grid.size(), GridSize::new(new_width, new_height));
        for row in 0..new_height.min(height) {
            for col in 0..new_width.min(8) {
                let expected = rows[row as usize].chars().nth(col as usize).unwrap();
                let actual = &grid.cell(GridPoint::new(col, row)).unwrap().text;
                prop_assert_eq!(actual, &expected.to_string());
            }
        }
        // Newly exposed cells are whitespace.
        if new_width > 8 {
            for row in 0..new_height.min(height) {
                prop_assert_eq!(&grid.cell(GridPoint::new(8, row)).unwrap().text, " ");
            }
        }
    }
}

// ============================================================================
// Cursor invalidation
// ============================================================================

proptest! {
    #[test]
    fn cursor_movement_dirties_both_cells(
        old_col in 0i64..10, old_row in 0i64..6,
        new_col in 0i64..10, new_row in 0i64..6,
    ) {
        let mut state = new_state();
        let mut errors = Vec::new();
        apply_events(
            &mut state,
            &[
                UiEvent::GridResize { grid: OUTER_GRID_ID, width: 10, height: 6 },
                UiEvent::GridCursorGoto { grid: OUTER_GRID_ID, row: old_row, column: old_col },
            ],
            &MonoShaper,
            &mut |error| errors.push(error),
        );
        let updates = apply_events(
            &mut state,
            &[UiEvent::GridCursorGoto { grid: OUTER_GRID_ID, row: new_row, column: new_col }],
            &MonoShaper,
            &mut |error| errors.push(error),
        );
        prop_assert!(errors.is_empty());

        let rects: Vec<GridRect> = match updates.grids.get(&OUTER_GRID_ID) {
            Some(GridUpdate::Dirty(rects)) => rects.to_vec(),
            other => {
                return Err(proptest::test_runner::TestCaseError::fail(format!(
                    "unexpected update: {other:?}"
                )));
            }
        };
        let covered = |point: GridPoint| rects.iter().any(|rect| rect.contains(point));
        prop_assert!(covered(GridPoint::new(old_col, old_row)));
        prop_assert!(covered(GridPoint::new(new_col, new_row)));

        // Movement within one row is a single spanning rectangle.
        if old_row == new_row {
            prop_assert_eq!(rects.len(), 1);
            let span = (old_col - new_col).abs() + 1;
            prop_assert_eq!(rects[0].size, GridSize::new(span, 1));
        }
    }
}
