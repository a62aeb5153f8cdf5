#![forbid(unsafe_code)]

//! The single-pass event applier.
//!
//! [`apply_events`] folds one decoded batch into the state and returns the
//! change descriptor. Events apply strictly in order. A failing event is
//! reported through the callback and skipped; the rest of the batch still
//! applies. The result's `needs_flush` is set only when the batch ends
//! with `flush`, i.e. the state is consistent and presentable.

use ahash::AHashMap;
use nvui_core::error::UiError;
use unicode_segmentation::UnicodeSegmentation;
use nvui_core::event::UiEvent;
use nvui_core::geometry::{GridPoint, GridRect, GridSize};
use nvui_core::{DEFAULT_HIGHLIGHT_ID, GridId};

use crate::appearance::{Highlight, ObservedHighlightName};
use crate::cmdline::Cmdline;
use crate::color::Color;
use crate::content::ContentPart;
use crate::cursor::{Cursor, CursorStyle, Mode, ModeInfo};
use crate::draw_runs::{ShapeContext, SharedRunCache};
use crate::grid::{Anchor, AssociatedWindow, Grid};
use crate::layout::Cell;
use crate::message::{Message, MessageKind};
use crate::popupmenu::{Popupmenu, PopupmenuAnchor, PopupmenuItem};
use crate::shaper::TextShaper;
use crate::state::UiState;
use crate::tabline::{Buffer, Tabline, Tabpage};
use crate::updates::Updates;
use nvui_core::value::Value;

/// Apply one decoded batch to the state.
///
/// Errors are localized: each is reported through `report` together with
/// skipping only the event that raised it.
pub fn apply_events(
    state: &mut UiState,
    events: &[UiEvent],
    shaper: &dyn TextShaper,
    report: &mut dyn FnMut(UiError),
) -> Updates {
    tracing::trace!(events = events.len(), "applying ui event batch");
    let mut updates = Updates::default();
    for event in events {
        if let Err(error) = apply_event(state, event, shaper, &mut updates, report) {
            report(error);
        }
    }
    updates.needs_flush = matches!(events.last(), Some(UiEvent::Flush));
    updates
}

fn apply_event(
    state: &mut UiState,
    event: &UiEvent,
    shaper: &dyn TextShaper,
    updates: &mut Updates,
    report: &mut dyn FnMut(UiError),
) -> Result<(), UiError> {
    match event {
        UiEvent::ModeInfoSet {
            cursor_style_enabled,
            cursor_styles,
        } => {
            state.mode_info = ModeInfo {
                cursor_style_enabled: *cursor_style_enabled,
                styles: cursor_styles.iter().map(CursorStyle::decode).collect(),
            };
            updates.mode_info = true;
            updates.cursor = true;
            // The rendered cursor shape may change even in place.
            if let Some(cursor) = state.cursor {
                updates.dirty(cursor.grid, GridRect::cell(cursor.position));
            }
        }

        UiEvent::ModeChange { mode, mode_idx } => {
            state.mode = Mode {
                name: mode.clone(),
                style_index: usize::try_from(*mode_idx).unwrap_or(0),
            };
            updates.mode = true;
            updates.cursor = true;
            if let Some(cursor) = state.cursor {
                updates.dirty(cursor.grid, GridRect::cell(cursor.position));
            }
        }

        UiEvent::SetTitle { title } => {
            state.title = Some(title.clone());
            updates.title = true;
        }

        UiEvent::SetIcon { icon } => {
            state.icon = Some(icon.clone());
            updates.icon = true;
        }

        UiEvent::OptionSet { name, value } => {
            state.options.insert(name.clone(), value.clone());
        }

        UiEvent::DefaultColorsSet {
            rgb_fg,
            rgb_bg,
            rgb_sp,
        } => {
            let appearance = &mut state.appearance;
            appearance.default_foreground =
                Color::from_protocol(*rgb_fg).unwrap_or(Color::WHITE);
            appearance.default_background =
                Color::from_protocol(*rgb_bg).unwrap_or(Color::BLACK);
            appearance.default_special = Color::from_protocol(*rgb_sp).unwrap_or(Color::WHITE);
            updates.appearance = true;
            for id in state.grids.keys() {
                updates.needs_display(*id);
            }
        }

        UiEvent::HlAttrDefine {
            id,
            rgb_attrs,
            info,
        } => {
            state.appearance.define(*id, Highlight::from_attrs(rgb_attrs)?);
            for entry in info {
                let Some(name) = entry.map_get("hl_name").and_then(Value::as_str) else {
                    continue;
                };
                if let Some(observed) = ObservedHighlightName::parse(name) {
                    state.appearance.observe(observed, *id);
                }
            }
            updates.appearance = true;
        }

        // Group-to-id bindings are already covered by the definition
        // metadata above.
        UiEvent::HlGroupSet { .. } => {}

        UiEvent::GridResize {
            grid,
            width,
            height,
        } => {
            let size = GridSize::new(*width, *height);
            let (grids, shared_runs, ctx) = split_shape(state, shaper);
            match grids.get_mut(grid) {
                Some(existing) => existing.resize(size, shared_runs, &ctx),
                None => {
                    let created = Grid::new(*grid, size, shared_runs, &ctx);
                    grids.insert(*grid, created);
                }
            }
            if let Some(cursor) = state.cursor {
                if cursor.grid == *grid
                    && (cursor.position.column >= *width || cursor.position.row >= *height)
                {
                    state.cursor = None;
                    updates.cursor = true;
                }
            }
            updates.layout_changed(*grid);
        }

        UiEvent::GridClear { grid } => {
            let (grids, shared_runs, ctx) = split_shape(state, shaper);
            let target = grids
                .get_mut(grid)
                .ok_or_else(|| UiError::inconsistency(format!("grid_clear: unknown grid {grid}")))?;
            target.clear(shared_runs, &ctx);
            updates.needs_display(*grid);
        }

        UiEvent::GridCursorGoto { grid, row, column } => {
            if !state.grids.contains_key(grid) {
                return Err(UiError::inconsistency(format!(
                    "grid_cursor_goto: unknown grid {grid}"
                )));
            }
            let cursor = Cursor {
                grid: *grid,
                position: GridPoint::new(*column, *row),
            };
            invalidate_cursor_cells(updates, state.cursor, cursor);
            state.cursor = Some(cursor);
            updates.cursor = true;
        }

        UiEvent::GridLine {
            grid,
            row,
            col_start,
            data,
            wrap: _,
        } => {
            let (grids, shared_runs, ctx) = split_shape(state, shaper);
            let target = grids
                .get_mut(grid)
                .ok_or_else(|| UiError::inconsistency(format!("grid_line: unknown grid {grid}")))?;
            let room = (target.size().columns - col_start).max(0) as usize;
            let cells = decode_line_cells(data, room)?;
            let dirty = target
                .update_row(*row, *col_start, &cells, shared_runs, &ctx)
                .ok_or_else(|| {
                    UiError::inconsistency(format!(
                        "grid_line: row {row} col {col_start} outside grid {grid}"
                    ))
                })?;
            updates.dirty(*grid, dirty);
        }

        UiEvent::GridScroll {
            grid,
            top,
            bottom,
            left,
            right,
            rows,
            columns,
        } => {
            if *columns != 0 {
                report(UiError::unsupported(format!(
                    "grid_scroll: horizontal offset {columns} on grid {grid}"
                )));
            }
            let (grids, shared_runs, ctx) = split_shape(state, shaper);
            let target = grids
                .get_mut(grid)
                .ok_or_else(|| UiError::inconsistency(format!("grid_scroll: unknown grid {grid}")))?;
            let region = GridRect::new(
                GridPoint::new(*left, *top),
                GridSize::new(right - left, bottom - top),
            );
            let dest = target.scroll(region, *rows, shared_runs, &ctx);
            updates.dirty(*grid, dest);
        }

        UiEvent::GridDestroy { grid } => {
            if state.grids.remove(grid).is_none() {
                return Err(UiError::inconsistency(format!(
                    "grid_destroy: unknown grid {grid}"
                )));
            }
            if state.cursor.map(|cursor| cursor.grid) == Some(*grid) {
                state.cursor = None;
                updates.cursor = true;
            }
            updates.destroyed(*grid);
        }

        UiEvent::WinPos {
            grid,
            window,
            start_row,
            start_column,
            width,
            height,
        } => {
            let ordinal = state.next_ordinal();
            let target = state
                .grids
                .get_mut(grid)
                .ok_or_else(|| UiError::inconsistency(format!("win_pos: unknown grid {grid}")))?;
            target.window = Some(AssociatedWindow::Plain {
                window: window.clone(),
                frame: GridRect::new(
                    GridPoint::new(*start_column, *start_row),
                    GridSize::new(*width, *height),
                ),
                ordinal,
            });
            target.hidden = false;
            updates.layout_changed(*grid);
        }

        UiEvent::WinFloatPos {
            grid,
            window,
            anchor,
            anchor_grid,
            anchor_row,
            anchor_column,
            focusable,
            z_index,
        } => {
            let anchor = Anchor::parse(anchor).ok_or_else(|| {
                UiError::decode(format!("win_float_pos: unknown anchor {anchor:?}"))
            })?;
            let ordinal = state.next_ordinal();
            let target = state.grids.get_mut(grid).ok_or_else(|| {
                UiError::inconsistency(format!("win_float_pos: unknown grid {grid}"))
            })?;
            target.window = Some(AssociatedWindow::Floating {
                window: window.clone(),
                anchor,
                anchor_grid: *anchor_grid,
                anchor_row: *anchor_row,
                anchor_column: *anchor_column,
                focusable: *focusable,
                z_index: *z_index,
                ordinal,
            });
            target.hidden = false;
            updates.layout_changed(*grid);
        }

        UiEvent::WinExternalPos { grid, window } => {
            let target = state.grids.get_mut(grid).ok_or_else(|| {
                UiError::inconsistency(format!("win_external_pos: unknown grid {grid}"))
            })?;
            target.window = Some(AssociatedWindow::External {
                window: window.clone(),
            });
            target.hidden = false;
            updates.layout_changed(*grid);
        }

        UiEvent::WinHide { grid } => {
            let target = state
                .grids
                .get_mut(grid)
                .ok_or_else(|| UiError::inconsistency(format!("win_hide: unknown grid {grid}")))?;
            target.hidden = true;
            updates.layout_changed(*grid);
        }

        UiEvent::WinClose { grid } => {
            let target = state
                .grids
                .get_mut(grid)
                .ok_or_else(|| UiError::inconsistency(format!("win_close: unknown grid {grid}")))?;
            target.window = None;
            target.hidden = false;
            updates.layout_changed(*grid);
        }

        UiEvent::PopupmenuShow {
            items,
            selected,
            row,
            column,
            grid,
        } => {
            let items: Vec<PopupmenuItem> = items
                .iter()
                .filter_map(|item| match PopupmenuItem::decode(item) {
                    Ok(item) => Some(item),
                    Err(error) => {
                        report(error);
                        None
                    }
                })
                .collect();
            let anchor = if *grid < 0 {
                PopupmenuAnchor::Cmdline { column: *column }
            } else {
                PopupmenuAnchor::Grid {
                    grid: *grid,
                    position: GridPoint::new(*column, *row),
                }
            };
            let mut menu = Popupmenu {
                items,
                selected: None,
                anchor,
            };
            menu.selected = menu.selection_from_protocol(*selected);
            state.popupmenu = Some(menu);
            updates.popupmenu = true;
        }

        UiEvent::PopupmenuSelect { selected } => {
            let menu = state.popupmenu.as_mut().ok_or_else(|| {
                UiError::inconsistency("popupmenu_select: no popupmenu shown".to_string())
            })?;
            menu.selected = menu.selection_from_protocol(*selected);
            updates.popupmenu = true;
        }

        UiEvent::PopupmenuHide => {
            if state.popupmenu.take().is_none() {
                return Err(UiError::inconsistency(
                    "popupmenu_hide: no popupmenu shown".to_string(),
                ));
            }
            updates.popupmenu = true;
        }

        UiEvent::TablineUpdate {
            current_tabpage,
            tabpages,
            current_buffer,
            buffers,
        } => {
            let tabpages: Vec<Tabpage> = tabpages
                .iter()
                .filter_map(|entry| match Tabpage::decode(entry) {
                    Ok(tabpage) => Some(tabpage),
                    Err(error) => {
                        report(error);
                        None
                    }
                })
                .collect();
            let buffers: Vec<Buffer> = buffers
                .iter()
                .filter_map(|entry| match Buffer::decode(entry) {
                    Ok(buffer) => Some(buffer),
                    Err(error) => {
                        report(error);
                        None
                    }
                })
                .collect();
            let new = Tabline {
                current_tabpage: Some(current_tabpage.clone()),
                tabpages,
                current_buffer: Some(current_buffer.clone()),
                buffers,
            };
            diff_tabline(updates, &state.tabline, &new);
            state.tabline = new;
        }

        UiEvent::CmdlineShow {
            content,
            pos,
            first_char,
            prompt,
            indent,
            level,
        } => {
            let content = ContentPart::decode_list(content, report);
            state.cmdlines.show(Cmdline {
                content,
                position: *pos,
                first_char: first_char.clone(),
                prompt: prompt.clone(),
                indent: *indent,
                level: *level,
                special_char: String::new(),
                shift_after_special: false,
            });
            updates.cmdlines = true;
        }

        UiEvent::CmdlinePos { pos, level } => {
            if !state.cmdlines.set_position(*pos, *level) {
                return Err(UiError::inconsistency(format!(
                    "cmdline_pos: no cmdline at level {level}"
                )));
            }
            updates.cmdlines = true;
        }

        UiEvent::CmdlineSpecialChar { c, shift, level } => {
            if !state.cmdlines.set_special_char(c.clone(), *shift, *level) {
                return Err(UiError::inconsistency(format!(
                    "cmdline_special_char: no cmdline at level {level}"
                )));
            }
            updates.cmdlines = true;
        }

        UiEvent::CmdlineHide { level } => {
            state.cmdlines.hide(*level);
            updates.cmdlines = true;
        }

        UiEvent::CmdlineBlockShow { lines } => {
            state.cmdlines.block_show(decode_block_lines(lines, report));
            updates.cmdlines = true;
        }

        UiEvent::CmdlineBlockAppend { line } => {
            state
                .cmdlines
                .block_append(ContentPart::decode_list(line, report));
            updates.cmdlines = true;
        }

        UiEvent::CmdlineBlockHide => {
            state.cmdlines.block_hide();
            updates.cmdlines = true;
        }

        UiEvent::MsgShow {
            kind,
            content,
            replace_last,
        } => {
            let message = Message {
                kind: MessageKind::parse(kind),
                content: ContentPart::decode_list(content, report),
            };
            state.messages.show(message, *replace_last);
            updates.messages = true;
        }

        UiEvent::MsgClear => {
            state.messages.clear();
            updates.messages = true;
        }

        UiEvent::BusyStart => {
            state.busy = true;
            updates.busy = true;
            updates.cursor = true;
        }

        UiEvent::BusyStop => {
            state.busy = false;
            updates.busy = true;
            updates.cursor = true;
        }

        UiEvent::MouseOn => {
            state.mouse_enabled = true;
            updates.mouse = true;
        }

        UiEvent::MouseOff => {
            state.mouse_enabled = false;
            updates.mouse = true;
        }

        UiEvent::Bell => updates.bell = true,
        UiEvent::VisualBell => updates.visual_bell = true,

        UiEvent::Suspend | UiEvent::UpdateMenu | UiEvent::Flush => {}
    }
    Ok(())
}

/// Split the state into the grid store, the run cache, and a shaping
/// context borrowing the rest.
fn split_shape<'a>(
    state: &'a mut UiState,
    shaper: &'a dyn TextShaper,
) -> (
    &'a mut AHashMap<GridId, Grid>,
    &'a mut SharedRunCache,
    ShapeContext<'a>,
) {
    let UiState {
        grids,
        shared_runs,
        fonts,
        font,
        appearance,
        ..
    } = state;
    (
        grids,
        shared_runs,
        ShapeContext {
            shaper,
            fonts,
            font: *font,
            appearance,
        },
    )
}

/// Mark the cells the cursor leaves and enters. Movement within one row
/// dirties the spanned columns as a single rectangle; anything else
/// dirties the two cells individually.
fn invalidate_cursor_cells(updates: &mut Updates, old: Option<Cursor>, new: Cursor) {
    match old {
        Some(old) if old.grid == new.grid && old.position.row == new.position.row => {
            let min = old.position.column.min(new.position.column);
            let max = old.position.column.max(new.position.column);
            updates.dirty(
                new.grid,
                GridRect::new(
                    GridPoint::new(min, new.position.row),
                    GridSize::new(max - min + 1, 1),
                ),
            );
        }
        Some(old) => {
            updates.dirty(old.grid, GridRect::cell(old.position));
            updates.dirty(new.grid, GridRect::cell(new.position));
        }
        None => updates.dirty(new.grid, GridRect::cell(new.position)),
    }
}

/// Expand the run-length encoded cells of one `grid_line`. Each entry is
/// `[text]`, `[text, hl_id]`, or `[text, hl_id, repeat]`; a missing id
/// repeats the previous entry's.
///
/// Expansion is capped at `room` cells, the space left in the target row,
/// so an absurd repeat count cannot allocate unboundedly. Entries past the
/// cap are still validated.
fn decode_line_cells(data: &[Value], room: usize) -> Result<Vec<Cell>, UiError> {
    let mut cells = Vec::with_capacity(data.len().min(room));
    let mut highlight = DEFAULT_HIGHLIGHT_ID;
    for entry in data {
        let entry = entry
            .as_array()
            .ok_or_else(|| UiError::decode(format!("grid_line cell: {entry}")))?;
        let (text, id, repeat) = match entry {
            [text] => (text, None, None),
            [text, id] => (text, Some(id), None),
            [text, id, repeat] => (text, Some(id), Some(repeat)),
            _ => {
                return Err(UiError::decode(format!(
                    "grid_line cell has {} elements",
                    entry.len()
                )));
            }
        };
        let text = text
            .as_str()
            .ok_or_else(|| UiError::decode(format!("grid_line cell text: {text}")))?;
        // One cluster per cell; the empty string marks a double-width
        // continuation.
        if text.graphemes(true).nth(1).is_some() {
            return Err(UiError::decode(format!(
                "grid_line cell text spans clusters: {text:?}"
            )));
        }
        if let Some(id) = id {
            highlight = id
                .as_int()
                .ok_or_else(|| UiError::decode(format!("grid_line cell highlight: {id}")))?;
        }
        let repeat = match repeat {
            Some(repeat) => repeat
                .as_int()
                .filter(|count| *count >= 1)
                .ok_or_else(|| UiError::decode(format!("grid_line cell repeat: {repeat}")))?,
            None => 1,
        };
        for _ in 0..repeat {
            if cells.len() >= room {
                break;
            }
            cells.push(Cell {
                text: text.to_string(),
                highlight,
            });
        }
    }
    Ok(cells)
}

fn decode_block_lines(
    lines: &[Value],
    report: &mut dyn FnMut(UiError),
) -> Vec<Vec<ContentPart>> {
    lines
        .iter()
        .filter_map(|line| match line.as_array() {
            Some(chunks) => Some(ContentPart::decode_list(chunks, report)),
            None => {
                report(UiError::decode(format!("cmdline block line: {line}")));
                None
            }
        })
        .collect()
}

fn diff_tabline(updates: &mut Updates, old: &Tabline, new: &Tabline) {
    let handles_changed = old.tabpages.len() != new.tabpages.len()
        || old
            .tabpages
            .iter()
            .zip(&new.tabpages)
            .any(|(a, b)| a.handle != b.handle);
    if handles_changed {
        updates.tabline.tabpages_set = true;
    } else if old
        .tabpages
        .iter()
        .zip(&new.tabpages)
        .any(|(a, b)| a.name != b.name)
    {
        updates.tabline.tabpages_content = true;
    }
    if old.current_tabpage != new.current_tabpage {
        updates.tabline.selected_tabpage = true;
    }
    if old.buffers != new.buffers {
        updates.tabline.buffers_set = true;
    }
    if old.current_buffer != new.current_buffer {
        updates.tabline.selected_buffer = true;
    }
}
