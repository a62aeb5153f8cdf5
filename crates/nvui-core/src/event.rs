#![forbid(unsafe_code)]

//! Decoded UI events.
//!
//! One `redraw` notification carries a batch of event tuples:
//! `[[name, args...], [name, args...], ...]` where each `args` entry is one
//! invocation of that event kind. [`decode_batch`] flattens a batch into an
//! ordered `Vec<UiEvent>`, validating arity and parameter types strictly;
//! a mismatch is a [`UiError::Decode`] localized to that tuple, never a
//! panic.
//!
//! The event set is closed: new kinds are added by extending the enum and
//! the match in the applier, never via open-ended polymorphism. Names this
//! engine does not model decode to nothing (they are skipped with a trace
//! log) so newer servers stay usable.

use crate::GridId;
use crate::error::UiError;
use crate::value::{ExtHandle, Value};

/// A single decoded UI event.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ModeInfoSet {
        cursor_style_enabled: bool,
        cursor_styles: Vec<Value>,
    },
    ModeChange {
        mode: String,
        mode_idx: i64,
    },
    SetTitle {
        title: String,
    },
    SetIcon {
        icon: String,
    },
    OptionSet {
        name: String,
        value: Value,
    },
    DefaultColorsSet {
        rgb_fg: i64,
        rgb_bg: i64,
        rgb_sp: i64,
    },
    HlAttrDefine {
        id: i64,
        rgb_attrs: Vec<(Value, Value)>,
        info: Vec<Value>,
    },
    HlGroupSet {
        name: String,
        id: i64,
    },
    GridResize {
        grid: GridId,
        width: i64,
        height: i64,
    },
    GridClear {
        grid: GridId,
    },
    GridCursorGoto {
        grid: GridId,
        row: i64,
        column: i64,
    },
    GridLine {
        grid: GridId,
        row: i64,
        col_start: i64,
        data: Vec<Value>,
        wrap: bool,
    },
    GridScroll {
        grid: GridId,
        top: i64,
        bottom: i64,
        left: i64,
        right: i64,
        rows: i64,
        columns: i64,
    },
    GridDestroy {
        grid: GridId,
    },
    WinPos {
        grid: GridId,
        window: ExtHandle,
        start_row: i64,
        start_column: i64,
        width: i64,
        height: i64,
    },
    WinFloatPos {
        grid: GridId,
        window: ExtHandle,
        anchor: String,
        anchor_grid: GridId,
        anchor_row: f64,
        anchor_column: f64,
        focusable: bool,
        z_index: i64,
    },
    WinExternalPos {
        grid: GridId,
        window: ExtHandle,
    },
    WinHide {
        grid: GridId,
    },
    WinClose {
        grid: GridId,
    },
    PopupmenuShow {
        items: Vec<Value>,
        selected: i64,
        row: i64,
        column: i64,
        grid: GridId,
    },
    PopupmenuSelect {
        selected: i64,
    },
    PopupmenuHide,
    TablineUpdate {
        current_tabpage: ExtHandle,
        tabpages: Vec<Value>,
        current_buffer: ExtHandle,
        buffers: Vec<Value>,
    },
    CmdlineShow {
        content: Vec<Value>,
        pos: i64,
        first_char: String,
        prompt: String,
        indent: i64,
        level: i64,
    },
    CmdlinePos {
        pos: i64,
        level: i64,
    },
    CmdlineSpecialChar {
        c: String,
        shift: bool,
        level: i64,
    },
    CmdlineHide {
        level: i64,
    },
    CmdlineBlockShow {
        lines: Vec<Value>,
    },
    CmdlineBlockAppend {
        line: Vec<Value>,
    },
    CmdlineBlockHide,
    MsgShow {
        kind: String,
        content: Vec<Value>,
        replace_last: bool,
    },
    MsgClear,
    BusyStart,
    BusyStop,
    MouseOn,
    MouseOff,
    Bell,
    VisualBell,
    Suspend,
    UpdateMenu,
    Flush,
}

impl UiEvent {
    /// Decode one invocation of the named event from its parameter tuple.
    ///
    /// Returns `Ok(None)` for event names this engine does not model.
    pub fn decode(name: &str, params: &[Value]) -> Result<Option<UiEvent>, UiError> {
        let event = match name {
            "mode_info_set" => {
                let [enabled, styles] = exact(name, params)?;
                UiEvent::ModeInfoSet {
                    cursor_style_enabled: boolean(name, enabled)?,
                    cursor_styles: array(name, styles)?,
                }
            }
            "mode_change" => {
                let [mode, mode_idx] = exact(name, params)?;
                UiEvent::ModeChange {
                    mode: string(name, mode)?,
                    mode_idx: integer(name, mode_idx)?,
                }
            }
            "set_title" => {
                let [title] = exact(name, params)?;
                UiEvent::SetTitle {
                    title: string(name, title)?,
                }
            }
            "set_icon" => {
                let [icon] = exact(name, params)?;
                UiEvent::SetIcon {
                    icon: string(name, icon)?,
                }
            }
            "option_set" => {
                let [option, value] = exact(name, params)?;
                UiEvent::OptionSet {
                    name: string(name, option)?,
                    value: value.clone(),
                }
            }
            "default_colors_set" => {
                let [rgb_fg, rgb_bg, rgb_sp, _cterm_fg, _cterm_bg] = exact(name, params)?;
                UiEvent::DefaultColorsSet {
                    rgb_fg: integer(name, rgb_fg)?,
                    rgb_bg: integer(name, rgb_bg)?,
                    rgb_sp: integer(name, rgb_sp)?,
                }
            }
            "hl_attr_define" => {
                let [id, rgb_attrs, _cterm_attrs, info] = exact(name, params)?;
                UiEvent::HlAttrDefine {
                    id: integer(name, id)?,
                    rgb_attrs: map(name, rgb_attrs)?,
                    info: array(name, info)?,
                }
            }
            "hl_group_set" => {
                let [group, id] = exact(name, params)?;
                UiEvent::HlGroupSet {
                    name: string(name, group)?,
                    id: integer(name, id)?,
                }
            }
            "grid_resize" => {
                let [grid, width, height] = exact(name, params)?;
                UiEvent::GridResize {
                    grid: integer(name, grid)?,
                    width: integer(name, width)?,
                    height: integer(name, height)?,
                }
            }
            "grid_clear" => {
                let [grid] = exact(name, params)?;
                UiEvent::GridClear {
                    grid: integer(name, grid)?,
                }
            }
            "grid_cursor_goto" => {
                let [grid, row, column] = exact(name, params)?;
                UiEvent::GridCursorGoto {
                    grid: integer(name, grid)?,
                    row: integer(name, row)?,
                    column: integer(name, column)?,
                }
            }
            "grid_line" => {
                let [grid, row, col_start, data, wrap] = exact(name, params)?;
                UiEvent::GridLine {
                    grid: integer(name, grid)?,
                    row: integer(name, row)?,
                    col_start: integer(name, col_start)?,
                    data: array(name, data)?,
                    wrap: boolean(name, wrap)?,
                }
            }
            "grid_scroll" => {
                let [grid, top, bottom, left, right, rows, columns] = exact(name, params)?;
                UiEvent::GridScroll {
                    grid: integer(name, grid)?,
                    top: integer(name, top)?,
                    bottom: integer(name, bottom)?,
                    left: integer(name, left)?,
                    right: integer(name, right)?,
                    rows: integer(name, rows)?,
                    columns: integer(name, columns)?,
                }
            }
            "grid_destroy" => {
                let [grid] = exact(name, params)?;
                UiEvent::GridDestroy {
                    grid: integer(name, grid)?,
                }
            }
            "win_pos" => {
                let [grid, window, start_row, start_column, width, height] = exact(name, params)?;
                UiEvent::WinPos {
                    grid: integer(name, grid)?,
                    window: ext(name, window)?,
                    start_row: integer(name, start_row)?,
                    start_column: integer(name, start_column)?,
                    width: integer(name, width)?,
                    height: integer(name, height)?,
                }
            }
            "win_float_pos" => {
                let [grid, window, anchor, anchor_grid, anchor_row, anchor_column, focusable, z_index] =
                    exact(name, params)?;
                UiEvent::WinFloatPos {
                    grid: integer(name, grid)?,
                    window: ext(name, window)?,
                    anchor: string(name, anchor)?,
                    anchor_grid: integer(name, anchor_grid)?,
                    anchor_row: float(name, anchor_row)?,
                    anchor_column: float(name, anchor_column)?,
                    focusable: boolean(name, focusable)?,
                    z_index: integer(name, z_index)?,
                }
            }
            "win_external_pos" => {
                let [grid, window] = exact(name, params)?;
                UiEvent::WinExternalPos {
                    grid: integer(name, grid)?,
                    window: ext(name, window)?,
                }
            }
            "win_hide" => {
                let [grid] = exact(name, params)?;
                UiEvent::WinHide {
                    grid: integer(name, grid)?,
                }
            }
            "win_close" => {
                let [grid] = exact(name, params)?;
                UiEvent::WinClose {
                    grid: integer(name, grid)?,
                }
            }
            "popupmenu_show" => {
                let [items, selected, row, column, grid] = exact(name, params)?;
                UiEvent::PopupmenuShow {
                    items: array(name, items)?,
                    selected: integer(name, selected)?,
                    row: integer(name, row)?,
                    column: integer(name, column)?,
                    grid: integer(name, grid)?,
                }
            }
            "popupmenu_select" => {
                let [selected] = exact(name, params)?;
                UiEvent::PopupmenuSelect {
                    selected: integer(name, selected)?,
                }
            }
            "popupmenu_hide" => {
                let [] = exact(name, params)?;
                UiEvent::PopupmenuHide
            }
            "tabline_update" => {
                let [current_tabpage, tabpages, current_buffer, buffers] = exact(name, params)?;
                UiEvent::TablineUpdate {
                    current_tabpage: ext(name, current_tabpage)?,
                    tabpages: array(name, tabpages)?,
                    current_buffer: ext(name, current_buffer)?,
                    buffers: array(name, buffers)?,
                }
            }
            "cmdline_show" => {
                let [content, pos, first_char, prompt, indent, level] = exact(name, params)?;
                UiEvent::CmdlineShow {
                    content: array(name, content)?,
                    pos: integer(name, pos)?,
                    first_char: string(name, first_char)?,
                    prompt: string(name, prompt)?,
                    indent: integer(name, indent)?,
                    level: integer(name, level)?,
                }
            }
            "cmdline_pos" => {
                let [pos, level] = exact(name, params)?;
                UiEvent::CmdlinePos {
                    pos: integer(name, pos)?,
                    level: integer(name, level)?,
                }
            }
            "cmdline_special_char" => {
                let [c, shift, level] = exact(name, params)?;
                UiEvent::CmdlineSpecialChar {
                    c: string(name, c)?,
                    shift: boolean(name, shift)?,
                    level: integer(name, level)?,
                }
            }
            "cmdline_hide" => {
                let [level] = exact(name, params)?;
                UiEvent::CmdlineHide {
                    level: integer(name, level)?,
                }
            }
            "cmdline_block_show" => {
                let [lines] = exact(name, params)?;
                UiEvent::CmdlineBlockShow {
                    lines: array(name, lines)?,
                }
            }
            "cmdline_block_append" => {
                let [line] = exact(name, params)?;
                UiEvent::CmdlineBlockAppend {
                    line: array(name, line)?,
                }
            }
            "cmdline_block_hide" => {
                let [] = exact(name, params)?;
                UiEvent::CmdlineBlockHide
            }
            "msg_show" => {
                let [kind, content, replace_last] = exact(name, params)?;
                UiEvent::MsgShow {
                    kind: string(name, kind)?,
                    content: array(name, content)?,
                    replace_last: boolean(name, replace_last)?,
                }
            }
            "msg_clear" => {
                let [] = exact(name, params)?;
                UiEvent::MsgClear
            }
            "busy_start" => {
                let [] = exact(name, params)?;
                UiEvent::BusyStart
            }
            "busy_stop" => {
                let [] = exact(name, params)?;
                UiEvent::BusyStop
            }
            "mouse_on" => {
                let [] = exact(name, params)?;
                UiEvent::MouseOn
            }
            "mouse_off" => {
                let [] = exact(name, params)?;
                UiEvent::MouseOff
            }
            "bell" => {
                let [] = exact(name, params)?;
                UiEvent::Bell
            }
            "visual_bell" => {
                let [] = exact(name, params)?;
                UiEvent::VisualBell
            }
            "suspend" => {
                let [] = exact(name, params)?;
                UiEvent::Suspend
            }
            "update_menu" => {
                let [] = exact(name, params)?;
                UiEvent::UpdateMenu
            }
            "flush" => {
                let [] = exact(name, params)?;
                UiEvent::Flush
            }
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Decode one `redraw` notification payload into an ordered event list.
///
/// Each batch entry is `[name, args, args, ...]`. Malformed entries and
/// tuples are reported through `report` and skipped; decoding always
/// continues with the next tuple, so one bad element never poisons the
/// batch.
pub fn decode_batch(batch: &[Value], report: &mut dyn FnMut(UiError)) -> Vec<UiEvent> {
    let mut events = Vec::new();
    for entry in batch {
        let Some(entry) = entry.as_array() else {
            report(UiError::decode(format!("redraw entry is not an array: {entry}")));
            continue;
        };
        let Some(name) = entry.first().and_then(Value::as_str) else {
            report(UiError::decode("redraw entry has no event name".to_string()));
            continue;
        };
        for tuple in &entry[1..] {
            let Some(params) = tuple.as_array() else {
                report(UiError::decode(format!("{name}: parameter tuple is not an array")));
                continue;
            };
            match UiEvent::decode(name, params) {
                Ok(Some(event)) => events.push(event),
                Ok(None) => {
                    tracing::trace!(event = name, "skipping unmodeled ui event");
                }
                Err(error) => report(error),
            }
        }
    }
    events
}

fn exact<'a, const N: usize>(name: &str, params: &'a [Value]) -> Result<&'a [Value; N], UiError> {
    params.try_into().map_err(|_| {
        UiError::decode(format!(
            "{name}: expected {N} parameters, got {}",
            params.len()
        ))
    })
}

fn integer(name: &str, value: &Value) -> Result<i64, UiError> {
    value
        .as_int()
        .ok_or_else(|| UiError::decode(format!("{name}: expected integer, got {value}")))
}

fn float(name: &str, value: &Value) -> Result<f64, UiError> {
    value
        .as_f64()
        .ok_or_else(|| UiError::decode(format!("{name}: expected number, got {value}")))
}

fn boolean(name: &str, value: &Value) -> Result<bool, UiError> {
    value
        .as_bool()
        .ok_or_else(|| UiError::decode(format!("{name}: expected boolean, got {value}")))
}

fn string(name: &str, value: &Value) -> Result<String, UiError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| UiError::decode(format!("{name}: expected string, got {value}")))
}

fn array(name: &str, value: &Value) -> Result<Vec<Value>, UiError> {
    value
        .as_array()
        .map(<[Value]>::to_vec)
        .ok_or_else(|| UiError::decode(format!("{name}: expected array, got {value}")))
}

fn map(name: &str, value: &Value) -> Result<Vec<(Value, Value)>, UiError> {
    value
        .as_map()
        .map(<[(Value, Value)]>::to_vec)
        .ok_or_else(|| UiError::decode(format!("{name}: expected map, got {value}")))
}

fn ext(name: &str, value: &Value) -> Result<ExtHandle, UiError> {
    value
        .as_ext()
        .cloned()
        .ok_or_else(|| UiError::decode(format!("{name}: expected ext handle, got {value}")))
}
