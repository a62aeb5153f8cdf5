#![forbid(unsafe_code)]

//! Cursor position, editor mode, and cursor style tables.

use nvui_core::geometry::GridPoint;
use nvui_core::value::Value;
use nvui_core::GridId;

/// The cursor's grid and cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub grid: GridId,
    pub position: GridPoint,
}

/// The active editor mode as last reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mode {
    pub name: String,
    /// Index into the mode-info style table.
    pub style_index: usize,
}

/// How the cursor is drawn in one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    Block,
    Horizontal,
    Vertical,
}

impl CursorShape {
    fn parse(value: &str) -> Option<CursorShape> {
        Some(match value {
            "block" => CursorShape::Block,
            "horizontal" => CursorShape::Horizontal,
            "vertical" => CursorShape::Vertical,
            _ => return None,
        })
    }
}

/// One entry of the mode-info style table. Every field is optional; the
/// server only sends what differs from its defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CursorStyle {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub shape: Option<CursorShape>,
    /// Thickness of bar shapes as a percentage of the cell.
    pub cell_percentage: Option<i64>,
    pub blink_wait: Option<i64>,
    pub blink_on: Option<i64>,
    pub blink_off: Option<i64>,
    /// Highlight id used to draw the cursor cell.
    pub attr_id: Option<i64>,
}

impl CursorStyle {
    /// Decode one style dictionary. Unknown keys are ignored, as are known
    /// keys of the wrong type.
    pub fn decode(value: &Value) -> CursorStyle {
        let mut style = CursorStyle::default();
        let Some(pairs) = value.as_map() else {
            return style;
        };
        for (key, value) in pairs {
            let Some(key) = key.as_str() else { continue };
            match key {
                "name" => style.name = value.as_str().map(str::to_string),
                "short_name" => style.short_name = value.as_str().map(str::to_string),
                "cursor_shape" => style.shape = value.as_str().and_then(CursorShape::parse),
                "cell_percentage" => style.cell_percentage = value.as_int(),
                "blinkwait" => style.blink_wait = value.as_int(),
                "blinkon" => style.blink_on = value.as_int(),
                "blinkoff" => style.blink_off = value.as_int(),
                "attr_id" => style.attr_id = value.as_int(),
                _ => {}
            }
        }
        style
    }

    /// Whether this style blinks.
    pub fn blinks(&self) -> bool {
        matches!((self.blink_on, self.blink_off), (Some(on), Some(off)) if on > 0 && off > 0)
    }
}

/// The mode-info table from the last `mode_info_set`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModeInfo {
    pub cursor_style_enabled: bool,
    pub styles: Vec<CursorStyle>,
}
