#![forbid(unsafe_code)]

//! Completion popup menu state.

use nvui_core::GridId;
use nvui_core::error::UiError;
use nvui_core::geometry::GridPoint;
use nvui_core::value::Value;

/// One completion candidate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopupmenuItem {
    pub word: String,
    pub kind: String,
    pub menu: String,
    pub info: String,
}

impl PopupmenuItem {
    /// Decode one `[word, kind, menu, info]` item.
    pub fn decode(value: &Value) -> Result<PopupmenuItem, UiError> {
        let Some([word, kind, menu, info]) = value.as_array().and_then(|item| {
            <&[Value; 4]>::try_from(item).ok()
        }) else {
            return Err(UiError::decode(format!("popupmenu item: {value}")));
        };
        let field = |value: &Value, name: &str| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| UiError::decode(format!("popupmenu item {name}: {value}")))
        };
        Ok(PopupmenuItem {
            word: field(word, "word")?,
            kind: field(kind, "kind")?,
            menu: field(menu, "menu")?,
            info: field(info, "info")?,
        })
    }
}

/// Where the popup menu is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupmenuAnchor {
    /// Anchored to a cell of a grid.
    Grid { grid: GridId, position: GridPoint },
    /// Anchored to a byte position of the command line (wildmenu).
    Cmdline { column: i64 },
}

/// The visible popup menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Popupmenu {
    pub items: Vec<PopupmenuItem>,
    /// Index of the selected item, if any.
    pub selected: Option<usize>,
    pub anchor: PopupmenuAnchor,
}

impl Popupmenu {
    /// Translate the protocol's `-1` sentinel into no selection. Indexes
    /// beyond the item list also mean no selection.
    pub fn selection_from_protocol(&self, selected: i64) -> Option<usize> {
        usize::try_from(selected)
            .ok()
            .filter(|index| *index < self.items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(word: &str) -> Value {
        Value::Array(vec![
            Value::from(word),
            Value::from("v"),
            Value::from(""),
            Value::from(""),
        ])
    }

    #[test]
    fn decodes_item() {
        let decoded = PopupmenuItem::decode(&item("foo")).unwrap();
        assert_eq!(decoded.word, "foo");
        assert_eq!(decoded.kind, "v");
    }

    #[test]
    fn wrong_arity_is_decode_error() {
        let result = PopupmenuItem::decode(&Value::Array(vec![Value::from("foo")]));
        assert!(matches!(result, Err(UiError::Decode(_))));
    }

    #[test]
    fn selection_sentinel_and_bounds() {
        let menu = Popupmenu {
            items: vec![PopupmenuItem::default(), PopupmenuItem::default()],
            selected: None,
            anchor: PopupmenuAnchor::Cmdline { column: 0 },
        };
        assert_eq!(menu.selection_from_protocol(-1), None);
        assert_eq!(menu.selection_from_protocol(1), Some(1));
        assert_eq!(menu.selection_from_protocol(2), None);
    }
}
