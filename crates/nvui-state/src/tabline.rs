#![forbid(unsafe_code)]

//! Tabline state: the tabpage and buffer lists with their current entries.

use nvui_core::error::UiError;
use nvui_core::value::{ExtHandle, Value};

/// One tabpage entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tabpage {
    pub handle: ExtHandle,
    pub name: String,
}

impl Tabpage {
    /// Decode a `{"tab": handle, "name": name}` entry.
    pub fn decode(value: &Value) -> Result<Tabpage, UiError> {
        Ok(Tabpage {
            handle: value
                .map_get("tab")
                .and_then(Value::as_ext)
                .cloned()
                .ok_or_else(|| UiError::decode(format!("tabpage entry: {value}")))?,
            name: value
                .map_get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| UiError::decode(format!("tabpage name: {value}")))?
                .to_string(),
        })
    }
}

/// One buffer entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub handle: ExtHandle,
    pub name: String,
}

impl Buffer {
    /// Decode a `{"buffer": handle, "name": name}` entry.
    pub fn decode(value: &Value) -> Result<Buffer, UiError> {
        Ok(Buffer {
            handle: value
                .map_get("buffer")
                .and_then(Value::as_ext)
                .cloned()
                .ok_or_else(|| UiError::decode(format!("buffer entry: {value}")))?,
            name: value
                .map_get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| UiError::decode(format!("buffer name: {value}")))?
                .to_string(),
        })
    }
}

/// The complete tabline as last published.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tabline {
    pub current_tabpage: Option<ExtHandle>,
    pub tabpages: Vec<Tabpage>,
    pub current_buffer: Option<ExtHandle>,
    pub buffers: Vec<Buffer>,
}

impl Tabline {
    /// Index of the current tabpage in the list.
    pub fn selected_tabpage_index(&self) -> Option<usize> {
        let current = self.current_tabpage.as_ref()?;
        self.tabpages
            .iter()
            .position(|tabpage| tabpage.handle == *current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab_entry(id: u8, name: &str) -> Value {
        Value::Map(vec![
            (Value::from("tab"), Value::Ext(ExtHandle::new(2, vec![id]))),
            (Value::from("name"), Value::from(name)),
        ])
    }

    #[test]
    fn decodes_tabpage_entry() {
        let tabpage = Tabpage::decode(&tab_entry(1, "init.rs")).unwrap();
        assert_eq!(tabpage.name, "init.rs");
        assert_eq!(tabpage.handle, ExtHandle::new(2, vec![1]));
    }

    #[test]
    fn missing_handle_is_decode_error() {
        let value = Value::Map(vec![(Value::from("name"), Value::from("x"))]);
        assert!(matches!(Tabpage::decode(&value), Err(UiError::Decode(_))));
    }

    #[test]
    fn selected_index_matches_current_handle() {
        let tabline = Tabline {
            current_tabpage: Some(ExtHandle::new(2, vec![2])),
            tabpages: vec![
                Tabpage::decode(&tab_entry(1, "a")).unwrap(),
                Tabpage::decode(&tab_entry(2, "b")).unwrap(),
            ],
            ..Tabline::default()
        };
        assert_eq!(tabline.selected_tabpage_index(), Some(1));
    }
}
