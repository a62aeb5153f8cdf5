#![forbid(unsafe_code)]

//! Highlighted text chunks shared by the command line and message views.

use nvui_core::HighlightId;
use nvui_core::error::UiError;
use nvui_core::value::Value;

/// One highlighted chunk of command-line or message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPart {
    pub highlight: HighlightId,
    pub text: String,
}

impl ContentPart {
    /// Decode one `[attr_id, text]` or `[attr_id, text, hl_id]` chunk. The
    /// trailing id, when present, supersedes the leading one.
    pub fn decode(value: &Value) -> Result<ContentPart, UiError> {
        let chunk = value
            .as_array()
            .ok_or_else(|| UiError::decode(format!("content chunk is not an array: {value}")))?;
        let (highlight, text) = match chunk {
            [attr, text] => (attr, text),
            [_, text, highlight] => (highlight, text),
            _ => {
                return Err(UiError::decode(format!(
                    "content chunk has {} elements",
                    chunk.len()
                )));
            }
        };
        Ok(ContentPart {
            highlight: highlight
                .as_int()
                .ok_or_else(|| UiError::decode(format!("content chunk id: {highlight}")))?,
            text: text
                .as_str()
                .ok_or_else(|| UiError::decode(format!("content chunk text: {text}")))?
                .to_string(),
        })
    }

    /// Decode a chunk list, reporting bad chunks and keeping the rest.
    pub fn decode_list(values: &[Value], report: &mut dyn FnMut(UiError)) -> Vec<ContentPart> {
        values
            .iter()
            .filter_map(|value| match ContentPart::decode(value) {
                Ok(part) => Some(part),
                Err(error) => {
                    report(error);
                    None
                }
            })
            .collect()
    }
}
