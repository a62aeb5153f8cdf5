#![forbid(unsafe_code)]

//! Cell storage and the derived row layout.
//!
//! A row of cells is chunked into highlight-uniform parts before shaping.
//! A cell with empty text is the continuation (right half) of the
//! double-width glyph in the cell before it; continuations extend their
//! part's column span without contributing text, and a part never starts
//! on one.

use nvui_core::{DEFAULT_HIGHLIGHT_ID, HighlightId};

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    /// One grapheme cluster, or empty for the continuation of a
    /// double-width glyph.
    pub text: String,
    pub highlight: HighlightId,
}

impl Cell {
    /// A default-highlight space, the clear value for grid regions.
    pub fn whitespace() -> Cell {
        Cell {
            text: " ".to_string(),
            highlight: DEFAULT_HIGHLIGHT_ID,
        }
    }

    /// Whether this cell is the trailing half of a double-width glyph.
    #[inline]
    pub fn is_continuation(&self) -> bool {
        self.text.is_empty()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::whitespace()
    }
}

/// A maximal highlight-uniform chunk of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPart {
    /// Concatenated cell texts, continuations contributing nothing.
    pub text: String,
    pub highlight: HighlightId,
    /// First column the part covers.
    pub origin_column: usize,
    /// Column span, continuations included.
    pub columns: usize,
}

/// The highlight-uniform partition of one row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowLayout {
    pub parts: Vec<RowPart>,
}

impl RowLayout {
    /// Chunk a row of cells into parts.
    pub fn build(cells: &[Cell]) -> RowLayout {
        let mut parts: Vec<RowPart> = Vec::new();
        for (column, cell) in cells.iter().enumerate() {
            if cell.is_continuation() {
                if let Some(part) = parts.last_mut() {
                    part.columns += 1;
                    continue;
                }
                // A continuation with no head is a protocol artifact; render
                // it as a blank cell.
                parts.push(RowPart {
                    text: " ".to_string(),
                    highlight: cell.highlight,
                    origin_column: column,
                    columns: 1,
                });
                continue;
            }
            match parts.last_mut() {
                Some(part) if part.highlight == cell.highlight => {
                    part.text.push_str(&cell.text);
                    part.columns += 1;
                }
                _ => parts.push(RowPart {
                    text: cell.text.clone(),
                    highlight: cell.highlight,
                    origin_column: column,
                    columns: 1,
                }),
            }
        }
        RowLayout { parts }
    }
}
