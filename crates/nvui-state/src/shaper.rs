#![forbid(unsafe_code)]

//! Text shaping seam.
//!
//! Shaping is platform work (CoreText, DirectWrite, HarfBuzz) and lives
//! behind [`TextShaper`]; the engine only caches and repositions its output.
//! [`MonoShaper`] is the deterministic in-tree implementation used by tests
//! and by headless callers.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::font::{FontId, FontTable};

/// One positioned glyph inside a shaped run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    /// Font-specific glyph id.
    pub glyph: u32,
    /// Byte offset of the source cluster within the run's text.
    pub cluster: u32,
    /// Horizontal position in points, relative to the run origin.
    pub x: f64,
}

/// A shaped, positioned slice of text in a single font.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapedRun {
    pub font: FontId,
    pub glyphs: Vec<ShapedGlyph>,
}

impl ShapedRun {
    /// A copy with every glyph shifted horizontally by `dx` points and every
    /// cluster rebased by `cluster_offset` bytes.
    ///
    /// `cluster_offset` may be negative when extracting a suffix.
    pub fn rebased(&self, dx: f64, cluster_offset: i64) -> ShapedRun {
        ShapedRun {
            font: self.font,
            glyphs: self
                .glyphs
                .iter()
                .map(|glyph| ShapedGlyph {
                    glyph: glyph.glyph,
                    cluster: (glyph.cluster as i64 + cluster_offset) as u32,
                    x: glyph.x + dx,
                })
                .collect(),
        }
    }

    /// The glyphs whose clusters fall inside `byte_range`, untouched.
    pub fn cluster_slice(&self, byte_range: std::ops::Range<u32>) -> ShapedRun {
        ShapedRun {
            font: self.font,
            glyphs: self
                .glyphs
                .iter()
                .filter(|glyph| byte_range.contains(&glyph.cluster))
                .copied()
                .collect(),
        }
    }
}

/// Shapes highlight-uniform text slices into positioned glyphs.
pub trait TextShaper {
    /// Shape `text` in the given font. `text` never spans a highlight
    /// boundary and never contains a newline.
    fn shape(&self, text: &str, font: FontId, fonts: &FontTable) -> ShapedRun;
}

/// Deterministic one-glyph-per-cluster shaper.
///
/// Glyph ids are the first scalar of each cluster; positions advance by the
/// cluster's display width times the font's cell width. Good enough for
/// tests and terminal-like callers, not for real typography.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoShaper;

impl TextShaper for MonoShaper {
    fn shape(&self, text: &str, font: FontId, fonts: &FontTable) -> ShapedRun {
        let cell_width = fonts
            .metrics(font)
            .map(|metrics| metrics.cell_width)
            .unwrap_or(1.0);
        let mut glyphs = Vec::new();
        let mut column = 0usize;
        for (offset, cluster) in text.grapheme_indices(true) {
            let glyph = cluster.chars().next().map(|c| c as u32).unwrap_or(0);
            glyphs.push(ShapedGlyph {
                glyph,
                cluster: offset as u32,
                x: column as f64 * cell_width,
            });
            column += cluster.width().max(1);
        }
        ShapedRun { font, glyphs }
    }
}
