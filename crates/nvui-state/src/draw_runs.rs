#![forbid(unsafe_code)]

//! Shaped draw runs and their reuse cache.
//!
//! Shaping is the expensive step of a grid update, so rebuilt rows try hard
//! to avoid it. For each layout part, in order:
//!
//! 1. the run after the previously reused one in the old row (runs of an
//!    unchanged row line up one to one),
//! 2. the shared short-text cache,
//! 3. a linear scan of the old row,
//! 4. a prefix or suffix slice of an old run with repositioned glyphs,
//! 5. a fresh shape.
//!
//! Reuse is an optimization only; every path yields the glyphs a fresh
//! shape of the same part would.

use std::collections::VecDeque;

use ahash::AHashMap;
use nvui_core::HighlightId;

use crate::appearance::Appearance;
use crate::font::{FontId, FontTable};
use crate::layout::{RowLayout, RowPart};
use crate::shaper::{ShapedRun, TextShaper};

/// Everything shaping a part needs, borrowed from the engine state.
pub struct ShapeContext<'a> {
    pub shaper: &'a dyn TextShaper,
    pub fonts: &'a FontTable,
    pub font: FontId,
    pub appearance: &'a Appearance,
}

impl ShapeContext<'_> {
    fn shape(&self, part: &RowPart) -> DrawRun {
        DrawRun {
            text: part.text.clone(),
            highlight: part.highlight,
            origin_column: part.origin_column,
            columns: part.columns,
            shaped: self.shaper.shape(&part.text, self.font, self.fonts),
        }
    }
}

/// A shaped, highlight-uniform slice of one row. Glyph positions are
/// relative to the run origin, so a run relocates by changing
/// `origin_column` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRun {
    pub text: String,
    pub highlight: HighlightId,
    pub origin_column: usize,
    pub columns: usize,
    pub shaped: ShapedRun,
}

impl DrawRun {
    fn matches(&self, part: &RowPart) -> bool {
        self.columns == part.columns && self.highlight == part.highlight && self.text == part.text
    }

    fn at(&self, origin_column: usize) -> DrawRun {
        DrawRun {
            origin_column,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    highlight: HighlightId,
    columns: usize,
}

impl CacheKey {
    fn for_part(part: &RowPart) -> CacheKey {
        CacheKey {
            text: part.text.clone(),
            highlight: part.highlight,
            columns: part.columns,
        }
    }
}

const CACHE_CAPACITY: usize = 80;
const CACHE_LOW_WATER: usize = 40;
const CACHE_MAX_TEXT_CLUSTERS: usize = 2;

/// Cross-row cache of shaped short texts.
///
/// Short parts (punctuation, line-drawing, single glyphs) recur constantly
/// across unrelated rows; longer texts rarely repeat and would bloat the
/// table, so only texts of at most two clusters are kept. Insertion order
/// is tracked for first-in eviction once the table overflows.
#[derive(Debug, Clone, Default)]
pub struct SharedRunCache {
    runs: AHashMap<CacheKey, DrawRun>,
    order: VecDeque<CacheKey>,
}

impl SharedRunCache {
    fn get(&self, part: &RowPart) -> Option<&DrawRun> {
        self.runs.get(&CacheKey::for_part(part))
    }

    fn insert(&mut self, run: &DrawRun) {
        if run.text.chars().count() > CACHE_MAX_TEXT_CLUSTERS {
            return;
        }
        let key = CacheKey {
            text: run.text.clone(),
            highlight: run.highlight,
            columns: run.columns,
        };
        if self.runs.insert(key.clone(), run.at(0)).is_none() {
            self.order.push_back(key);
        }
        if self.runs.len() > CACHE_CAPACITY {
            while self.runs.len() > CACHE_LOW_WATER {
                let Some(evicted) = self.order.pop_front() else {
                    break;
                };
                self.runs.remove(&evicted);
            }
        }
    }

    /// Drop every cached run. Called when fonts or shaping inputs change.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.order.clear();
    }

    /// Number of cached runs.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// The shaped form of one row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowDrawRun {
    pub runs: Vec<DrawRun>,
}

impl RowDrawRun {
    /// Shape a row layout, reusing the old row's runs and the shared cache
    /// where possible.
    pub fn build(
        layout: &RowLayout,
        previous: Option<&RowDrawRun>,
        shared: &mut SharedRunCache,
        ctx: &ShapeContext<'_>,
    ) -> RowDrawRun {
        let mut runs = Vec::with_capacity(layout.parts.len());
        let mut previous_reused: Option<usize> = None;
        for part in &layout.parts {
            let (run, reused_index) = Self::reuse_or_shape(part, previous, previous_reused, shared, ctx);
            shared.insert(&run);
            if reused_index.is_some() {
                previous_reused = reused_index;
            }
            runs.push(run);
        }
        RowDrawRun { runs }
    }

    fn reuse_or_shape(
        part: &RowPart,
        previous: Option<&RowDrawRun>,
        previous_reused: Option<usize>,
        shared: &SharedRunCache,
        ctx: &ShapeContext<'_>,
    ) -> (DrawRun, Option<usize>) {
        if let Some(previous) = previous {
            let probe = previous_reused.map_or(0, |index| index + 1);
            if let Some(run) = previous.runs.get(probe) {
                if run.matches(part) {
                    return (run.at(part.origin_column), Some(probe));
                }
            }

            if let Some(run) = shared.get(part) {
                return (run.at(part.origin_column), None);
            }

            if let Some((index, run)) = previous
                .runs
                .iter()
                .enumerate()
                .find(|(_, run)| run.matches(part))
            {
                return (run.at(part.origin_column), Some(index));
            }

            if let Some(run) = Self::slice_reuse(part, previous) {
                return (run, None);
            }
        } else if let Some(run) = shared.get(part) {
            return (run.at(part.origin_column), None);
        }

        (ctx.shape(part), None)
    }

    /// Reuse the glyphs of an old run whose text contains the new part as a
    /// prefix or suffix. Valid because shaping never forms ligatures across
    /// the highlight boundaries parts are cut on.
    fn slice_reuse(part: &RowPart, previous: &RowDrawRun) -> Option<DrawRun> {
        for run in &previous.runs {
            if run.highlight != part.highlight || run.text.len() <= part.text.len() {
                continue;
            }
            if run.text.starts_with(&part.text) {
                let shaped = run.shaped.cluster_slice(0..part.text.len() as u32);
                return Some(DrawRun {
                    text: part.text.clone(),
                    highlight: part.highlight,
                    origin_column: part.origin_column,
                    columns: part.columns,
                    shaped,
                });
            }
            if run.text.ends_with(&part.text) {
                let offset = (run.text.len() - part.text.len()) as u32;
                let slice = run.shaped.cluster_slice(offset..run.text.len() as u32);
                let dx = slice.glyphs.first().map(|glyph| glyph.x).unwrap_or(0.0);
                return Some(DrawRun {
                    text: part.text.clone(),
                    highlight: part.highlight,
                    origin_column: part.origin_column,
                    columns: part.columns,
                    shaped: slice.rebased(-dx, -(offset as i64)),
                });
            }
        }
        None
    }
}
