#![forbid(unsafe_code)]

//! Highlight attribute table and color resolution.
//!
//! Highlight ids are dense small integers allocated by the server. Id `0`
//! is the default highlight and is never stored; resolution falls through
//! to the default colors for it and for any id the server has not defined
//! yet. `reverse` is resolved here, at lookup time, so stored records stay
//! exactly what the server sent.

use ahash::AHashMap;
use bitflags::bitflags;
use nvui_core::error::UiError;
use nvui_core::value::Value;
use nvui_core::{DEFAULT_HIGHLIGHT_ID, HighlightId};

use crate::color::Color;

bitflags! {
    /// Text decorations carried by a highlight definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Decorations: u16 {
        const BOLD          = 1 << 0;
        const ITALIC        = 1 << 1;
        const UNDERLINE     = 1 << 2;
        const UNDERCURL     = 1 << 3;
        const UNDERDOUBLE   = 1 << 4;
        const UNDERDOTTED   = 1 << 5;
        const UNDERDASHED   = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// One highlight attribute definition, stored as sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlight {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub special: Option<Color>,
    pub decorations: Decorations,
    pub reverse: bool,
    /// Pseudo-transparency level, `0..=100`.
    pub blend: i64,
}

/// Attribute keys carried by the protocol that this engine deliberately
/// does not model.
const IGNORED_ATTR_KEYS: &[&str] = &[
    "altfont",
    "bg_indexed",
    "fg_indexed",
    "nocombine",
    "standout",
    "url",
];

impl Highlight {
    /// Build a fresh record from the `rgb_attrs` dictionary of an attribute
    /// definition. A key outside the known set and the ignore list is a
    /// decode error.
    pub fn from_attrs(attrs: &[(Value, Value)]) -> Result<Highlight, UiError> {
        let mut highlight = Highlight::default();
        for (key, value) in attrs {
            let key = key
                .as_str()
                .ok_or_else(|| UiError::decode(format!("highlight attribute key: {key}")))?;
            match key {
                "foreground" => {
                    highlight.foreground = value.as_int().and_then(Color::from_protocol);
                }
                "background" => {
                    highlight.background = value.as_int().and_then(Color::from_protocol);
                }
                "special" => {
                    highlight.special = value.as_int().and_then(Color::from_protocol);
                }
                "reverse" => highlight.reverse = value.as_bool().unwrap_or(false),
                "bold" => highlight.set_flag(Decorations::BOLD, value),
                "italic" => highlight.set_flag(Decorations::ITALIC, value),
                "underline" => highlight.set_flag(Decorations::UNDERLINE, value),
                "undercurl" => highlight.set_flag(Decorations::UNDERCURL, value),
                "underdouble" => highlight.set_flag(Decorations::UNDERDOUBLE, value),
                "underdotted" => highlight.set_flag(Decorations::UNDERDOTTED, value),
                "underdashed" => highlight.set_flag(Decorations::UNDERDASHED, value),
                "strikethrough" => highlight.set_flag(Decorations::STRIKETHROUGH, value),
                "blend" => highlight.blend = value.as_int().unwrap_or(0),
                key if IGNORED_ATTR_KEYS.contains(&key) => {}
                key => {
                    return Err(UiError::decode(format!(
                        "unknown highlight attribute {key:?}"
                    )));
                }
            }
        }
        Ok(highlight)
    }

    fn set_flag(&mut self, flag: Decorations, value: &Value) {
        self.decorations.set(flag, value.as_bool().unwrap_or(false));
    }
}

/// Semantic highlight group names the engine tracks when the server reports
/// them in attribute-definition metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObservedHighlightName {
    Normal,
    NormalNC,
    NormalFloat,
    ErrorMsg,
    Special,
    Pmenu,
    PmenuSel,
    PmenuKind,
    PmenuKindSel,
    PmenuExtra,
    PmenuExtraSel,
    TabLine,
    TabLineFill,
    TabLineSel,
}

impl ObservedHighlightName {
    /// Parse a highlight group name. Unrecognized names are not tracked.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "Normal" => Self::Normal,
            "NormalNC" => Self::NormalNC,
            "NormalFloat" => Self::NormalFloat,
            "ErrorMsg" => Self::ErrorMsg,
            "Special" => Self::Special,
            "Pmenu" => Self::Pmenu,
            "PmenuSel" => Self::PmenuSel,
            "PmenuKind" => Self::PmenuKind,
            "PmenuKindSel" => Self::PmenuKindSel,
            "PmenuExtra" => Self::PmenuExtra,
            "PmenuExtraSel" => Self::PmenuExtraSel,
            "TabLine" => Self::TabLine,
            "TabLineFill" => Self::TabLineFill,
            "TabLineSel" => Self::TabLineSel,
            _ => return None,
        })
    }
}

/// The highlight table plus default colors.
#[derive(Debug, Clone)]
pub struct Appearance {
    highlights: AHashMap<HighlightId, Highlight>,
    observed: AHashMap<ObservedHighlightName, HighlightId>,
    pub default_foreground: Color,
    pub default_background: Color,
    pub default_special: Color,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            highlights: AHashMap::new(),
            observed: AHashMap::new(),
            default_foreground: Color::WHITE,
            default_background: Color::BLACK,
            default_special: Color::WHITE,
        }
    }
}

impl Appearance {
    /// Install a definition for `id`, replacing any previous record whole.
    pub fn define(&mut self, id: HighlightId, highlight: Highlight) {
        if id == DEFAULT_HIGHLIGHT_ID {
            return;
        }
        self.highlights.insert(id, highlight);
    }

    /// Record that `id` currently carries a tracked semantic group name.
    pub fn observe(&mut self, name: ObservedHighlightName, id: HighlightId) {
        self.observed.insert(name, id);
    }

    /// The id last seen carrying a tracked semantic group name, if any.
    pub fn observed_id(&self, name: ObservedHighlightName) -> Option<HighlightId> {
        self.observed.get(&name).copied()
    }

    /// The stored record for `id`, if the server has defined one.
    pub fn highlight(&self, id: HighlightId) -> Option<&Highlight> {
        self.highlights.get(&id)
    }

    /// Resolved foreground color. `reverse` swaps foreground and background,
    /// defaults included.
    pub fn foreground(&self, id: HighlightId) -> Color {
        match self.highlights.get(&id) {
            Some(highlight) if highlight.reverse => {
                highlight.background.unwrap_or(self.default_background)
            }
            Some(highlight) => highlight.foreground.unwrap_or(self.default_foreground),
            None => self.default_foreground,
        }
    }

    /// Resolved background color. `reverse` swaps foreground and background,
    /// defaults included.
    pub fn background(&self, id: HighlightId) -> Color {
        match self.highlights.get(&id) {
            Some(highlight) if highlight.reverse => {
                highlight.foreground.unwrap_or(self.default_foreground)
            }
            Some(highlight) => highlight.background.unwrap_or(self.default_background),
            None => self.default_background,
        }
    }

    /// Resolved special (underline) color.
    pub fn special(&self, id: HighlightId) -> Color {
        self.highlights
            .get(&id)
            .and_then(|highlight| highlight.special)
            .unwrap_or(self.default_special)
    }

    /// Decorations for `id`, empty for unknown ids.
    pub fn decorations(&self, id: HighlightId) -> Decorations {
        self.highlights
            .get(&id)
            .map(|highlight| highlight.decorations)
            .unwrap_or_default()
    }

    /// Background opacity derived from the blend level.
    pub fn background_alpha(&self, id: HighlightId) -> f64 {
        let blend = self
            .highlights
            .get(&id)
            .map(|highlight| highlight.blend.clamp(0, 100))
            .unwrap_or(0);
        1.0 - blend as f64 / 100.0
    }
}
