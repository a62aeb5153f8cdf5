#![forbid(unsafe_code)]

//! Font arena.
//!
//! Draw runs reference fonts by a small copyable id so cached runs stay
//! cheap to clone and compare. The arena interns by value equality; asking
//! for the same description twice yields the same id.

/// Index into the font arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FontId(pub u32);

/// A font description plus the cell metrics derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    pub family: String,
    pub size: f64,
    /// Width of one grid cell in points.
    pub cell_width: f64,
    /// Height of one grid cell in points.
    pub cell_height: f64,
    /// Baseline offset from the cell top in points.
    pub ascent: f64,
}

impl FontMetrics {
    fn same_face(&self, other: &FontMetrics) -> bool {
        self.family == other.family && self.size.to_bits() == other.size.to_bits()
    }
}

/// Interning arena of font descriptions.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: Vec<FontMetrics>,
}

impl FontTable {
    /// Intern a description, returning the existing id if an equal face is
    /// already registered.
    pub fn intern(&mut self, metrics: FontMetrics) -> FontId {
        if let Some(index) = self.fonts.iter().position(|font| font.same_face(&metrics)) {
            return FontId(index as u32);
        }
        self.fonts.push(metrics);
        FontId((self.fonts.len() - 1) as u32)
    }

    /// Metrics for an interned id.
    pub fn metrics(&self, id: FontId) -> Option<&FontMetrics> {
        self.fonts.get(id.0 as usize)
    }

    /// Number of interned faces.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(family: &str, size: f64) -> FontMetrics {
        FontMetrics {
            family: family.to_string(),
            size,
            cell_width: size * 0.6,
            cell_height: size * 1.2,
            ascent: size,
        }
    }

    #[test]
    fn interning_is_idempotent() {
        let mut table = FontTable::default();
        let a = table.intern(metrics("Menlo", 13.0));
        let b = table.intern(metrics("Menlo", 13.0));
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn distinct_faces_get_distinct_ids() {
        let mut table = FontTable::default();
        let a = table.intern(metrics("Menlo", 13.0));
        let b = table.intern(metrics("Menlo", 14.0));
        let c = table.intern(metrics("Monaco", 13.0));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(table.metrics(c).unwrap().family, "Monaco");
    }
}
