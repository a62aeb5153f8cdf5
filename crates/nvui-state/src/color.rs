#![forbid(unsafe_code)]

//! Packed 24-bit colors as sent by the server.

/// An opaque sRGB color, packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub rgb: u32,
}

impl Color {
    pub const BLACK: Color = Color { rgb: 0x000000 };
    pub const WHITE: Color = Color { rgb: 0xFFFFFF };

    /// Create from a packed `0xRRGGBB` value.
    #[inline]
    pub const fn new(rgb: u32) -> Self {
        Self { rgb }
    }

    /// Create from a protocol integer. Negative values (the server's "no
    /// color" marker) yield `None`.
    #[inline]
    pub const fn from_protocol(value: i64) -> Option<Self> {
        if value < 0 {
            None
        } else {
            Some(Self {
                rgb: (value as u32) & 0x00FF_FFFF,
            })
        }
    }

    /// Red component, `0..=255`.
    #[inline]
    pub const fn red(&self) -> u8 {
        ((self.rgb >> 16) & 0xFF) as u8
    }

    /// Green component, `0..=255`.
    #[inline]
    pub const fn green(&self) -> u8 {
        ((self.rgb >> 8) & 0xFF) as u8
    }

    /// Blue component, `0..=255`.
    #[inline]
    pub const fn blue(&self) -> u8 {
        (self.rgb & 0xFF) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_unpack() {
        let color = Color::new(0x12_34_56);
        assert_eq!(color.red(), 0x12);
        assert_eq!(color.green(), 0x34);
        assert_eq!(color.blue(), 0x56);
    }

    #[test]
    fn protocol_negative_means_unset() {
        assert_eq!(Color::from_protocol(-1), None);
        assert_eq!(Color::from_protocol(0xFF0000), Some(Color::new(0xFF0000)));
    }

    #[test]
    fn protocol_masks_high_bits() {
        assert_eq!(
            Color::from_protocol(0x01_00_00_00 + 0xABCDEF),
            Some(Color::new(0xABCDEF))
        );
    }
}
