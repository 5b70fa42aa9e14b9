//! RGB colour values.

use std::fmt;

/// An opaque RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Fill for metatile slots that are not in use.
    pub const EMPTY: Self = Self::rgb(0xBB, 0x00, 0xBB);

    /// Create a colour from 5-bit Game Boy Color channels (0-31 each).
    pub const fn from_rgb5(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(scale_rgb5(r), scale_rgb5(g), scale_rgb5(b))
    }

    /// Convert to an RGB triple.
    pub fn to_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Scale a 5-bit channel to 8 bits.
const fn scale_rgb5(c: u8) -> u8 {
    let c = if c > 31 { 31 } else { c };
    ((c as u16) * 255 / 31) as u8
}
