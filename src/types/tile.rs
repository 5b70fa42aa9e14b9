//! 8x8 tiles of 2-bit shades.

use super::{Colour, Palette, PaletteTable};

/// Width and height of a tile in pixels.
pub const TILE_SIZE: usize = 8;

/// Bytes per tile in 2bpp planar format.
pub const TILE_BYTES: usize = 16;

/// An 8x8 tile. Each pixel is a shade from 0 (lightest) to 3 (darkest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    pixels: [[u8; TILE_SIZE]; TILE_SIZE],
}

impl Tile {
    /// A tile with every pixel at shade 0.
    pub const BLANK: Tile = Tile {
        pixels: [[0; TILE_SIZE]; TILE_SIZE],
    };

    /// Create a tile from rows of shades. Values are masked to 2 bits.
    pub fn new(mut pixels: [[u8; TILE_SIZE]; TILE_SIZE]) -> Self {
        for row in pixels.iter_mut() {
            for px in row.iter_mut() {
                *px &= 0x03;
            }
        }
        Self { pixels }
    }

    /// Decode one tile of 2bpp planar data: per row, the low bit plane byte
    /// followed by the high bit plane byte, leftmost pixel in bit 7.
    pub fn from_2bpp(data: &[u8; TILE_BYTES]) -> Self {
        let mut pixels = [[0; TILE_SIZE]; TILE_SIZE];
        for (y, row) in pixels.iter_mut().enumerate() {
            let low = data[y * 2];
            let high = data[y * 2 + 1];
            for (x, px) in row.iter_mut().enumerate() {
                let bit_low = (low >> (7 - x)) & 1;
                let bit_high = (high >> (7 - x)) & 1;
                *px = bit_low | (bit_high << 1);
            }
        }
        Self { pixels }
    }

    /// Shade at (x, y).
    pub fn shade(&self, x: usize, y: usize) -> u8 {
        self.pixels[y][x]
    }

    /// Shade at (x, y) as seen after mirroring the tile.
    pub fn shade_flipped(&self, x: usize, y: usize, x_flip: bool, y_flip: bool) -> u8 {
        let sx = if x_flip { TILE_SIZE - 1 - x } else { x };
        let sy = if y_flip { TILE_SIZE - 1 - y } else { y };
        self.pixels[sy][sx]
    }

    /// Colour of the pixel at (x, y) under a palette.
    pub fn colour(&self, table: &PaletteTable, palette: Palette, x: usize, y: usize) -> Colour {
        table.colour(palette, self.shade(x, y))
    }

    /// Check whether every pixel is shade 0.
    pub fn is_blank(&self) -> bool {
        *self == Tile::BLANK
    }
}
