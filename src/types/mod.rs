//! Core domain types for polished.
//!
//! This module contains the data model shared by the codecs and renderer:
//! - `Colour` - RGB colour values
//! - `Palette` / `PaletteTable` - background palettes and their colours
//! - `Options` - decode and compose mode flags
//! - `Tile` - 8x8 2bpp tiles
//! - `Metatile` - 4x4 grids of tile cells with attributes
//! - `Map` - blk grids of metatile ids, with resizing, flood fill and history

mod colour;
mod history;
mod map;
mod metatile;
mod options;
mod palette;
mod tile;

pub use colour::Colour;
pub use history::{History, MAX_HISTORY};
pub use map::{Align, Anchor, Map, MapAttributes, MAX_MAP_SIZE};
pub use metatile::{
    Attributes, Metatile, Quadrant, TileCell, MAX_METATILES, METATILE_CELLS, METATILE_SIZE,
    NUM_QUADRANTS,
};
pub use options::Options;
pub use palette::{Palette, PaletteTable, NUM_PALETTES, NUM_SHADES};
pub use tile::{Tile, TILE_BYTES, TILE_SIZE};
