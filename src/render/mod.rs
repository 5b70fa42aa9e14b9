//! Rendering for polished.
//!
//! Metatiles and maps are composited into a `Canvas`, a flat RGB buffer the
//! embedding application can display or encode.

mod canvas;
mod map;

use crate::types::{METATILE_SIZE, TILE_SIZE};

pub use canvas::Canvas;
pub use map::{MapRenderer, PaletteSource, RenderOptions};

/// Scale factor for zoomed metatile drawing.
pub const ZOOM_FACTOR: usize = 2;

/// Bytes per canvas pixel.
pub const NUM_CHANNELS: usize = 3;

/// Width and height of a metatile in pixels at 1x.
pub const METATILE_PX_SIZE: usize = METATILE_SIZE * TILE_SIZE;
