//! Decode and compose mode flags.

use serde::{Deserialize, Serialize};

/// Mode flags that change how tile ids and palettes are interpreted.
///
/// Fixed when a `Tileset` or `Metatileset` is created and read-only for the
/// rest of its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Render every palette with four grey shades.
    pub monochrome: bool,

    /// Index all 256 tile ids into the main sheet, never the roof overlay.
    pub allow_256_tiles: bool,
}

impl Options {
    pub fn monochrome(mut self, monochrome: bool) -> Self {
        self.monochrome = monochrome;
        self
    }

    pub fn allow_256_tiles(mut self, allow: bool) -> Self {
        self.allow_256_tiles = allow;
        self
    }
}
