//! polished - metatile and map engine for Game Boy disassembly projects
//!
//! Loads a tileset's graphics, its metatile blockset and a blk map, renders
//! the map to an RGB pixel buffer and writes edited data back in the
//! formats the disassemblies use.

pub mod blk;
pub mod cli;
pub mod error;
pub mod metatileset;
pub mod output;
pub mod project;
pub mod render;
pub mod tileset;
pub mod types;
pub mod validation;

pub use error::{BlkError, CodecError, GfxError, PolishedError, Result};
pub use metatileset::{Collisions, Metatileset, MetatilesetPaths};
pub use project::{Artifact, Manifest, MapGuess, Project};
pub use render::{Canvas, MapRenderer, PaletteSource, RenderOptions};
pub use tileset::Tileset;
pub use types::{
    Anchor, Attributes, Colour, Map, MapAttributes, Metatile, Options, Palette, PaletteTable,
    Quadrant, Tile, TileCell,
};
pub use validation::{validate, Diagnostic, Severity, ValidationResult};
