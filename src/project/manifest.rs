//! Project manifest (polished.yaml) parsing.
//!
//! The manifest is optional. It holds the decode mode flags and defaults for
//! editing and rendering.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PolishedError, Result};
use crate::render::{PaletteSource, RenderOptions};
use crate::types::{Anchor, Options, Palette};

/// Manifest filename at the project root.
pub const MANIFEST_FILE: &str = "polished.yaml";

/// Project manifest loaded from polished.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Render every palette with four grey shades.
    pub monochrome: bool,

    /// Index all 256 tile ids into the main sheet, never the roof overlay.
    pub allow_256_tiles: bool,

    /// Block id for cells exposed by a resize.
    pub fill_block: u8,

    /// Default anchor for resizing.
    pub resize_anchor: Anchor,

    /// Palette used for every tile when rendering.
    pub render_palette: Palette,

    /// Use each cell's attribute palette instead of `render_palette`.
    pub attribute_palettes: bool,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            monochrome: false,
            allow_256_tiles: false,
            fill_block: 0,
            resize_anchor: Anchor::default(),
            render_palette: Palette::Green,
            attribute_palettes: false,
        }
    }
}

impl Manifest {
    /// Load a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PolishedError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load the manifest in `root`, or defaults when there is none.
    pub fn find(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        log::info!("Loading {}", path.display());
        Self::load(&path)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PolishedError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some(format!("Check {} syntax", MANIFEST_FILE)),
        })
    }

    /// Decode options derived from the mode flags.
    pub fn options(&self) -> Options {
        Options::default()
            .monochrome(self.monochrome)
            .allow_256_tiles(self.allow_256_tiles)
    }

    pub fn render_options(&self) -> RenderOptions {
        let palette = if self.attribute_palettes {
            PaletteSource::Attributes
        } else {
            PaletteSource::Fixed(self.render_palette)
        };
        RenderOptions::with_palette(palette)
    }
}
