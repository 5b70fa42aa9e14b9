//! Metatilesets: 256 metatile slots over one tileset, with collision data and
//! background palettes.
//!
//! Slots at or beyond `size()` are cleared placeholders. They stay
//! addressable so the codecs and the renderer can index any of the 256 ids.

mod codec;
mod collision;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CodecError, PolishedError, Result};
use crate::tileset::Tileset;
use crate::types::{Metatile, Options, PaletteTable, MAX_METATILES};

pub use collision::{Collisions, QuadrantBytes, QuadrantLabels};

/// Files backing a metatileset. Attribute and collision files are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetatilesetPaths {
    pub metatiles: Option<PathBuf>,
    pub attributes: Option<PathBuf>,
    pub collisions: Option<PathBuf>,
}

/// A tileset plus the metatiles built from it.
#[derive(Debug, Clone)]
pub struct Metatileset {
    tileset: Tileset,
    metatiles: Vec<Metatile>,
    count: usize,
    collisions: Collisions,
    palettes: PaletteTable,
    modified: bool,
}

impl Metatileset {
    pub fn new(options: Options) -> Self {
        Self {
            tileset: Tileset::new(options),
            metatiles: (0..MAX_METATILES).map(|id| Metatile::new(id as u8)).collect(),
            count: 0,
            collisions: Collisions::default(),
            palettes: PaletteTable::default(),
            modified: false,
        }
    }

    pub fn options(&self) -> Options {
        self.tileset.options()
    }

    pub fn tileset(&self) -> &Tileset {
        &self.tileset
    }

    pub fn tileset_mut(&mut self) -> &mut Tileset {
        &mut self.tileset
    }

    /// Number of metatiles in use.
    pub fn size(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn metatile(&self, id: u8) -> &Metatile {
        &self.metatiles[id as usize]
    }

    /// Mutable access to a slot. Marks the metatileset modified.
    pub fn metatile_mut(&mut self, id: u8) -> &mut Metatile {
        self.modified = true;
        &mut self.metatiles[id as usize]
    }

    /// Metatiles in use.
    pub fn metatiles(&self) -> &[Metatile] {
        &self.metatiles[..self.count]
    }

    pub fn collisions(&self) -> &Collisions {
        &self.collisions
    }

    pub fn collisions_mut(&mut self) -> &mut Collisions {
        self.modified = true;
        &mut self.collisions
    }

    pub fn palettes(&self) -> &PaletteTable {
        &self.palettes
    }

    /// Load background palettes from a `.pal` file.
    pub fn load_palettes(&mut self, path: &Path) -> Result<()> {
        log::info!("Loading palettes from {}", path.display());
        let source = fs::read_to_string(path).map_err(|e| PolishedError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.palettes = PaletteTable::parse_pal(&source)?;
        Ok(())
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Change the number of metatiles in use. Slots between the old and new
    /// count are cleared, along with their collision data.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds `MAX_METATILES`.
    pub fn resize(&mut self, count: usize) {
        assert!(count <= MAX_METATILES, "{count} metatiles exceeds {MAX_METATILES}");
        let (low, high) = if count < self.count {
            (count, self.count)
        } else {
            (self.count, count)
        };
        for id in low..high {
            self.metatiles[id].clear();
            self.collisions.clear_slot(id as u8);
        }
        self.count = count;
        self.modified = true;
    }

    /// Clear every metatile and its collision data. Graphics stay loaded.
    pub fn clear(&mut self) {
        for metatile in self.metatiles.iter_mut() {
            metatile.clear();
        }
        self.count = 0;
        self.collisions = Collisions::default();
        self.modified = false;
    }

    /// Write every configured file and clear the modified flag.
    ///
    /// Nothing is written unless every target can be created.
    pub fn save(&mut self, paths: &MetatilesetPaths) -> Result<()> {
        let Some(metatiles) = &paths.metatiles else {
            return Err(PolishedError::Codec {
                path: PathBuf::new(),
                source: CodecError::NoFileChosen,
            });
        };
        for path in [Some(metatiles), paths.attributes.as_ref(), paths.collisions.as_ref()]
            .into_iter()
            .flatten()
        {
            codec::check_writable(path).map_err(|e| wrap(path, e))?;
        }

        self.write_metatiles(metatiles).map_err(|e| wrap(metatiles, e))?;
        if let Some(attributes) = &paths.attributes {
            self.write_attributes(attributes).map_err(|e| wrap(attributes, e))?;
        }
        if let Some(collisions) = &paths.collisions {
            self.write_collisions(collisions).map_err(|e| wrap(collisions, e))?;
        }
        self.modified = false;
        Ok(())
    }
}

pub(crate) fn wrap(path: &Path, source: CodecError) -> PolishedError {
    PolishedError::Codec {
        path: path.to_path_buf(),
        source,
    }
}
