//! Tile store: decoded 8x8 tiles from a tileset sheet plus an optional roof
//! overlay sheet.
//!
//! Sheets are loaded from `.png` (greyscale, luminance quantised to four
//! shades), raw `.2bpp`, or LZ-compressed `.2bpp.lz` files.

pub mod lz;

use std::fs;
use std::path::Path;

use image::GrayImage;

use crate::error::GfxError;
use crate::types::{Options, Tile, TILE_BYTES, TILE_SIZE};

/// Maximum number of tiles in a sheet.
pub const MAX_TILES: usize = 256;

/// Tile ids with this bit set resolve to the roof sheet when one is loaded.
const ROOF_BIT: u8 = 0x80;

/// Decoded tile sheets for one tileset.
#[derive(Debug, Clone, Default)]
pub struct Tileset {
    options: Options,
    tiles: Vec<Tile>,
    roof: Vec<Tile>,
}

impl Tileset {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            tiles: Vec::new(),
            roof: Vec::new(),
        }
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Load the main sheet, replacing prior content. On failure the sheet is
    /// left empty.
    pub fn load(&mut self, path: &Path) -> Result<(), GfxError> {
        self.tiles.clear();
        log::info!("Loading tiles from {}", path.display());
        self.tiles = read_tiles(path)?;
        log::debug!("{} tiles in {}", self.tiles.len(), path.display());
        Ok(())
    }

    /// Load the main sheet from uncompressed 2bpp bytes.
    pub fn load_2bpp(&mut self, data: &[u8]) -> Result<(), GfxError> {
        self.tiles.clear();
        self.tiles = check_count(tiles_from_2bpp(data)?)?;
        Ok(())
    }

    /// Load the roof overlay sheet, replacing any previous roof.
    pub fn load_roof(&mut self, path: &Path) -> Result<(), GfxError> {
        self.roof.clear();
        log::info!("Loading roof tiles from {}", path.display());
        self.roof = read_tiles(path)?;
        Ok(())
    }

    pub fn load_roof_2bpp(&mut self, data: &[u8]) -> Result<(), GfxError> {
        self.roof.clear();
        self.roof = check_count(tiles_from_2bpp(data)?)?;
        Ok(())
    }

    pub fn clear_roof(&mut self) {
        self.roof.clear();
    }

    /// Drop both sheets.
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.roof.clear();
    }

    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    pub fn num_roof_tiles(&self) -> usize {
        self.roof.len()
    }

    pub fn has_roof(&self) -> bool {
        !self.roof.is_empty()
    }

    /// Tile from the main sheet. Out-of-range ids give the blank tile.
    pub fn tile(&self, id: u8) -> &Tile {
        self.tiles.get(id as usize).unwrap_or(&Tile::BLANK)
    }

    /// Resolve a tile id the way a metatile cell sees it.
    ///
    /// In 256-tile mode every id indexes the main sheet. Otherwise ids with
    /// the top bit set come from the roof sheet when one is loaded.
    pub fn tile_or_roof(&self, id: u8) -> &Tile {
        if self.is_roof_id(id) {
            return self
                .roof
                .get((id & !ROOF_BIT) as usize)
                .unwrap_or(&Tile::BLANK);
        }
        self.tile(id)
    }

    /// Whether `tile_or_roof(id)` finds a loaded tile rather than falling
    /// back to the blank one.
    pub fn contains(&self, id: u8) -> bool {
        if self.is_roof_id(id) {
            ((id & !ROOF_BIT) as usize) < self.roof.len()
        } else {
            (id as usize) < self.tiles.len()
        }
    }

    fn is_roof_id(&self, id: u8) -> bool {
        !self.options.allow_256_tiles && id & ROOF_BIT != 0 && self.has_roof()
    }
}

/// Read a tile sheet, picking the decoder from the file extension.
pub fn read_tiles(path: &Path) -> Result<Vec<Tile>, GfxError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let tiles = if name.ends_with(".png") {
        let img = image::open(path).map_err(|_| GfxError::CannotOpenFile)?;
        tiles_from_image(&img.to_luma8())?
    } else if name.ends_with(".lz") {
        let data = fs::read(path).map_err(|_| GfxError::CannotOpenFile)?;
        tiles_from_2bpp(&lz::decompress(&data)?)?
    } else if name.ends_with(".2bpp") {
        let data = fs::read(path).map_err(|_| GfxError::CannotOpenFile)?;
        tiles_from_2bpp(&data)?
    } else {
        return Err(GfxError::BadExtension);
    };

    check_count(tiles)
}

/// Decode planar 2bpp data, 16 bytes per tile.
pub fn tiles_from_2bpp(data: &[u8]) -> Result<Vec<Tile>, GfxError> {
    if data.len() % TILE_BYTES != 0 {
        return Err(GfxError::IncompleteTile);
    }
    Ok(data
        .chunks_exact(TILE_BYTES)
        .map(|chunk| {
            let mut buf = [0; TILE_BYTES];
            buf.copy_from_slice(chunk);
            Tile::from_2bpp(&buf)
        })
        .collect())
}

/// Slice a greyscale image into tiles, left to right then top to bottom.
pub fn tiles_from_image(img: &GrayImage) -> Result<Vec<Tile>, GfxError> {
    let (width, height) = img.dimensions();
    let size = TILE_SIZE as u32;
    if width == 0 || height == 0 || width % size != 0 || height % size != 0 {
        return Err(GfxError::BadDimensions { width, height });
    }

    let mut tiles = Vec::with_capacity(((width / size) * (height / size)) as usize);
    for ty in 0..height / size {
        for tx in 0..width / size {
            let mut pixels = [[0; TILE_SIZE]; TILE_SIZE];
            for (y, row) in pixels.iter_mut().enumerate() {
                for (x, px) in row.iter_mut().enumerate() {
                    let luma = img.get_pixel(tx * size + x as u32, ty * size + y as u32).0[0];
                    *px = shade_of_luma(luma);
                }
            }
            tiles.push(Tile::new(pixels));
        }
    }
    Ok(tiles)
}

/// White is shade 0, black is shade 3.
fn shade_of_luma(luma: u8) -> u8 {
    3 - ((luma as u16 + 42) / 85).min(3) as u8
}

fn check_count(tiles: Vec<Tile>) -> Result<Vec<Tile>, GfxError> {
    if tiles.len() > MAX_TILES {
        return Err(GfxError::TooManyTiles(tiles.len()));
    }
    Ok(tiles)
}
