//! Metatiles: 4x4 grids of tile references with per-cell attributes.

use super::Palette;

/// Width and height of a metatile in tiles.
pub const METATILE_SIZE: usize = 4;

/// Number of cells in a metatile.
pub const METATILE_CELLS: usize = METATILE_SIZE * METATILE_SIZE;

/// Number of collision quadrants in a metatile.
pub const NUM_QUADRANTS: usize = 4;

/// Maximum number of metatiles in a metatileset.
pub const MAX_METATILES: usize = 256;

const PALETTE_MASK: u8 = 0x07;
const TILE_HIGH_BIT: u8 = 0x08;
const X_FLIP_BIT: u8 = 0x20;
const Y_FLIP_BIT: u8 = 0x40;
const PRIORITY_BIT: u8 = 0x80;

/// One of the four 2x2-tile collision regions of a metatile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants in file order.
    pub const ALL: [Quadrant; NUM_QUADRANTS] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Quadrant containing the tile cell at (x, y).
    pub fn of_cell(x: usize, y: usize) -> Self {
        match (x < METATILE_SIZE / 2, y < METATILE_SIZE / 2) {
            (true, true) => Quadrant::TopLeft,
            (false, true) => Quadrant::TopRight,
            (true, false) => Quadrant::BottomLeft,
            (false, false) => Quadrant::BottomRight,
        }
    }
}

/// Decoded form of one attribute byte.
///
/// Bits 0-2 palette, bit 3 tile id high bit, bit 5 x-flip, bit 6 y-flip,
/// bit 7 priority. Bit 4 is unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    pub palette: Palette,
    pub tile_high_bit: bool,
    pub x_flip: bool,
    pub y_flip: bool,
    pub priority: bool,
}

impl Attributes {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            palette: Palette::from_index(byte & PALETTE_MASK),
            tile_high_bit: byte & TILE_HIGH_BIT != 0,
            x_flip: byte & X_FLIP_BIT != 0,
            y_flip: byte & Y_FLIP_BIT != 0,
            priority: byte & PRIORITY_BIT != 0,
        }
    }

    pub fn to_byte(self) -> u8 {
        let mut byte = self.palette.index();
        if self.tile_high_bit {
            byte |= TILE_HIGH_BIT;
        }
        if self.x_flip {
            byte |= X_FLIP_BIT;
        }
        if self.y_flip {
            byte |= Y_FLIP_BIT;
        }
        if self.priority {
            byte |= PRIORITY_BIT;
        }
        byte
    }
}

/// A single tile reference inside a metatile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileCell {
    pub tile_id: u8,
    pub palette: Palette,
    pub priority: bool,
    pub x_flip: bool,
    pub y_flip: bool,
}

impl TileCell {
    /// Attribute byte for this cell. The tile id high bit is derived from
    /// `tile_id`.
    pub fn attributes(&self) -> Attributes {
        Attributes {
            palette: self.palette,
            tile_high_bit: self.tile_id >= 0x80,
            x_flip: self.x_flip,
            y_flip: self.y_flip,
            priority: self.priority,
        }
    }

    /// Apply a decoded attribute byte. `tile_id` is left untouched since the
    /// tile-grid file is authoritative for it.
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.palette = attributes.palette;
        self.priority = attributes.priority;
        self.x_flip = attributes.x_flip;
        self.y_flip = attributes.y_flip;
    }
}

/// A 4x4 grid of tile cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metatile {
    id: u8,
    cells: [[TileCell; METATILE_SIZE]; METATILE_SIZE],
}

impl Metatile {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            cells: [[TileCell::default(); METATILE_SIZE]; METATILE_SIZE],
        }
    }

    /// Index of this metatile within its metatileset.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Reset every cell to tile 0 with default attributes.
    pub fn clear(&mut self) {
        self.cells = [[TileCell::default(); METATILE_SIZE]; METATILE_SIZE];
    }

    pub fn cell(&self, x: usize, y: usize) -> &TileCell {
        assert!(x < METATILE_SIZE && y < METATILE_SIZE, "cell ({x}, {y}) out of bounds");
        &self.cells[y][x]
    }

    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut TileCell {
        assert!(x < METATILE_SIZE && y < METATILE_SIZE, "cell ({x}, {y}) out of bounds");
        &mut self.cells[y][x]
    }

    pub fn tile_id(&self, x: usize, y: usize) -> u8 {
        self.cell(x, y).tile_id
    }

    pub fn set_tile_id(&mut self, x: usize, y: usize, id: u8) {
        self.cell_mut(x, y).tile_id = id;
    }

    /// Iterate over cells in row-major order with their positions.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &TileCell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().map(move |(x, cell)| (x, y, cell))
        })
    }

    /// Tile ids in row-major order, as stored in a tile-grid record.
    pub fn tile_ids(&self) -> [u8; METATILE_CELLS] {
        let mut ids = [0; METATILE_CELLS];
        for (x, y, cell) in self.iter_cells() {
            ids[y * METATILE_SIZE + x] = cell.tile_id;
        }
        ids
    }

    /// Attribute bytes in row-major order, as stored in an attribute record.
    pub fn attribute_bytes(&self) -> [u8; METATILE_CELLS] {
        let mut bytes = [0; METATILE_CELLS];
        for (x, y, cell) in self.iter_cells() {
            bytes[y * METATILE_SIZE + x] = cell.attributes().to_byte();
        }
        bytes
    }
}
