//! Metatile and map compositing.
//!
//! The renderer looks up each cell's tile (roof overlay included), applies
//! its flips, and writes the palette colour for each shade. Metatile ids at
//! or beyond the metatileset's size become solid placeholder squares.

use crate::metatileset::Metatileset;
use crate::types::{Colour, Map, Palette, PaletteTable, TileCell, TILE_SIZE};

use super::{Canvas, METATILE_PX_SIZE, ZOOM_FACTOR};

/// Where the compositor takes each tile's palette from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteSource {
    /// One palette for every tile.
    Fixed(Palette),
    /// The palette stored in each cell's attribute byte.
    Attributes,
}

impl Default for PaletteSource {
    fn default() -> Self {
        PaletteSource::Fixed(Palette::Green)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub palette: PaletteSource,
}

impl RenderOptions {
    pub fn with_palette(palette: PaletteSource) -> Self {
        Self { palette }
    }
}

/// Composites metatiles onto canvases.
pub struct MapRenderer<'a> {
    metatileset: &'a Metatileset,
    options: RenderOptions,
    monochrome: PaletteTable,
}

impl<'a> MapRenderer<'a> {
    pub fn new(metatileset: &'a Metatileset, options: RenderOptions) -> Self {
        Self {
            metatileset,
            options,
            monochrome: PaletteTable::monochrome(),
        }
    }

    fn table(&self) -> &PaletteTable {
        if self.metatileset.options().monochrome {
            &self.monochrome
        } else {
            self.metatileset.palettes()
        }
    }

    /// Draw one metatile with its top-left corner at pixel (x, y).
    pub fn draw(&self, canvas: &mut Canvas, x: usize, y: usize, id: u8, zoomed: bool) {
        let scale = if zoomed { ZOOM_FACTOR } else { 1 };

        if id as usize >= self.metatileset.size() {
            let side = METATILE_PX_SIZE * scale;
            canvas.fill_rect(x, y, side, side, Colour::EMPTY);
            return;
        }

        let table = self.table();
        let metatile = self.metatileset.metatile(id);
        for (tx, ty, cell) in metatile.iter_cells() {
            let ox = x + tx * TILE_SIZE * scale;
            let oy = y + ty * TILE_SIZE * scale;
            self.draw_tile(canvas, table, cell, ox, oy, scale);
        }
    }

    fn draw_tile(
        &self,
        canvas: &mut Canvas,
        table: &PaletteTable,
        cell: &TileCell,
        x: usize,
        y: usize,
        scale: usize,
    ) {
        let tile = self.metatileset.tileset().tile_or_roof(cell.tile_id);
        let palette = match self.options.palette {
            PaletteSource::Fixed(palette) => palette,
            PaletteSource::Attributes => cell.palette,
        };

        for py in 0..TILE_SIZE {
            for px in 0..TILE_SIZE {
                let shade = tile.shade_flipped(px, py, cell.x_flip, cell.y_flip);
                let colour = table.colour(palette, shade);
                if scale == 1 {
                    canvas.set_pixel(x + px, y + py, colour);
                } else {
                    canvas.fill_rect(x + px * scale, y + py * scale, scale, scale, colour);
                }
            }
        }
    }

    /// Render a whole map at 1x, row by row.
    pub fn render(&self, map: &Map) -> Canvas {
        let mut canvas = Canvas::new(
            map.width() * METATILE_PX_SIZE,
            map.height() * METATILE_PX_SIZE,
        );
        for (mx, my, id) in map.iter_cells() {
            self.draw(&mut canvas, mx * METATILE_PX_SIZE, my * METATILE_PX_SIZE, id, false);
        }
        canvas
    }
}

impl Metatileset {
    /// Draw one metatile with the default fixed palette.
    pub fn draw(&self, canvas: &mut Canvas, x: usize, y: usize, id: u8, zoomed: bool) {
        MapRenderer::new(self, RenderOptions::default()).draw(canvas, x, y, id, zoomed);
    }

    /// Render a map with the default fixed palette.
    pub fn render_map(&self, map: &Map) -> Canvas {
        self.render_map_with(map, RenderOptions::default())
    }

    pub fn render_map_with(&self, map: &Map, options: RenderOptions) -> Canvas {
        MapRenderer::new(self, options).render(map)
    }
}
