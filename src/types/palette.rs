//! Background palettes and the colour table they index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PolishedError, Result};

use super::Colour;

/// Number of background palettes.
pub const NUM_PALETTES: usize = 8;

/// Number of shades in a 2bpp palette.
pub const NUM_SHADES: usize = 4;

/// One of the eight background palettes, indexed by attribute bits 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Gray,
    Red,
    Green,
    Water,
    Yellow,
    Brown,
    Roof,
    Text,
}

impl Palette {
    /// All palettes in index order.
    pub const ALL: [Palette; NUM_PALETTES] = [
        Palette::Gray,
        Palette::Red,
        Palette::Green,
        Palette::Water,
        Palette::Yellow,
        Palette::Brown,
        Palette::Roof,
        Palette::Text,
    ];

    /// Palette for the low three bits of `index`.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index & 0x07) as usize]
    }

    /// Attribute index (0-7).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Lowercase name, as used in `polished.yaml`.
    pub fn name(self) -> &'static str {
        match self {
            Palette::Gray => "gray",
            Palette::Red => "red",
            Palette::Green => "green",
            Palette::Water => "water",
            Palette::Yellow => "yellow",
            Palette::Brown => "brown",
            Palette::Roof => "roof",
            Palette::Text => "text",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Colours for every (palette, shade) pair.
///
/// Shade 0 is the lightest colour and shade 3 the darkest, matching the
/// 2-bit pixel values of decoded tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteTable {
    colours: [[Colour; NUM_SHADES]; NUM_PALETTES],
}

impl PaletteTable {
    /// Built-in daytime colours.
    pub fn day() -> Self {
        const fn c(r: u8, g: u8, b: u8) -> Colour {
            Colour::from_rgb5(r, g, b)
        }
        Self {
            colours: [
                [c(27, 31, 27), c(21, 21, 21), c(13, 13, 13), c(7, 7, 7)],
                [c(27, 31, 27), c(31, 19, 24), c(30, 10, 6), c(7, 7, 7)],
                [c(22, 31, 10), c(12, 25, 1), c(5, 14, 0), c(7, 7, 7)],
                [c(27, 31, 27), c(18, 19, 31), c(15, 16, 31), c(7, 7, 7)],
                [c(27, 31, 27), c(31, 31, 7), c(31, 16, 1), c(7, 7, 7)],
                [c(27, 31, 27), c(24, 18, 7), c(20, 15, 3), c(7, 7, 7)],
                [c(27, 31, 27), c(15, 31, 31), c(5, 17, 31), c(7, 7, 7)],
                [c(31, 31, 16), c(31, 31, 16), c(14, 9, 0), c(0, 0, 0)],
            ],
        }
    }

    /// Four grey shades shared by every palette.
    pub fn monochrome() -> Self {
        let shades = [
            Colour::WHITE,
            Colour::rgb(0xAA, 0xAA, 0xAA),
            Colour::rgb(0x55, 0x55, 0x55),
            Colour::BLACK,
        ];
        Self {
            colours: [shades; NUM_PALETTES],
        }
    }

    /// Colour of a 2-bit shade under a palette.
    pub fn colour(&self, palette: Palette, shade: u8) -> Colour {
        self.colours[palette as usize][(shade & 0x03) as usize]
    }

    /// Replace one palette's colours.
    pub fn set(&mut self, palette: Palette, colours: [Colour; NUM_SHADES]) {
        self.colours[palette as usize] = colours;
    }

    /// Parse a `bg_tiles.pal`-style file.
    ///
    /// Each `RGB` line holds four colours as 5-bit channel triples. The first
    /// eight lines fill the palettes in index order; palettes without a line
    /// keep their built-in colours.
    pub fn parse_pal(source: &str) -> Result<Self> {
        let mut table = Self::day();
        let mut filled = 0;

        for line in source.lines() {
            if filled == NUM_PALETTES {
                break;
            }
            let line = line.split(';').next().unwrap_or("").trim();
            let Some(rest) = line.strip_prefix("RGB") else {
                continue;
            };

            let channels: Vec<u8> = rest
                .split(',')
                .filter_map(|v| v.trim().parse::<u8>().ok())
                .collect();
            if channels.len() != NUM_SHADES * 3 {
                log::warn!("Skipping malformed palette line: {}", line);
                continue;
            }

            let mut colours = [Colour::BLACK; NUM_SHADES];
            for (shade, rgb) in channels.chunks_exact(3).enumerate() {
                colours[shade] = Colour::from_rgb5(rgb[0], rgb[1], rgb[2]);
            }
            table.set(Palette::from_index(filled as u8), colours);
            filled += 1;
        }

        if filled == 0 {
            return Err(PolishedError::Parse {
                message: "No RGB palette lines found".to_string(),
                help: Some("Expected lines like `RGB 27,31,27, 21,21,21, 13,13,13, 07,07,07`".to_string()),
            });
        }

        Ok(table)
    }
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self::day()
    }
}
