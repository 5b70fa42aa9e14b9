//! Map type: a grid of metatile ids (the blk format) plus header attributes.
//!
//! Cells are stored row-major, one byte per cell, exactly as in a `.blk`
//! file. Accessors take pre-validated coordinates and panic when given
//! coordinates outside the grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolishedError;

use super::history::History;

/// Largest width or height a map can have.
pub const MAX_MAP_SIZE: usize = 255;

/// Placement of old content inside a resized map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

/// Alignment of an anchor along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Middle,
    End,
}

impl Align {
    /// Offset of old content along this axis in the new grid.
    ///
    /// Odd remainders round toward zero, which keeps the extra row or column
    /// on the bottom/right side.
    fn offset(self, old: usize, new: usize) -> isize {
        let delta = new as isize - old as isize;
        match self {
            Align::Start => 0,
            Align::Middle => delta / 2,
            Align::End => delta,
        }
    }
}

impl Anchor {
    /// All anchors in 3x3 grid order.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Left,
        Anchor::Center,
        Anchor::Right,
        Anchor::BottomLeft,
        Anchor::Bottom,
        Anchor::BottomRight,
    ];

    /// Anchor at a 3x3 grid index (0 = top-left, 8 = bottom-right).
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn horizontal(self) -> Align {
        match self.index() % 3 {
            0 => Align::Start,
            1 => Align::Middle,
            _ => Align::End,
        }
    }

    pub fn vertical(self) -> Align {
        match self.index() / 3 {
            0 => Align::Start,
            1 => Align::Middle,
            _ => Align::End,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::Top => "top",
            Anchor::TopRight => "top-right",
            Anchor::Left => "left",
            Anchor::Center => "center",
            Anchor::Right => "right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::Bottom => "bottom",
            Anchor::BottomRight => "bottom-right",
        }
    }
}

impl FromStr for Anchor {
    type Err = PolishedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == s)
            .ok_or_else(|| PolishedError::Parse {
                message: format!("Unknown anchor: {}", s),
                help: Some(
                    "Use one of top-left, top, top-right, left, center, right, bottom-left, bottom, bottom-right"
                        .to_string(),
                ),
            })
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header attributes of a map. Values come from project heuristics and may
/// be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapAttributes {
    pub tileset: String,
    pub roof: Option<String>,
    pub group: u32,
    pub environment: String,
    pub landmark: String,
    pub palette: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MapState {
    width: usize,
    height: usize,
    blocks: Vec<u8>,
}

/// A width x height grid of metatile ids.
#[derive(Debug, Clone)]
pub struct Map {
    width: usize,
    height: usize,
    blocks: Vec<u8>,

    /// Header attributes.
    pub attributes: MapAttributes,

    modified: bool,
    history: History<MapState>,
}

impl Map {
    /// Create a map filled with block 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    /// Create a map filled with `block`.
    pub fn filled(width: usize, height: usize, block: u8) -> Self {
        assert_valid_size(width, height);
        Self {
            width,
            height,
            blocks: vec![block; width * height],
            attributes: MapAttributes::default(),
            modified: false,
            history: History::new(),
        }
    }

    /// Create a map from row-major blk bytes. Returns `None` if the byte
    /// count does not match the size.
    pub fn from_blocks(width: usize, height: usize, blocks: Vec<u8>) -> Option<Self> {
        assert_valid_size(width, height);
        if blocks.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            blocks,
            attributes: MapAttributes::default(),
            modified: false,
            history: History::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Row-major block ids.
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    /// Swap in freshly loaded blocks. Undo history from before the load is
    /// dropped.
    pub(crate) fn replace_blocks(&mut self, blocks: Vec<u8>) {
        debug_assert_eq!(blocks.len(), self.width * self.height);
        self.blocks = blocks;
        self.history.clear();
    }

    pub fn block_at(&self, x: usize, y: usize) -> u8 {
        self.blocks[self.index(x, y)]
    }

    pub fn set_block(&mut self, x: usize, y: usize, id: u8) {
        let i = self.index(x, y);
        self.blocks[i] = id;
        self.modified = true;
    }

    /// Iterate over all cells with their positions.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        let width = self.width;
        self.blocks
            .iter()
            .enumerate()
            .map(move |(i, &id)| (i % width, i / width, id))
    }

    pub fn modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Change the map size, placing old content according to `anchor` and
    /// filling newly exposed cells with `fill`.
    pub fn resize(&mut self, width: usize, height: usize, anchor: Anchor, fill: u8) {
        assert_valid_size(width, height);

        let ox = anchor.horizontal().offset(self.width, width);
        let oy = anchor.vertical().offset(self.height, height);

        let mut blocks = vec![fill; width * height];
        for y in 0..height {
            let sy = y as isize - oy;
            if sy < 0 || sy >= self.height as isize {
                continue;
            }
            for x in 0..width {
                let sx = x as isize - ox;
                if sx < 0 || sx >= self.width as isize {
                    continue;
                }
                blocks[y * width + x] = self.blocks[sy as usize * self.width + sx as usize];
            }
        }

        self.width = width;
        self.height = height;
        self.blocks = blocks;
        self.modified = true;
    }

    /// Replace every cell 4-connected to `origin` through cells equal to
    /// `from` with `to`. Returns the number of cells changed.
    pub fn flood_fill(&mut self, origin: (usize, usize), from: u8, to: u8) -> usize {
        let start = self.index(origin.0, origin.1);
        if from == to || self.blocks[start] != from {
            return 0;
        }

        let mut changed = 0;
        let mut pending = vec![origin];
        self.blocks[start] = to;

        while let Some((x, y)) = pending.pop() {
            changed += 1;

            let mut neighbours = [None; 4];
            if x > 0 {
                neighbours[0] = Some((x - 1, y));
            }
            if x + 1 < self.width {
                neighbours[1] = Some((x + 1, y));
            }
            if y > 0 {
                neighbours[2] = Some((x, y - 1));
            }
            if y + 1 < self.height {
                neighbours[3] = Some((x, y + 1));
            }

            for (nx, ny) in neighbours.into_iter().flatten() {
                let i = ny * self.width + nx;
                if self.blocks[i] == from {
                    // Mark on push so each cell is queued once
                    self.blocks[i] = to;
                    pending.push((nx, ny));
                }
            }
        }

        self.modified = true;
        changed
    }

    /// Snapshot the current state before an edit.
    pub fn remember(&mut self) {
        let state = self.state();
        self.history.remember(state);
    }

    /// Restore the most recently remembered state.
    pub fn undo(&mut self) -> bool {
        let current = self.state();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Restore the most recently undone state.
    pub fn redo(&mut self) -> bool {
        let current = self.state();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn state(&self) -> MapState {
        MapState {
            width: self.width,
            height: self.height,
            blocks: self.blocks.clone(),
        }
    }

    fn restore(&mut self, state: MapState) {
        self.width = state.width;
        self.height = state.height;
        self.blocks = state.blocks;
        self.modified = true;
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "block ({x}, {y}) outside {}x{} map",
            self.width,
            self.height
        );
        y * self.width + x
    }
}

fn assert_valid_size(width: usize, height: usize) {
    assert!(
        (1..=MAX_MAP_SIZE).contains(&width) && (1..=MAX_MAP_SIZE).contains(&height),
        "map size {width}x{height} outside 1..={MAX_MAP_SIZE}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A map whose cell at (x, y) holds `y * 10 + x`.
    fn numbered(width: usize, height: usize) -> Map {
        let blocks = (0..height)
            .flat_map(|y| (0..width).map(move |x| (y * 10 + x) as u8))
            .collect();
        Map::from_blocks(width, height, blocks).unwrap()
    }

    fn rows(map: &Map) -> Vec<Vec<u8>> {
        map.blocks()
            .chunks(map.width())
            .map(|row| row.to_vec())
            .collect()
    }

    #[test]
    fn test_map_new() {
        let map = Map::new(3, 2);
        assert_eq!(map.size(), (3, 2));
        assert_eq!(map.blocks(), &[0; 6]);
        assert!(!map.modified());
    }

    #[test]
    fn test_set_and_get_block() {
        let mut map = Map::new(2, 2);
        map.set_block(1, 0, 9);
        assert_eq!(map.block_at(1, 0), 9);
        assert_eq!(map.blocks(), &[0, 9, 0, 0]);
        assert!(map.modified());
    }

    #[test]
    #[should_panic]
    fn test_block_out_of_bounds_panics() {
        let map = Map::new(2, 2);
        map.block_at(2, 0);
    }

    #[test]
    #[should_panic]
    fn test_zero_size_panics() {
        Map::new(0, 4);
    }

    #[test]
    fn test_from_blocks_checks_length() {
        assert!(Map::from_blocks(2, 2, vec![1, 2, 3]).is_none());
        assert!(Map::from_blocks(2, 2, vec![1, 2, 3, 4]).is_some());
    }

    #[test]
    fn test_iter_cells() {
        let map = numbered(2, 2);
        let cells: Vec<_> = map.iter_cells().collect();
        assert_eq!(cells, vec![(0, 0, 0), (1, 0, 1), (0, 1, 10), (1, 1, 11)]);
    }

    #[test]
    fn test_anchor_alignment() {
        assert_eq!(Anchor::TopLeft.horizontal(), Align::Start);
        assert_eq!(Anchor::TopLeft.vertical(), Align::Start);
        assert_eq!(Anchor::Bottom.horizontal(), Align::Middle);
        assert_eq!(Anchor::Bottom.vertical(), Align::End);
        assert_eq!(Anchor::Right.horizontal(), Align::End);
        assert_eq!(Anchor::Right.vertical(), Align::Middle);
        assert_eq!(Anchor::from_index(4), Some(Anchor::Center));
        assert_eq!(Anchor::from_index(9), None);
    }

    #[test]
    fn test_anchor_parse() {
        assert_eq!("top-left".parse::<Anchor>().unwrap(), Anchor::TopLeft);
        assert_eq!("CENTER".parse::<Anchor>().unwrap(), Anchor::Center);
        assert!("middle".parse::<Anchor>().is_err());
        let a: Anchor = serde_yaml::from_str("bottom-right").unwrap();
        assert_eq!(a, Anchor::BottomRight);
    }

    #[test]
    fn test_resize_grow_top_left() {
        let mut map = numbered(2, 2);
        map.resize(3, 3, Anchor::TopLeft, 99);
        assert_eq!(
            rows(&map),
            vec![vec![0, 1, 99], vec![10, 11, 99], vec![99, 99, 99]]
        );
        assert!(map.modified());
    }

    #[test]
    fn test_resize_grow_bottom_right() {
        let mut map = numbered(2, 2);
        map.resize(3, 3, Anchor::BottomRight, 99);
        assert_eq!(
            rows(&map),
            vec![vec![99, 99, 99], vec![99, 0, 1], vec![99, 10, 11]]
        );
    }

    #[test]
    fn test_resize_grow_center_biases_top_left() {
        let mut map = numbered(1, 1);
        map.resize(4, 4, Anchor::Center, 99);
        // Three extra columns: one before, two after
        assert_eq!(map.block_at(1, 1), 0);
        assert_eq!(map.block_at(0, 0), 99);
        assert_eq!(map.block_at(2, 2), 99);
    }

    #[test]
    fn test_resize_shrink_center() {
        let mut map = numbered(5, 5);
        map.resize(2, 2, Anchor::Center, 99);
        // Offset (2 - 5) / 2 = -1: old (1, 1) lands at (0, 0)
        assert_eq!(rows(&map), vec![vec![11, 12], vec![21, 22]]);
    }

    #[test]
    fn test_resize_shrink_bottom() {
        let mut map = numbered(3, 3);
        map.resize(3, 1, Anchor::Bottom, 99);
        assert_eq!(rows(&map), vec![vec![20, 21, 22]]);
    }

    #[test]
    fn test_resize_preserves_overlap_for_every_anchor() {
        let (ow, oh) = (4, 3);
        for anchor in Anchor::ALL {
            for (nw, nh) in [(6, 5), (2, 2), (4, 7), (1, 3)] {
                let original = numbered(ow, oh);
                let mut map = original.clone();
                map.resize(nw, nh, anchor, 200);

                let ox = anchor.horizontal().offset(ow, nw);
                let oy = anchor.vertical().offset(oh, nh);
                for (x, y, id) in map.iter_cells() {
                    let sx = x as isize - ox;
                    let sy = y as isize - oy;
                    if (0..ow as isize).contains(&sx) && (0..oh as isize).contains(&sy) {
                        assert_eq!(id, original.block_at(sx as usize, sy as usize));
                    } else {
                        assert_eq!(id, 200, "{anchor} {nw}x{nh} at ({x}, {y})");
                    }
                }
            }
        }
    }

    #[test]
    fn test_flood_fill_whole_map() {
        let mut map = Map::filled(6, 4, 3);
        let changed = map.flood_fill((2, 1), 3, 7);
        assert_eq!(changed, 24);
        assert!(map.blocks().iter().all(|&b| b == 7));
    }

    #[test]
    fn test_flood_fill_leaves_island() {
        // A wall of 1s splits the map; the right side is an island of 0s
        let mut map = Map::new(5, 3);
        for y in 0..3 {
            map.set_block(2, y, 1);
        }
        let changed = map.flood_fill((0, 0), 0, 5);
        assert_eq!(changed, 6);
        assert_eq!(
            rows(&map),
            vec![vec![5, 5, 1, 0, 0], vec![5, 5, 1, 0, 0], vec![5, 5, 1, 0, 0]]
        );
    }

    #[test]
    fn test_flood_fill_no_op() {
        let mut map = Map::filled(3, 3, 4);
        assert_eq!(map.flood_fill((1, 1), 4, 4), 0);
        assert_eq!(map.flood_fill((1, 1), 2, 8), 0);
        assert!(map.blocks().iter().all(|&b| b == 4));
        assert!(!map.modified());
    }

    #[test]
    fn test_flood_fill_large_map() {
        let mut map = Map::new(MAX_MAP_SIZE, MAX_MAP_SIZE);
        let changed = map.flood_fill((128, 128), 0, 1);
        assert_eq!(changed, MAX_MAP_SIZE * MAX_MAP_SIZE);
    }

    #[test]
    fn test_undo_redo_resize() {
        let mut map = numbered(2, 2);
        map.remember();
        map.resize(3, 1, Anchor::TopLeft, 0);
        assert_eq!(map.size(), (3, 1));

        assert!(map.undo());
        assert_eq!(map.size(), (2, 2));
        assert_eq!(map.blocks(), numbered(2, 2).blocks());

        assert!(map.redo());
        assert_eq!(map.size(), (3, 1));
        assert!(!map.redo());
    }

    #[test]
    fn test_undo_without_history() {
        let mut map = Map::new(1, 1);
        assert!(!map.can_undo());
        assert!(!map.undo());
    }
}
