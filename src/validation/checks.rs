//! Consistency checks between a metatileset, its graphics and a map.
//!
//! Each check returns a `ValidationResult`.

use std::collections::BTreeMap;

use crate::metatileset::{Collisions, Metatileset};
use crate::types::Map;

use super::warning::{Diagnostic, ValidationResult};

/// Check that the metatileset defines at least one block.
pub fn check_empty_blockset(metatileset: &Metatileset) -> ValidationResult {
    let mut result = ValidationResult::new();
    if metatileset.is_empty() {
        result.push(
            Diagnostic::error("polished::validate::empty-blockset", "The blockset defines no blocks")
                .with_help("Check that the metatiles file belongs to this tileset"),
        );
    }
    result
}

/// Block ids used by the map, with how many cells use each.
fn block_usage(map: &Map) -> BTreeMap<u8, usize> {
    let mut usage = BTreeMap::new();
    for &id in map.blocks() {
        *usage.entry(id).or_insert(0) += 1;
    }
    usage
}

/// Check for map cells that reference blocks past the end of the blockset.
pub fn check_undefined_blocks(metatileset: &Metatileset, map: &Map) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (id, cells) in block_usage(map) {
        if (id as usize) < metatileset.size() {
            continue;
        }
        result.push(
            Diagnostic::warning(
                "polished::validate::undefined-block",
                format!(
                    "Block ${:02X} is used by {} cell(s) but the blockset has {} block(s)",
                    id,
                    cells,
                    metatileset.size()
                ),
            )
            .with_help("Undefined blocks render as placeholders")
            .at_block(id),
        );
    }

    result
}

/// Check that every tile id in the blockset resolves to a loaded tile.
pub fn check_tile_refs(metatileset: &Metatileset) -> ValidationResult {
    let mut result = ValidationResult::new();
    let tileset = metatileset.tileset();

    for metatile in metatileset.metatiles() {
        let missing: Vec<String> = metatile
            .iter_cells()
            .filter(|(_, _, cell)| !tileset.contains(cell.tile_id))
            .map(|(_, _, cell)| format!("${:02X}", cell.tile_id))
            .collect();
        if missing.is_empty() {
            continue;
        }
        result.push(
            Diagnostic::warning(
                "polished::validate::missing-tile",
                format!(
                    "Block ${:02X} uses tile(s) {} beyond the {} loaded",
                    metatile.id(),
                    missing.join(", "),
                    tileset.num_tiles()
                ),
            )
            .at_block(metatile.id()),
        );
    }

    result
}

/// Check that blocks placed on the map have text collision labels.
///
/// Binary collisions carry no labels and are not checked.
pub fn check_collision_labels(metatileset: &Metatileset, map: &Map) -> ValidationResult {
    let mut result = ValidationResult::new();
    let Collisions::Text(labels) = metatileset.collisions() else {
        return result;
    };

    for id in block_usage(map).into_keys() {
        if id as usize >= metatileset.size() {
            continue;
        }
        if labels[id as usize].iter().any(|label| label.is_empty()) {
            result.push(
                Diagnostic::warning(
                    "polished::validate::missing-collision",
                    format!("Block ${:02X} is on the map but has no collision record", id),
                )
                .with_help("Add a tilecoll line for every block")
                .at_block(id),
            );
        }
    }

    result
}
