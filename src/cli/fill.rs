//! `polished fill`: flood fill from one cell.

use clap::Args;

use crate::error::{PolishedError, Result};
use crate::output::{display_path, plural, Printer};

use super::MapArgs;

/// Flood fill a region of a map with one block
#[derive(Args, Debug)]
pub struct FillArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Column of the starting cell
    #[arg(short)]
    pub x: usize,

    /// Row of the starting cell
    #[arg(short)]
    pub y: usize,

    /// Block id to fill with
    #[arg(long, short)]
    pub block: u8,
}

/// Fill and write the map, returning the number of cells changed.
pub fn fill(args: &FillArgs) -> Result<usize> {
    let (project, guess) = args.map.resolve()?;
    let mut map = project.load_map(&args.map.blk, &guess)?;

    if args.x >= map.width() || args.y >= map.height() {
        return Err(PolishedError::Project {
            message: format!(
                "({}, {}) is outside the {}x{} map",
                args.x,
                args.y,
                map.width(),
                map.height()
            ),
            help: None,
        });
    }

    let from = map.block_at(args.x, args.y);
    let changed = map.flood_fill((args.x, args.y), from, args.block);
    if changed > 0 {
        map.write_blk(&args.map.blk)
            .map_err(|source| PolishedError::Blk {
                path: args.map.blk.clone(),
                source,
            })?;
    }
    Ok(changed)
}

pub fn run(args: FillArgs, printer: &Printer) -> Result<()> {
    let changed = fill(&args)?;
    if changed == 0 {
        printer.info("Unchanged", &display_path(&args.map.blk));
    } else {
        printer.success(
            "Filled",
            &format!(
                "{} in {} with ${:02X}",
                plural(changed, "cell", "cells"),
                display_path(&args.map.blk),
                args.block
            ),
        );
    }
    Ok(())
}
