//! `polished info`: report the guessed header and the loaded blockset.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::error::{PolishedError, Result};
use crate::metatileset::Metatileset;
use crate::output::{display_path, plural, Printer};
use crate::types::MapAttributes;
use crate::validation;

use super::MapArgs;

/// Show what the project says about a map
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// Print a JSON report to stdout
    #[arg(long)]
    pub json: bool,
}

/// Everything `info` knows about a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapReport {
    pub blk: PathBuf,
    pub root: PathBuf,
    pub width: Option<usize>,
    pub height: Option<usize>,
    #[serde(flatten)]
    pub attributes: MapAttributes,
    pub blockset: Option<BlocksetReport>,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlocksetReport {
    pub blocks: usize,
    pub tiles: usize,
    pub roof_tiles: usize,
    pub binary_collisions: bool,
}

impl BlocksetReport {
    fn of(metatileset: &Metatileset) -> Self {
        Self {
            blocks: metatileset.size(),
            tiles: metatileset.tileset().num_tiles(),
            roof_tiles: metatileset.tileset().num_roof_tiles(),
            binary_collisions: metatileset.collisions().is_binary(),
        }
    }
}

/// Build the report. A blockset that fails to load is logged and left out.
pub fn report(args: &InfoArgs) -> Result<MapReport> {
    let (project, guess) = args.map.resolve()?;
    let mut report = MapReport {
        blk: args.map.blk.clone(),
        root: project.root().to_path_buf(),
        width: guess.size.map(|(w, _)| w),
        height: guess.size.map(|(_, h)| h),
        attributes: guess.attributes.clone(),
        blockset: None,
        errors: 0,
        warnings: 0,
    };

    if guess.attributes.tileset.is_empty() {
        return Ok(report);
    }
    let metatileset = match project
        .load_metatileset(&guess.attributes.tileset, guess.attributes.roof.as_deref())
    {
        Ok(metatileset) => metatileset,
        Err(e) => {
            log::warn!("Cannot load blockset: {}", e);
            return Ok(report);
        }
    };
    report.blockset = Some(BlocksetReport::of(&metatileset));

    if guess.size.is_some() {
        let map = project.load_map(&args.map.blk, &guess)?;
        let result = validation::validate(&metatileset, &map);
        report.errors = result.error_count();
        report.warnings = result.warning_count();
    }
    Ok(report)
}

pub fn run(args: InfoArgs, printer: &Printer) -> Result<()> {
    let report = report(&args)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| PolishedError::Parse {
            message: format!("Cannot serialise report: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    printer.info("Map", &printer.cyan(&display_path(&report.blk)));
    printer.info("Project", &display_path(&report.root));
    match (report.width, report.height) {
        (Some(w), Some(h)) => printer.info("Size", &format!("{}x{}", w, h)),
        _ => printer.warning("Size", "unknown"),
    }

    let attributes = &report.attributes;
    if attributes.tileset.is_empty() {
        printer.warning("Tileset", "unknown");
    } else {
        printer.info("Tileset", &printer.bold(&attributes.tileset));
    }
    if let Some(roof) = &attributes.roof {
        printer.info("Roof", roof);
    }
    for (label, value) in [
        ("Environment", &attributes.environment),
        ("Landmark", &attributes.landmark),
        ("Palette", &attributes.palette),
    ] {
        if !value.is_empty() {
            printer.info(label, value);
        }
    }
    if attributes.group != 0 {
        printer.info("Group", &attributes.group.to_string());
    }

    if let Some(blockset) = &report.blockset {
        printer.info(
            "Blockset",
            &format!(
                "{}, {}",
                plural(blockset.blocks, "block", "blocks"),
                plural(blockset.tiles, "tile", "tiles")
            ),
        );
        if blockset.roof_tiles > 0 {
            printer.info("Roof", &plural(blockset.roof_tiles, "tile", "tiles"));
        }
        let kind = if blockset.binary_collisions { "binary" } else { "text" };
        printer.info("Collisions", kind);
    }

    if report.errors > 0 || report.warnings > 0 {
        printer.warning(
            "Problems",
            &format!(
                "{}, {} (run `polished check` for details)",
                plural(report.errors, "error", "errors"),
                plural(report.warnings, "warning", "warnings")
            ),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, data: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, data).unwrap();
    }

    fn args(blk: PathBuf) -> InfoArgs {
        InfoArgs {
            map: MapArgs {
                blk,
                width: None,
                height: None,
                tileset: None,
                roof: None,
            },
            json: false,
        }
    }

    #[test]
    fn test_report_with_blockset() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "main.asm", b"");
        write(root, "gfx/tilesets/johto.2bpp.lz", &[0x6F, 0xFF]);
        write(root, "data/tilesets/johto_metatiles.bin", &[0; 32]);
        write(root, "maps/Route1.2x1.johto.blk", &[0, 1]);

        let report = report(&args(root.join("maps/Route1.2x1.johto.blk"))).unwrap();
        assert_eq!(report.width, Some(2));
        assert_eq!(report.height, Some(1));
        assert_eq!(report.attributes.tileset, "johto");
        let blockset = report.blockset.unwrap();
        assert_eq!(blockset.blocks, 2);
        assert_eq!(blockset.tiles, 1);
        assert!(!blockset.binary_collisions);
        // No collision records for blocks 0 and 1
        assert_eq!(report.warnings, 2);
    }

    #[test]
    fn test_report_without_tileset() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "main.asm", b"");
        write(root, "maps/Mystery.blk", &[0; 4]);

        let report = report(&args(root.join("maps/Mystery.blk"))).unwrap();
        assert_eq!(report.width, None);
        assert!(report.attributes.tileset.is_empty());
        assert!(report.blockset.is_none());
    }

    #[test]
    fn test_report_serialises_flat_attributes() {
        let report = MapReport {
            blk: PathBuf::from("maps/Route1.blk"),
            root: PathBuf::from("."),
            width: Some(10),
            height: Some(9),
            attributes: MapAttributes {
                tileset: "johto".to_string(),
                ..MapAttributes::default()
            },
            blockset: None,
            errors: 0,
            warnings: 0,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["tileset"], "johto");
        assert_eq!(value["width"], 10);
        assert!(value["blockset"].is_null());
    }
}
