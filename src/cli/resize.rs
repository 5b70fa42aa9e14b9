//! `polished resize`: change a map's dimensions.

use std::path::PathBuf;

use clap::Args;

use crate::error::{PolishedError, Result};
use crate::output::{display_path, Printer};
use crate::project::metadata::size_from_filename;
use crate::types::{Anchor, Map, MAX_MAP_SIZE};

use super::MapArgs;

/// Resize a map
#[derive(Args, Debug)]
pub struct ResizeArgs {
    #[command(flatten)]
    pub map: MapArgs,

    /// New width in blocks
    #[arg(short = 'W', long = "new-width")]
    pub new_width: usize,

    /// New height in blocks
    #[arg(short = 'H', long = "new-height")]
    pub new_height: usize,

    /// Where the old content sits in the new map
    #[arg(long)]
    pub anchor: Option<Anchor>,

    /// Block id for new cells
    #[arg(long)]
    pub fill: Option<u8>,

    /// Write here instead of overwriting the input
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

fn check_size(width: usize, height: usize) -> Result<()> {
    if (1..=MAX_MAP_SIZE).contains(&width) && (1..=MAX_MAP_SIZE).contains(&height) {
        return Ok(());
    }
    Err(PolishedError::Project {
        message: format!("Cannot resize to {}x{}", width, height),
        help: Some(format!("Sizes run from 1 to {}", MAX_MAP_SIZE)),
    })
}

/// Resize and write the map, returning it.
pub fn resize(args: &ResizeArgs) -> Result<Map> {
    check_size(args.new_width, args.new_height)?;
    let (project, guess) = args.map.resolve()?;
    let mut map = project.load_map(&args.map.blk, &guess)?;

    let manifest = project.manifest();
    let anchor = args.anchor.unwrap_or(manifest.resize_anchor);
    let fill = args.fill.unwrap_or(manifest.fill_block);

    map.resize(args.new_width, args.new_height, anchor, fill);

    let output = args.output.as_ref().unwrap_or(&args.map.blk);
    map.write_blk(output).map_err(|source| PolishedError::Blk {
        path: output.clone(),
        source,
    })?;
    Ok(map)
}

pub fn run(args: ResizeArgs, printer: &Printer) -> Result<()> {
    let map = resize(&args)?;
    let output = args.output.as_ref().unwrap_or(&args.map.blk);
    printer.success(
        "Resized",
        &format!(
            "{} to {}x{}",
            display_path(output),
            map.width(),
            map.height()
        ),
    );
    let filename = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if size_from_filename(&filename).is_some_and(|size| size != map.size()) {
        printer.warning("Note", "the filename still carries the old size");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(blk: PathBuf, w: usize, h: usize) -> ResizeArgs {
        ResizeArgs {
            map: MapArgs {
                blk,
                width: None,
                height: None,
                tileset: None,
                roof: None,
            },
            new_width: w,
            new_height: h,
            anchor: None,
            fill: None,
            output: None,
        }
    }

    #[test]
    fn test_resize_uses_manifest_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("polished.yaml"), "fill_block: 7\nresize_anchor: top-left\n")
            .unwrap();
        let blk = root.join("Route1.2x2.blk");
        fs::write(&blk, [1u8, 2, 3, 4]).unwrap();

        let map = resize(&args(blk.clone(), 3, 2)).unwrap();
        assert_eq!(map.blocks(), &[1, 2, 7, 3, 4, 7]);
        assert_eq!(fs::read(&blk).unwrap(), vec![1, 2, 7, 3, 4, 7]);
    }

    #[test]
    fn test_resize_flags_override_manifest() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("main.asm"), "").unwrap();
        let blk = root.join("Route1.2x2.blk");
        fs::write(&blk, [1u8, 2, 3, 4]).unwrap();
        let out = root.join("Route1.2x3.blk");

        let mut a = args(blk.clone(), 2, 3);
        a.anchor = Some(Anchor::Bottom);
        a.fill = Some(9);
        a.output = Some(out.clone());
        resize(&a).unwrap();

        assert_eq!(fs::read(&out).unwrap(), vec![9, 9, 1, 2, 3, 4]);
        assert_eq!(fs::read(&blk).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_resize_rejects_bad_size() {
        let dir = tempdir().unwrap();
        let blk = dir.path().join("Route1.2x2.blk");
        assert!(resize(&args(blk.clone(), 0, 2)).is_err());
        assert!(resize(&args(blk, 2, 256)).is_err());
    }
}
