//! Locating project files across the historical pokecrystal/pokered layouts.
//!
//! Each artifact has a short list of candidate paths, newest convention
//! first. Lookup returns the first candidate that exists, or the last one
//! so that callers creating a new file still get a sensible path.

use std::path::{Path, PathBuf};

/// Existence checks, so lookups can run against a fake filesystem.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl<F> FileSystem for F
where
    F: Fn(&Path) -> bool,
{
    fn exists(&self, path: &Path) -> bool {
        self(path)
    }
}

/// A logical project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Graphics,
    RoofGraphics,
    Metatiles,
    Attributes,
    Collisions,
    PaletteMap,
    MapConstants,
    MapHeaders,
    MapHeader,
    TilesetConstants,
    BgPalette,
}

impl Artifact {
    /// Candidate paths relative to the project root, in priority order.
    ///
    /// `name` is the tileset (or map) name; artifacts that do not depend on
    /// it ignore it.
    pub fn candidates(self, name: &str) -> Vec<PathBuf> {
        let stem = name.split('.').next().unwrap_or(name);
        let paths: Vec<String> = match self {
            Artifact::Graphics => vec![
                format!("gfx/tilesets/{name}.png"),
                format!("gfx/tilesets/{name}.2bpp"),
                format!("gfx/tilesets/{name}.2bpp.lz"),
            ],
            Artifact::RoofGraphics => vec![
                format!("gfx/tilesets/roofs/{name}.png"),
                format!("gfx/tilesets/roofs/{name}.2bpp"),
            ],
            Artifact::Metatiles => vec![
                format!("data/tilesets/{name}_metatiles.bin"),
                format!("gfx/blocksets/{stem}.bst"),
                format!("tilesets/{name}_metatiles.bin"),
            ],
            Artifact::Attributes => vec![
                format!("data/tilesets/{name}_attributes.bin"),
                format!("tilesets/{name}_attributes.bin"),
            ],
            Artifact::Collisions => vec![
                format!("data/tilesets/{name}_collision.asm"),
                format!("data/tilesets/{name}_collision.bin"),
                format!("tilesets/{name}_collision.asm"),
            ],
            Artifact::PaletteMap => vec![
                format!("gfx/tilesets/{name}_palette_map.asm"),
                format!("color/tilesets/{stem}.asm"),
                format!("tilesets/{name}_palette_map.asm"),
            ],
            Artifact::MapConstants => vec![
                "constants/map_dimension_constants.asm".to_string(),
                "constants/map_constants.asm".to_string(),
            ],
            Artifact::MapHeaders => vec![
                "data/maps/maps.asm".to_string(),
                "maps/map_headers.asm".to_string(),
            ],
            Artifact::MapHeader => vec![
                format!("data/maps/headers/{name}.asm"),
                format!("data/mapHeaders/{name}.asm"),
            ],
            Artifact::TilesetConstants => vec![
                "constants/tileset_constants.asm".to_string(),
                "constants/tilemap_constants.asm".to_string(),
            ],
            Artifact::BgPalette => vec![
                "gfx/tilesets/bg_tiles.pal".to_string(),
                "tilesets/bg.pal".to_string(),
            ],
        };
        paths.into_iter().map(PathBuf::from).collect()
    }
}

/// Locate an artifact on the real filesystem.
pub fn locate(root: &Path, artifact: Artifact, name: &str) -> PathBuf {
    locate_in(&RealFs, root, artifact, name)
}

/// First existing candidate under `root`, else the last candidate.
pub fn locate_in(fs: &impl FileSystem, root: &Path, artifact: Artifact, name: &str) -> PathBuf {
    let candidates = artifact.candidates(name);
    let mut last = root.to_path_buf();
    for candidate in candidates {
        let path = root.join(candidate);
        if fs.exists(&path) {
            return path;
        }
        last = path;
    }
    last
}

/// First existing candidate under `root`, if any.
pub fn locate_existing(
    fs: &impl FileSystem,
    root: &Path,
    artifact: Artifact,
    name: &str,
) -> Option<PathBuf> {
    artifact
        .candidates(name)
        .into_iter()
        .map(|candidate| root.join(candidate))
        .find(|path| fs.exists(path))
}

/// Files that mark a project root.
const ROOT_MARKERS: [&str; 2] = ["main.asm", "polished.yaml"];

/// Walk up from a blk file to the nearest directory holding a root marker.
pub fn project_root(blk_path: &Path, fs: &impl FileSystem) -> Option<PathBuf> {
    let start = blk_path.parent()?;
    start
        .ancestors()
        .find(|dir| ROOT_MARKERS.iter().any(|marker| fs.exists(&dir.join(marker))))
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fake(paths: &[&str]) -> impl Fn(&Path) -> bool {
        let set: HashSet<PathBuf> = paths.iter().map(PathBuf::from).collect();
        move |path: &Path| set.contains(path)
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let fs = fake(&[
            "/proj/gfx/tilesets/johto.2bpp",
            "/proj/gfx/tilesets/johto.2bpp.lz",
        ]);
        assert_eq!(
            locate_in(&fs, Path::new("/proj"), Artifact::Graphics, "johto"),
            PathBuf::from("/proj/gfx/tilesets/johto.2bpp")
        );
    }

    #[test]
    fn test_falls_back_to_last_candidate() {
        let fs = fake(&[]);
        assert_eq!(
            locate_in(&fs, Path::new("/proj"), Artifact::Metatiles, "johto"),
            PathBuf::from("/proj/tilesets/johto_metatiles.bin")
        );
        assert_eq!(
            locate_existing(&fs, Path::new("/proj"), Artifact::Metatiles, "johto"),
            None
        );
    }

    #[test]
    fn test_stem_cuts_at_first_dot() {
        let fs = fake(&["/p/gfx/blocksets/overworld.bst"]);
        assert_eq!(
            locate_in(&fs, Path::new("/p"), Artifact::Metatiles, "overworld.t2"),
            PathBuf::from("/p/gfx/blocksets/overworld.bst")
        );
        assert_eq!(
            Artifact::PaletteMap.candidates("overworld.t2")[1],
            PathBuf::from("color/tilesets/overworld.asm")
        );
    }

    #[test]
    fn test_name_independent_artifacts() {
        let fs = fake(&["/p/constants/map_constants.asm"]);
        assert_eq!(
            locate_in(&fs, Path::new("/p"), Artifact::MapConstants, ""),
            PathBuf::from("/p/constants/map_constants.asm")
        );
    }

    #[test]
    fn test_project_root() {
        let fs = fake(&["/home/me/crystal/main.asm"]);
        assert_eq!(
            project_root(Path::new("/home/me/crystal/maps/Route1.blk"), &fs),
            Some(PathBuf::from("/home/me/crystal"))
        );
        assert_eq!(project_root(Path::new("/elsewhere/Route1.blk"), &fs), None);
    }

    #[test]
    fn test_real_fs() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data/maps")).unwrap();
        std::fs::write(dir.path().join("data/maps/maps.asm"), "").unwrap();
        assert_eq!(
            locate(dir.path(), Artifact::MapHeaders, ""),
            dir.path().join("data/maps/maps.asm")
        );
    }
}
