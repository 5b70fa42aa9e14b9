//! Project discovery and loading.
//!
//! A project is a pokecrystal- or pokered-style disassembly checkout. This
//! module locates its files, guesses map metadata from its sources, and
//! loads metatilesets and maps from it.

pub mod manifest;
pub mod metadata;
pub mod paths;
pub mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PolishedError, Result};
use crate::metatileset::{wrap, Metatileset, MetatilesetPaths};
use crate::types::{Map, MapAttributes, Options, MAX_MAP_SIZE};

pub use manifest::{Manifest, MANIFEST_FILE};
pub use metadata::{MapHeaderInfo, MapSize, TilesetNames};
pub use paths::{locate, locate_existing, locate_in, project_root, Artifact, FileSystem, RealFs};
pub use scanner::{guess_choice, list_roofs, list_tilesets, TilesetChoice};

/// What the project sources say about a blk file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapGuess {
    /// Width and height, if any heuristic found them.
    pub size: Option<(usize, usize)>,
    pub attributes: MapAttributes,
}

/// An opened project root.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Open a project at `root`, reading its manifest if present.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(PolishedError::Project {
                message: format!("{} is not a directory", root.display()),
                help: None,
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            manifest: Manifest::find(root)?,
        })
    }

    /// Open the project containing a blk file.
    pub fn discover(blk: &Path) -> Result<Self> {
        let root = project_root(blk, &RealFs).ok_or_else(|| PolishedError::Project {
            message: format!("No project found above {}", blk.display()),
            help: Some(format!(
                "Run inside a disassembly with a main.asm, or add a {}",
                MANIFEST_FILE
            )),
        })?;
        Self::open(&root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn options(&self) -> Options {
        self.manifest.options()
    }

    pub fn locate(&self, artifact: Artifact, name: &str) -> PathBuf {
        locate(&self.root, artifact, name)
    }

    fn read_artifact(&self, artifact: Artifact, name: &str) -> Option<String> {
        let path = locate_existing(&RealFs, &self.root, artifact, name)?;
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Tileset display names from the tileset constants file.
    pub fn tileset_names(&self) -> TilesetNames {
        self.read_artifact(Artifact::TilesetConstants, "")
            .map(|text| metadata::tileset_names(&text))
            .unwrap_or_default()
    }

    pub fn tilesets(&self) -> Vec<TilesetChoice> {
        list_tilesets(&self.root, &self.tileset_names())
    }

    pub fn roofs(&self) -> Vec<String> {
        list_roofs(&self.root)
    }

    /// Guess a blk file's size and attributes.
    ///
    /// Sizes come from the filename, then the map constants. The tileset
    /// comes from the filename, then the map headers listing, then a
    /// per-map header file. A guessed tileset is matched against the
    /// graphics actually present.
    pub fn resolve_map(&self, blk: &Path) -> MapGuess {
        let filename = blk
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let map_name = metadata::map_name(&filename);
        let mut guess = MapGuess::default();

        guess.size = metadata::size_from_filename(&filename);
        if guess.size.is_none() {
            if let Some(size) = self
                .read_artifact(Artifact::MapConstants, "")
                .and_then(|text| metadata::guess_map_size(&filename, &text))
            {
                guess.size = Some((size.width, size.height));
                guess.attributes.group = size.group;
            }
        }

        let tileset = if let Some(tileset) = metadata::tileset_from_filename(&filename) {
            tileset
        } else if let Some(headers) = self.read_artifact(Artifact::MapHeaders, "") {
            match metadata::guess_map_header(map_name, &headers) {
                Some(header) => {
                    guess.attributes.environment = header.environment;
                    guess.attributes.landmark = header.landmark;
                    guess.attributes.palette = header.palette;
                    header.tileset
                }
                None => String::new(),
            }
        } else {
            self.read_artifact(Artifact::MapHeader, map_name)
                .and_then(|text| metadata::tileset_from_map_header(&text))
                .unwrap_or_default()
        };

        let names = self.tileset_names();
        let choices = list_tilesets(&self.root, &names);
        guess.attributes.tileset = match guess_choice(&choices, &tileset, &names) {
            Some(choice) => choice.name.clone(),
            None => tileset,
        };

        log::debug!(
            "Guessed {} as {:?} with tileset {:?}",
            filename,
            guess.size,
            guess.attributes.tileset
        );
        guess
    }

    /// Where a tileset's metatile files live. Attributes and collisions are
    /// only included when the project has them.
    pub fn metatileset_paths(&self, tileset: &str) -> MetatilesetPaths {
        MetatilesetPaths {
            metatiles: Some(self.locate(Artifact::Metatiles, tileset)),
            attributes: locate_existing(&RealFs, &self.root, Artifact::Attributes, tileset),
            collisions: locate_existing(&RealFs, &self.root, Artifact::Collisions, tileset),
        }
    }

    /// Load a tileset's graphics, metatiles, attributes, collisions and
    /// palettes. Graphics and metatiles are required; the rest load when
    /// present.
    pub fn load_metatileset(&self, tileset: &str, roof: Option<&str>) -> Result<Metatileset> {
        if tileset.is_empty() {
            return Err(PolishedError::Project {
                message: "No tileset chosen".to_string(),
                help: Some("Name the file NAME.TILESET.blk or pass --tileset".to_string()),
            });
        }

        let mut metatileset = Metatileset::new(self.options());

        let gfx = self.locate(Artifact::Graphics, tileset);
        metatileset
            .tileset_mut()
            .load(&gfx)
            .map_err(|source| PolishedError::Gfx { path: gfx, source })?;

        if let Some(roof) = roof {
            let path = self.locate(Artifact::RoofGraphics, roof);
            metatileset
                .tileset_mut()
                .load_roof(&path)
                .map_err(|source| PolishedError::Gfx { path, source })?;
        }

        let paths = self.metatileset_paths(tileset);
        if let Some(path) = &paths.metatiles {
            metatileset.read_metatiles(path).map_err(|e| wrap(path, e))?;
        }
        if let Some(path) = &paths.attributes {
            metatileset.read_attributes(path).map_err(|e| wrap(path, e))?;
        }
        if let Some(path) = &paths.collisions {
            metatileset.read_collisions(path).map_err(|e| wrap(path, e))?;
        }
        if let Some(path) = locate_existing(&RealFs, &self.root, Artifact::BgPalette, "") {
            if let Err(e) = metatileset.load_palettes(&path) {
                log::warn!("Using built-in palettes: {}", e);
            }
        }

        metatileset.set_modified(false);
        Ok(metatileset)
    }

    /// Load a blk file with a guessed (or caller-supplied) size.
    pub fn load_map(&self, blk: &Path, guess: &MapGuess) -> Result<Map> {
        let Some((width, height)) = guess.size else {
            return Err(PolishedError::Project {
                message: format!("Unknown size for {}", blk.display()),
                help: Some("Name the file NAME.WxH.blk or pass --width and --height".to_string()),
            });
        };
        if !(1..=MAX_MAP_SIZE).contains(&width) || !(1..=MAX_MAP_SIZE).contains(&height) {
            return Err(PolishedError::Project {
                message: format!("Cannot load {} as {}x{}", blk.display(), width, height),
                help: Some(format!("Sizes run from 1 to {}", MAX_MAP_SIZE)),
            });
        }
        let mut map = Map::new(width, height);
        map.read_blk(blk).map_err(|source| PolishedError::Blk {
            path: blk.to_path_buf(),
            source,
        })?;
        map.attributes = guess.attributes.clone();
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &[u8]) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn crystal_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "main.asm", b"");
        write(
            root,
            "constants/map_constants.asm",
            b"\tnewgroup\n\tmap_const ROUTE_1, 2, 1\n",
        );
        write(
            root,
            "data/maps/maps.asm",
            b"\tmap Route1, TILESET_JOHTO, ROUTE, LANDMARK_ROUTE_1, MUSIC, TRUE, PALETTE_AUTO\n",
        );
        write(root, "gfx/tilesets/johto.2bpp", &[0xFF; 32]);
        write(root, "data/tilesets/johto_metatiles.bin", &[1; 32]);
        write(root, "data/tilesets/johto_attributes.bin", &[0x22; 32]);
        write(
            root,
            "data/tilesets/johto_collision.asm",
            b"\ttilecoll WALL, WALL, WALL, WALL ; 00\n\ttilecoll FLOOR, FLOOR, FLOOR, FLOOR ; 01\n",
        );
        write(root, "maps/Route1.blk", &[0, 1]);
        dir
    }

    #[test]
    fn test_resolve_map_from_project_sources() {
        let dir = crystal_project();
        let project = Project::open(dir.path()).unwrap();
        let guess = project.resolve_map(&dir.path().join("maps/Route1.blk"));

        assert_eq!(guess.size, Some((2, 1)));
        assert_eq!(guess.attributes.group, 1);
        assert_eq!(guess.attributes.environment, "ROUTE");
        assert_eq!(guess.attributes.landmark, "landmark_route_1");
        assert_eq!(guess.attributes.palette, "PALETTE_AUTO");
        // Plain .2bpp sheets are not listed as choices, so the guess stands
        assert_eq!(guess.attributes.tileset, "johto");
    }

    #[test]
    fn test_filename_overrides_sources() {
        let dir = crystal_project();
        let project = Project::open(dir.path()).unwrap();
        let guess = project.resolve_map(Path::new("Route1.3x4.kanto.blk"));
        assert_eq!(guess.size, Some((3, 4)));
        assert_eq!(guess.attributes.tileset, "kanto");
        assert_eq!(guess.attributes.environment, "");
    }

    #[test]
    fn test_load_metatileset_and_map() {
        let dir = crystal_project();
        let project = Project::discover(&dir.path().join("maps/Route1.blk")).unwrap();
        let mts = project.load_metatileset("johto", None).unwrap();
        assert_eq!(mts.tileset().num_tiles(), 2);
        assert_eq!(mts.size(), 2);
        assert_eq!(mts.metatile(1).cell(3, 3).palette, crate::types::Palette::Green);
        assert_eq!(
            mts.collisions().label(1, crate::types::Quadrant::TopLeft),
            "FLOOR"
        );
        assert!(!mts.modified());

        let blk = dir.path().join("maps/Route1.blk");
        let map = project.load_map(&blk, &project.resolve_map(&blk)).unwrap();
        assert_eq!(map.blocks(), &[0, 1]);
        assert_eq!(map.attributes.tileset, "johto");
    }

    #[test]
    fn test_pokered_map_header() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "data/mapHeaders/PalletTown.asm", b"PalletTown_h:\n\tdb OVERWORLD\n");
        let project = Project::open(dir.path()).unwrap();
        let guess = project.resolve_map(Path::new("PalletTown.blk"));
        assert_eq!(guess.attributes.tileset, "overworld");
        assert_eq!(guess.size, None);
        assert!(project.load_map(Path::new("PalletTown.blk"), &guess).is_err());
    }

    #[test]
    fn test_load_metatileset_errors() {
        let dir = crystal_project();
        let project = Project::open(dir.path()).unwrap();
        assert!(matches!(
            project.load_metatileset("kanto", None),
            Err(PolishedError::Gfx { .. })
        ));
        assert!(matches!(
            project.load_metatileset("", None),
            Err(PolishedError::Project { .. })
        ));
        assert!(Project::open(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_load_map_rejects_out_of_range_size() {
        let dir = crystal_project();
        let project = Project::open(dir.path()).unwrap();
        let blk = dir.path().join("maps/Route1.blk");
        for size in [(0, 4), (300, 1), (2, 256)] {
            let guess = MapGuess {
                size: Some(size),
                ..MapGuess::default()
            };
            assert!(matches!(
                project.load_map(&blk, &guess),
                Err(PolishedError::Project { .. })
            ));
        }
    }

    #[test]
    fn test_save_without_collision_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "main.asm", b"");
        write(dir.path(), "gfx/tilesets/johto.2bpp", &[0; 16]);
        write(dir.path(), "data/tilesets/johto_metatiles.bin", &[0; 16]);
        let project = Project::open(dir.path()).unwrap();

        let paths = project.metatileset_paths("johto");
        assert_eq!(paths.collisions, None);

        let mut mts = project.load_metatileset("johto", None).unwrap();
        mts.metatile_mut(0).set_tile_id(1, 1, 0);
        mts.resize(2);
        mts.save(&paths).unwrap();
        assert!(!mts.modified());
        assert_eq!(
            fs::read(dir.path().join("data/tilesets/johto_metatiles.bin")).unwrap().len(),
            32
        );
        assert!(!dir.path().join("tilesets").exists());
    }
}
